//! OSM XML rendering of finished entities.
//!
//! Free-text attribute values are escaped with `quick-xml` plus character
//! references for line breaks, so `Main St & 1st` comes out as
//! `Main St &amp; 1st` and an embedded newline as `&#xA;`. Tags are written in key
//! order and a whole graph is written in identifier order so output is
//! stable across runs.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;

use crate::{BBox, Member, MemberTarget, Metadata, Node, OsmGraph, Relation, Tags, Way};

/// Generator attribute written on the root element.
pub const GENERATOR: &str = concat!("osmgraph ", env!("CARGO_PKG_VERSION"));

/// Streams OSM XML elements into a writer.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use osmgraph_core::xml::OsmXmlWriter;
/// use osmgraph_core::{Metadata, Node, Point, Tags, Timestamp, User};
///
/// let node = Node {
///     id: 1,
///     point: Point::new(52.5, 13.4),
///     meta: Metadata {
///         version: 1,
///         timestamp: Arc::new(Timestamp::from_millis(0)),
///         changeset: 7,
///         visible: true,
///         user: Arc::new(User::new(5, "bob")),
///     },
///     tags: Tags::from_iter([("name", "Main St & 1st")]),
/// };
/// let mut writer = OsmXmlWriter::new(Vec::new());
/// writer.write_node(&node)?;
/// let xml = String::from_utf8(writer.into_inner()).expect("utf-8 output");
/// assert!(xml.contains(r#"v="Main St &amp; 1st""#));
/// # Ok::<(), quick_xml::Error>(())
/// ```
pub struct OsmXmlWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> OsmXmlWriter<W> {
    /// Wrap `inner`, indenting nested elements by two spaces.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Write a complete document: declaration, `<osm>`, bounds, then nodes,
    /// ways and relations each sorted by id.
    pub fn write_graph(&mut self, graph: &OsmGraph) -> quick_xml::Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("osm");
        root.push_attribute(("version", "0.6"));
        root.push_attribute(("generator", GENERATOR));
        self.writer.write_event(Event::Start(root))?;

        if !graph.bounds.is_empty() {
            self.write_bounds(&graph.bounds)?;
        }
        for node in sorted_by_id(&graph.nodes) {
            self.write_node(node)?;
        }
        for way in sorted_by_id(&graph.ways) {
            self.write_way(way)?;
        }
        for relation in sorted_by_id(&graph.relations) {
            self.write_relation(relation)?;
        }

        self.writer.write_event(Event::End(BytesEnd::new("osm")))
    }

    /// Write a `<bounds>` element.
    pub fn write_bounds(&mut self, bounds: &BBox) -> quick_xml::Result<()> {
        let mut element = BytesStart::new("bounds");
        element.push_attribute(("minlat", bounds.lower_left.lat.to_string().as_str()));
        element.push_attribute(("minlon", bounds.lower_left.lon.to_string().as_str()));
        element.push_attribute(("maxlat", bounds.upper_right.lat.to_string().as_str()));
        element.push_attribute(("maxlon", bounds.upper_right.lon.to_string().as_str()));
        self.writer.write_event(Event::Empty(element))
    }

    /// Write a `<node>` element with its tags.
    pub fn write_node(&mut self, node: &Node) -> quick_xml::Result<()> {
        let mut element = BytesStart::new("node");
        element.push_attribute(("id", node.id.to_string().as_str()));
        element.push_attribute(("lat", node.point.lat.to_string().as_str()));
        element.push_attribute(("lon", node.point.lon.to_string().as_str()));
        push_metadata(&mut element, &node.meta);
        if node.tags.is_empty() {
            return self.writer.write_event(Event::Empty(element));
        }
        self.writer.write_event(Event::Start(element))?;
        self.write_tags(&node.tags)?;
        self.writer.write_event(Event::End(BytesEnd::new("node")))
    }

    /// Write a `<way>` element with its node references and tags.
    pub fn write_way(&mut self, way: &Way) -> quick_xml::Result<()> {
        let mut element = BytesStart::new("way");
        element.push_attribute(("id", way.id.to_string().as_str()));
        push_metadata(&mut element, &way.meta);
        self.writer.write_event(Event::Start(element))?;
        for node_id in &way.node_ids {
            let mut nd = BytesStart::new("nd");
            nd.push_attribute(("ref", node_id.to_string().as_str()));
            self.writer.write_event(Event::Empty(nd))?;
        }
        self.write_tags(&way.tags)?;
        self.writer.write_event(Event::End(BytesEnd::new("way")))
    }

    /// Write a `<relation>` element with its members and tags.
    pub fn write_relation(&mut self, relation: &Relation) -> quick_xml::Result<()> {
        let mut element = BytesStart::new("relation");
        element.push_attribute(("id", relation.id.to_string().as_str()));
        push_metadata(&mut element, &relation.meta);
        self.writer.write_event(Event::Start(element))?;
        for member in &relation.members {
            self.write_member(member)?;
        }
        self.write_tags(&relation.tags)?;
        self.writer.write_event(Event::End(BytesEnd::new("relation")))
    }

    fn write_member(&mut self, member: &Member) -> quick_xml::Result<()> {
        let (kind, id) = match &member.target {
            Some(MemberTarget::Node(node)) => ("node", node.id),
            Some(MemberTarget::Way(way)) => ("way", way.id),
            Some(MemberTarget::Relation(relation)) => ("relation", relation.id),
            None => (member.kind.as_str(), member.id),
        };
        let mut element = BytesStart::new("member");
        element.push_attribute(("type", kind));
        element.push_attribute(("ref", id.to_string().as_str()));
        element.push_attribute(text_attribute("role", &member.role));
        self.writer.write_event(Event::Empty(element))
    }

    fn write_tags(&mut self, tags: &Tags) -> quick_xml::Result<()> {
        for (key, value) in tags.iter() {
            let mut element = BytesStart::new("tag");
            element.push_attribute(text_attribute("k", key));
            element.push_attribute(text_attribute("v", value));
            self.writer.write_event(Event::Empty(element))?;
        }
        Ok(())
    }
}

fn push_metadata(element: &mut BytesStart<'_>, meta: &Metadata) {
    element.push_attribute(("version", meta.version.to_string().as_str()));
    element.push_attribute(("timestamp", meta.timestamp.to_rfc3339().as_str()));
    element.push_attribute(("changeset", meta.changeset.to_string().as_str()));
    element.push_attribute(("uid", meta.user.id.to_string().as_str()));
    element.push_attribute(text_attribute("user", &meta.user.name));
    element.push_attribute(("visible", if meta.visible { "true" } else { "false" }));
}

/// Attribute whose value is escaped for markup and line breaks.
///
/// Readers normalise raw `\n` and `\r` inside attribute values to spaces,
/// so both are written as character references.
fn text_attribute<'a>(key: &'a str, value: &'a str) -> Attribute<'a> {
    let escaped = match escape(value) {
        Cow::Borrowed(text) if !text.contains(['\n', '\r']) => Cow::Borrowed(text.as_bytes()),
        escaped => Cow::Owned(
            escaped
                .replace('\n', "&#xA;")
                .replace('\r', "&#xD;")
                .into_bytes(),
        ),
    };
    Attribute {
        key: QName(key.as_bytes()),
        value: escaped,
    }
}

fn sorted_by_id<T>(entities: &HashMap<i64, Arc<T>>) -> Vec<&T> {
    let mut sorted: Vec<(i64, &T)> = entities
        .iter()
        .map(|(id, entity)| (*id, entity.as_ref()))
        .collect();
    sorted.sort_unstable_by_key(|(id, _)| *id);
    sorted.into_iter().map(|(_, entity)| entity).collect()
}
