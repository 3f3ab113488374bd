use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};
use osmgraph_core::primitive::Primitive;
use osmgraph_core::{
    DecodeError, DecodeOptions, Handler, OsmGraph, PassSummary, ResolveError, materialize, stream,
};
use osmpbf::{Blob, BlobDecode, BlobReader};
use thiserror::Error;

mod convert;

/// Primitives decoded from an OSM PBF stream, one block at a time.
///
/// Header blobs are skipped. Blobs of an unknown type surface as
/// [`Primitive::Unrecognized`] so the pipeline can count and skip them. The
/// iterator is fused after the first error.
pub struct PbfPrimitives<R: Read + Send> {
    blobs: BlobReader<R>,
    pending: VecDeque<Primitive>,
    finished: bool,
}

impl<R: Read + Send> PbfPrimitives<R> {
    /// Decode primitives from `reader`.
    pub fn new(reader: R) -> Self {
        Self::from_blobs(BlobReader::new(reader))
    }

    fn from_blobs(blobs: BlobReader<R>) -> Self {
        Self {
            blobs,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn fill(&mut self, blob: &Blob) -> Result<(), osmpbf::Error> {
        match blob.decode()? {
            BlobDecode::OsmHeader(_) => debug!("Skipping OSM header blob"),
            BlobDecode::OsmData(block) => {
                self.pending.extend(block.elements().map(convert::element));
            }
            BlobDecode::Unknown(kind) => self.pending.push_back(Primitive::Unrecognized {
                kind: kind.to_owned(),
            }),
        }
        Ok(())
    }
}

impl PbfPrimitives<BufReader<File>> {
    /// Open the file at `path`.
    ///
    /// # Errors
    /// Returns the `osmpbf` error when the file cannot be opened.
    pub fn from_path(path: &Path) -> Result<Self, osmpbf::Error> {
        BlobReader::from_path(path).map(Self::from_blobs)
    }
}

impl<R: Read + Send> Iterator for PbfPrimitives<R> {
    type Item = Result<Primitive, osmpbf::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(primitive) = self.pending.pop_front() {
                return Some(Ok(primitive));
            }
            if self.finished {
                return None;
            }
            let decoded = self
                .blobs
                .next()?
                .and_then(|blob| self.fill(&blob));
            if let Err(err) = decoded {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}

/// Where PBF data was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A file on disk.
    Path(PathBuf),
    /// An in-memory buffer.
    Bytes,
    /// A caller-supplied reader.
    Reader,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bytes => f.write_str("in-memory buffer"),
            Self::Reader => f.write_str("reader"),
        }
    }
}

/// Errors returned when loading or streaming an OSM PBF dataset.
#[derive(Debug, Error)]
pub enum OsmLoadError {
    /// The file could not be opened.
    #[error("failed to open OSM PBF file at {path:?}")]
    Open {
        /// Error reported by `osmpbf`.
        #[source]
        source: osmpbf::Error,
        /// Path that was requested.
        path: PathBuf,
    },
    /// A blob or block could not be decoded.
    #[error("failed to decode OSM PBF data from {origin}")]
    Decode {
        /// Error reported by `osmpbf`.
        #[source]
        source: osmpbf::Error,
        /// Source of the corrupt data.
        origin: Origin,
    },
    /// A way or relation referenced an entity that never appeared.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl OsmLoadError {
    fn from_decode(err: DecodeError<osmpbf::Error>, origin: Origin) -> Self {
        match err {
            DecodeError::Source(source) => Self::Decode { source, origin },
            DecodeError::Resolve(err) => Self::Resolve(err),
        }
    }
}

/// Load a PBF file into a fully resolved graph.
///
/// # Errors
/// Returns [`OsmLoadError::Open`] when the file cannot be opened,
/// [`OsmLoadError::Decode`] for corrupt data and [`OsmLoadError::Resolve`]
/// when a reference does not resolve.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use osmgraph_core::DecodeOptions;
/// use osmgraph_data::load_osm_pbf;
///
/// # fn main() -> Result<(), osmgraph_data::OsmLoadError> {
/// let graph = load_osm_pbf(Path::new("berlin.osm.pbf"), &DecodeOptions::default())?;
/// println!("Loaded {} ways", graph.ways.len());
/// # Ok(())
/// # }
/// ```
pub fn load_osm_pbf(path: &Path, options: &DecodeOptions) -> Result<OsmGraph, OsmLoadError> {
    info!("Loading OSM PBF file {}", path.display());
    let primitives = open(path)?;
    materialize(primitives, options)
        .map_err(|err| OsmLoadError::from_decode(err, Origin::Path(path.to_path_buf())))
}

/// Load PBF data already held in memory.
///
/// # Errors
/// As [`load_osm_pbf`], without the open failure.
pub fn load_osm_pbf_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<OsmGraph, OsmLoadError> {
    materialize(PbfPrimitives::new(Cursor::new(bytes)), options)
        .map_err(|err| OsmLoadError::from_decode(err, Origin::Bytes))
}

/// Load PBF data from any reader.
///
/// # Errors
/// As [`load_osm_pbf`], without the open failure.
pub fn load_osm_pbf_reader<R>(reader: R, options: &DecodeOptions) -> Result<OsmGraph, OsmLoadError>
where
    R: Read + Send,
{
    materialize(PbfPrimitives::new(reader), options)
        .map_err(|err| OsmLoadError::from_decode(err, Origin::Reader))
}

/// Stream a PBF file through `handler`.
///
/// Pass `&mut handler` to inspect it afterwards. Entities delivered before a
/// failure stay with the handler.
///
/// # Errors
/// As [`load_osm_pbf`]. Resolve failures only occur when
/// [`DecodeOptions::references`] asks for resolution.
pub fn stream_osm_pbf<H: Handler>(
    path: &Path,
    handler: H,
    options: &DecodeOptions,
) -> Result<PassSummary, OsmLoadError> {
    info!("Streaming OSM PBF file {}", path.display());
    let primitives = open(path)?;
    stream(primitives, handler, options)
        .map_err(|err| OsmLoadError::from_decode(err, Origin::Path(path.to_path_buf())))
}

/// Stream PBF data from any reader through `handler`.
///
/// # Errors
/// As [`stream_osm_pbf`], without the open failure.
pub fn stream_osm_pbf_reader<R, H>(
    reader: R,
    handler: H,
    options: &DecodeOptions,
) -> Result<PassSummary, OsmLoadError>
where
    R: Read + Send,
    H: Handler,
{
    stream(PbfPrimitives::new(reader), handler, options)
        .map_err(|err| OsmLoadError::from_decode(err, Origin::Reader))
}

fn open(path: &Path) -> Result<PbfPrimitives<BufReader<File>>, OsmLoadError> {
    PbfPrimitives::from_path(path).map_err(|source| OsmLoadError::Open {
        source,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests;
