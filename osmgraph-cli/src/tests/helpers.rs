//! Test helpers for materializing PBF fixtures on disk.

use base64::{Engine as _, engine::general_purpose};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Temporary directory holding decoded fixtures, removed on drop.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace path");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Decode `<stem>.osm.pbf.b64` from the data crate's fixtures.
    pub(super) fn fixture(&self, stem: &str) -> Utf8PathBuf {
        let encoded_path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../osmgraph-data/tests/fixtures")
            .join(format!("{stem}.osm.pbf.b64"));
        let encoded = fs::read_to_string(&encoded_path).unwrap_or_else(|err| {
            panic!("failed to read base64 fixture {encoded_path}: {err}");
        });
        let cleaned: String = encoded
            .chars()
            .filter(|ch| !ch.is_ascii_whitespace())
            .collect();
        let decoded = general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .unwrap_or_else(|err| panic!("failed to decode base64 fixture {encoded_path}: {err}"));
        let path = self.root.join(format!("{stem}.osm.pbf"));
        fs::write(&path, decoded).expect("write decoded fixture");
        path
    }
}

pub(super) fn output_text(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("command output is utf-8")
}
