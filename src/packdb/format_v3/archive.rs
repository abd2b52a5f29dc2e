//! Archive assembly
//!
//! Both export modes produce a ZIP container. The writer owns the fixed
//! package layout and tracks which blob digests it has stored, so
//! identical content lands in the archive exactly once.

use log::{debug, trace};
use std::collections::HashSet;
use std::io::{Seek, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::constants::{ASSETS_DIR, CATALOG_RECORD_PATH};
use super::hashing::ContentDigest;
use crate::exceptions::Result;

/// Archive path of a content-addressed blob
pub fn blob_path(digest: &ContentDigest) -> String {
    format!("{ASSETS_DIR}/{digest}")
}

/// Writes the fixed package layout into a ZIP container
pub struct BundleWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    stored_blobs: HashSet<ContentDigest>,
}

impl<W: Write + Seek> BundleWriter<W> {
    pub fn new(sink: W) -> Self {
        BundleWriter {
            zip: ZipWriter::new(sink),
            stored_blobs: HashSet::new(),
        }
    }

    /// Store a content-addressed blob under `Assets/<digest>`
    ///
    /// A digest already stored is skipped: content addressing makes the
    /// repeat write byte-identical, and the container keeps one copy.
    pub fn put_blob(&mut self, digest: &ContentDigest, bytes: &[u8]) -> Result<()> {
        if !self.stored_blobs.insert(*digest) {
            trace!("⏭️  Blob {digest} already stored, skipping");
            return Ok(());
        }

        let path = blob_path(digest);
        self.zip.start_file(&*path, SimpleFileOptions::default())?;
        self.zip.write_all(bytes)?;
        debug!("📦 Stored blob {path} ({} bytes)", bytes.len());
        Ok(())
    }

    /// Store a plain named file at the archive root
    pub fn put_named_file(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.zip.start_file(name, SimpleFileOptions::default())?;
        self.zip.write_all(bytes)?;
        debug!("📦 Stored {name} ({} bytes)", bytes.len());
        Ok(())
    }

    /// Store the catalog record JSON at its fixed top-level path
    pub fn put_catalog_record(&mut self, json: &str) -> Result<()> {
        self.put_named_file(CATALOG_RECORD_PATH, json.as_bytes())
    }

    /// Number of distinct blobs stored so far
    pub fn blob_count(&self) -> usize {
        self.stored_blobs.len()
    }

    /// Whether a blob with this digest is already stored
    pub fn contains_blob(&self, digest: &ContentDigest) -> bool {
        self.stored_blobs.contains(digest)
    }

    /// Write the central directory and hand back the sink
    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}

impl<W: Write + Seek> std::fmt::Debug for BundleWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleWriter")
            .field("stored_blobs", &self.stored_blobs.len())
            .finish()
    }
}
