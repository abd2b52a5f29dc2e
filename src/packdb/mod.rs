//! Package format implementations

pub mod format_v3;

use crate::exceptions::{GarbError, Result};
use std::path::Path;

/// Supported package formats
#[derive(Debug, Clone, Copy)]
pub enum PackageFormat {
    PackDbV3,
}

/// Detect the format of a package by probing its container
pub fn detect_format(package_path: &Path) -> Result<PackageFormat> {
    use std::fs::File;
    use std::io::Read;

    log::trace!("Detecting format for: {:?}", package_path);
    let mut file = File::open(package_path)?;

    // A PackDB package is a ZIP archive carrying the catalog record
    let mut magic = [0u8; 4];
    let is_zip =
        file.read_exact(&mut magic).is_ok() && &magic[..] == format_v3::constants::ZIP_MAGIC;
    if is_zip {
        if let Ok(mut archive) = zip::ZipArchive::new(file) {
            if archive
                .by_name(format_v3::constants::CATALOG_RECORD_PATH)
                .is_ok()
            {
                log::debug!("Found catalog record, package is PackDB/v3");
                return Ok(PackageFormat::PackDbV3);
            }
        }
        log::trace!("ZIP container without a catalog record");
    }

    Err(GarbError::UnsupportedFormat(
        "Not a PackDB package".to_string(),
    ))
}
