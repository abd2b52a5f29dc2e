//! High-level API for garb operations

use crate::exceptions::{GarbError, Result};
use crate::ident::ResourceId;
use crate::packdb::format_v3::builder::TextureOutcome;
use crate::packdb::format_v3::catalog::CatalogDocument;
use crate::packdb::format_v3::constants::ASSET_BASE_ENV;
use crate::packdb::format_v3::hashing::ContentDigest;
use crate::packdb::format_v3::remote::HttpRemote;
use crate::packdb::format_v3::texture::TextureSet;
use crate::packdb::{self, PackageFormat};
use std::path::Path;

/// Options for exporting a package
#[derive(Debug, Default)]
pub struct ExportOptions {
    /// Base URL of the asset service
    pub base_url: Option<String>,
    /// Identifier stamped on the export; generated when absent
    pub export_id: Option<ResourceId>,
}

/// Result of a plain bundle export
#[derive(Debug)]
pub struct PlainReport {
    pub files: Vec<String>,
    pub skipped: Vec<String>,
}

/// Result of a packaged export
#[derive(Debug)]
pub struct PackageReport {
    pub export_id: ResourceId,
    pub outcomes: Vec<TextureOutcome>,
    pub config_digest: ContentDigest,
    pub catalog: CatalogDocument,
    pub blob_count: usize,
}

/// Result of package verification
#[derive(Debug)]
pub struct VerifyReport {
    pub format: String,
    pub version: String,
    pub catalog_id: String,
    pub manifest_count: usize,
    pub blob_count: usize,
    pub config_digest: String,
    pub intact: bool,
}

/// Export a plain bundle: one named PNG per painted texture
pub fn export_plain_bundle(textures: TextureSet, output_path: &Path) -> Result<PlainReport> {
    let out = std::fs::File::create(output_path)?;
    let result = packdb::format_v3::build_plain(textures, out);
    let (_, report) = discard_failed_export(output_path, result)?;
    Ok(report)
}

/// Export a PackDB/v3 package
pub fn export_package(
    textures: TextureSet,
    output_path: &Path,
    options: ExportOptions,
) -> Result<PackageReport> {
    let base_url = resolve_base_url(&options)?;
    let remote = HttpRemote::new(base_url);
    let export_id = options.export_id.unwrap_or_else(ResourceId::generate);

    let out = std::fs::File::create(output_path)?;
    let result = packdb::format_v3::build_package(export_id, textures, &remote, out);
    let (_, report) = discard_failed_export(output_path, result)?;
    Ok(report)
}

/// Verify a package
pub fn verify_package(package_path: &Path) -> Result<VerifyReport> {
    let format = packdb::detect_format(package_path)?;

    match format {
        PackageFormat::PackDbV3 => packdb::format_v3::verify(package_path),
    }
}

/// Remove the output file left behind by a failed build
fn discard_failed_export<T>(output_path: &Path, result: Result<T>) -> Result<T> {
    if result.is_err() {
        let _ = std::fs::remove_file(output_path);
    }
    result
}

/// Resolve the asset service base URL
fn resolve_base_url(options: &ExportOptions) -> Result<String> {
    // Priority order:
    // 1. Explicit base_url from options
    // 2. GARB_ASSET_BASE environment variable
    // No fallback - the asset service must be explicitly specified
    if let Some(ref base_url) = options.base_url {
        Ok(base_url.clone())
    } else if let Ok(base_url) = std::env::var(ASSET_BASE_ENV) {
        Ok(base_url)
    } else {
        Err(GarbError::Generic(
            "Asset service base URL must be specified via --base-url or GARB_ASSET_BASE environment variable".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packdb::format_v3::texture::TextureBuffer;
    use tempfile::TempDir;

    fn undersized_texture() -> TextureSet {
        let mut textures = TextureSet::new();
        // 4x4 RGBA needs 64 bytes
        textures.insert(
            "Head-Front",
            Some(TextureBuffer::Rgba {
                width: 4,
                height: 4,
                pixels: vec![0u8; 3],
            }),
        );
        textures
    }

    #[test]
    fn test_failed_plain_export_leaves_no_output_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.zip");

        let err = export_plain_bundle(undersized_texture(), &path).unwrap_err();
        assert!(matches!(err, GarbError::UnsupportedImage(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_package_export_leaves_no_output_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.zip");
        let options = ExportOptions {
            base_url: Some("http://127.0.0.1:9".to_string()),
            export_id: None,
        };

        // Texture encoding fails before any fetch is attempted
        let err = export_package(undersized_texture(), &path, options).unwrap_err();
        assert!(matches!(err, GarbError::UnsupportedImage(_)));
        assert!(!path.exists());
    }
}
