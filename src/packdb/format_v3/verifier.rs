//! PackDB/v3 package verifier

use super::archive::blob_path;
use super::catalog::CatalogDocument;
use super::codec::decode_config;
use super::constants::{ASSETS_DIR, CATALOG_RECORD_PATH, FORMAT_VERSION};
use super::hashing::ContentDigest;
use crate::api::VerifyReport;
use crate::exceptions::{GarbError, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Verify a PackDB/v3 package
pub fn verify(package_path: &Path) -> Result<VerifyReport> {
    info!("Verifying PackDB/v3 package: {package_path:?}");

    let file = File::open(package_path)?;
    let mut archive = ZipArchive::new(file)?;

    // Read the catalog record
    let catalog = read_catalog(&mut archive)?;

    // Verify manifest entries resolve to stored blobs of the declared size
    let manifest_resolved = verify_manifest_entries(&mut archive, &catalog)?;
    debug!(
        "Manifest entries: {}",
        if manifest_resolved {
            "✅ VALID"
        } else {
            "❌ INVALID"
        }
    );

    // Recompute every stored blob digest against its entry name
    let (blob_count, digests_valid) = verify_blob_digests(&mut archive)?;
    debug!(
        "Blob digests: {}",
        if digests_valid {
            "✅ VALID"
        } else {
            "❌ INVALID"
        }
    );

    // Decode the configuration blob named by assetUri
    let (config_digest, config_decodable) = match catalog.config_digest() {
        Ok(digest) => (
            digest.to_hex(),
            verify_config_blob(&mut archive, &digest)?,
        ),
        Err(e) => {
            debug!("❌ Catalog assetUri is malformed: {e}");
            (catalog.asset_uri.clone(), false)
        }
    };
    debug!(
        "Configuration blob: {}",
        if config_decodable {
            "✅ VALID"
        } else {
            "❌ INVALID"
        }
    );

    debug!(
        "🔍 Verification results: manifest={manifest_resolved}, digests={digests_valid}, config={config_decodable}"
    );
    let intact = manifest_resolved && digests_valid && config_decodable;

    Ok(VerifyReport {
        format: "PackDB".to_string(),
        version: format!("v{FORMAT_VERSION}"),
        catalog_id: catalog.id.clone(),
        manifest_count: catalog.asset_manifest.len(),
        blob_count,
        config_digest,
        intact,
    })
}

/// Read and parse the catalog record
fn read_catalog<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<CatalogDocument> {
    let mut record = String::new();
    archive
        .by_name(CATALOG_RECORD_PATH)
        .map_err(|e| {
            GarbError::VerificationFailed(format!("Package has no {CATALOG_RECORD_PATH}: {e}"))
        })?
        .read_to_string(&mut record)?;
    CatalogDocument::from_json(&record)
}

/// Check that every manifest entry names a stored blob of the declared size
fn verify_manifest_entries<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    catalog: &CatalogDocument,
) -> Result<bool> {
    for asset in &catalog.asset_manifest {
        let digest = match ContentDigest::parse_hex(&asset.hash) {
            Ok(digest) => digest,
            Err(_) => {
                debug!("❌ Manifest hash '{}' is not a content digest", asset.hash);
                return Ok(false);
            }
        };
        let path = blob_path(&digest);
        match archive.by_name(&path) {
            Ok(entry) => {
                if entry.size() != asset.bytes {
                    debug!(
                        "❌ Blob {path} is {} bytes, manifest declares {}",
                        entry.size(),
                        asset.bytes
                    );
                    return Ok(false);
                }
            }
            Err(_) => {
                debug!("❌ Manifest entry {path} is not stored");
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Recompute the digest of every `Assets/` entry and compare with its name
fn verify_blob_digests<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<(usize, bool)> {
    let prefix = format!("{ASSETS_DIR}/");
    let names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(&prefix))
        .map(str::to_string)
        .collect();

    let mut all_valid = true;
    for name in &names {
        let expected = match ContentDigest::parse_hex(&name[prefix.len()..]) {
            Ok(digest) => digest,
            Err(_) => {
                debug!("❌ Blob entry '{name}' is not named by a content digest");
                all_valid = false;
                continue;
            }
        };
        let mut entry = archive.by_name(name)?;
        let actual = ContentDigest::from_reader(&mut entry)?;
        if actual != expected {
            debug!("❌ Blob {name} recomputes to {actual}");
            all_valid = false;
        }
    }
    Ok((names.len(), all_valid))
}

/// Check the configuration blob is stored and decodes back to a document
fn verify_config_blob<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    digest: &ContentDigest,
) -> Result<bool> {
    let path = blob_path(digest);
    let mut blob = Vec::new();
    match archive.by_name(&path) {
        Ok(mut entry) => {
            entry.read_to_end(&mut blob)?;
        }
        Err(_) => {
            debug!("❌ Configuration blob {path} is not stored");
            return Ok(false);
        }
    }
    match decode_config(&blob) {
        Ok(_) => Ok(true),
        Err(e) => {
            debug!("❌ Configuration blob does not decode: {e}");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::archive::BundleWriter;
    use super::super::codec::encode_config;
    use super::*;
    use serde_json::json;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct PackageFixture {
        texture: Vec<u8>,
        texture_digest: ContentDigest,
        config_digest: ContentDigest,
    }

    impl PackageFixture {
        fn new() -> Self {
            let texture = b"fake png payload".to_vec();
            let texture_digest = ContentDigest::from_bytes(&texture);
            let config_blob = encode_config(&json!({"head": texture_digest.to_hex()})).unwrap();
            let config_digest = ContentDigest::from_bytes(&config_blob);
            Self {
                texture,
                texture_digest,
                config_digest,
            }
        }

        fn config_blob(&self) -> Vec<u8> {
            encode_config(&json!({"head": self.texture_digest.to_hex()})).unwrap()
        }

        fn catalog(&self, texture_bytes: u64) -> CatalogDocument {
            CatalogDocument {
                id: "R-Main".to_string(),
                kind: "avatar".to_string(),
                owner_id: 1,
                created_at: "2020-01-01T00:00:00.000Z".to_string(),
                updated_at: "2020-01-01T00:00:00.000Z".to_string(),
                asset_uri: format!("packdb:///{}", self.config_digest.to_hex()),
                asset_manifest: vec![super::super::catalog::AssetRef {
                    hash: self.texture_digest.to_hex(),
                    bytes: texture_bytes,
                }],
            }
        }
    }

    fn write_package(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_verify_reports_intact_package() {
        let fixture = PackageFixture::new();
        let mut writer = BundleWriter::new(Cursor::new(Vec::new()));
        writer
            .put_blob(&fixture.texture_digest, &fixture.texture)
            .unwrap();
        writer
            .put_blob(&fixture.config_digest, &fixture.config_blob())
            .unwrap();
        let catalog = fixture.catalog(fixture.texture.len() as u64);
        writer.put_catalog_record(&catalog.to_json().unwrap()).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "intact.zip", &bytes);

        let report = verify(&path).unwrap();
        assert!(report.intact);
        assert_eq!(report.format, "PackDB");
        assert_eq!(report.version, "v3");
        assert_eq!(report.catalog_id, "R-Main");
        assert_eq!(report.manifest_count, 1);
        assert_eq!(report.blob_count, 2);
        assert_eq!(report.config_digest, fixture.config_digest.to_hex());
    }

    #[test]
    fn test_verify_flags_manifest_size_mismatch() {
        let fixture = PackageFixture::new();
        let mut writer = BundleWriter::new(Cursor::new(Vec::new()));
        writer
            .put_blob(&fixture.texture_digest, &fixture.texture)
            .unwrap();
        writer
            .put_blob(&fixture.config_digest, &fixture.config_blob())
            .unwrap();
        let catalog = fixture.catalog(fixture.texture.len() as u64 + 1);
        writer.put_catalog_record(&catalog.to_json().unwrap()).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "sized.zip", &bytes);

        let report = verify(&path).unwrap();
        assert!(!report.intact);
    }

    #[test]
    fn test_verify_flags_blob_digest_mismatch() {
        let fixture = PackageFixture::new();
        let mut writer = BundleWriter::new(Cursor::new(Vec::new()));
        // Stored under the texture's digest but holding different bytes
        writer
            .put_named_file(&blob_path(&fixture.texture_digest), b"tampered bytes!!")
            .unwrap();
        writer
            .put_blob(&fixture.config_digest, &fixture.config_blob())
            .unwrap();
        let catalog = fixture.catalog(16);
        writer.put_catalog_record(&catalog.to_json().unwrap()).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "tampered.zip", &bytes);

        let report = verify(&path).unwrap();
        assert!(!report.intact);
    }

    #[test]
    fn test_verify_rejects_package_without_catalog() {
        let mut writer = BundleWriter::new(Cursor::new(Vec::new()));
        writer.put_named_file("Other.txt", b"hello").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "bare.zip", &bytes);

        let err = verify(&path).unwrap_err();
        match err {
            GarbError::VerificationFailed(message) => {
                assert!(message.contains("R-Main.record"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
