//! PackDB/v3 package builder

mod texture_processor;

pub use texture_processor::TextureOutcome;

use texture_processor::TextureProcessor;

use super::archive::BundleWriter;
use super::bootstrap::{BOOTSTRAP_BLOBS, BootstrapBlob};
use super::catalog::CatalogDocument;
use super::codec::encode_config;
use super::constants::{TEMPLATE_ENDPOINT, TEXTURE_EXTENSION};
use super::hashing::ContentDigest;
use super::remote::RemoteAssets;
use super::template::substitute_placeholders;
use super::texture::TextureSet;
use crate::api::{PackageReport, PlainReport};
use crate::exceptions::{GarbError, Result};
use crate::ident::ResourceId;
use log::{debug, info, trace};
use std::io::{Seek, Write};
use std::time::Instant;

/// Build a plain bundle: one `<part>.png` entry per painted texture
pub fn build_plain<W: Write + Seek>(textures: TextureSet, sink: W) -> Result<(W, PlainReport)> {
    info!("🎨 Building plain texture bundle ({} entries)", textures.len());
    let plain_timer = Instant::now();

    let mut writer = BundleWriter::new(sink);
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for (part, buffer) in textures {
        let Some(buffer) = buffer else {
            info!("⏭️ Texture '{part}' has no pixel data, skipping");
            skipped.push(part);
            continue;
        };
        let png = buffer.into_png_bytes()?;
        let name = format!("{part}{TEXTURE_EXTENSION}");
        writer.put_named_file(&name, &png)?;
        files.push(name);
    }

    let sink = writer.finish()?;
    info!(
        "✅ Plain bundle holds {} files ({} skipped) in {:?}",
        files.len(),
        skipped.len(),
        plain_timer.elapsed()
    );
    Ok((sink, PlainReport { files, skipped }))
}

/// Build a PackDB/v3 package from the given textures
pub fn build_package<W: Write + Seek>(
    export_id: ResourceId,
    textures: TextureSet,
    remote: &dyn RemoteAssets,
    sink: W,
) -> Result<(W, PackageReport)> {
    run_pipeline(export_id, textures, remote, sink, BOOTSTRAP_BLOBS)
}

fn run_pipeline<W: Write + Seek>(
    export_id: ResourceId,
    textures: TextureSet,
    remote: &dyn RemoteAssets,
    sink: W,
    bootstrap: &[BootstrapBlob],
) -> Result<(W, PackageReport)> {
    let build_timer = Instant::now();
    info!("📦 Building PackDB/v3 package for export {export_id}");
    trace!("🔍 {} texture entries", textures.len());

    let mut writer = BundleWriter::new(sink);

    // Phase 1: Encode, hash and store texture blobs
    let mut processor = TextureProcessor::new();
    processor.process(textures, &mut writer)?;

    // Phase 2: Fetch the catalog template
    let template = fetch_template(remote)?;

    // Phase 3: Resolve placeholders against the stored digests
    let pairs = processor.substitution_pairs();
    let resolved = substitute_placeholders(
        &template,
        pairs.iter().map(|(part, hex)| (part.as_str(), hex.as_str())),
    );
    let document: serde_json::Value = serde_json::from_str(&resolved).map_err(|e| {
        GarbError::Serialization(format!("Resolved catalog template is not valid JSON: {e}"))
    })?;

    // Phase 4: Compress the configuration document and store it
    let config_blob = encode_config(&document)?;
    let config_digest = ContentDigest::from_bytes(&config_blob);
    writer.put_blob(&config_digest, &config_blob)?;
    debug!(
        "📍 Configuration blob: {} bytes, digest {config_digest}",
        config_blob.len()
    );

    // Phase 5: Assemble and store the catalog record
    let catalog = CatalogDocument::assemble(&config_digest, bootstrap, processor.asset_refs());
    writer.put_catalog_record(&catalog.to_json()?)?;

    // Phase 6: Fetch and store the bootstrap blobs
    store_bootstrap_blobs(remote, &mut writer, bootstrap)?;

    // Phase 7: Finalize the container
    let blob_count = writer.blob_count();
    let sink = writer.finish()?;
    info!(
        "✅ Package holds {} distinct blobs, built in {:?}",
        blob_count,
        build_timer.elapsed()
    );

    Ok((
        sink,
        PackageReport {
            export_id,
            outcomes: processor.outcomes,
            config_digest,
            catalog,
            blob_count,
        },
    ))
}

/// Fetch the catalog template from the asset service
fn fetch_template(remote: &dyn RemoteAssets) -> Result<String> {
    let template_timer = Instant::now();
    let template = remote.fetch_text(TEMPLATE_ENDPOINT)?;
    trace!(
        "✅ Catalog template fetched in {:?} ({} bytes)",
        template_timer.elapsed(),
        template.len()
    );
    Ok(template)
}

/// Fetch each bootstrap blob and store it under its pinned digest
fn store_bootstrap_blobs<W: Write + Seek>(
    remote: &dyn RemoteAssets,
    writer: &mut BundleWriter<W>,
    blobs: &[BootstrapBlob],
) -> Result<()> {
    for blob in blobs {
        debug!("🚀 Fetching bootstrap blob '{}'", blob.name);
        let bytes = remote.fetch_blob(blob.endpoint)?;
        let expected = ContentDigest::parse_hex(blob.digest)?;
        if bytes.len() as u64 != blob.size || !expected.matches(&bytes) {
            return Err(GarbError::Fetch(format!(
                "Bootstrap blob '{}' does not match its pinned digest ({} bytes fetched, {} expected)",
                blob.name,
                bytes.len(),
                blob.size
            )));
        }
        writer.put_blob(&expected, &bytes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::archive::blob_path;
    use super::super::codec::decode_config;
    use super::super::constants::{ASSET_URI_SCHEME, CATALOG_RECORD_PATH};
    use super::super::texture::TextureBuffer;
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    struct FakeRemote {
        template: String,
        blobs: HashMap<String, Vec<u8>>,
    }

    impl RemoteAssets for FakeRemote {
        fn fetch_text(&self, endpoint: &str) -> Result<String> {
            if endpoint == TEMPLATE_ENDPOINT {
                Ok(self.template.clone())
            } else {
                Err(GarbError::Fetch(format!("unexpected endpoint: {endpoint}")))
            }
        }

        fn fetch_blob(&self, endpoint: &str) -> Result<Vec<u8>> {
            self.blobs
                .get(endpoint)
                .cloned()
                .ok_or_else(|| GarbError::Fetch(format!("unexpected endpoint: {endpoint}")))
        }
    }

    fn solid_rgba(width: u32, height: u32, rgba: [u8; 4]) -> TextureBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            pixels.extend_from_slice(&rgba);
        }
        TextureBuffer::Rgba {
            width,
            height,
            pixels,
        }
    }

    fn leaked_hex(bytes: &[u8]) -> &'static str {
        Box::leak(ContentDigest::from_bytes(bytes).to_hex().into_boxed_str())
    }

    fn fake_bootstrap(config_payload: &[u8], runtime_payload: &[u8]) -> Vec<BootstrapBlob> {
        vec![
            BootstrapBlob {
                name: "boot-config",
                digest: leaked_hex(config_payload),
                size: config_payload.len() as u64,
                endpoint: "/v3/bootstrap/boot-config.bin",
            },
            BootstrapBlob {
                name: "boot-runtime",
                digest: leaked_hex(runtime_payload),
                size: runtime_payload.len() as u64,
                endpoint: "/v3/bootstrap/boot-runtime.bin",
            },
        ]
    }

    #[test]
    fn test_package_pipeline_end_to_end() {
        let mut textures = TextureSet::new();
        textures.insert("Head-Front", Some(solid_rgba(4, 4, [255, 0, 0, 255])));
        textures.insert("Body-Front", None);

        let boot_config = b"boot configuration payload";
        let boot_runtime = b"boot runtime payload";
        let bootstrap = fake_bootstrap(boot_config, boot_runtime);

        let mut blobs = HashMap::new();
        blobs.insert(
            "/v3/bootstrap/boot-config.bin".to_string(),
            boot_config.to_vec(),
        );
        blobs.insert(
            "/v3/bootstrap/boot-runtime.bin".to_string(),
            boot_runtime.to_vec(),
        );
        let remote = FakeRemote {
            template: r#"{"avatar":{"head":"[::Head-Front::]","body":"[::Body-Front::]"}}"#
                .to_string(),
            blobs,
        };

        let export_id = ResourceId::generate();
        let (sink, report) = run_pipeline(
            export_id,
            textures,
            &remote,
            Cursor::new(Vec::new()),
            &bootstrap,
        )
        .unwrap();

        // One texture, the config blob and the bootstrap pair
        assert_eq!(report.blob_count, 4);
        assert_eq!(report.export_id, export_id);
        assert_eq!(report.outcomes.len(), 2);
        let head_digest = match &report.outcomes[0] {
            TextureOutcome::Included { part, digest, .. } => {
                assert_eq!(part, "Head-Front");
                *digest
            }
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(
            report.outcomes[1],
            TextureOutcome::SkippedMissing {
                part: "Body-Front".to_string()
            }
        );

        // Manifest lists the bootstrap pair first, then the stored texture
        assert_eq!(report.catalog.asset_manifest.len(), 3);
        assert_eq!(report.catalog.asset_manifest[0].hash, bootstrap[0].digest);
        assert_eq!(report.catalog.asset_manifest[2].hash, head_digest.to_hex());
        assert_eq!(
            report.catalog.asset_uri,
            format!("{ASSET_URI_SCHEME}{}", report.config_digest.to_hex())
        );

        let mut archive = ZipArchive::new(sink).unwrap();
        let mut record = String::new();
        archive
            .by_name(CATALOG_RECORD_PATH)
            .unwrap()
            .read_to_string(&mut record)
            .unwrap();
        let parsed = CatalogDocument::from_json(&record).unwrap();
        assert_eq!(parsed.asset_manifest, report.catalog.asset_manifest);

        // The config blob decodes back to the resolved template
        let mut config_blob = Vec::new();
        archive
            .by_name(&blob_path(&report.config_digest))
            .unwrap()
            .read_to_end(&mut config_blob)
            .unwrap();
        let document = decode_config(&config_blob).unwrap();
        assert_eq!(document["avatar"]["head"], json!(head_digest.to_hex()));
        // Placeholders for skipped parts stay verbatim
        assert_eq!(document["avatar"]["body"], json!("[::Body-Front::]"));

        assert!(archive.by_name(&blob_path(&head_digest)).is_ok());
        for blob in &bootstrap {
            let digest = ContentDigest::parse_hex(blob.digest).unwrap();
            assert!(archive.by_name(&blob_path(&digest)).is_ok());
        }
    }

    #[test]
    fn test_build_package_rejects_unverifiable_bootstrap_blob() {
        let mut textures = TextureSet::new();
        textures.insert("Head-Front", Some(solid_rgba(1, 1, [1, 2, 3, 255])));

        let mut blobs = HashMap::new();
        for blob in BOOTSTRAP_BLOBS {
            blobs.insert(blob.endpoint.to_string(), b"not the pinned payload".to_vec());
        }
        let remote = FakeRemote {
            template: "{}".to_string(),
            blobs,
        };

        let err = build_package(
            ResourceId::generate(),
            textures,
            &remote,
            Cursor::new(Vec::new()),
        )
        .unwrap_err();
        match err {
            GarbError::Fetch(message) => assert!(message.contains("boot-config")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_plain_writes_one_png_per_painted_part() {
        let mut textures = TextureSet::new();
        textures.insert("Head-Front", Some(solid_rgba(2, 2, [0, 255, 0, 255])));
        textures.insert("Body-Front", None);
        textures.insert("Head-Back", Some(solid_rgba(2, 2, [0, 0, 255, 255])));

        let (sink, report) = build_plain(textures, Cursor::new(Vec::new())).unwrap();
        assert_eq!(report.files, vec!["Head-Front.png", "Head-Back.png"]);
        assert_eq!(report.skipped, vec!["Body-Front"]);

        let mut archive = ZipArchive::new(sink).unwrap();
        assert_eq!(archive.len(), 2);
        let mut png = Vec::new();
        archive
            .by_name("Head-Front.png")
            .unwrap()
            .read_to_end(&mut png)
            .unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        assert!(archive.by_name("Body-Front.png").is_err());
    }
}
