//! Texture conversion and blob accumulation

use super::super::archive::BundleWriter;
use super::super::catalog::AssetRef;
use super::super::hashing::ContentDigest;
use super::super::texture::TextureSet;
use crate::exceptions::Result;
use log::{debug, info, trace};
use std::io::{Seek, Write};
use std::time::Instant;

/// Outcome of packaging one named texture entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureOutcome {
    /// The texture was encoded to PNG and stored under its content digest
    Included {
        part: String,
        digest: ContentDigest,
        bytes: u64,
    },
    /// The entry had no pixel data and contributes nothing to the package
    SkippedMissing { part: String },
}

/// Encode textures, hash them and accumulate catalog bookkeeping
pub(super) struct TextureProcessor {
    pub(super) outcomes: Vec<TextureOutcome>,
}

impl TextureProcessor {
    pub(super) fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    pub(super) fn process<W: Write + Seek>(
        &mut self,
        textures: TextureSet,
        writer: &mut BundleWriter<W>,
    ) -> Result<()> {
        debug!("🎨 Processing {} texture entries", textures.len());
        let texture_timer = Instant::now();

        for (part, buffer) in textures {
            let Some(buffer) = buffer else {
                info!("⏭️ Texture '{part}' has no pixel data, skipping");
                self.outcomes.push(TextureOutcome::SkippedMissing { part });
                continue;
            };

            trace!("📖 Encoding texture '{part}'");
            let png = buffer.into_png_bytes()?;
            let digest = ContentDigest::from_bytes(&png);
            let bytes = png.len() as u64;
            writer.put_blob(&digest, &png)?;

            debug!("📍 Texture '{part}': {bytes} bytes, digest {digest}");
            self.outcomes.push(TextureOutcome::Included {
                part,
                digest,
                bytes,
            });
        }

        debug!(
            "✅ Processed {} textures in {:?}",
            self.outcomes.len(),
            texture_timer.elapsed()
        );
        Ok(())
    }

    /// `(part, digest-hex)` pairs for template substitution, in accumulation order
    pub(super) fn substitution_pairs(&self) -> Vec<(String, String)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                TextureOutcome::Included { part, digest, .. } => {
                    Some((part.clone(), digest.to_hex()))
                }
                TextureOutcome::SkippedMissing { .. } => None,
            })
            .collect()
    }

    /// Manifest entries for the stored textures, in accumulation order
    pub(super) fn asset_refs(&self) -> Vec<AssetRef> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                TextureOutcome::Included { digest, bytes, .. } => Some(AssetRef {
                    hash: digest.to_hex(),
                    bytes: *bytes,
                }),
                TextureOutcome::SkippedMissing { .. } => None,
            })
            .collect()
    }
}
