//! Catalog record structures
//!
//! The catalog record is the JSON document stored at `R-Main.record`: a
//! fixed identity block, the `assetUri` pointing at the compressed-config
//! blob, and an `assetManifest` listing every blob the archive carries.

use serde::{Deserialize, Serialize};

use super::bootstrap::BootstrapBlob;
use super::constants;
use super::hashing::ContentDigest;
use crate::exceptions::{GarbError, Result};

/// One `{hash, bytes}` reference in the catalog's asset manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetRef {
    pub hash: String,
    pub bytes: u64,
}

/// Catalog record describing an exported package
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub owner_id: u64,
    pub created_at: String,
    pub updated_at: String,
    pub asset_uri: String,
    pub asset_manifest: Vec<AssetRef>,
}

impl CatalogDocument {
    /// Assemble the record for one export: the given bootstrap references
    /// first, then the accumulated texture assets in accumulation order.
    pub fn assemble(
        config_digest: &ContentDigest,
        bootstrap: &[BootstrapBlob],
        texture_assets: Vec<AssetRef>,
    ) -> Self {
        let mut asset_manifest: Vec<AssetRef> = bootstrap
            .iter()
            .map(|blob| AssetRef {
                hash: blob.digest.to_string(),
                bytes: blob.size,
            })
            .collect();
        asset_manifest.extend(texture_assets);

        CatalogDocument {
            id: constants::CATALOG_RECORD_ID.to_string(),
            kind: constants::CATALOG_TYPE.to_string(),
            owner_id: constants::CATALOG_OWNER_ID,
            created_at: constants::CATALOG_CREATED_AT.to_string(),
            updated_at: constants::CATALOG_UPDATED_AT.to_string(),
            asset_uri: format!("{}{config_digest}", constants::ASSET_URI_SCHEME),
            asset_manifest,
        }
    }

    /// Serialize to the JSON text stored in the archive
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a record read back out of an archive
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The compressed-config digest referenced by `assetUri`
    pub fn config_digest(&self) -> Result<ContentDigest> {
        let hex = self
            .asset_uri
            .strip_prefix(constants::ASSET_URI_SCHEME)
            .ok_or_else(|| {
                GarbError::VerificationFailed(format!(
                    "assetUri '{}' does not use the {} scheme",
                    self.asset_uri,
                    constants::ASSET_URI_SCHEME
                ))
            })?;
        ContentDigest::parse_hex(hex)
    }
}
