// src/packdb/format_v3/constants.rs
// Core format constants that never change
// For the bootstrap blob table, see bootstrap.rs

// Fixed header prepended to every compressed configuration blob:
// "FrDT" tag, four reserved zero bytes, format version 3
pub const CONFIG_BLOB_HEADER: &[u8] = &[0x46, 0x72, 0x44, 0x54, 0x00, 0x00, 0x00, 0x00, 0x03];

// Format version - immutable
pub const FORMAT_VERSION: u32 = 3;

// ZIP local-file-header magic, used for container detection
pub const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04]; // "PK\x03\x04"

// Archive layout - fixed entry names inside the container
pub const ASSETS_DIR: &str = "Assets";
pub const CATALOG_RECORD_ID: &str = "R-Main";
pub const CATALOG_RECORD_PATH: &str = "R-Main.record";
pub const ASSET_URI_SCHEME: &str = "packdb:///";

// Placeholder token syntax in fetched configuration templates
pub const PLACEHOLDER_OPEN: &str = "[::";
pub const PLACEHOLDER_CLOSE: &str = "::]";

// Catalog record identity - reproduced verbatim on every export
pub const CATALOG_TYPE: &str = "avatar";
pub const CATALOG_OWNER_ID: u64 = 1;
pub const CATALOG_CREATED_AT: &str = "2020-01-01T00:00:00.000Z";
pub const CATALOG_UPDATED_AT: &str = "2020-01-01T00:00:00.000Z";

// Remote endpoints, relative to the configured asset base URL
pub const TEMPLATE_ENDPOINT: &str = "/v3/catalog/template.json";

// Environment variable consulted when no base URL is passed explicitly
pub const ASSET_BASE_ENV: &str = "GARB_ASSET_BASE";

// Extension for plain texture exports
pub const TEXTURE_EXTENSION: &str = ".png";
