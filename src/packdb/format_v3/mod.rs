//! PackDB/v3 format implementation

pub mod archive;
pub mod bootstrap;
pub mod builder;
pub mod catalog;
pub mod codec;
pub mod constants;
pub mod hashing;
pub mod remote;
pub mod template;
pub mod texture;
pub mod verifier;

// Re-export main functions
pub use builder::{build_package, build_plain};
pub use verifier::verify;

// Re-export types for advanced usage
pub use builder::TextureOutcome;
pub use catalog::{AssetRef, CatalogDocument};
pub use hashing::ContentDigest;
pub use remote::{HttpRemote, RemoteAssets};
pub use texture::{TextureBuffer, TextureSet};
