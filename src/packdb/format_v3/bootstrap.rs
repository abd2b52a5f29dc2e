// src/packdb/format_v3/bootstrap.rs
// Fixed bootstrap dependency table
// Every package carries these runtime blobs alongside the avatar assets

/// A runtime blob every package must carry, pinned by content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapBlob {
    /// Short name for logs and reports
    pub name: &'static str,
    /// Expected SHA-256 of the fetched bytes (lowercase hex)
    pub digest: &'static str,
    /// Expected size in bytes
    pub size: u64,
    /// Endpoint path relative to the asset base URL
    pub endpoint: &'static str,
}

/// Bootstrap blobs bundled into every package, in manifest order.
pub const BOOTSTRAP_BLOBS: &[BootstrapBlob] = &[
    BootstrapBlob {
        name: "boot-config",
        digest: "41ccec83c150c98d061ad6245e0aa866b08ba2237f0087f6e21a0d3deb2cec19",
        size: 117,
        endpoint: "/v3/bootstrap/boot-config.bin",
    },
    BootstrapBlob {
        name: "boot-runtime",
        digest: "aedca4d3da09eaaa3ef2621025e3fd713019395ec4f0c0ea1d09af5146e8f787",
        size: 126_710,
        endpoint: "/v3/bootstrap/boot-runtime.bin",
    },
];
