//! Standard exit codes for Garb binaries
//!
//! These exit codes are used by both the exporter and the verifier to
//! provide consistent error reporting across the Garb tooling.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Package format error (invalid package structure, corrupt data)
pub const EXIT_FORMAT_ERROR: i32 = 102;

/// Remote fetch error (template or bootstrap asset unreachable)
pub const EXIT_FETCH_ERROR: i32 = 103;

/// Image encoding error (texture buffer could not become a PNG)
pub const EXIT_IMAGE_ERROR: i32 = 104;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (file not found, permission denied, disk error)
pub const EXIT_IO_ERROR: i32 = 106;

/// Serialization error (configuration document not representable)
pub const EXIT_SERIALIZATION_ERROR: i32 = 107;

/// Export/packaging error (exporter-specific)
pub const EXIT_EXPORT_ERROR: i32 = 108;

/// Configuration error (missing base URL, invalid input document)
pub const EXIT_CONFIG_ERROR: i32 = 109;

/// Verification failed (package contents do not match their record)
pub const EXIT_VERIFY_ERROR: i32 = 110;
