//! Garb - content-addressed avatar asset packager
//!
//! This crate provides functionality for exporting, packaging, and verifying
//! avatar texture packages with support for multiple container formats.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,

    // All warnings must be fixed
    warnings,
)]
#![warn(
    // Documentation
    missing_docs,

    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::too_many_arguments,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::single_match_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![allow(
    // Temporarily allowed but should be fixed
    clippy::too_many_arguments,  // Some functions need refactoring
    missing_docs,  // TODO: Complete documentation
)]

pub mod api;
pub mod exceptions;
pub mod exit_codes;
pub mod ident;
pub mod logger;
pub mod packdb;
pub mod version;

// Re-export main API functions
pub use api::{
    ExportOptions, PackageReport, PlainReport, VerifyReport, export_package, export_plain_bundle,
    verify_package,
};
pub use exceptions::GarbError;
pub use ident::ResourceId;

// Re-export format-specific types for advanced usage
pub use packdb::PackageFormat;
pub use packdb::format_v3;
