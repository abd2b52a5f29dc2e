//! Placeholder substitution for fetched catalog templates
//!
//! Templates arrive as opaque text containing `[::<part>::]` tokens. Each
//! accumulated (part, digest) pair replaces every occurrence of its token;
//! tokens for parts that were skipped stay in the text untouched.

use log::debug;

use super::constants::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};

/// The `[::<part>::]` token for a texture part name
pub fn placeholder_token(part: &str) -> String {
    format!("{PLACEHOLDER_OPEN}{part}{PLACEHOLDER_CLOSE}")
}

/// Replace placeholder tokens with digests, in accumulation order
pub fn substitute_placeholders<'a>(
    template: &str,
    substitutions: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut resolved = template.to_string();
    for (part, digest) in substitutions {
        let token = placeholder_token(part);
        if resolved.contains(&token) {
            resolved = resolved.replace(&token, digest);
        } else {
            debug!("🔍 Template has no {token} token");
        }
    }
    resolved
}
