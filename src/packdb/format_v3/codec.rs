//! Compressed configuration blobs
//!
//! The resolved configuration document travels inside the package as one
//! blob: BSON-serialized, Brotli-compressed, prefixed with a fixed 9-byte
//! header so consumers can recognize the payload version before
//! decompressing. Consumers strip exactly the header, decompress the
//! remainder, and read the BSON document back out.

use log::trace;
use serde_json::Value;
use std::io::Cursor;

use super::constants::CONFIG_BLOB_HEADER;
use crate::exceptions::{GarbError, Result};

/// Encode a configuration document into its packaged blob form
pub fn encode_config(document: &Value) -> Result<Vec<u8>> {
    // BSON can only carry a document at the top level
    if !document.is_object() {
        return Err(GarbError::Serialization(
            "Configuration must be a JSON object at the top level".to_string(),
        ));
    }

    let bson_bytes = bson::to_vec(document)?;
    trace!("📝 Encoding configuration document ({} BSON bytes)", bson_bytes.len());

    let mut blob = Vec::with_capacity(CONFIG_BLOB_HEADER.len() + bson_bytes.len());
    blob.extend_from_slice(CONFIG_BLOB_HEADER);
    brotli::BrotliCompress(
        &mut Cursor::new(&bson_bytes),
        &mut blob,
        &brotli::enc::BrotliEncoderParams::default(),
    )
    .map_err(|e| GarbError::Serialization(format!("Brotli compression failed: {e}")))?;

    trace!("📝 Configuration blob is {} bytes", blob.len());
    Ok(blob)
}

/// Decode a packaged configuration blob back into its document
pub fn decode_config(blob: &[u8]) -> Result<Value> {
    let header_len = CONFIG_BLOB_HEADER.len();
    if blob.len() < header_len || &blob[..header_len] != CONFIG_BLOB_HEADER {
        return Err(GarbError::Serialization(
            "Configuration blob does not start with the FrDT header".to_string(),
        ));
    }

    let mut decompressed = Vec::new();
    brotli::BrotliDecompress(&mut Cursor::new(&blob[header_len..]), &mut decompressed)
        .map_err(|e| GarbError::Serialization(format!("Brotli decompression failed: {e}")))?;

    let document: bson::Document = bson::from_slice(&decompressed)?;
    Ok(serde_json::to_value(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blob_starts_with_fixed_header() {
        let blob = encode_config(&json!({"skin": "pale"})).unwrap();
        assert_eq!(
            &blob[..9],
            &[0x46, 0x72, 0x44, 0x54, 0x00, 0x00, 0x00, 0x00, 0x03]
        );
        assert!(blob.len() > 9);
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let document = json!({
            "name": "casual-outfit",
            "layers": [{"part": "torso", "tint": -4}, {"part": "head"}],
            "scale": 1.25,
            "visible": true,
            "notes": null,
        });
        let decoded = decode_config(&encode_config(&document).unwrap()).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn test_round_trip_unicode_strings() {
        let document = json!({
            "name": "café-アバター",
            "nested": {"greeting": "привет", "emoji": "🎨"},
            "tags": ["ß", "水着"],
        });
        let decoded = decode_config(&encode_config(&document).unwrap()).unwrap();
        assert_eq!(decoded, document);
        assert_eq!(decoded["nested"]["greeting"], json!("привет"));
    }

    #[test]
    fn test_round_trip_empty_document() {
        let document = json!({});
        let decoded = decode_config(&encode_config(&document).unwrap()).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn test_key_order_survives_round_trip() {
        let document: Value = serde_json::from_str(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
        let decoded = decode_config(&encode_config(&document).unwrap()).unwrap();
        let keys: Vec<&String> = decoded.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_rejects_non_object_top_level() {
        let err = encode_config(&json!(["not", "a", "document"])).unwrap_err();
        assert!(matches!(err, GarbError::Serialization(_)));
    }

    #[test]
    fn test_rejects_oversized_unsigned_integer() {
        let err = encode_config(&json!({"n": u64::MAX})).unwrap_err();
        assert!(matches!(err, GarbError::Serialization(_)));
    }

    #[test]
    fn test_decode_rejects_missing_header() {
        assert!(decode_config(b"").is_err());
        assert!(decode_config(b"FrXT\x00\x00\x00\x00\x03rest").is_err());
    }

    #[test]
    fn test_decode_rejects_corrupt_payload() {
        let mut blob = CONFIG_BLOB_HEADER.to_vec();
        blob.extend_from_slice(b"definitely not brotli");
        assert!(decode_config(&blob).is_err());
    }
}
