//! Document digests.
//!
//! Stored documents carry a digest of their compact JSON so repeated runs over
//! identical workbooks can be recognized without comparing whole payloads.
//!
//! - algorithm: **FNV-1a 64-bit**
//! - input: the UTF-8 bytes of the compact JSON document
//! - output: `"fnv1a64:<16 lowercase hex digits>"`
//!
//! This is not a security primitive.

use crate::GraphDocument;

/// Prefix used in serialized digests.
pub const DIGEST_V1_PREFIX: &str = "fnv1a64:";

/// FNV-1a 64-bit digest over arbitrary bytes.
pub fn fnv1a64_digest_bytes(bytes: &[u8]) -> String {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    format!("{DIGEST_V1_PREFIX}{hash:016x}")
}

/// Digest of a document's compact JSON form.
pub fn document_digest_v1(document: &GraphDocument) -> serde_json::Result<String> {
    let json = document.to_compact_json()?;
    Ok(fnv1a64_digest_bytes(json.as_bytes()))
}
