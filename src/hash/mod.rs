// Content digests using BLAKE3

use crate::constants::{HASH_ALGORITHM, HASH_FULL_SCHEME};

/// Digest of an in-memory payload.
/// Format: "blake3:full:<hash>"
pub fn digest_bytes(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    format!("{}:{}:{}", HASH_ALGORITHM, HASH_FULL_SCHEME, hash.to_hex())
}

/// Check a payload against a digest produced by `digest_bytes`
pub fn verify_digest(data: &[u8], expected: &str) -> bool {
    digest_bytes(data) == expected
}

/// Shortened digest for table output
pub fn short_digest(digest: &str) -> &str {
    let hex = digest.rsplit(':').next().unwrap_or(digest);
    &hex[..hex.len().min(12)]
}
