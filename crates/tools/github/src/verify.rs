//! Download integrity check against the digest GitHub publishes per asset.

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Compute the `sha256:<hex>` digest of `data`.
#[must_use]
pub fn sha256_digest(data: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(data)))
}

/// Check `data` against `expected` (`algorithm:hex`).
///
/// An empty `expected` skips the check; older assets carry no digest.
/// Comparison is case-sensitive.
///
/// # Errors
///
/// Returns `Integrity` on mismatch and `UnsupportedDigest` when the digest
/// names an algorithm other than sha256.
pub fn verify(data: &[u8], expected: &str) -> Result<()> {
    if expected.is_empty() {
        return Ok(());
    }

    let actual = match expected.split_once(':') {
        Some(("sha256", _)) => sha256_digest(data),
        _ => {
            return Err(Error::UnsupportedDigest {
                digest: expected.to_string(),
            });
        }
    };

    if actual != expected {
        return Err(Error::Integrity {
            expected: expected.to_string(),
            actual,
        });
    }

    Ok(())
}
