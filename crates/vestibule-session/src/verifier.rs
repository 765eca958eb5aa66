//! Credential verification: turning a submitted password into a digest.
//!
//! The session manager never interprets digests. It asks a
//! [`CredentialVerifier`] for the digest of the submitted password and
//! compares the result byte-for-byte with the digest stored in the
//! registry. Everything about HOW digests are computed lives behind the
//! trait:
//!
//! - [`Pbkdf2Verifier`] for real use (salted, iterated PBKDF2-HMAC-SHA256)
//! - a mock verifier in tests
//!
//! # Digest format
//!
//! ```text
//! pbkdf2-sha256$<iterations>$<salt, lowercase hex>$<hash, lowercase hex>
//! ```
//!
//! The salt and iteration count travel with the stored digest, so the
//! verifier reads them from the stored value (the `reference`) and
//! recomputes the whole string for the submitted password.

use rand::Rng;
use sha2::Sha256;

/// Iteration count used by [`hash_password`].
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Highest iteration count a stored digest may ask for. Anything above
/// would stall a sign-in for minutes.
pub const MAX_ITERATIONS: u32 = 10_000_000;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_BYTES: usize = 16;
const HASH_BYTES: usize = 32;

/// Computes credential digests for comparison against the registry.
///
/// # Contract
///
/// - Deterministic: the same `(password, reference)` always yields the
///   same digest.
/// - No side effects.
/// - `reference` is the digest stored for the user being checked. It
///   carries the parameters (salt, cost) needed to reproduce a digest;
///   verifiers without parameters may ignore it.
/// - If `reference` can't be understood, return something that can never
///   equal a stored digest (an empty string works, since the registry
///   rejects empty digests).
///
/// # Example
///
/// ```rust
/// use vestibule_session::CredentialVerifier;
///
/// /// Stores passwords in the clear. Only for tests!
/// struct PlainVerifier;
///
/// impl CredentialVerifier for PlainVerifier {
///     fn digest(&self, password: &str, _reference: &str) -> String {
///         format!("plain${password}")
///     }
/// }
///
/// assert_eq!(PlainVerifier.digest("pw", "plain$pw"), "plain$pw");
/// ```
pub trait CredentialVerifier: Send + Sync + 'static {
    /// Returns the digest of `password`, using the parameters embedded in
    /// `reference`.
    fn digest(&self, password: &str, reference: &str) -> String;

    /// Returns `true` if `reference` is a stored digest this verifier can
    /// reproduce. Checked for every registry entry at startup, so a
    /// registry no one could ever sign in to fails fast.
    fn accepts(&self, reference: &str) -> bool {
        let _ = reference;
        true
    }
}

// ---------------------------------------------------------------------------
// Pbkdf2Verifier
// ---------------------------------------------------------------------------

/// PBKDF2-HMAC-SHA256 verifier. The default for Vestibule.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pbkdf2Verifier;

impl CredentialVerifier for Pbkdf2Verifier {
    fn digest(&self, password: &str, reference: &str) -> String {
        match DigestParams::parse(reference) {
            Some(params) => {
                let hash = derive(password, &params.salt, params.iterations);
                format_digest(params.iterations, &params.salt, &hash)
            }
            None => {
                tracing::warn!("stored credential digest has an unrecognized format");
                String::new()
            }
        }
    }

    fn accepts(&self, reference: &str) -> bool {
        DigestParams::parse(reference).is_some()
    }
}

/// Salt and cost read back from a stored digest.
struct DigestParams {
    iterations: u32,
    salt: Vec<u8>,
}

impl DigestParams {
    fn parse(reference: &str) -> Option<Self> {
        let mut parts = reference.split('$');
        if parts.next()? != SCHEME {
            return None;
        }
        let iterations: u32 = parts.next()?.parse().ok()?;
        if iterations == 0 || iterations > MAX_ITERATIONS {
            return None;
        }
        let salt = hex::decode(parts.next()?).ok()?;
        // The hash itself isn't needed to recompute, but it must be well formed.
        let hash = hex::decode(parts.next()?).ok()?;
        if hash.len() != HASH_BYTES || parts.next().is_some() {
            return None;
        }
        Some(Self { iterations, salt })
    }
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_BYTES] {
    let mut hash = [0u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    hash
}

fn format_digest(iterations: u32, salt: &[u8], hash: &[u8]) -> String {
    format!(
        "{SCHEME}${iterations}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Produces a new stored digest for `password` with a random salt and
/// [`DEFAULT_ITERATIONS`].
///
/// Use this to generate `credentialDigest` values for registry files.
pub fn hash_password(password: &str) -> String {
    hash_password_with(password, DEFAULT_ITERATIONS)
}

/// Like [`hash_password`] with an explicit iteration count.
///
/// The count is clamped to `1..=MAX_ITERATIONS`.
pub fn hash_password_with(password: &str, iterations: u32) -> String {
    let iterations = iterations.clamp(1, MAX_ITERATIONS);
    let salt: [u8; SALT_BYTES] = rand::rng().random();
    let hash = derive(password, &salt, iterations);
    format_digest(iterations, &salt, &hash)
}

// =========================================================================
// Tests
// =========================================================================
