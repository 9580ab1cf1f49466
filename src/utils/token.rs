use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, ParamsBuilder, Version,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Duration;
use rand_core::{OsRng, RngCore};

use crate::config::HashCost;

/// 32 bytes of OS randomness per token, well past the 128-bit floor.
pub const TOKEN_BYTES: usize = 32;

/// Upper bound on the generate-insert-retry loop for unique tokens. With
/// 256-bit tokens a single collision is already implausible; hitting this
/// bound means something is badly wrong with the store or the RNG.
pub const MAX_TOKEN_ATTEMPTS: u32 = 5;

/// The digest-bearing token kinds a user row can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Activation,
    Reset,
    Remember,
}

impl TokenKind {
    /// Server-side validity window, measured from issuance. Activation
    /// tokens never expire and remember tokens are client-controlled.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            TokenKind::Reset => Some(Duration::hours(2)),
            TokenKind::Activation | TokenKind::Remember => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Activation => "activation",
            TokenKind::Reset => "reset",
            TokenKind::Remember => "remember",
        }
    }
}

/// Opaque URL-safe random token; plaintext is handed to the caller and only
/// its digest is stored.
pub fn new_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    let mut rng = OsRng;
    rng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// API authentication token. Same entropy, prefixed so keys are easy to
/// recognize in logs and support tickets. Stored as-is: it is a unique
/// lookup key, not a digest-verified secret.
pub fn new_auth_token() -> String {
    format!("tok_{}", new_token())
}

/// Salted, adaptive-cost one-way hashing for passwords and tokens.
///
/// Cost comes from [`HashCost`]; the low-cost profile is for tests only.
/// Verification reads the parameters embedded in the PHC string, so digests
/// written under one profile still verify under another.
#[derive(Clone)]
pub struct Hasher {
    argon2: Argon2<'static>,
}

impl Hasher {
    pub fn new(cost: &HashCost) -> Result<Self, argon2::Error> {
        let params = ParamsBuilder::new()
            .m_cost(cost.m_cost)
            .t_cost(cost.t_cost)
            .p_cost(cost.p_cost)
            .output_len(32)
            .build()?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn digest(&self, secret: &str) -> Result<String, argon2::password_hash::Error> {
        let mut rng = OsRng;
        let salt = SaltString::generate(&mut rng);
        let hash = self.argon2.hash_password(secret.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Constant-time comparison via argon2. Absent or malformed digests
    /// verify as `false`, never as an error.
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}
