use std::fmt;
use std::str::FromStr;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::{Result, ServiceError};

/// How new credentials are hashed.
///
/// `LegacySha256` is an unsalted single-round SHA-256 hex digest, kept only
/// so data files from the first release stay usable byte-for-byte. It is
/// weak against offline guessing; prefer `Argon2id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    #[default]
    Argon2id,
    LegacySha256,
}

/// Outcome of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Mismatch,
    Match,
    /// Correct password, but stored in a weaker format than the active scheme.
    Outdated,
}

#[derive(Error, Debug)]
#[error("unknown password scheme: {0} (expected argon2id or legacy-sha256)")]
pub struct UnknownScheme(pub String);

impl FromStr for PasswordScheme {
    type Err = UnknownScheme;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(Self::Argon2id),
            "legacy" | "legacy-sha256" | "sha256" => Ok(Self::LegacySha256),
            other => Err(UnknownScheme(other.to_string())),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argon2id => f.write_str("argon2id"),
            Self::LegacySha256 => f.write_str("legacy-sha256"),
        }
    }
}

impl PasswordScheme {
    pub fn hash(self, password: &str) -> Result<String> {
        match self {
            Self::Argon2id => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| ServiceError::Hashing(e.to_string()))?;
                Ok(hash.to_string())
            }
            Self::LegacySha256 => Ok(legacy_digest(password)),
        }
    }

    /// Check `password` against `stored`, which may be in either format.
    pub fn verify(self, stored: &str, password: &str) -> Result<Verification> {
        let phc = is_phc(stored);

        let matched = if phc {
            let parsed =
                PasswordHash::new(stored).map_err(|e| ServiceError::Hashing(e.to_string()))?;
            match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => true,
                Err(password_hash::Error::Password) => false,
                Err(e) => return Err(ServiceError::Hashing(e.to_string())),
            }
        } else {
            legacy_digest(password) == stored
        };

        Ok(match (matched, self, phc) {
            (false, _, _) => Verification::Mismatch,
            (true, Self::Argon2id, false) => Verification::Outdated,
            (true, _, _) => Verification::Match,
        })
    }
}

fn legacy_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn is_phc(stored: &str) -> bool {
    stored.starts_with("$argon2")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_digest_is_plain_sha256_hex() {
        let hash = PasswordScheme::LegacySha256.hash("abc").unwrap();
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn argon2_hash_is_salted() {
        let a = PasswordScheme::Argon2id.hash("pw1").unwrap();
        let b = PasswordScheme::Argon2id.hash("pw1").unwrap();
        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
    }

    #[test]
    fn argon2_verify() {
        let scheme = PasswordScheme::Argon2id;
        let stored = scheme.hash("pw1").unwrap();
        assert_eq!(scheme.verify(&stored, "pw1").unwrap(), Verification::Match);
        assert_eq!(scheme.verify(&stored, "wrong").unwrap(), Verification::Mismatch);
    }

    #[test]
    fn legacy_hash_is_outdated_under_argon2() {
        let stored = PasswordScheme::LegacySha256.hash("pw1").unwrap();

        assert_eq!(
            PasswordScheme::Argon2id.verify(&stored, "pw1").unwrap(),
            Verification::Outdated
        );
        assert_eq!(
            PasswordScheme::LegacySha256.verify(&stored, "pw1").unwrap(),
            Verification::Match
        );
        assert_eq!(
            PasswordScheme::Argon2id.verify(&stored, "nope").unwrap(),
            Verification::Mismatch
        );
    }

    #[test]
    fn argon2_hash_still_verifies_in_legacy_mode() {
        let stored = PasswordScheme::Argon2id.hash("pw1").unwrap();
        assert_eq!(
            PasswordScheme::LegacySha256.verify(&stored, "pw1").unwrap(),
            Verification::Match
        );
    }

    #[test]
    fn corrupt_phc_string_is_an_error() {
        let result = PasswordScheme::Argon2id.verify("$argon2id$v=19$m=abc,t=2,p=1$c2FsdHNhbHQ$aGFzaA", "pw1");
        assert!(matches!(result, Err(ServiceError::Hashing(_))));
    }

    #[test]
    fn parse_scheme_names() {
        assert_eq!("argon2id".parse::<PasswordScheme>().unwrap(), PasswordScheme::Argon2id);
        assert_eq!(
            " Legacy-SHA256 ".parse::<PasswordScheme>().unwrap(),
            PasswordScheme::LegacySha256
        );
        assert!("md5".parse::<PasswordScheme>().is_err());
        assert_eq!(PasswordScheme::LegacySha256.to_string(), "legacy-sha256");
    }
}
