use argon2::{
    password_hash::{PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use serde::Deserialize;
use sha_crypt::{
    sha256_check, sha256_simple, sha512_check, sha512_simple, Sha256Params, Sha512Params,
};
use std::str::FromStr;
use subtle::ConstantTimeEq;
use tracing::warn;
use warden_error::{Result, WardenError};

use crate::auth::checkers::HashChecker;

const SHA_CRYPT_ROUNDS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename(deserialize = "bcrypt"))]
    Bcrypt,
    #[serde(rename(deserialize = "sha256"))]
    Sha256Crypt,
    #[serde(rename(deserialize = "sha512"))]
    Sha512Crypt,
    #[serde(rename(deserialize = "argon2"))]
    Argon2,
    #[serde(rename(deserialize = "none"))]
    None,
}

impl FromStr for HashAlgorithm {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(HashAlgorithm::Bcrypt),
            "sha256" => Ok(HashAlgorithm::Sha256Crypt),
            "sha512" => Ok(HashAlgorithm::Sha512Crypt),
            "argon2" => Ok(HashAlgorithm::Argon2),
            "none" => Ok(HashAlgorithm::None),
            other => Err(WardenError::UnsupportedHash(other.to_owned())),
        }
    }
}

pub fn create_password_hash(password: &str, algo: HashAlgorithm) -> Result<String> {
    match algo {
        HashAlgorithm::Bcrypt => Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?),
        HashAlgorithm::Sha256Crypt => {
            let params = Sha256Params::new(SHA_CRYPT_ROUNDS)
                .map_err(|_| WardenError::new("Invalid SHA256 parameters"))?;
            sha256_simple(password, &params).map_err(|_| WardenError::new("SHA256 hashing failed"))
        }
        HashAlgorithm::Sha512Crypt => {
            let params = Sha512Params::new(SHA_CRYPT_ROUNDS)
                .map_err(|_| WardenError::new("Invalid SHA512 parameters"))?;
            sha512_simple(password, &params).map_err(|_| WardenError::new("SHA512 hashing failed"))
        }
        HashAlgorithm::Argon2 => {
            let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
                .map_err(|_| WardenError::new("Argon2 salt generation failed"))?;
            let password_hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|_| WardenError::new("Argon2 hashing failed"))?
                .to_string();
            Ok(password_hash)
        }
        HashAlgorithm::None => Ok(format!("$none${}", password)),
    }
}

/// Checks `password` against a configured value.
///
/// The format is sniffed from the configured value's prefix. Anything that
/// is not a recognised hash encoding is compared as plaintext.
pub fn verify_password_hash(password: &str, hash: &str) -> Result<bool> {
    if hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$") {
        Ok(bcrypt::verify(password, hash)?)
    } else if hash.starts_with("$5$") {
        Ok(sha256_check(password, hash).is_ok())
    } else if hash.starts_with("$6$") {
        Ok(sha512_check(password, hash).is_ok())
    } else if hash.starts_with("$argon2") {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| WardenError::MalformedHash("Argon2 hash parsing failed".to_owned()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    } else if let Some(stripped) = hash.strip_prefix("$none$") {
        Ok(constant_time_eq(stripped, password))
    } else {
        Ok(constant_time_eq(hash, password))
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// The default [`HashChecker`], backed by [`verify_password_hash`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl HashChecker for PasswordHasher {
    fn verify(&self, password: &str, configured: &str) -> bool {
        verify_password_hash(password, configured).unwrap_or_else(|err| {
            warn!(target: "services::password_hasher", "Password verification failed: {}", err);
            false
        })
    }
}
