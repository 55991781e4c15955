//! Argon2id hashing, always run on the blocking pool.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::sync::OnceCell;
use tokio::task;

use crate::config::SecurityConfig;
use crate::constants::auth::MIN_PASSWORD_LENGTH;

/// Returns an error message when `password` is too short.
#[must_use]
pub fn check_length(password: &str) -> Option<String> {
    (password.chars().count() < MIN_PASSWORD_LENGTH).then(|| {
        format!("Password must be at least {MIN_PASSWORD_LENGTH} characters")
    })
}

pub struct PasswordService {
    params: Params,
    dummy_hash: OnceCell<String>,
}

impl PasswordService {
    pub fn new(config: &SecurityConfig) -> Result<Self> {
        let params = Params::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        Ok(Self {
            params,
            dummy_hash: OnceCell::new(),
        })
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let params = self.params.clone();

        task::spawn_blocking(move || hash_with_params(&password, params))
            .await
            .context("Password hashing task panicked")?
    }

    /// Verifies against a PHC string. The parameters embedded in the hash are
    /// used, so hashes produced with older settings keep verifying.
    pub async fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();

        task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")?
    }

    /// Spends the same work as a real verification for an account that does not exist.
    pub async fn verify_dummy(&self, password: &str) -> Result<()> {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hash("holywins-dummy-password"))
            .await?;
        self.verify(password, dummy).await?;
        Ok(())
    }
}

fn hash_with_params(password: &str, params: Params) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
