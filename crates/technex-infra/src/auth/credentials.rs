//! Admin login and provisioning.

use std::sync::Arc;

use technex_core::domain::NewAdmin;
use technex_core::ports::{AdminRepository, AuthError, PasswordService, TokenService};

use crate::redact::mask_email;

/// A freshly minted session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub username: String,
}

/// Checks a username-or-email and password against the admins table and
/// mints a session token on success.
///
/// Unknown logins and wrong passwords fail identically. An unknown login is
/// still verified against a decoy hash so both paths cost one Argon2 run.
pub struct CredentialVerifier {
    admins: Arc<dyn AdminRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    decoy_hash: String,
}

impl CredentialVerifier {
    pub fn new(
        admins: Arc<dyn AdminRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Result<Self, AuthError> {
        let decoy_hash = passwords.hash("technex-decoy-password")?;

        Ok(Self {
            admins,
            passwords,
            tokens,
            decoy_hash,
        })
    }

    pub async fn login(&self, login: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let admin = self.admins.find_by_login(login).await?;
        let hash = admin
            .as_ref()
            .map_or(self.decoy_hash.clone(), |a| a.password_hash.clone());

        let matched = self.verify_off_thread(password.to_string(), hash).await;

        match admin {
            Some(admin) if matched => {
                let token = self.tokens.generate_token(admin.id, &admin.username)?;
                tracing::info!(admin_id = admin.id, "Admin logged in");
                Ok(IssuedSession {
                    token,
                    username: admin.username,
                })
            }
            _ => {
                tracing::warn!(login = %mask_email(login), "Failed admin login");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Create the admin unless one with this username already exists.
    /// Returns whether a row was written.
    pub async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
        email: Option<String>,
    ) -> Result<bool, AuthError> {
        if self.admins.find_by_login(username).await?.is_some() {
            tracing::debug!(username, "Bootstrap admin already present");
            return Ok(false);
        }

        let password_hash = self.passwords.hash(password)?;
        self.admins
            .create(NewAdmin {
                username: username.to_string(),
                password_hash,
                email,
            })
            .await?;

        tracing::info!(username, "Bootstrap admin created");
        Ok(true)
    }

    /// Argon2 is CPU bound; keep it off the async workers. A stored hash that
    /// cannot be parsed counts as a mismatch.
    async fn verify_off_thread(&self, password: String, hash: String) -> bool {
        let passwords = self.passwords.clone();
        let outcome =
            tokio::task::spawn_blocking(move || passwords.verify(&password, &hash)).await;

        match outcome {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Stored password hash is unreadable");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }
}
