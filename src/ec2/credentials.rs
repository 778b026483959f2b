//! Windows administrator password retrieval.
//!
//! Password data appears some minutes after boot. The poller asks for it
//! every `password_poll_interval` until the query timeout elapses, then
//! decrypts the base64 blob with the keypair's RSA private key (PKCS#1 v1.5).

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::control_plane::Ec2Api;
use crate::error::{InfraError, InfraResult};
use crate::fs;
use crate::models::CredentialsQuery;
use crate::wait;

use super::Ec2;

/// Account name paired with the decrypted password.
pub const DEFAULT_USERNAME: &str = "Administrator";

/// Login credentials of a Windows instance.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Decrypted password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn decrypt_error(instance_id: &str, message: impl Into<String>) -> InfraError {
    InfraError::Decrypt {
        instance_id: instance_id.to_owned(),
        message: message.into(),
    }
}

fn parse_private_key(pem: &[u8], instance_id: &str) -> InfraResult<RsaPrivateKey> {
    let text = std::str::from_utf8(pem)
        .map_err(|err| decrypt_error(instance_id, format!("private key is not UTF-8: {err}")))?;
    RsaPrivateKey::from_pkcs1_pem(text)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(text))
        .map_err(|err| decrypt_error(instance_id, format!("unreadable private key: {err}")))
}

fn decrypt_password(key: &RsaPrivateKey, blob: &str, instance_id: &str) -> InfraResult<String> {
    let compact: String = blob.chars().filter(|ch| !ch.is_whitespace()).collect();
    let cipher = STANDARD
        .decode(compact)
        .map_err(|err| decrypt_error(instance_id, format!("invalid base64: {err}")))?;
    let plain = key
        .decrypt(Pkcs1v15Encrypt, &cipher)
        .map_err(|err| decrypt_error(instance_id, err.to_string()))?;
    String::from_utf8(plain)
        .map_err(|err| decrypt_error(instance_id, format!("password is not UTF-8: {err}")))
}

impl<C: Ec2Api> Ec2<C> {
    /// Polls for the instance's password data and decrypts it.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Timeout`] when no password data appears within
    /// the query timeout, [`InfraError::Validation`] when the timeout is too
    /// large to schedule, [`InfraError::NotFound`] or [`InfraError::Io`] when
    /// the private key cannot be read, [`InfraError::Decrypt`] when the key or
    /// blob is unusable, or the mapped control-plane error. Every error other
    /// than "not yet available" ends the loop immediately.
    pub async fn find_credentials(&self, query: &CredentialsQuery) -> InfraResult<Credentials> {
        query.validate()?;
        let instance_id = query.instance_id.as_str();
        let key = parse_private_key(&fs::read(&query.private_key_path)?, instance_id)?;

        let deadline = wait::deadline_after(query.timeout_duration(), "timeout_secs")?;
        while Instant::now() <= deadline {
            let data = self
                .control_plane
                .get_password_data(instance_id)
                .await
                .map_err(|err| {
                    warn!(instance_id, error = %err, "password data request failed");
                    InfraError::from(err)
                })?;
            if let Some(blob) = data.filter(|blob| !blob.trim().is_empty()) {
                let password = decrypt_password(&key, &blob, instance_id).inspect_err(|err| {
                    warn!(instance_id, error = %err, "password decryption failed");
                })?;
                info!(instance_id, "password retrieved");
                return Ok(Credentials {
                    username: DEFAULT_USERNAME.to_owned(),
                    password,
                });
            }
            debug!(instance_id, "password data not available yet");
            sleep(self.timings.password_poll_interval).await;
        }

        warn!(instance_id, timeout_secs = query.timeout_secs, "password data never appeared");
        Err(InfraError::Timeout {
            action: String::from("password data"),
            resource_id: instance_id.to_owned(),
        })
    }
}
