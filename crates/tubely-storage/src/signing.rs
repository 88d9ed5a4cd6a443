//! HMAC-signed read URLs for backends without native presigning.
//!
//! Query: `expires={unix_ts}&signature={hex(HMAC-SHA256(secret, "{key}\n{expires}"))}`.

use crate::traits::{StorageError, StorageResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl UrlSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, key: &str, expires: u64) -> StorageResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| StorageError::ConfigError(format!("Invalid signing secret: {}", e)))?;
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    /// Query string granting read access to `key` for `expires_in`.
    ///
    /// The expiry is rounded up to the next whole second so the URL is never valid for
    /// less than `expires_in`.
    pub fn sign(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let now = unix_now();
        let ttl_secs = expires_in.as_secs() + u64::from(expires_in.subsec_nanos() > 0);
        let expires = now.saturating_add(ttl_secs);
        let signature = hex::encode(self.mac(key, expires)?.finalize().into_bytes());
        Ok(format!("expires={}&signature={}", expires, signature))
    }

    /// Check a signature produced by [`UrlSigner::sign`] and that it has not expired.
    pub fn verify(&self, key: &str, expires: u64, signature: &str) -> StorageResult<()> {
        let tag = hex::decode(signature)
            .map_err(|_| StorageError::InvalidKey("Malformed signature".to_string()))?;
        self.mac(key, expires)?
            .verify_slice(&tag)
            .map_err(|_| StorageError::InvalidKey("Invalid signature".to_string()))?;

        if unix_now() > expires {
            return Err(StorageError::InvalidKey("Signed URL has expired".to_string()));
        }
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
