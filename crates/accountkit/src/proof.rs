//! App secret proof
//!
//! The provider requires `appsecret_proof` on calls made with a user access
//! token: `hex(HMAC-SHA256(key = app_secret, message = access_token))`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Compute the lowercase hex app secret proof for `access_token`.
pub fn app_secret_proof(app_secret: &str, access_token: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .map_err(|e| Error::InvalidArgument(format!("app secret rejected as HMAC key: {e}")))?;
    mac.update(access_token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
