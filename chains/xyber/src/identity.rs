//! Solana-style ed25519 signing identity.

use crate::error::{XyberError, XyberResult};
use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use std::fmt;
use zeroize::Zeroizing;

const KEYPAIR_LENGTH: usize = 64;

/// Keypair decoded from a base58 private key.
///
/// The secret half is wiped when this value is dropped.
pub struct SigningIdentity {
    signing_key: SigningKey,
}

impl SigningIdentity {
    /// Decodes either a 64-byte keypair (secret ‖ public) or a bare 32-byte seed.
    pub fn from_base58(private_key: &str) -> XyberResult<Self> {
        let bytes = Zeroizing::new(bs58::decode(private_key.trim()).into_vec().map_err(
            |e| XyberError::InvalidKey {
                reason: format!("base58 decode failed: {}", e),
            },
        )?);

        let signing_key = match bytes.len() {
            KEYPAIR_LENGTH => {
                let mut keypair = Zeroizing::new([0u8; KEYPAIR_LENGTH]);
                keypair.copy_from_slice(&bytes);
                SigningKey::from_keypair_bytes(&keypair).map_err(|_| XyberError::InvalidKey {
                    reason: "public key does not match secret key".to_string(),
                })?
            }
            SECRET_KEY_LENGTH => {
                let mut seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
                seed.copy_from_slice(&bytes);
                SigningKey::from_bytes(&seed)
            }
            other => {
                return Err(XyberError::InvalidKey {
                    reason: format!(
                        "expected {} or {} bytes, got {}",
                        KEYPAIR_LENGTH, SECRET_KEY_LENGTH, other
                    ),
                })
            }
        };

        Ok(Self { signing_key })
    }

    /// Base58 public key.
    pub fn address(&self) -> String {
        bs58::encode(self.signing_key.verifying_key().as_bytes()).into_string()
    }

    /// Detached signature over the UTF-8 bytes of `message`, base58 encoded.
    pub fn sign(&self, message: &str) -> String {
        let signature = self.signing_key.sign(message.as_bytes());
        bs58::encode(signature.to_bytes()).into_string()
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address())
            .field("secret", &"***REDACTED***")
            .finish()
    }
}

pub fn derive_address(private_key: &str) -> XyberResult<String> {
    Ok(SigningIdentity::from_base58(private_key)?.address())
}

pub fn sign(private_key: &str, message: &str) -> XyberResult<String> {
    Ok(SigningIdentity::from_base58(private_key)?.sign(message))
}

/// `AbCdEf******UvWxYz` style address for console output.
pub fn mask_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.is_empty() {
        return "N/A".to_string();
    }
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}{}{}", head, "*".repeat(6), tail)
}
