use rand::{RngCore, rngs::OsRng};

use crate::domain::cluster::{
    entities::{BootstrapToken, ClusterError},
    ports::BootstrapTokenRepository,
};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Largest multiple of the alphabet size that fits in a byte. Bytes at or
/// above it are discarded so every character is equally likely.
const ACCEPT_BELOW: u8 = 252;

/// Kubeadm-style bootstrap tokens (`[a-z0-9]{6}.[a-z0-9]{16}`) drawn from the
/// operating system CSPRNG.
#[derive(Debug, Clone, Default)]
pub struct RandBytesBootstrapTokenRepository;

impl RandBytesBootstrapTokenRepository {
    pub fn new() -> Self {
        RandBytesBootstrapTokenRepository
    }

    fn random_chars<R: RngCore>(rng: &mut R, len: usize) -> Result<String, ClusterError> {
        let mut out = String::with_capacity(len);
        let mut bytes = [0u8; 32];

        while out.len() < len {
            rng.try_fill_bytes(&mut bytes)
                .map_err(|e| ClusterError::Generation(e.to_string()))?;

            for byte in bytes.iter().filter(|byte| **byte < ACCEPT_BELOW) {
                if out.len() == len {
                    break;
                }
                out.push(ALPHABET[(*byte % 36) as usize] as char);
            }
        }

        Ok(out)
    }

    fn generate_with<R: RngCore>(rng: &mut R) -> Result<BootstrapToken, ClusterError> {
        let id = Self::random_chars(rng, BootstrapToken::ID_LEN)?;
        let secret = Self::random_chars(rng, BootstrapToken::SECRET_LEN)?;

        Ok(BootstrapToken::new(format!("{id}.{secret}")))
    }
}

impl BootstrapTokenRepository for RandBytesBootstrapTokenRepository {
    fn generate_token(&self) -> Result<BootstrapToken, ClusterError> {
        Self::generate_with(&mut OsRng).inspect_err(|e| {
            tracing::error!("Failed to generate bootstrap token: {}", e);
        })
    }
}
