//! Local transaction signer
//!
//! Holds the registrar's secp256k1 key. The key never leaves this type and
//! is not printed by `Debug`.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

use crate::error::{ChainError, ChainResult};

/// Length of a recoverable signature (r || s || v)
pub const SIGNATURE_LEN: usize = 65;

/// secp256k1 signer backed by an in-process key
#[derive(Clone)]
pub struct LocalSigner {
    signing_key: SigningKey,
    address: [u8; 20],
}

impl LocalSigner {
    /// Parse a hex private key, with or without a 0x prefix
    pub fn from_hex(key: &str) -> ChainResult<Self> {
        let trimmed = key.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(hex_part)
            .map_err(|_| ChainError::InvalidCredential("private key is not valid hex".into()))?;
        if bytes.len() != 32 {
            return Err(ChainError::InvalidCredential(format!(
                "private key must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        Self::from_bytes(&bytes)
    }

    /// Build from raw key bytes
    pub fn from_bytes(bytes: &[u8]) -> ChainResult<Self> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|_| ChainError::InvalidCredential("private key out of range".into()))?;
        let address = address_of(signing_key.verifying_key());
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Account address derived from the public key
    pub fn address(&self) -> [u8; 20] {
        self.address
    }

    /// Account address as lowercase 0x-prefixed hex
    pub fn address_hex(&self) -> String {
        format!("0x{}", hex::encode(self.address))
    }

    /// Sign a 32-byte digest, returning r || s || recovery id
    pub fn sign_hash(&self, hash: &[u8; 32]) -> ChainResult<[u8; SIGNATURE_LEN]> {
        let (signature, recovery_id): (Signature, RecoveryId) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|e| ChainError::TransactionSign(e.to_string()))?;

        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(out)
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address_hex())
            .finish_non_exhaustive()
    }
}

/// Address = last 20 bytes of keccak256(uncompressed public key without prefix)
fn address_of(key: &VerifyingKey) -> [u8; 20] {
    let point = key.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}
