//! Transaction Builder
//!
//! Builds, hashes and signs VeChainThor transactions for contract calls.
//!
//! Body layout (RLP list):
//! `[chainTag, blockRef, expiration, clauses, gasPriceCoef, gas, dependsOn, nonce, reserved]`
//! where each clause is `[to, value, data]`. The signing hash is
//! blake2b-256 over the encoded body and the signed form appends the
//! 65-byte signature as a tenth element.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use crate::error::{ChainError, ChainResult};
use crate::rlp::RlpItem;
use crate::signer::LocalSigner;

type Blake2b256 = Blake2b<U32>;

/// blake2b with a 32-byte digest
pub fn blake2b256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// A single call within a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub to: [u8; 20],
    pub value: u64,
    pub data: Vec<u8>,
}

impl Clause {
    /// Contract call with no value transfer
    pub fn call(to: [u8; 20], data: Vec<u8>) -> Self {
        Self { to, value: 0, data }
    }

    fn to_rlp(&self) -> RlpItem {
        RlpItem::List(vec![
            RlpItem::bytes(self.to.to_vec()),
            RlpItem::uint(self.value),
            RlpItem::bytes(self.data.clone()),
        ])
    }
}

/// Unsigned transaction body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxBody {
    pub chain_tag: u8,
    pub block_ref: [u8; 8],
    pub expiration: u32,
    pub clauses: Vec<Clause>,
    pub gas_price_coef: u8,
    pub gas: u64,
    pub depends_on: Option<[u8; 32]>,
    pub nonce: u64,
}

/// Signed, broadcast-ready transaction
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// RLP-encoded signed transaction
    pub raw: Vec<u8>,
    /// Transaction id
    pub id: [u8; 32],
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    pub fn id_hex(&self) -> String {
        format!("0x{}", hex::encode(self.id))
    }
}

impl TxBody {
    fn fields(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::uint(u64::from(self.chain_tag)),
            RlpItem::uint(u64::from_be_bytes(self.block_ref)),
            RlpItem::uint(u64::from(self.expiration)),
            RlpItem::List(self.clauses.iter().map(Clause::to_rlp).collect()),
            RlpItem::uint(u64::from(self.gas_price_coef)),
            RlpItem::uint(self.gas),
            RlpItem::bytes(self.depends_on.map(|d| d.to_vec()).unwrap_or_default()),
            RlpItem::uint(self.nonce),
            RlpItem::empty_list(),
        ]
    }

    /// Encoded unsigned body
    pub fn encode(&self) -> Vec<u8> {
        RlpItem::List(self.fields()).encode()
    }

    /// Digest the origin signs
    pub fn signing_hash(&self) -> [u8; 32] {
        blake2b256(&[&self.encode()])
    }

    /// Sign the body and compute the transaction id
    pub fn sign(&self, signer: &LocalSigner) -> ChainResult<SignedTransaction> {
        if self.clauses.is_empty() {
            return Err(ChainError::TransactionBuild("transaction has no clauses".into()));
        }

        let signing_hash = self.signing_hash();
        let signature = signer.sign_hash(&signing_hash)?;

        let mut fields = self.fields();
        fields.push(RlpItem::bytes(signature.to_vec()));
        let raw = RlpItem::List(fields).encode();

        let id = blake2b256(&[&signing_hash, &signer.address()]);
        Ok(SignedTransaction { raw, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn sample_body() -> TxBody {
        let mut to = [0u8; 20];
        to.copy_from_slice(&hex::decode("7567d83b7b8d80addcb281a71d54fc7b3364ffed").unwrap());
        let data = hex::decode("000000606060").unwrap();
        TxBody {
            chain_tag: 1,
            block_ref: [0, 0, 0, 0, 0xaa, 0xbb, 0xcc, 0xdd],
            expiration: 32,
            clauses: vec![
                Clause { to, value: 10_000, data: data.clone() },
                Clause { to, value: 20_000, data },
            ],
            gas_price_coef: 128,
            gas: 21_000,
            depends_on: None,
            nonce: 12_345_678,
        }
    }

    #[test]
    fn test_body_encoding_vector() {
        let body = sample_body();
        assert_eq!(
            hex::encode(body.encode()),
            "f8540184aabbccdd20f840df947567d83b7b8d80addcb281a71d54fc7b3364ffed82271086000000606060df947567d83b7b8d80addcb281a71d54fc7b3364ffed824e208600000060606081808252088083bc614ec0"
        );
        assert_eq!(
            hex::encode(body.signing_hash()),
            "2a1c25ce0d66f45276a5f308b99bf410e2fc7d5b6ea37a49f2ab9f1da9446478"
        );
    }

    #[test]
    fn test_signed_transaction_id() {
        let signer = LocalSigner::from_hex(KEY_ONE).unwrap();
        let signed = sample_body().sign(&signer).unwrap();
        assert_eq!(
            signed.id_hex(),
            "0xe1bbf97a364b0d5e516fd4921e096aa12e94d77ba4853ecaf1bc303d64456379"
        );
        // body (0x54 payload) plus a 65-byte signature string
        assert_eq!(signed.raw.len(), 2 + 0x54 + 2 + 65);
        assert_eq!(&signed.raw[..2], &[0xf8, 0x54 + 2 + 65]);
    }

    #[test]
    fn test_empty_clauses_rejected() {
        let signer = LocalSigner::from_hex(KEY_ONE).unwrap();
        let mut body = sample_body();
        body.clauses.clear();
        assert!(matches!(body.sign(&signer), Err(ChainError::TransactionBuild(_))));
    }
}
