//! Contract ABI encoding
//!
//! Encodes the `gradeSubmission(address,bool)` call and decodes revert
//! payloads returned by the node.

use l2e_core::WalletAddress;
use sha3::{Digest, Keccak256};

use crate::error::{ChainError, ChainResult};

/// Grading function signature
pub const GRADE_SUBMISSION_SIGNATURE: &str = "gradeSubmission(address,bool)";

/// keccak256("gradeSubmission(address,bool)")[..4]
pub const GRADE_SUBMISSION_SELECTOR: [u8; 4] = [0xe4, 0x79, 0xde, 0xee];

/// keccak256("Error(string)")[..4]
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// keccak256("Panic(uint256)")[..4]
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// ABI word size
const WORD: usize = 32;

/// Compute a function selector from its canonical signature
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Parse a hex account address into raw bytes
pub fn parse_address(address: &str) -> ChainResult<[u8; 20]> {
    WalletAddress::parse(address)
        .map(|a| a.to_bytes())
        .map_err(|_| ChainError::InvalidAddress(address.to_string()))
}

/// Encode `gradeSubmission(student, approved)` call data
pub fn encode_grade_submission(student: &WalletAddress, approved: bool) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 2 * WORD);
    data.extend_from_slice(&GRADE_SUBMISSION_SELECTOR);

    // address: left-padded to one word
    data.extend_from_slice(&[0u8; WORD - 20]);
    data.extend_from_slice(&student.to_bytes());

    // bool: uint8 0/1 left-padded to one word
    data.extend_from_slice(&[0u8; WORD - 1]);
    data.push(u8::from(approved));

    data
}

/// Decode a human-readable revert reason, if the payload carries one
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (selector, body) = data.split_at(4);

    if selector == ERROR_STRING_SELECTOR {
        let offset = read_word_usize(body, 0)?;
        let len = read_word_usize(body, offset)?;
        let start = offset.checked_add(WORD)?;
        let bytes = body.get(start..start.checked_add(len)?)?;
        return String::from_utf8(bytes.to_vec()).ok();
    }

    if selector == PANIC_SELECTOR {
        let word = body.get(..WORD)?;
        let code = word.iter().skip_while(|b| **b == 0).fold(String::new(), |mut s, b| {
            s.push_str(&format!("{:02x}", b));
            s
        });
        let code = if code.is_empty() { "00".to_string() } else { code };
        return Some(format!("panic code 0x{}", code));
    }

    None
}

/// Build the failure reason for a reverted call
///
/// Uses the decoded reason when available, otherwise the raw bytes.
pub fn describe_revert(outputs: &[Vec<u8>]) -> String {
    let data = outputs.iter().find(|o| !o.is_empty());
    match data {
        None => "Transaction was reverted".to_string(),
        Some(data) => match decode_revert_reason(data) {
            Some(reason) => format!("Transaction was reverted: {}", reason),
            None => format!(
                "Transaction was reverted - Data: {}",
                l2e_core::logging::hex_preview(data)
            ),
        },
    }
}

fn read_word_usize(body: &[u8], at: usize) -> Option<usize> {
    let word = body.get(at..at.checked_add(WORD)?)?;
    // Offsets and lengths must fit in the low 8 bytes
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(low)).ok()
}
