//! Keccak-256 hashing

use sha3::{Digest, Keccak256};
use wabi_primitives::H256;

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: impl AsRef<[u8]>) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}

/// First four bytes of `keccak256(signature)`
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Reference vectors ====================

    #[test]
    fn test_keccak256_empty() {
        let hash = keccak256([0u8; 0]);
        assert_eq!(
            hash.to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_hello() {
        let hash = keccak256(b"hello");
        assert_eq!(
            hash.to_hex(),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_keccak256_32_zero_bytes() {
        let hash = keccak256([0u8; 32]);
        assert_eq!(
            hash.to_hex(),
            "0x290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563"
        );
    }

    #[test]
    fn test_keccak256_hex_input() {
        let data = hex::decode("deadbeef").unwrap();
        assert_eq!(
            keccak256(&data).to_hex(),
            "0xd4fd4e189132273036449fc9e11198c739161b4c0116a9a2dccdfa1c492006f1"
        );
    }

    // ==================== Selectors and topics ====================

    #[test]
    fn test_erc20_selectors() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("approve(address,uint256)"), [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_revert_selectors() {
        assert_eq!(selector("Error(string)"), [0x08, 0xc3, 0x79, 0xa0]);
        assert_eq!(selector("Panic(uint256)"), [0x4e, 0x48, 0x7b, 0x71]);
    }

    #[test]
    fn test_transfer_event_topic() {
        let topic = keccak256("Transfer(address,address,uint256)");
        assert_eq!(
            topic.to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_keccak256_deterministic() {
        assert_eq!(keccak256(b"input"), keccak256(b"input"));
        assert_ne!(keccak256(b"input1"), keccak256(b"input2"));
    }
}
