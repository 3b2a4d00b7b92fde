use keccak_hash::keccak;

use crate::HASH_LEN;

/// An all-zero word. Merkle paths use it as a placeholder sibling, in which
/// case the running node is hashed with itself.
pub const ZERO_HASH: [u8; HASH_LEN] = [0; HASH_LEN];

/// Keccak-256 of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; HASH_LEN] {
    keccak(data).0
}

/// Keccak-256 of the concatenation of `parts`.
pub fn keccak256_concat(parts: &[&[u8]]) -> [u8; HASH_LEN] {
    keccak256(parts.concat())
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(
            keccak256(b""),
            hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn concat_matches_single_buffer() {
        assert_eq!(
            keccak256_concat(&[b"burn".as_slice(), b"", b"proof"]),
            keccak256(b"burnproof")
        );
    }
}
