//! Content hashing using blake3.

use std::fmt;

/// Number of hex characters used in marker file names.
const SHORT_LEN: usize = 8;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash raw source bytes.
    pub fn of(bytes: impl AsRef<[u8]>) -> Self {
        Self(*blake3::hash(bytes.as_ref()).as_bytes())
    }

    /// First 8 hex characters, as used in marker names.
    pub fn short(self) -> String {
        hex::encode(&self.0[..SHORT_LEN / 2])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// `true` when `s` looks like a marker suffix (8 lowercase hex chars).
pub(super) fn is_short_hex(s: &str) -> bool {
    s.len() == SHORT_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_content_same_hash() {
        assert_eq!(ContentHash::of("# Hello"), ContentHash::of(b"# Hello"));
    }

    #[test]
    fn test_different_content_different_hash() {
        let a = ContentHash::of("---\ntitle: A\n---\n# Hello");
        let b = ContentHash::of("---\ntitle: B\n---\n# Hello");
        assert_ne!(a, b);
        assert_ne!(a.short(), b.short());
    }

    #[test]
    fn test_short_is_hex_prefix() {
        let hash = ContentHash::of("content");
        let short = hash.short();

        assert_eq!(short.len(), 8);
        assert!(blake3::hash(b"content").to_hex().starts_with(&short));
        assert!(is_short_hex(&short));
        assert_eq!(hash.to_string(), short);
    }

    #[test]
    fn test_is_short_hex() {
        assert!(is_short_hex("0123abcd"));
        assert!(!is_short_hex("0123ABCD"));
        assert!(!is_short_hex("0123abc"));
        assert!(!is_short_hex("0123abcg"));
    }
}
