//! # Content Digest — Content-Addressed Identifiers
//!
//! Defines [`Digest`] and [`DigestAlgorithm`] for the content-addressed
//! blob store the tag index sits on top of.
//!
//! ## Opacity
//!
//! A `Digest` is an opaque, immutable string compared by exact equality.
//! Construction through [`Digest::new`] does not validate: digests read back
//! from persisted link files are returned exactly as stored. Well-formedness
//! is checked with [`Digest::validate`] at the points where a digest enters
//! the system (tagging, index path computation).
//!
//! ## Format
//!
//! `<algorithm>:<encoded>` where `encoded` is lowercase hex whose length is
//! fixed by the algorithm (`sha256` → 64, `sha384` → 96, `sha512` → 128).

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::error::ValidationError;

/// The hash algorithm named by a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, the canonical algorithm for new content.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Length of the hex-encoded hash for this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            other => Err(ValidationError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// An opaque content digest, e.g. `sha256:9f86d0…`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Wrap a digest string without validating it.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Wrap a digest string, rejecting it unless it is well-formed.
    pub fn parse(s: impl Into<String>) -> Result<Self, ValidationError> {
        let digest = Self(s.into());
        digest.validate()?;
        Ok(digest)
    }

    /// Compute the SHA-256 digest of `content`.
    pub fn sha256_of(content: &[u8]) -> Self {
        let hash = Sha256::digest(content);
        let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("{}:{hex}", DigestAlgorithm::Sha256))
    }

    /// Return the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the digest string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that the digest is well-formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.parts().map(|_| ())
    }

    /// Split a well-formed digest into its algorithm and encoded hash.
    pub fn parts(&self) -> Result<(DigestAlgorithm, &str), ValidationError> {
        if self.0.is_empty() {
            return Err(ValidationError::EmptyDigest);
        }
        let (algorithm, encoded) = self
            .0
            .split_once(':')
            .filter(|(a, e)| !a.is_empty() && !e.is_empty())
            .ok_or_else(|| ValidationError::InvalidDigestFormat(self.0.clone()))?;

        let algorithm: DigestAlgorithm = algorithm.parse()?;
        if encoded.len() != algorithm.hex_len() {
            return Err(ValidationError::InvalidDigestLength {
                algorithm: algorithm.to_string(),
                expected: algorithm.hex_len(),
                actual: encoded.len(),
            });
        }
        if !encoded
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(ValidationError::InvalidDigestEncoding(encoded.to_string()));
        }
        Ok((algorithm, encoded))
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Digest {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Digest {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for Digest {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Digest {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hex(c: char, n: usize) -> String {
        std::iter::repeat(c).take(n).collect()
    }

    #[test]
    fn test_valid_digests() {
        for (alg, n) in [("sha256", 64), ("sha384", 96), ("sha512", 128)] {
            let d = Digest::new(format!("{alg}:{}", hex('a', n)));
            assert!(d.validate().is_ok(), "{d} should be valid");
        }
    }

    #[test]
    fn test_empty_digest_rejected() {
        assert_eq!(Digest::default().validate(), Err(ValidationError::EmptyDigest));
    }

    #[test]
    fn test_missing_separator_rejected() {
        let err = Digest::new(hex('a', 64)).validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDigestFormat(_)));
        let err = Digest::new("sha256:").validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDigestFormat(_)));
        let err = Digest::new(":abc").validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDigestFormat(_)));
    }

    #[test]
    fn test_unsupported_algorithm_rejected() {
        let err = Digest::new(format!("md5:{}", hex('a', 32)))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedAlgorithm("md5".into()));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = Digest::new(format!("sha256:{}", hex('a', 63)))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidDigestLength { expected: 64, actual: 63, .. }
        ));
    }

    #[test]
    fn test_uppercase_hex_rejected() {
        let err = Digest::new(format!("sha256:{}", hex('A', 64)))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDigestEncoding(_)));
    }

    #[test]
    fn test_parts_splits_algorithm_and_hex() {
        let d = Digest::new(format!("sha512:{}", hex('0', 128)));
        let (alg, encoded) = d.parts().unwrap();
        assert_eq!(alg, DigestAlgorithm::Sha512);
        assert_eq!(encoded.len(), 128);
    }

    #[test]
    fn test_sha256_of_known_vector() {
        let d = Digest::sha256_of(b"");
        assert_eq!(
            d.as_str(),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_new_does_not_validate() {
        let d = Digest::new("not a digest");
        assert_eq!(d, "not a digest");
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_serde_is_plain_string() {
        let d = Digest::sha256_of(b"x");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{d}\""));
    }

    proptest! {
        #[test]
        fn prop_sha256_of_always_validates(content in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert!(Digest::sha256_of(&content).validate().is_ok());
        }

        #[test]
        fn prop_non_hex_character_is_rejected(pos in 0usize..64, c in "[g-zG-Z]") {
            let mut encoded = hex('a', 64);
            encoded.replace_range(pos..pos + 1, &c);
            let d = Digest::new(format!("sha256:{encoded}"));
            prop_assert!(matches!(d.validate(), Err(ValidationError::InvalidDigestEncoding(_))));
        }
    }
}
