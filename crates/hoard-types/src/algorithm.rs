use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// A digest algorithm from the fixed allowlist.
///
/// The set is closed: any tag outside it is rejected at parse time with
/// [`TypeError::UnsupportedAlgorithm`]. Whether a variant can actually be
/// computed in this build is a separate question answered by the
/// [catalog](crate::catalog).
///
/// Variants are declared in ascending digest length, so the derived `Ord`
/// matches catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Every algorithm on the allowlist, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    /// Canonical lowercase tag, as used in digest identifiers.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha-1",
            Self::Sha256 => "sha-256",
            Self::Sha384 => "sha-384",
            Self::Sha512 => "sha-512",
        }
    }

    /// Output length of the digest in bytes.
    pub const fn byte_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Length of the canonical hex encoding.
    pub const fn hex_len(&self) -> usize {
        self.byte_len() * 2
    }

    /// Whether the hashing family for this algorithm is compiled in.
    pub const fn is_compiled(&self) -> bool {
        match self {
            Self::Md5 => cfg!(feature = "md5"),
            Self::Sha1 => cfg!(feature = "sha1"),
            Self::Sha256 | Self::Sha384 | Self::Sha512 => cfg!(feature = "sha2"),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = TypeError;

    /// Parse a tag case-insensitively (`"SHA-256"` and `"sha-256"` both work).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl Serialize for DigestAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DigestAlgorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}
