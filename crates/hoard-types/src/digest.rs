use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::algorithm::DigestAlgorithm;
use crate::error::TypeError;

/// Identifiers of one piece of content, keyed by algorithm.
///
/// Iteration follows catalog order.
pub type DigestSet = BTreeMap<DigestAlgorithm, DigestId>;

/// Canonical identifier of content under one digest algorithm.
///
/// Rendered as `<algorithm>:<lowercase-hex>`, e.g.
/// `md5:900150983cd24fb0d6963f7d28e17f72`. The hex part always has exactly
/// `2 * algorithm.byte_len()` characters; every constructor enforces this.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DigestId {
    algorithm: DigestAlgorithm,
    hex: String,
}

impl DigestId {
    /// Build an identifier from raw digest bytes.
    pub fn from_digest(algorithm: DigestAlgorithm, bytes: &[u8]) -> Result<Self, TypeError> {
        if bytes.len() != algorithm.byte_len() {
            return Err(TypeError::InvalidLength {
                algorithm: algorithm.to_string(),
                expected: algorithm.hex_len(),
                actual: bytes.len() * 2,
            });
        }
        Ok(Self {
            algorithm,
            hex: hex::encode(bytes),
        })
    }

    /// Build an identifier from a hex string (either case accepted).
    pub fn from_hex(algorithm: DigestAlgorithm, s: &str) -> Result<Self, TypeError> {
        if s.len() != algorithm.hex_len() {
            return Err(TypeError::InvalidLength {
                algorithm: algorithm.to_string(),
                expected: algorithm.hex_len(),
                actual: s.len(),
            });
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_digest(algorithm, &bytes)
    }

    /// The algorithm this identifier was computed with.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Lowercase hex encoding of the digest.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Raw digest bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        // The hex is produced by `hex::encode` or validated on parse.
        hex::decode(&self.hex).unwrap_or_default()
    }

    /// Short form for logs: algorithm plus the first 8 hex characters.
    pub fn short(&self) -> String {
        format!("{}:{}", self.algorithm, &self.hex[..8])
    }
}

impl fmt::Debug for DigestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestId({})", self.short())
    }
}

impl fmt::Display for DigestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

impl FromStr for DigestId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, hex) = s
            .split_once(':')
            .ok_or_else(|| TypeError::MalformedIdentifier(s.to_string()))?;
        let algorithm: DigestAlgorithm = tag.parse()?;
        Self::from_hex(algorithm, hex)
    }
}

impl Serialize for DigestId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DigestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
