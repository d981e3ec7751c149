//! Cryptographic digest types and deterministic hashing.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

/// Supported digest algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256 (default).
    #[default]
    Sha256,
    /// SHA-512.
    Sha512,
    /// MD5 (legacy interoperability only; not collision resistant).
    Md5,
}

impl HashAlgorithm {
    /// Digest output length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
            Self::Md5 => 16,
        }
    }

    /// Parse from a case-insensitive name.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            "md5" => Ok(Self::Md5),
            other => Err(crate::Error::MalformedHash(format!(
                "unknown hash algorithm: {other}"
            ))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha512 => write!(f, "sha512"),
            Self::Md5 => write!(f, "md5"),
        }
    }
}

/// A content digest tagged with its algorithm.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    algorithm: HashAlgorithm,
    bytes: Vec<u8>,
}

impl ContentDigest {
    /// Compute the digest of raw bytes.
    pub fn compute(data: &[u8], algorithm: HashAlgorithm) -> Self {
        let bytes = match algorithm {
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
            HashAlgorithm::Md5 => Md5::digest(data).to_vec(),
        };
        Self { algorithm, bytes }
    }

    /// Compute the digest of a structured value.
    ///
    /// The value is canonically serialized first (serde_json orders object
    /// keys), so logically equal values hash identically regardless of how
    /// they were built in memory.
    pub fn compute_value(
        value: &serde_json::Value,
        algorithm: HashAlgorithm,
    ) -> crate::Result<Self> {
        let canonical = serde_json::to_vec(value)
            .map_err(|e| crate::Error::Serialization(e.to_string()))?;
        Ok(Self::compute(&canonical, algorithm))
    }

    /// Create an incremental hasher.
    pub fn hasher(algorithm: HashAlgorithm) -> ContentHasher {
        let inner = match algorithm {
            HashAlgorithm::Sha256 => HasherInner::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => HasherInner::Sha512(Sha512::new()),
            HashAlgorithm::Md5 => HasherInner::Md5(Md5::new()),
        };
        ContentHasher { inner }
    }

    /// Get the algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Get the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str, algorithm: HashAlgorithm) -> crate::Result<Self> {
        let expected = algorithm.digest_len() * 2;
        if s.len() != expected {
            return Err(crate::Error::MalformedHash(format!(
                "expected {expected} hex chars for {algorithm}, got {}",
                s.len()
            )));
        }
        let mut bytes = vec![0u8; algorithm.digest_len()];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hex_str = std::str::from_utf8(chunk)
                .map_err(|e| crate::Error::MalformedHash(e.to_string()))?;
            bytes[i] = u8::from_str_radix(hex_str, 16)
                .map_err(|e| crate::Error::MalformedHash(e.to_string()))?;
        }
        Ok(Self { algorithm, bytes })
    }

    /// Encode as lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Encode as base64 string.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({}:{})", self.algorithm, &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

enum HasherInner {
    Sha256(Sha256),
    Sha512(Sha512),
    Md5(Md5),
}

/// Incremental digest hasher.
pub struct ContentHasher {
    inner: HasherInner,
}

impl ContentHasher {
    /// Update the hasher with data.
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.inner {
            HasherInner::Sha256(h) => h.update(data),
            HasherInner::Sha512(h) => h.update(data),
            HasherInner::Md5(h) => h.update(data),
        }
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> ContentDigest {
        match self.inner {
            HasherInner::Sha256(h) => ContentDigest {
                algorithm: HashAlgorithm::Sha256,
                bytes: h.finalize().to_vec(),
            },
            HasherInner::Sha512(h) => ContentDigest {
                algorithm: HashAlgorithm::Sha512,
                bytes: h.finalize().to_vec(),
            },
            HasherInner::Md5(h) => ContentDigest {
                algorithm: HashAlgorithm::Md5,
                bytes: h.finalize().to_vec(),
            },
        }
    }
}
