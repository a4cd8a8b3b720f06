use std::fmt;

use serde::{Deserialize, Serialize};

/// Media type assumed when nothing better is known.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// A lossless transfer encoding applied to stored content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEncoding {
    Gzip,
    Deflate,
    Zstd,
    Base64,
    /// Any other encoding, by its registered name.
    Other(String),
}

impl ContentEncoding {
    /// Map an encoding name to a variant. Never fails: unknown names are
    /// kept verbatim as [`ContentEncoding::Other`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gzip" | "x-gzip" => Self::Gzip,
            "deflate" => Self::Deflate,
            "zstd" => Self::Zstd,
            "base64" => Self::Base64,
            _ => Self::Other(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Zstd => "zstd",
            Self::Base64 => "base64",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes derived from (or declared for) a piece of content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAttrs {
    /// Content length in bytes.
    pub size: u64,
    /// Media type, e.g. `text/plain`.
    pub media_type: String,
    /// Character set for textual content.
    pub charset: Option<String>,
    /// Transfer encoding, if the stored bytes are encoded.
    pub encoding: Option<ContentEncoding>,
}

impl ContentAttrs {
    /// Attributes for `size` bytes of untyped content.
    pub fn new(size: u64) -> Self {
        Self {
            size,
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
            charset: None,
            encoding: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_encoding(mut self, encoding: ContentEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }
}
