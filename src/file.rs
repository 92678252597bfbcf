//! The Vinyl file model: a path plus a contents payload flowing between pipeline stages.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Payload of a [`VinylFile`].
pub enum Contents {
    /// The file carries no contents (e.g. a directory or a `read: false` source).
    Null,
    /// A fully buffered payload.
    Buffer(Vec<u8>),
    /// A live byte stream. Never supported by the transformer.
    Stream(Box<dyn Read + Send>),
}

impl Contents {
    pub fn is_null(&self) -> bool {
        matches!(self, Contents::Null)
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Contents::Stream(_))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Null => f.write_str("Null"),
            Contents::Buffer(bytes) => f
                .debug_tuple("Buffer")
                .field(&String::from_utf8_lossy(bytes))
                .finish(),
            Contents::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Streams have no identity to compare, so two stream payloads are never equal.
impl PartialEq for Contents {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Contents::Null, Contents::Null) => true,
            (Contents::Buffer(a), Contents::Buffer(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Vec<u8>> for Contents {
    fn from(bytes: Vec<u8>) -> Self {
        Contents::Buffer(bytes)
    }
}

impl From<String> for Contents {
    fn from(text: String) -> Self {
        Contents::Buffer(text.into_bytes())
    }
}

impl From<&str> for Contents {
    fn from(text: &str) -> Self {
        Contents::Buffer(text.as_bytes().to_vec())
    }
}

/// A file object conforming to the Vinyl v2 contract.
#[derive(Debug, PartialEq)]
pub struct VinylFile {
    pub path: Option<PathBuf>,
    pub base: Option<PathBuf>,
    pub contents: Contents,
}

impl Default for VinylFile {
    fn default() -> Self {
        Self {
            path: None,
            base: None,
            contents: Contents::Null,
        }
    }
}

impl VinylFile {
    pub fn new(contents: impl Into<Contents>) -> Self {
        Self {
            contents: contents.into(),
            ..Self::default()
        }
    }

    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_base<P: Into<PathBuf>>(mut self, base: P) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Derives a sibling file sharing this file's base, with the extension
    /// swapped for `extension` and new contents.
    pub fn derive(&self, extension: &str, contents: impl Into<Contents>) -> Self {
        Self {
            path: self.path.as_deref().map(|p| replace_extension(p, extension)),
            base: self.base.clone(),
            contents: contents.into(),
        }
    }

    /// Path relative to `base`, falling back to the file name.
    pub fn relative(&self) -> Option<PathBuf> {
        let path = self.path.as_deref()?;
        if let Some(base) = &self.base {
            if let Ok(relative) = path.strip_prefix(base) {
                return Some(relative.to_path_buf());
            }
        }
        path.file_name().map(PathBuf::from)
    }
}

/// Replaces the extension of `path`, appending one if the path had none.
pub fn replace_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension.trim_start_matches('.'))
}
