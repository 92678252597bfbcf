//! Boundary adapter between untyped pipeline objects and the transformer.
//!
//! Objects arriving from outside the process (JSON lines) are classified once,
//! here, into the closed set of [`Input`] variants by looking at two stable markers:
//!
//! * `"isVinyl": true` identifies a Vinyl file object at all;
//! * `"vinylVersion": n` with `n >= 2` identifies the v2 contract.
//!
//! Everything after classification is a pattern match.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Cursor;
use std::path::PathBuf;

use crate::error::Result;
use crate::file::{Contents, VinylFile};

/// Identity marker key.
pub const VINYL_MARKER: &str = "isVinyl";
/// Contract version key.
pub const VERSION_MARKER: &str = "vinylVersion";
/// Lowest supported contract version.
pub const MIN_VINYL_VERSION: u64 = 2;

/// An item handed to the transformer by the upstream producer.
#[derive(Debug)]
pub enum Input {
    /// A Vinyl v2 file.
    File(VinylFile),
    /// A Vinyl-shaped value from a pre-v2 implementation.
    Legacy(Value),
    /// A value that is not a Vinyl file.
    Foreign(Value),
}

impl From<VinylFile> for Input {
    fn from(file: VinylFile) -> Self {
        Input::File(file)
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::from_json(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsRecord {
    Text(String),
    Bytes(Vec<u8>),
    Stream { stream: String },
}

#[derive(Deserialize)]
struct FileRecord {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    base: Option<PathBuf>,
    #[serde(default)]
    contents: Option<ContentsRecord>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ContentsOut<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileOut<'a> {
    is_vinyl: bool,
    vinyl_version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<&'a PathBuf>,
    contents: Option<ContentsOut<'a>>,
}

impl Input {
    /// Classifies a JSON pipeline object.
    pub fn from_json(value: Value) -> Self {
        let Some(object) = value.as_object() else {
            return Input::Foreign(value);
        };
        if object.get(VINYL_MARKER).and_then(Value::as_bool) != Some(true) {
            return Input::Foreign(value);
        }
        let version = object.get(VERSION_MARKER).and_then(version_of);
        if !version.is_some_and(|v| v >= MIN_VINYL_VERSION) {
            return Input::Legacy(value);
        }

        match FileRecord::deserialize(&value) {
            Ok(record) => Input::File(record.into_file()),
            Err(e) => {
                log::debug!("Malformed Vinyl object: {}", e);
                Input::Foreign(value)
            }
        }
    }

    /// Parses one line of the JSON-lines protocol.
    pub fn from_json_str(line: &str) -> Result<Self> {
        Ok(Self::from_json(serde_json::from_str(line)?))
    }
}

impl FileRecord {
    fn into_file(self) -> VinylFile {
        let contents = match self.contents {
            None => Contents::Null,
            Some(ContentsRecord::Text(text)) => Contents::from(text),
            Some(ContentsRecord::Bytes(bytes)) => Contents::Buffer(bytes),
            Some(ContentsRecord::Stream { stream }) => {
                Contents::Stream(Box::new(Cursor::new(stream.into_bytes())))
            }
        };
        VinylFile {
            path: self.path,
            base: self.base,
            contents,
        }
    }
}

/// Reads a contract version. Integral floats such as `2.0` count as integers.
fn version_of(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0)
            .map(|v| v as u64)
    })
}

/// Name of a value's runtime shape, as shown in shape errors.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serializes a file back into the wire format.
///
/// Stream contents cannot be serialized and are written as `null`.
pub fn to_json(file: &VinylFile) -> Value {
    let contents = match &file.contents {
        Contents::Buffer(bytes) => Some(match std::str::from_utf8(bytes) {
            Ok(text) => ContentsOut::Text(text),
            Err(_) => ContentsOut::Bytes(bytes),
        }),
        Contents::Null | Contents::Stream(_) => None,
    };
    let out = FileOut {
        is_vinyl: true,
        vinyl_version: MIN_VINYL_VERSION,
        path: file.path.as_ref(),
        base: file.base.as_ref(),
        contents,
    };
    serde_json::to_value(out).unwrap_or(Value::Null)
}
