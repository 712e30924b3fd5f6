use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed rule {0:?}, expected B<digits>/S<digits>")]
  MalformedRule(String),

  #[error(transparent)]
  Decode(#[from] DecodeError),

  #[error("{}: {}", .path.display(), .source)]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("nothing alive to save")]
  EmptyRegion,

  #[error("settings line {line}: invalid value {value:?} for {key}")]
  InvalidSetting {
    line: usize,
    key: String,
    value: String,
  },

  #[error("{cols}x{rows} board with {cell_width}px cells is too large for an image")]
  ImageTooLarge {
    cols: usize,
    rows: usize,
    cell_width: u32,
  },

  #[error("image export failed: {0}")]
  Image(#[from] image::ImageError),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Error::Io { path: path.into(), source }
  }
}

/// Problems found while decoding a pattern file.
///
/// Only `UnsupportedFormat` stops a load. Everything else is collected next
/// to the decoded pattern, see [`is_tolerated`](DecodeError::is_tolerated).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
  #[error("unsupported pattern format: {}", .path.display())]
  UnsupportedFormat {
    path: PathBuf,
  },

  #[error("line {line}: malformed header {text:?}")]
  MalformedHeader {
    line: usize,
    text: String,
  },

  #[error("line {line}, column {column}: illegal character {found:?} in {text:?}")]
  IllegalCharacter {
    line: usize,
    column: usize,
    found: char,
    text: String,
  },

  #[error("line {line}: non-standard '*' alive marker in {text:?}")]
  NonStandardMarker {
    line: usize,
    text: String,
  },

  #[error("line {line}: pattern exceeds {limit} cells per side in {text:?}")]
  TooLarge {
    line: usize,
    limit: usize,
    text: String,
  },

  #[error("pattern ends without '!'")]
  Unterminated,
}

impl DecodeError {
  /// Deviations that leave the decoded data intact.
  pub fn is_tolerated(&self) -> bool {
    matches!(self, DecodeError::NonStandardMarker { .. } | DecodeError::Unterminated)
  }
}
