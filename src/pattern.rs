use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use itertools::Itertools;
use crate::error::{DecodeError, Error, Result};
use crate::grid::{Cell, DEAD};
use crate::rule::Rule;
use crate::{plaintext, rle};

/// Rectangular block of dead/alive cells read from a pattern file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
  cells: Vec<Vec<Cell>>,
  /// Where the pattern's origin goes in a target grid, when the file says.
  pub anchor: Option<(i64, i64)>,
  pub name: Option<String>,
  pub rule: Option<Rule>,
}

/// A decoded pattern together with everything that went wrong on the way.
#[derive(Clone, Debug, Default)]
pub struct Decoded {
  pub pattern: Pattern,
  pub issues: Vec<DecodeError>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
  /// `.cells`
  Plaintext,
  /// `.rle`
  Rle,
}

impl Pattern {
  /// Right-pads every row with dead cells up to the widest one.
  pub fn from_rows(mut cells: Vec<Vec<Cell>>) -> Self {
    let width = cells.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut cells {
      row.resize(width, DEAD);
    }
    Self {
      cells,
      ..Default::default()
    }
  }

  pub fn width(&self) -> usize {
    self.cells.first().map_or(0, Vec::len)
  }

  pub fn height(&self) -> usize {
    self.cells.len()
  }

  pub fn rows(&self) -> &[Vec<Cell>] {
    &self.cells
  }

  pub fn is_alive(&self, x: usize, y: usize) -> bool {
    self.cells.get(y).and_then(|row| row.get(x)).map_or(false, |&c| c != DEAD)
  }

  pub fn population(&self) -> usize {
    self.cells.iter().flatten().filter(|&&c| c != DEAD).count()
  }

  /// The anchor, or the origin when the file had none.
  pub fn anchor_or_origin(&self) -> (i64, i64) {
    self.anchor.unwrap_or((0, 0))
  }
}

impl fmt::Display for Pattern {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let text = self.cells.iter()
      .map(|row| row.iter().map(|&c| if c == DEAD { '.' } else { 'O' }).collect::<String>())
      .join("\n");
    f.write_str(&text)
  }
}

impl Format {
  pub fn from_path(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
      "cells" => Some(Format::Plaintext),
      "rle" => Some(Format::Rle),
      _ => None,
    }
  }
}

/// Reads a pattern file, choosing the decoder from the file extension.
///
/// Every issue found is logged with the file path; tolerated ones as
/// warnings, aborted lines as errors.
pub fn load(path: impl AsRef<Path>) -> Result<Decoded> {
  let path = path.as_ref();
  let format = Format::from_path(path)
    .ok_or_else(|| DecodeError::UnsupportedFormat { path: path.to_owned() })?;
  let src = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

  let decoded = decode(&src, format);
  for issue in &decoded.issues {
    if issue.is_tolerated() {
      log::warn!("{}: {}", path.display(), issue);
    } else {
      log::error!("{}: {}", path.display(), issue);
    }
  }
  log::debug!(
    "{}: {}x{} pattern, {} alive",
    path.display(),
    decoded.pattern.width(),
    decoded.pattern.height(),
    decoded.pattern.population(),
  );
  Ok(decoded)
}

pub fn decode(src: &str, format: Format) -> Decoded {
  match format {
    Format::Plaintext => plaintext::read(src),
    Format::Rle => rle::read(src),
  }
}

/// Pattern files of a flat library directory, sorted by file name.
pub fn list(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
  let dir = dir.as_ref();
  let mut files = vec![];
  for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
    let path = entry.map_err(|e| Error::io(dir, e))?.path();
    if path.is_file() && Format::from_path(&path).is_some() {
      files.push(path);
    }
  }
  files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
  Ok(files)
}
