use std::fs;
use std::path::Path;
use regex::Regex;
use crate::error::{DecodeError, Error, Result};
use crate::grid::{BoundingBox, Grid, BORN, DEAD};
use crate::pattern::{Decoded, Pattern};

thread_local! {
  static NAME_RE: Regex = Regex::new(r"^!Name:\s*(.*)$").unwrap();
  static POSITION_RE: Regex = Regex::new(r"^!Position:\s*(-?\d+)\s*,\s*(-?\d+)").unwrap();
}

/// Read a Life pattern from a Plaintext string.
///
/// Plaintext format: <https://www.conwaylife.com/wiki/Plaintext>.
///
/// `!` lines are headers. Blank lines before the first data row are skipped,
/// later ones are all-dead rows. Rows are right-padded to the widest row.
pub fn read(src: &str) -> Decoded {
  let mut rows = vec![];
  let mut issues = vec![];
  let mut name = None;
  let mut seen_data = false;

  for (i, line) in src.lines().enumerate() {
    let line_no = i + 1;
    let line = line.trim();

    if line.starts_with('!') {
      if let Some(n) = NAME_RE.with(|re| re.captures(line).map(|caps| caps[1].trim().to_owned())) {
        name = Some(n);
      }
      continue;
    }
    if line.is_empty() && !seen_data {
      continue;
    }
    seen_data = true;

    let mut row = Vec::with_capacity(line.len());
    let mut marker_reported = false;
    for (column, c) in line.chars().enumerate() {
      match c {
        '.' => row.push(DEAD),
        'O' => row.push(BORN),
        '*' => {
          row.push(BORN);
          if !marker_reported {
            marker_reported = true;
            issues.push(DecodeError::NonStandardMarker {
              line: line_no,
              text: line.to_owned(),
            });
          }
        }
        _ => {
          issues.push(DecodeError::IllegalCharacter {
            line: line_no,
            column: column + 1,
            found: c,
            text: line.to_owned(),
          });
          break;
        }
      }
    }
    rows.push(row);
  }

  let mut pattern = Pattern::from_rows(rows);
  pattern.anchor = position(src);
  pattern.name = name;
  Decoded { pattern, issues }
}

/// The `!Position: x,y` anchor of a Plaintext string, if any.
pub fn position(src: &str) -> Option<(i64, i64)> {
  POSITION_RE.with(|re| {
    src.lines()
      .filter_map(|line| re.captures(line.trim()))
      .filter_map(|caps| Some((caps[1].parse().ok()?, caps[2].parse().ok()?)))
      .last()
  })
}

/// Write the cells of `region` as a Plaintext string.
///
/// The top-left corner of `region` is recorded as the `!Position:` anchor.
/// Cell age is not kept.
pub fn write(grid: &Grid, region: BoundingBox, name: &str) -> Result<String> {
  let region = region.clamp(grid.cols(), grid.rows());
  if region.is_empty() {
    return Err(Error::EmptyRegion);
  }

  let mut output = format!("!Name: {}\n!Position: {},{}\n!\n", name, region.x1, region.y1);
  for y in region.rows() {
    for x in region.columns() {
      output.push(if grid.is_alive(x, y) { 'O' } else { '.' });
    }
    output.push('\n');
  }
  Ok(output)
}

/// Save the cells of `region` to a `.cells` file, creating its directory.
pub fn save(grid: &Grid, region: BoundingBox, name: &str, path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  let output = write(grid, region, name)?;
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
  }
  fs::write(path, output).map_err(|e| Error::io(path, e))?;
  log::info!("saved {:?} ({}x{}) to {}", name, region.width(), region.height(), path.display());
  Ok(())
}
