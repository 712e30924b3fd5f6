use regex::Regex;
use crate::error::DecodeError;
use crate::grid::{Cell, BORN, DEAD};
use crate::pattern::{Decoded, Pattern};
use crate::rule::Rule;

/// Largest run count, declared width or declared height accepted, in cells.
pub const MAX_EXTENT: usize = 4096;

thread_local! {
  static HEADER_RE: Regex = Regex::new(
    r"^x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)\s*(?:,\s*rule\s*=\s*(\S+))?\s*$"
  ).unwrap();
}

/// Read a Life pattern from a RLE string.
///
/// RLE format: <https://www.conwaylife.com/wiki/Run_Length_Encoded>.
///
/// A malformed header line, an illegal character or a run beyond
/// [`MAX_EXTENT`] is recorded and the rest of that line is skipped; rows
/// already closed are kept as they are.
pub fn read(src: impl AsRef<str>) -> Decoded {
  let mut builder = RowBuilder::default();
  let mut issues = vec![];
  let mut rule = None;
  let mut terminated = false;

  'lines: for (i, line) in src.as_ref().lines().enumerate() {
    let line_no = i + 1;
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    if line.starts_with('x') {
      match header(line) {
        Some(Header { width, height, .. }) if width > MAX_EXTENT || height > MAX_EXTENT => {
          issues.push(DecodeError::TooLarge {
            line: line_no,
            limit: MAX_EXTENT,
            text: line.to_owned(),
          });
        }
        Some(h) => {
          builder.width = h.width;
          builder.height = h.height;
          if let Some(r) = h.rule {
            rule = header_rule(&r);
          }
        }
        None => {
          issues.push(DecodeError::MalformedHeader {
            line: line_no,
            text: line.to_owned(),
          });
        }
      }
      continue;
    }

    for (column, c) in line.chars().enumerate() {
      let fits = match c {
        c if c.is_whitespace() => true,
        '0'..='9' => {
          let digit = c as usize - '0' as usize;
          let run = builder.run.unwrap_or(0) * 10 + digit;
          builder.run = Some(run);
          run <= MAX_EXTENT
        }
        'b' | 'B' => builder.push(DEAD),
        'o' | 'O' => builder.push(BORN),
        '$' => builder.end_row(),
        '!' => {
          builder.finish();
          terminated = true;
          break 'lines;
        }
        _ => {
          issues.push(DecodeError::IllegalCharacter {
            line: line_no,
            column: column + 1,
            found: c,
            text: line.to_owned(),
          });
          builder.run = None;
          break;
        }
      };
      if !fits {
        issues.push(DecodeError::TooLarge {
          line: line_no,
          limit: MAX_EXTENT,
          text: line.to_owned(),
        });
        builder.run = None;
        break;
      }
    }
  }

  if !terminated {
    issues.push(DecodeError::Unterminated);
    if !builder.row.is_empty() {
      builder.close_row();
    }
    builder.pad_height();
  }

  let mut pattern = Pattern::from_rows(builder.rows);
  pattern.rule = rule;
  Decoded { pattern, issues }
}

struct Header {
  width: usize,
  height: usize,
  rule: Option<String>,
}

/// `x = m, y = n[, rule = r]`, or `None` when the line does not match or a
/// dimension overflows.
fn header(line: &str) -> Option<Header> {
  HEADER_RE.with(|re| {
    let caps = re.captures(line)?;
    Some(Header {
      width: caps[1].parse().ok()?,
      height: caps[2].parse().ok()?,
      rule: caps.get(3).map(|r| r.as_str().to_owned()),
    })
  })
}

/// Accepts `b`/`s` in either case, e.g. `b3/s23`.
fn header_rule(src: &str) -> Option<Rule> {
  match Rule::parse(&src.to_ascii_uppercase()) {
    Ok(rule) => Some(rule),
    Err(e) => {
      log::warn!("ignoring RLE header rule: {}", e);
      None
    }
  }
}

#[derive(Default)]
struct RowBuilder {
  /// Declared by the header, `0` when missing.
  width: usize,
  height: usize,
  rows: Vec<Vec<Cell>>,
  row: Vec<Cell>,
  /// Pending run count, at most `MAX_EXTENT`.
  run: Option<usize>,
}

impl RowBuilder {
  fn take_run(&mut self) -> usize {
    self.run.take().unwrap_or(1)
  }

  /// `false`, with nothing added, when the row would grow past `MAX_EXTENT`.
  fn push(&mut self, cell: Cell) -> bool {
    let n = self.take_run();
    if self.row.len() + n > MAX_EXTENT {
      return false;
    }
    self.row.extend(std::iter::repeat(cell).take(n));
    true
  }

  /// `n$` closes the current row and adds `n - 1` dead rows.
  fn end_row(&mut self) -> bool {
    let n = self.take_run();
    if self.rows.len() + n > MAX_EXTENT {
      return false;
    }
    self.close_row();
    for _ in 1..n {
      self.rows.push(vec![DEAD; self.width]);
    }
    true
  }

  fn close_row(&mut self) {
    let mut row = std::mem::take(&mut self.row);
    if row.len() < self.width {
      row.resize(self.width, DEAD);
    }
    self.rows.push(row);
  }

  fn pad_height(&mut self) {
    while self.rows.len() < self.height {
      self.rows.push(vec![DEAD; self.width]);
    }
  }

  fn finish(&mut self) {
    self.run = None;
    self.close_row();
    self.pad_height();
  }
}
