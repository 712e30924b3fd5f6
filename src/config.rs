use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use regex::Regex;
use crate::error::{Error, Result};
use crate::rule::Rule;

const DEFAULT_FILE: &str = "\
# Language code, 'fr' or 'en'
LANGUAGE = fr
#LANGUAGE = en

# Cell width in pixels (odd values look better)
CELL_WIDTH = 9
#CELL_WIDTH = 15
#CELL_WIDTH = 19

# Milliseconds between two generations (smaller is faster)
#LIFE_CYCLE = 125
LIFE_CYCLE = 250
#LIFE_CYCLE = 500

# Rule in B/S notation (neighbor counts for B=birth and S=survival)
RULE = B3/S23 # John Horton Conway's Game of Life
#RULE = B36/S23 # Nathan Thompson's HighLife
#RULE = B3678/S34678 # Nathan Thompson's Day & Night

# Board size in cells
ROWS = 98
COLUMNS = 192

# Directory of saved and downloaded patterns
LIBRARY = library

DEBUG = false
";

thread_local! {
  static LINE_RE: Regex = Regex::new(r"^\s*(\w*)\s*=\s*([^\s#]*)").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
  pub language: String,
  pub cell_width: u32,
  /// Milliseconds between two generations.
  pub life_cycle: u64,
  pub rule: String,
  pub rows: usize,
  pub columns: usize,
  pub library: PathBuf,
  pub debug: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      language: "fr".to_owned(),
      cell_width: 9,
      life_cycle: 250,
      rule: "B3/S23".to_owned(),
      rows: 98,
      columns: 192,
      library: PathBuf::from("library"),
      debug: false,
    }
  }
}

impl Settings {
  /// Reads `KEY = value` lines over the defaults. `#` starts a comment.
  pub fn parse(src: &str) -> Result<Self> {
    let mut settings = Settings::default();

    for (i, line) in src.lines().enumerate() {
      let pair = LINE_RE.with(|re| {
        re.captures(line).map(|caps| (caps[1].to_owned(), caps[2].to_owned()))
      });
      let (key, value) = match pair {
        Some(pair) => pair,
        None => continue,
      };
      let (line, key, value) = (i + 1, key.as_str(), value.as_str());
      match key {
        "LANGUAGE" => settings.language = value.to_owned(),
        "CELL_WIDTH" => settings.cell_width = number(line, key, value)?,
        "LIFE_CYCLE" => settings.life_cycle = number(line, key, value)?,
        "RULE" => settings.rule = value.to_owned(),
        "ROWS" => settings.rows = number(line, key, value)?,
        "COLUMNS" => settings.columns = number(line, key, value)?,
        "LIBRARY" => settings.library = PathBuf::from(value),
        "DEBUG" => settings.debug = number(line, key, value)?,
        _ => log::warn!("settings line {}: unknown key {:?}", line, key),
      }
    }
    Ok(settings)
  }

  /// Reads `path`, or writes a commented default file there when missing.
  pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if path.is_file() {
      let src = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
      return Settings::parse(&src);
    }
    fs::write(path, DEFAULT_FILE).map_err(|e| Error::io(path, e))?;
    log::info!("created default settings in {}", path.display());
    Ok(Settings::default())
  }

  pub fn rule(&self) -> Result<Rule> {
    Rule::parse(&self.rule)
  }

  pub fn tick_interval(&self) -> Duration {
    Duration::from_millis(self.life_cycle)
  }

  /// Halves the life cycle, down to 1 ms.
  pub fn faster(&mut self) {
    self.life_cycle = (self.life_cycle / 2).max(1);
  }

  pub fn slower(&mut self) {
    self.life_cycle = self.life_cycle.saturating_mul(2);
  }
}

fn number<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T> {
  value.parse().map_err(|_| Error::InvalidSetting {
    line,
    key: key.to_owned(),
    value: value.to_owned(),
  })
}
