use std::fmt::{self, Display};
use std::str::FromStr;
use regex::Regex;
use crate::error::{Error, Result};

/// Birth/survival rule in B/S notation.
///
/// Bit `n` of a mask is set when `n` live neighbors trigger the transition.
/// Digit 9 is accepted by the parser but can never match a Moore count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
  birth: NeighborMask,
  survival: NeighborMask,
}

pub(crate) type NeighborMask = u16;

/// John Horton Conway's Game of Life, B3/S23.
pub const GAME_OF_LIFE: Rule = Rule {
  birth: 0b000001000,
  survival: 0b000001100,
};

/// HighLife, B36/S23.
pub const HIGH_LIFE: Rule = Rule {
  birth: 0b001001000,
  survival: 0b000001100,
};

/// Day & Night, B3678/S34678.
pub const DAY_AND_NIGHT: Rule = Rule {
  birth: 0b111001000,
  survival: 0b111011000,
};

thread_local! {
  // ASCII digits only: `\d` would also match other Unicode digits.
  static RULE_RE: Regex = Regex::new(r"^B([0-9]*)/S([0-9]*)$").unwrap();
}

impl Rule {
  pub fn parse(src: &str) -> Result<Self> {
    let masks = RULE_RE.with(|re| {
      let caps = re.captures(src)?;
      Some((digit_mask(&caps[1]), digit_mask(&caps[2])))
    });
    let (birth, survival) = masks.ok_or_else(|| Error::MalformedRule(src.to_owned()))?;

    Ok(Self { birth, survival })
  }

  pub fn is_birth(&self, neighbors: u8) -> bool {
    neighbors < 16 && self.birth >> neighbors & 1 != 0
  }

  pub fn is_survival(&self, neighbors: u8) -> bool {
    neighbors < 16 && self.survival >> neighbors & 1 != 0
  }

  pub fn births(&self) -> Vec<u8> {
    mask_members(self.birth)
  }

  pub fn survivals(&self) -> Vec<u8> {
    mask_members(self.survival)
  }
}

impl Default for Rule {
  fn default() -> Self {
    GAME_OF_LIFE
  }
}

impl FromStr for Rule {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Rule::parse(s)
  }
}

fn digit_mask(digits: &str) -> NeighborMask {
  digits.bytes()
    .fold(0, |mask, d| mask | 1 << (d - b'0'))
}

fn mask_members(mut mask: NeighborMask) -> Vec<u8> {
  let mut members = vec![];
  while mask != 0 {
    members.push(mask.trailing_zeros() as u8);
    mask &= mask - 1;
  }
  members
}

impl Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "B")?;
    for n in self.births() {
      write!(f, "{}", n)?;
    }
    write!(f, "/S")?;
    for n in self.survivals() {
      write!(f, "{}", n)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_conway() {
    let rule = Rule::parse("B3/S23").unwrap();
    assert_eq!(rule.births(), vec![3]);
    assert_eq!(rule.survivals(), vec![2, 3]);
    assert_eq!(rule, GAME_OF_LIFE);
    assert_eq!(Rule::default(), GAME_OF_LIFE);
  }

  #[test]
  fn parse_presets() {
    assert_eq!(Rule::parse("B36/S23").unwrap().births(), vec![3, 6]);
    assert_eq!(Rule::parse("B36/S23").unwrap(), HIGH_LIFE);
    assert_eq!(Rule::parse("B3678/S34678").unwrap(), DAY_AND_NIGHT);
  }

  #[test]
  fn parse_empty_groups() {
    let rule: Rule = "B/S".parse().unwrap();
    assert!(rule.births().is_empty());
    assert!(rule.survivals().is_empty());

    let seeds: Rule = "B2/S".parse().unwrap();
    assert_eq!(seeds.births(), vec![2]);
    assert!(!seeds.is_survival(2));
  }

  #[test]
  fn parse_malformed() {
    for src in &["B3S23", "X3/S23", "b3/s23", "B3/S23 ", "B3/S2a", "", "B\u{663}/S23", "B3/S\u{ff12}3"] {
      match Rule::parse(src) {
        Err(Error::MalformedRule(s)) => assert_eq!(&s, src),
        other => panic!("{:?} parsed as {:?}", src, other),
      }
    }
  }

  #[test]
  fn parse_from_many_threads() {
    let handles: Vec<_> = (0..4)
      .map(|_| std::thread::spawn(|| (Rule::parse("B36/S23").ok(), Rule::parse("B3/S\u{663}").is_err())))
      .collect();
    for handle in handles {
      assert_eq!(handle.join().unwrap(), (Some(HIGH_LIFE), true));
    }
  }

  #[test]
  fn out_of_range_digit_never_matches() {
    let rule = Rule::parse("B9/S9").unwrap();
    assert_eq!(rule.births(), vec![9]);
    assert!((0..=8).all(|n| !rule.is_birth(n) && !rule.is_survival(n)));
  }

  #[test]
  fn membership() {
    assert!(GAME_OF_LIFE.is_birth(3));
    assert!(!GAME_OF_LIFE.is_birth(2));
    assert!(GAME_OF_LIFE.is_survival(2));
    assert!(!GAME_OF_LIFE.is_survival(4));
    assert!(!GAME_OF_LIFE.is_survival(200));
  }

  #[test]
  fn display() {
    assert_eq!(DAY_AND_NIGHT.to_string(), "B3678/S34678");
    assert_eq!(Rule::parse("B/S0").unwrap().to_string(), "B/S0");
  }
}
