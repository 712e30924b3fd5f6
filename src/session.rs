use std::path::Path;
use crate::error::Result;
use crate::evolve::{self, Census};
use crate::grid::{BoundingBox, Grid, BORN, DEAD};
use crate::pattern::Pattern;
use crate::plaintext;
use crate::rule::Rule;

/// File name, without extension, of the starting configuration kept when an
/// evolution begins.
pub const LAST_GAME: &str = "last-game";

/// A simulation: one board, one rule, and the bookkeeping of an evolution.
pub struct Session {
  grid: Grid,
  rule: Rule,
  live: BoundingBox,
  generation: u64,
  census: Census,
  population_min: usize,
  population_max: usize,
}

impl Session {
  pub fn new(rows: usize, cols: usize, rule: Rule) -> Self {
    Self {
      grid: Grid::new(rows, cols),
      rule,
      live: BoundingBox::empty(cols, rows),
      generation: 0,
      census: Census::default(),
      population_min: 0,
      population_max: 0,
    }
  }

  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  pub fn rule(&self) -> &Rule {
    &self.rule
  }

  pub fn live_region(&self) -> BoundingBox {
    self.live
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn census(&self) -> Census {
    self.census
  }

  /// Smallest and largest population since the evolution began.
  pub fn population_range(&self) -> (usize, usize) {
    (self.population_min, self.population_max)
  }

  fn refresh_live_region(&mut self) {
    self.live = self.grid.bounding_box(self.grid.full());
  }

  /// Flips a cell between dead and newly born. Out of bounds is ignored.
  pub fn toggle(&mut self, x: usize, y: usize) {
    if x >= self.grid.cols() || y >= self.grid.rows() {
      return;
    }
    let cell = if self.grid.is_alive(x, y) { DEAD } else { BORN };
    self.grid.set(x, y, cell);
    self.refresh_live_region();
  }

  pub fn clear(&mut self) {
    self.grid.clear();
    self.live = BoundingBox::empty(self.grid.cols(), self.grid.rows());
  }

  /// Stamps `pattern` with its origin at `(x, y)`, clipped to the board.
  pub fn paste(&mut self, pattern: &Pattern, x: i64, y: i64) {
    self.grid.stamp(pattern, x, y);
    self.refresh_live_region();
  }

  /// Clears the board and pastes `pattern` at its own anchor.
  pub fn restore(&mut self, pattern: &Pattern) {
    let (x, y) = pattern.anchor_or_origin();
    self.clear();
    self.paste(pattern, x, y);
  }

  /// Restores `pattern` at its anchor, or centred on the board when it has
  /// none.
  pub fn place(&mut self, pattern: &Pattern) {
    if pattern.anchor.is_some() {
      return self.restore(pattern);
    }
    let x = (self.grid.cols() as i64 - pattern.width() as i64) / 2;
    let y = (self.grid.rows() as i64 - pattern.height() as i64) / 2;
    self.clear();
    self.paste(pattern, x.max(0), y.max(0));
  }

  /// Starts counting generations from the current board.
  pub fn begin_evolution(&mut self) -> Census {
    self.refresh_live_region();
    let population = self.grid.count_live();
    self.generation = 1;
    self.census = Census {
      population,
      births: population,
      survivals: 0,
      deaths: 0,
    };
    self.population_min = population;
    self.population_max = population;
    log::info!("evolution begins under {} with {} cells", self.rule, population);
    self.census
  }

  /// Everything died, or the last step changed nothing.
  pub fn is_stalled(&self) -> bool {
    self.population_min == 0 || self.census.is_stalled()
  }

  /// One generation, unless the evolution has stalled.
  pub fn tick(&mut self) -> Option<Census> {
    if self.is_stalled() {
      return None;
    }

    let (census, live) = evolve::step(&mut self.grid, &self.rule, self.live);
    self.live = live;
    self.census = census;
    self.generation += 1;
    self.population_min = self.population_min.min(census.population);
    self.population_max = self.population_max.max(census.population);

    log::debug!(
      "generation {}: population {} births {} survivals {} deaths {}",
      self.generation, census.population, census.births, census.survivals, census.deaths,
    );
    if self.is_stalled() {
      log::info!("evolution stalled at generation {}", self.generation);
    }
    Some(census)
  }

  /// Saves the live region of the board as a `.cells` file.
  pub fn save(&self, name: &str, path: impl AsRef<Path>) -> Result<()> {
    plaintext::save(&self.grid, self.live, name, path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use crate::pattern::Decoded;
  use crate::rule::GAME_OF_LIFE;

  fn glider() -> Pattern {
    let Decoded { pattern, .. } = plaintext::read("!Position: 2,1\n.O.\n..O\nOOO\n");
    pattern
  }

  #[test]
  fn restore_at_anchor() {
    let mut session = Session::new(10, 10, GAME_OF_LIFE);
    session.toggle(9, 9);
    session.restore(&glider());
    assert_eq!(session.grid().count_live(), 5);
    assert!(session.grid().is_alive(3, 1));
    assert!(!session.grid().is_alive(9, 9));
    assert_eq!(session.live_region(), BoundingBox::new(2, 1, 4, 3));
  }

  #[test]
  fn place_centres_unanchored_patterns() {
    let mut session = Session::new(10, 11, GAME_OF_LIFE);
    session.place(&glider());
    assert_eq!(session.live_region(), BoundingBox::new(2, 1, 4, 3));

    let mut pattern = glider();
    pattern.anchor = None;
    session.place(&pattern);
    assert_eq!(session.grid().count_live(), 5);
    assert_eq!(session.live_region(), BoundingBox::new(4, 3, 6, 5));

    let wide = Pattern::from_rows(vec![vec![BORN; 14]]);
    session.place(&wide);
    assert_eq!(session.live_region(), BoundingBox::new(0, 4, 10, 4));
  }

  #[test]
  fn paste_updates_live_region() {
    let mut session = Session::new(10, 10, GAME_OF_LIFE);
    session.paste(&glider(), 8, 7);
    assert_eq!(session.grid().count_live(), 3);
    assert_eq!(session.live_region(), BoundingBox::new(8, 7, 9, 9));
    session.clear();
    assert!(session.live_region().is_empty());
  }

  #[test]
  fn toggle_flips() {
    let mut session = Session::new(4, 4, GAME_OF_LIFE);
    session.toggle(1, 2);
    assert!(session.grid().is_alive(1, 2));
    assert_eq!(session.live_region(), BoundingBox::new(1, 2, 1, 2));
    session.toggle(1, 2);
    assert!(!session.grid().is_alive(1, 2));
    session.toggle(4, 0);
    assert_eq!(session.grid().count_live(), 0);
  }

  #[test]
  fn blinker_runs_until_stopped() {
    let mut session = Session::new(7, 7, GAME_OF_LIFE);
    for y in 2..5 {
      session.toggle(3, y);
    }
    assert_eq!(session.begin_evolution(), Census { population: 3, births: 3, survivals: 0, deaths: 0 });

    for _ in 0..10 {
      let census = session.tick().unwrap();
      assert_eq!(census.population, 3);
    }
    assert_eq!(session.generation(), 11);
    assert_eq!(session.population_range(), (3, 3));
  }

  #[test]
  fn block_stalls() {
    let mut session = Session::new(6, 6, GAME_OF_LIFE);
    for &(x, y) in &[(1, 1), (2, 1), (1, 2), (2, 2)] {
      session.toggle(x, y);
    }
    session.begin_evolution();
    assert!(session.tick().is_some());
    assert!(session.is_stalled());
    assert!(session.tick().is_none());
    assert_eq!(session.generation(), 2);
  }

  #[test]
  fn dying_pattern_stalls() {
    let mut session = Session::new(5, 5, GAME_OF_LIFE);
    session.toggle(0, 0);
    session.toggle(4, 4);
    session.begin_evolution();
    let census = session.tick().unwrap();
    assert_eq!(census.deaths, 2);
    assert_eq!(session.population_range(), (0, 2));
    assert!(session.tick().is_none());
  }

  #[test]
  fn empty_board_never_ticks() {
    let mut session = Session::new(5, 5, GAME_OF_LIFE);
    session.begin_evolution();
    assert!(session.is_stalled());
    assert!(session.tick().is_none());
  }

  #[test]
  fn save_empty_board_is_rejected() {
    let session = Session::new(5, 5, GAME_OF_LIFE);
    let path = std::env::temp_dir().join("lifegrid-never-written.cells");
    assert!(matches!(session.save("empty", &path), Err(Error::EmptyRegion)));
    assert!(!path.exists());
  }
}
