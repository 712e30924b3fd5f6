use crate::grid::{BoundingBox, Grid, BORN, DEAD};
use crate::rule::Rule;

/// Counters of one generation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
  pub population: usize,
  pub births: usize,
  pub survivals: usize,
  pub deaths: usize,
}

impl Census {
  /// Nothing was born and nothing died.
  pub fn is_stalled(&self) -> bool {
    self.births == 0 && self.deaths == 0
  }
}

/// Advances `grid` one generation.
///
/// `live` must hold every live cell. Only `live` padded by one cell is
/// rewritten; the rest of the grid is carried over untouched. Returns the
/// census of the step and the new live region.
pub fn step(grid: &mut Grid, rule: &Rule, live: BoundingBox) -> (Census, BoundingBox) {
  let (cols, rows) = (grid.cols(), grid.rows());
  let live = live.clamp(cols, rows);
  if live.is_empty() {
    return (Census::default(), BoundingBox::empty(cols, rows));
  }
  let work = live.padded(1, cols, rows);

  // Counts are complete before any cell changes.
  let neighbors = NeighborCounts::new(grid, live, work);

  let mut census = Census::default();
  for y in work.rows() {
    for x in work.columns() {
      let n = neighbors.get(x, y);
      let cell = grid.get(x, y);
      if cell == DEAD {
        if rule.is_birth(n) {
          grid.set(x, y, BORN);
          census.births += 1;
        }
      } else if rule.is_survival(n) {
        grid.set(x, y, cell.saturating_add(1));
        census.survivals += 1;
      } else {
        grid.set(x, y, DEAD);
        census.deaths += 1;
      }
    }
  }
  census.population = census.births + census.survivals;

  (census, grid.bounding_box(work))
}

/// Moore neighbor counts over a work window.
struct NeighborCounts {
  window: BoundingBox,
  counts: Vec<u8>,
}

impl NeighborCounts {
  /// Every live cell of `live` adds one to each of its in-grid neighbors.
  /// `window` must contain `live` padded by one.
  fn new(grid: &Grid, live: BoundingBox, window: BoundingBox) -> Self {
    let mut counts = Self {
      window,
      counts: vec![0; window.width() * window.height()],
    };
    let (cols, rows) = (grid.cols() as i64, grid.rows() as i64);

    for y in live.rows() {
      for x in live.columns() {
        if !grid.is_alive(x, y) {
          continue;
        }
        for dy in -1..=1 {
          for dx in -1..=1 {
            if dx == 0 && dy == 0 {
              continue;
            }
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx >= 0 && nx < cols && ny >= 0 && ny < rows {
              let i = counts.index(nx as usize, ny as usize);
              counts.counts[i] += 1;
            }
          }
        }
      }
    }
    counts
  }

  fn index(&self, x: usize, y: usize) -> usize {
    debug_assert!(self.window.contains(x as i64, y as i64));
    (y - self.window.y1 as usize) * self.window.width() + (x - self.window.x1 as usize)
  }

  fn get(&self, x: usize, y: usize) -> u8 {
    self.counts[self.index(x, y)]
  }
}
