use std::fmt;
use std::ops::RangeInclusive;
use crate::pattern::Pattern;

/// Cell state: `0` is dead, `1` newly born, `n > 1` alive for `n - 1`
/// consecutive generations.
pub type Cell = u32;

pub const DEAD: Cell = 0;
pub const BORN: Cell = 1;

/// Inclusive rectangle `x1..=x2` × `y1..=y2` in grid coordinates.
///
/// `x1 == -1` is the "nothing alive" sentinel, in which case `x2` and `y2`
/// hold the width and height of the window that was searched.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BoundingBox {
  pub x1: i64,
  pub y1: i64,
  pub x2: i64,
  pub y2: i64,
}

impl BoundingBox {
  pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
    Self { x1, y1, x2, y2 }
  }

  pub fn empty(width: usize, height: usize) -> Self {
    Self {
      x1: -1,
      y1: -1,
      x2: width as i64,
      y2: height as i64,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.x1 < 0 || self.x2 < self.x1 || self.y2 < self.y1
  }

  pub fn width(&self) -> usize {
    if self.is_empty() { 0 } else { (self.x2 - self.x1 + 1) as usize }
  }

  pub fn height(&self) -> usize {
    if self.is_empty() { 0 } else { (self.y2 - self.y1 + 1) as usize }
  }

  pub fn contains(&self, x: i64, y: i64) -> bool {
    !self.is_empty() && x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
  }

  /// Intersection with a `cols × rows` grid.
  pub fn clamp(&self, cols: usize, rows: usize) -> Self {
    if self.is_empty() {
      return Self::empty(cols, rows);
    }
    let clamped = Self {
      x1: self.x1.max(0),
      y1: self.y1.max(0),
      x2: self.x2.min(cols as i64 - 1),
      y2: self.y2.min(rows as i64 - 1),
    };
    if clamped.is_empty() {
      Self::empty(cols, rows)
    } else {
      clamped
    }
  }

  /// Grows the box by `pad` cells on every side, staying inside the grid.
  pub fn padded(&self, pad: i64, cols: usize, rows: usize) -> Self {
    if self.is_empty() {
      return Self::empty(cols, rows);
    }
    Self {
      x1: self.x1 - pad,
      y1: self.y1 - pad,
      x2: self.x2 + pad,
      y2: self.y2 + pad,
    }.clamp(cols, rows)
  }

  /// Columns covered by a non-empty box.
  pub fn columns(&self) -> RangeInclusive<usize> {
    self.x1 as usize..=self.x2 as usize
  }

  /// Rows covered by a non-empty box.
  pub fn rows(&self) -> RangeInclusive<usize> {
    self.y1 as usize..=self.y2 as usize
  }
}

/// Fixed-size board with closed, permanently dead borders.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
  rows: usize,
  cols: usize,
  cells: Vec<Cell>,
}

impl Grid {
  pub fn new(rows: usize, cols: usize) -> Self {
    Self {
      rows,
      cols,
      cells: vec![DEAD; rows * cols],
    }
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  /// The whole board as a search window.
  pub fn full(&self) -> BoundingBox {
    BoundingBox::new(0, 0, self.cols as i64 - 1, self.rows as i64 - 1)
      .clamp(self.cols, self.rows)
  }

  /// `x` is the column, `y` the row. Panics when out of bounds.
  pub fn get(&self, x: usize, y: usize) -> Cell {
    self.cells[self.index(x, y)]
  }

  pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
    let i = self.index(x, y);
    self.cells[i] = cell;
  }

  pub fn is_alive(&self, x: usize, y: usize) -> bool {
    self.get(x, y) != DEAD
  }

  fn index(&self, x: usize, y: usize) -> usize {
    assert!(x < self.cols && y < self.rows, "cell ({}, {}) outside {}x{} grid", x, y, self.cols, self.rows);
    y * self.cols + x
  }

  /// Any live cell in `col_start..=col_end` of `row`. Panics like [`get`](Grid::get)
  /// when a bound lies outside the grid; an empty range is never live.
  pub fn is_row_live(&self, row: usize, col_start: usize, col_end: usize) -> bool {
    if col_start > col_end {
      return false;
    }
    let (start, end) = (self.index(col_start, row), self.index(col_end, row));
    self.cells[start..=end].iter().any(|&c| c != DEAD)
  }

  pub fn is_column_live(&self, col: usize, row_start: usize, row_end: usize) -> bool {
    (row_start..=row_end).any(|row| self.is_alive(col, row))
  }

  /// Smallest box holding every live cell of `search`.
  ///
  /// Only `search` is scanned, outer edges first. Returns the sentinel sized
  /// after `search` when it holds no live cell.
  pub fn bounding_box(&self, search: BoundingBox) -> BoundingBox {
    let search = search.clamp(self.cols, self.rows);
    if search.is_empty() {
      return BoundingBox::empty(self.cols, self.rows);
    }
    let (top, bottom) = (search.y1 as usize, search.y2 as usize);

    let left = match search.columns().find(|&x| self.is_column_live(x, top, bottom)) {
      Some(x) => x,
      None => return BoundingBox::empty(search.width(), search.height()),
    };
    let right = search.columns().rev()
      .find(|&x| self.is_column_live(x, top, bottom))
      .unwrap_or(left);
    let y1 = search.rows()
      .find(|&y| self.is_row_live(y, left, right))
      .unwrap_or(top);
    let y2 = search.rows().rev()
      .find(|&y| self.is_row_live(y, left, right))
      .unwrap_or(y1);

    BoundingBox::new(left as i64, y1 as i64, right as i64, y2 as i64)
  }

  pub fn clear(&mut self) {
    for c in &mut self.cells {
      *c = DEAD;
    }
    log::debug!("grid cleared, full redraw needed");
  }

  pub fn count_live(&self) -> usize {
    self.cells.iter().filter(|&&c| c != DEAD).count()
  }

  /// Copies the whole `pattern` rectangle with its origin at `(x, y)`.
  ///
  /// Dead pattern cells overwrite the board too. Cells falling outside the
  /// grid are dropped.
  pub fn stamp(&mut self, pattern: &Pattern, x: i64, y: i64) {
    for (dy, row) in pattern.rows().iter().enumerate() {
      let ty = y + dy as i64;
      if ty < 0 || ty >= self.rows as i64 {
        continue;
      }
      for (dx, &cell) in row.iter().enumerate() {
        let tx = x + dx as i64;
        if tx >= 0 && tx < self.cols as i64 {
          self.set(tx as usize, ty as usize, cell);
        }
      }
    }
  }

  /// Dead/alive copy of the cells inside `region`.
  pub fn extract(&self, region: BoundingBox) -> Pattern {
    let region = region.clamp(self.cols, self.rows);
    if region.is_empty() {
      return Pattern::default();
    }
    let rows = region.rows()
      .map(|y| {
        region.columns()
          .map(|x| if self.is_alive(x, y) { BORN } else { DEAD })
          .collect()
      })
      .collect();
    Pattern::from_rows(rows)
  }
}

impl fmt::Debug for Grid {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for y in 0..self.rows {
      for x in 0..self.cols {
        let c = match self.get(x, y) {
          DEAD => '.',
          BORN => 'o',
          _ => 'O',
        };
        write!(f, "{}", c)?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn grid_with(rows: usize, cols: usize, alive: &[(usize, usize)]) -> Grid {
    let mut grid = Grid::new(rows, cols);
    for &(x, y) in alive {
      grid.set(x, y, BORN);
    }
    grid
  }

  #[test]
  fn row_and_column_liveness() {
    let grid = grid_with(4, 5, &[(3, 1)]);
    assert!(grid.is_row_live(1, 0, 4));
    assert!(grid.is_row_live(1, 3, 3));
    assert!(!grid.is_row_live(1, 0, 2));
    assert!(!grid.is_row_live(2, 0, 4));
    assert!(grid.is_column_live(3, 0, 3));
    assert!(!grid.is_column_live(3, 2, 3));
    assert!(!grid.is_column_live(2, 0, 3));
  }

  #[test]
  fn row_scan_stays_on_its_row() {
    let grid = grid_with(3, 4, &[(0, 2)]);
    assert!(!grid.is_row_live(1, 0, 3));
    assert!(grid.is_row_live(2, 0, 3));
    assert!(!grid.is_row_live(2, 3, 0));
    assert!(!grid.is_column_live(0, 2, 0));
  }

  #[test]
  #[should_panic(expected = "outside 4x3 grid")]
  fn row_scan_past_last_column_panics() {
    let grid = grid_with(3, 4, &[(0, 2)]);
    grid.is_row_live(1, 0, 4);
  }

  #[test]
  #[should_panic(expected = "outside 4x3 grid")]
  fn column_scan_past_last_row_panics() {
    let grid = grid_with(3, 4, &[(0, 2)]);
    grid.is_column_live(1, 0, 3);
  }

  #[test]
  fn bounding_box_of_scattered_cells() {
    let grid = grid_with(10, 10, &[(2, 7), (6, 3), (4, 5)]);
    assert_eq!(grid.bounding_box(grid.full()), BoundingBox::new(2, 3, 6, 7));
  }

  #[test]
  fn bounding_box_sentinel() {
    let grid = Grid::new(6, 8);
    let bbox = grid.bounding_box(grid.full());
    assert_eq!(bbox, BoundingBox::new(-1, -1, 8, 6));
    assert!(bbox.is_empty());

    let grid = grid_with(6, 8, &[(0, 0)]);
    let bbox = grid.bounding_box(BoundingBox::new(2, 1, 4, 3));
    assert_eq!(bbox, BoundingBox::new(-1, -1, 3, 3));
  }

  #[test]
  fn bounding_box_ignores_cells_outside_search() {
    let grid = grid_with(10, 10, &[(0, 0), (5, 5), (9, 9)]);
    let bbox = grid.bounding_box(BoundingBox::new(3, 3, 7, 7));
    assert_eq!(bbox, BoundingBox::new(5, 5, 5, 5));
  }

  // Pseudo random boards: the box is the sentinel iff nothing is alive,
  // its edges touch live cells and nothing alive lies outside it.
  #[test]
  fn bounding_box_is_tight() {
    let mut seed: u64 = 12345;
    for round in 0..50 {
      let mut grid = Grid::new(12, 17);
      let density = round % 7;
      for y in 0..grid.rows() {
        for x in 0..grid.cols() {
          seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
          if (seed >> 33) % 40 < density {
            grid.set(x, y, BORN);
          }
        }
      }

      let bbox = grid.bounding_box(grid.full());
      assert_eq!(bbox.is_empty(), grid.count_live() == 0);
      if bbox.is_empty() {
        continue;
      }
      assert!(grid.is_column_live(bbox.x1 as usize, bbox.y1 as usize, bbox.y2 as usize));
      assert!(grid.is_column_live(bbox.x2 as usize, bbox.y1 as usize, bbox.y2 as usize));
      assert!(grid.is_row_live(bbox.y1 as usize, bbox.x1 as usize, bbox.x2 as usize));
      assert!(grid.is_row_live(bbox.y2 as usize, bbox.x1 as usize, bbox.x2 as usize));
      for y in 0..grid.rows() {
        for x in 0..grid.cols() {
          if grid.is_alive(x, y) {
            assert!(bbox.contains(x as i64, y as i64));
          }
        }
      }
    }
  }

  #[test]
  fn padded_is_clamped() {
    let bbox = BoundingBox::new(0, 2, 4, 4);
    assert_eq!(bbox.padded(1, 5, 6), BoundingBox::new(0, 1, 4, 5));
    assert!(BoundingBox::empty(5, 6).padded(1, 5, 6).is_empty());
  }

  #[test]
  fn clear_and_count() {
    let mut grid = grid_with(3, 3, &[(0, 0), (1, 1), (2, 2)]);
    grid.set(1, 1, 7);
    assert_eq!(grid.count_live(), 3);
    grid.clear();
    assert_eq!(grid.count_live(), 0);
  }

  #[test]
  fn stamp_clips_at_edges() {
    let pattern = Pattern::from_rows(vec![
      vec![BORN, DEAD],
      vec![BORN, BORN],
    ]);
    let mut grid = grid_with(3, 3, &[(2, 2)]);
    grid.stamp(&pattern, 2, 1);
    assert_eq!(format!("{:?}", grid), "...\n..o\n..o\n");
    grid.stamp(&pattern, -1, -1);
    assert_eq!(format!("{:?}", grid), "o..\n..o\n..o\n");
  }

  #[test]
  fn extract_drops_age() {
    let mut grid = grid_with(4, 4, &[(1, 1), (2, 2)]);
    grid.set(2, 2, 9);
    let pattern = grid.extract(grid.bounding_box(grid.full()));
    assert_eq!(pattern.rows(), &[vec![BORN, DEAD], vec![DEAD, BORN]][..]);
  }
}
