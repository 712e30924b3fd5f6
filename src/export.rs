use std::convert::TryFrom;
use std::path::Path;
use image::{ImageBuffer, Rgb, RgbImage};
use crate::error::{Error, Result};
use crate::grid::{Grid, BORN, DEAD};

const LINE: Rgb<u8> = Rgb([0, 0, 0]);
const DEAD_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const BORN_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const AGED_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Draws the board: 1-pixel black grid lines around `cell_width` squares.
pub fn render(grid: &Grid, cell_width: u32) -> Result<RgbImage> {
  let too_large = || Error::ImageTooLarge {
    cols: grid.cols(),
    rows: grid.rows(),
    cell_width,
  };
  let pitch = cell_width.checked_add(1).ok_or_else(too_large)?;
  let width = side(grid.cols(), pitch).ok_or_else(too_large)?;
  let height = side(grid.rows(), pitch).ok_or_else(too_large)?;

  Ok(ImageBuffer::from_fn(width, height, |px, py| {
    if px % pitch == 0 || py % pitch == 0 {
      return LINE;
    }
    match grid.get((px / pitch) as usize, (py / pitch) as usize) {
      DEAD => DEAD_COLOR,
      BORN => BORN_COLOR,
      _ => AGED_COLOR,
    }
  }))
}

/// Pixels along one side: `cells` squares and the lines around them.
fn side(cells: usize, pitch: u32) -> Option<u32> {
  u32::try_from(cells).ok()?.checked_mul(pitch)?.checked_add(1)
}

/// Writes a snapshot of the board; the format follows the file extension.
pub fn save_image(grid: &Grid, cell_width: u32, path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  render(grid, cell_width)?.save(path)?;
  log::info!("saved {}x{} board image to {}", grid.cols(), grid.rows(), path.display());
  Ok(())
}
