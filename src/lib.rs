//! Life-like cellular automata on a bounded board.
//!
//! Generations are computed over the live region only, see [`evolve::step`].
//! Patterns are exchanged in the Plaintext (`.cells`) and RLE (`.rle`)
//! formats.

pub mod config;
pub mod error;
pub mod evolve;
pub mod export;
pub mod grid;
pub mod pattern;
pub mod plaintext;
pub mod rle;
pub mod rule;
pub mod session;

pub use error::{DecodeError, Error, Result};
pub use evolve::Census;
pub use grid::{BoundingBox, Cell, Grid};
pub use pattern::{Decoded, Pattern};
pub use rule::Rule;
pub use session::Session;
