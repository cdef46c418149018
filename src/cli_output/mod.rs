//! Text output for the interactive exam.

mod render;

pub use render::*;
