//! Basic value types shared by entities, tables and the codec

pub mod color;
pub mod handle;
pub mod line_weight;
pub mod vector;

pub use color::Color;
pub use handle::{Handle, HandleSeed};
pub use line_weight::LineWeight;
pub use vector::{center_and_size, Vector2};
