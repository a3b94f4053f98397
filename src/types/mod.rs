//! Value types for light control parameters.

mod color;

pub use color::Colors;
