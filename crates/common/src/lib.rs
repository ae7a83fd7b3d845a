//! Shared types: RGB colors parsed from hex strings and the live control options.
//!
//! # Invariants
//! - Options are read-only from the render core's point of view.
//! - Derived colors always hold the last successfully parsed value.

pub mod color;
pub mod options;

pub use color::{ColorError, Rgb};
pub use options::{ControlOptions, ControlPanel, OptionsError};
