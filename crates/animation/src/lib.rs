//! Animation state and pointer interaction.
//!
//! # Invariants
//! - Current values approach their targets by a fixed fraction per frame and
//!   never overshoot.
//! - Interaction handlers change targets and smoothing only; a click is the
//!   one transition that snaps current values.
//! - At most one cooldown deadline is pending at a time.

pub mod cooldown;
pub mod interaction;
pub mod state;

pub use cooldown::CooldownTimer;
pub use interaction::{InteractionController, InteractionMode};
pub use state::{AnimationState, Smoothing, Targets};
