//! Transition timing and interpolation.

/// Easing curves.
pub mod ease;
/// Linear interpolation of geometry.
pub mod lerp;
/// Fixed-duration transitions and their mapping onto video frames.
pub mod transition;
