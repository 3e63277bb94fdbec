//! Encoding sinks.
//!
//! Sinks consume frame documents in playback order and are driven by [`crate::playback::Player`].

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
