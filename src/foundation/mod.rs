/// Frame indices, frame rates and colors.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
