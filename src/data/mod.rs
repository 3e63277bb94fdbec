//! Championship dataset loading and aggregation.

/// CSV loading and row normalization.
pub mod ingest;
/// Yearly cumulative title counts.
pub mod tally;
