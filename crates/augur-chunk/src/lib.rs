//! Size evaluation and boundary-aware splitting of unified diffs.
//!
//! A diff is treated purely as a sequence of lines with one recognized
//! structural marker: the `diff --git ` line that opens each file's patch
//! section. [`splitter::split_diff`] partitions a diff into ordered,
//! budget-capped chunks that prefer to break exactly before such markers;
//! [`budget::evaluate`] decides whether a diff needs splitting at all.

pub mod budget;
pub mod splitter;
