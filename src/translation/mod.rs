/*!
 * Resilient translation of single texts.
 *
 * - `engine`: the attempt engine and its retry/fallback/split cascade
 * - `sentences`: sentence segmentation used by the split stage
 */

// Re-export main types for easier usage
pub use self::engine::{AttemptEngine, AttemptResult, EngineOptions, Stage};
pub use self::sentences::{split_in_halves, split_sentences};

// Submodules
pub mod engine;
pub mod sentences;
