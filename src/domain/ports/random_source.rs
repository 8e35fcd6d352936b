//! Source of uniform randomness for reviewer selection.

/// Uniform index generator.
///
/// Injected into reviewer selection so tests can script exact outcomes.
pub trait RandomSource: Send + Sync {
    /// A uniformly distributed index in `0..upper`. `upper` is never zero.
    fn index(&self, upper: usize) -> usize;
}
