use crate::error::Result;

/// Trait for models that score next-token continuations during a decode.
///
/// Implementations own the model; the search only ever sees opaque states.
pub trait Scorer {
    /// Decoder state carried from one step to the next.
    type State: Clone;

    /// Score every continuation of a hypothesis.
    ///
    /// Returns a per-token loss vector (lower is better) and the state
    /// after consuming `prev_token`.
    ///
    /// - `state`: the hypothesis' decoder state.
    /// - `prev_token`: the token the hypothesis emitted last (BEGIN at the
    ///   first step). Under vocabulary manipulation it is a restricted index.
    fn score(&self, state: &Self::State, prev_token: u32) -> Result<(Vec<f32>, Self::State)>;

    /// Length of the vectors returned by [`Scorer::score`] over the full
    /// vocabulary.
    fn vocab_size(&self) -> usize;
}
