use nd_vocab::BEGIN;

use crate::error::{DecodeError, Result};
use crate::hypothesis::{Hypothesis, HypothesisShape};

/// Step-indexed hypothesis pool for one sequence being decoded.
///
/// Layout:
///   slots[0]:      the BEGIN seed, alone
///   slots[i > 0]:  survivors of step i, each pointing into slots[i - 1]
///
/// The store is a plain container: the driver prunes before appending, so
/// `beam_size` is recorded but not enforced here.
#[derive(Debug, Clone)]
pub struct BeamStore<S> {
    /// Record variant every slot holds.
    shape: HypothesisShape,
    /// Maximum survivors per step.
    beam_size: usize,
    /// Hypotheses for each step, `capacity_steps + 1` slots.
    slots: Vec<Vec<Hypothesis<S>>>,
}

impl<S> BeamStore<S> {
    /// Create an empty store. Call [`BeamStore::reset`] before appending.
    pub fn new(shape: HypothesisShape) -> Self {
        BeamStore {
            shape,
            beam_size: 0,
            slots: Vec::new(),
        }
    }

    /// Clear all slots, allocate `capacity_steps + 1` of them and seed
    /// slot 0 with the BEGIN hypothesis.
    ///
    /// Detailed shapes require `seed_state`; other shapes drop it. On error
    /// the store is left untouched.
    pub fn reset(
        &mut self,
        capacity_steps: usize,
        beam_size: usize,
        seed_loss: f32,
        seed_state: Option<S>,
    ) -> Result<()> {
        if capacity_steps == 0 {
            return Err(DecodeError::InvalidArgument(
                "beam capacity must be at least one step".to_string(),
            ));
        }
        if beam_size == 0 {
            return Err(DecodeError::InvalidArgument(
                "beam size must be at least 1".to_string(),
            ));
        }
        let seed = self.shape.record(seed_loss, 0.0, seed_state, BEGIN, 0)?;

        self.slots.clear();
        self.slots
            .resize_with(capacity_steps + 1, || Vec::with_capacity(beam_size));
        self.slots[0].push(seed);
        self.beam_size = beam_size;
        Ok(())
    }

    /// Insert `hyp` into slot `step`.
    ///
    /// In debug builds the back pointer is checked against slot `step - 1`.
    pub fn append(&mut self, step: usize, hyp: Hypothesis<S>) -> Result<()> {
        if step == 0 || step > self.capacity_steps() {
            return Err(DecodeError::InvalidArgument(format!(
                "step {} outside 1..={}",
                step,
                self.capacity_steps()
            )));
        }
        if hyp.shape() != self.shape {
            return Err(DecodeError::InvalidArgument(format!(
                "cannot append a {} record to a {} beam",
                hyp.shape(),
                self.shape
            )));
        }
        if cfg!(debug_assertions) {
            let slot_len = self.slots[step - 1].len();
            if hyp.back() >= slot_len {
                return Err(DecodeError::CorruptBeam {
                    step,
                    pointer: hyp.back(),
                    slot_len,
                });
            }
        }
        self.slots[step].push(hyp);
        Ok(())
    }

    /// Insert without any checks, for building corrupt beams in tests.
    #[cfg(test)]
    pub(crate) fn push_unchecked(&mut self, step: usize, hyp: Hypothesis<S>) {
        self.slots[step].push(hyp);
    }

    pub fn shape(&self) -> HypothesisShape {
        self.shape
    }

    pub fn beam_size(&self) -> usize {
        self.beam_size
    }

    /// Highest step index that can be appended to; 0 before the first reset.
    pub fn capacity_steps(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    /// Hypotheses stored at `step`.
    pub fn slot(&self, step: usize) -> Option<&[Hypothesis<S>]> {
        self.slots.get(step).map(Vec::as_slice)
    }

    pub fn get(&self, step: usize, pos: usize) -> Option<&Hypothesis<S>> {
        self.slots.get(step).and_then(|slot| slot.get(pos))
    }

    /// Number of hypotheses at `step` (0 for steps past capacity).
    pub fn len_at(&self, step: usize) -> usize {
        self.slots.get(step).map_or(0, Vec::len)
    }

    pub fn iter_slots(&self) -> impl Iterator<Item = &[Hypothesis<S>]> {
        self.slots.iter().map(Vec::as_slice)
    }
}
