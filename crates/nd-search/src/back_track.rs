use crate::beam::BeamStore;
use crate::error::{DecodeError, Result};
use crate::hypothesis::Hypothesis;

/// A path recovered from a terminal hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// Emitted tokens, left to right, without BEGIN and the terminal END.
    pub tokens: Vec<u32>,
    /// Cumulative loss of the terminal hypothesis.
    pub loss: f32,
    /// Ranking score of the terminal hypothesis.
    pub score: f32,
}

/// (ranking score, token, back pointer) of a record.
fn link<S>(hyp: &Hypothesis<S>) -> (f32, u32, usize) {
    match *hyp {
        Hypothesis::Plain { loss, token, back } => (loss, token, back),
        Hypothesis::Normalized {
            accum, token, back, ..
        } => (accum, token, back),
        Hypothesis::Detailed {
            loss, token, back, ..
        } => (loss, token, back),
        Hypothesis::NormalizedDetailed {
            accum, token, back, ..
        } => (accum, token, back),
    }
}

/// Walk back pointers from the terminal hypothesis at
/// `store[terminal_step][terminal_pos]` and return the emitted tokens with
/// the terminal loss.
///
/// The terminal's own token (END) and the BEGIN seed are not part of the
/// output, so a consistent beam yields `terminal_step - 1` tokens.
pub fn reconstruct<S>(
    store: &BeamStore<S>,
    terminal_step: usize,
    terminal_pos: usize,
) -> Result<(Vec<u32>, f32)> {
    let r = reconstruct_hypothesis(store, terminal_step, terminal_pos)?;
    Ok((r.tokens, r.loss))
}

/// Like [`reconstruct`] but also reports the terminal's ranking score.
pub fn reconstruct_hypothesis<S>(
    store: &BeamStore<S>,
    terminal_step: usize,
    terminal_pos: usize,
) -> Result<Reconstruction> {
    if terminal_step == 0 || terminal_step > store.capacity_steps() {
        return Err(DecodeError::InvalidArgument(format!(
            "terminal step {} outside 1..={}",
            terminal_step,
            store.capacity_steps()
        )));
    }
    let terminal = store.get(terminal_step, terminal_pos).ok_or_else(|| {
        DecodeError::InvalidArgument(format!(
            "no hypothesis at position {} of step {} (slot holds {})",
            terminal_pos,
            terminal_step,
            store.len_at(terminal_step)
        ))
    })?;
    let (score, _, mut back) = link(terminal);

    let mut tokens = Vec::with_capacity(terminal_step - 1);
    for step in (1..terminal_step).rev() {
        let hyp = store.get(step, back).ok_or(DecodeError::CorruptBeam {
            step,
            pointer: back,
            slot_len: store.len_at(step),
        })?;
        let (_, token, parent) = link(hyp);
        tokens.push(token);
        back = parent;
    }
    // The last pointer followed (the terminal's own at step 1) names the seed.
    if back >= store.len_at(0) {
        return Err(DecodeError::CorruptBeam {
            step: 0,
            pointer: back,
            slot_len: store.len_at(0),
        });
    }
    tokens.reverse();

    Ok(Reconstruction {
        tokens,
        loss: terminal.loss(),
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hypothesis::HypothesisShape;
    use approx::assert_relative_eq;
    use nd_vocab::END;

    /// Append a record of the store's shape; `accum` is loss / step.
    fn push<S: Clone>(
        beam: &mut BeamStore<S>,
        step: usize,
        loss: f32,
        state: &S,
        token: u32,
        back: usize,
    ) {
        let hyp = beam
            .shape()
            .record(loss, loss / step as f32, Some(state.clone()), token, back)
            .unwrap();
        beam.append(step, hyp).unwrap();
    }

    /// A beam of width two over three steps, with END emitted at step 4
    /// from the second survivor of step 3.
    ///
    ///   step 1: [10, 11]
    ///   step 2: [12 <- 11, 13 <- 10]
    ///   step 3: [14 <- 0, 15 <- 1]
    ///   step 4: [END <- 1]
    fn build(shape: HypothesisShape) -> BeamStore<u32> {
        let mut beam = BeamStore::new(shape);
        beam.reset(6, 2, 0.0, Some(0)).unwrap();
        push(&mut beam, 1, 0.5, &1, 10, 0);
        push(&mut beam, 1, 0.7, &2, 11, 0);
        push(&mut beam, 2, 1.0, &3, 12, 1);
        push(&mut beam, 2, 1.1, &4, 13, 0);
        push(&mut beam, 3, 1.5, &5, 14, 0);
        push(&mut beam, 3, 1.6, &6, 15, 1);
        push(&mut beam, 4, 2.0, &7, END, 1);
        beam
    }

    #[test]
    fn test_reconstruct_every_shape() {
        for norm in [false, true] {
            for detail in [false, true] {
                let shape = HypothesisShape::from_flags(norm, detail);
                let beam = build(shape);
                let (tokens, loss) = reconstruct(&beam, 4, 0).unwrap();
                assert_eq!(tokens, vec![10, 13, 15], "shape {}", shape);
                assert_relative_eq!(loss, 2.0);

                let r = reconstruct_hypothesis(&beam, 4, 0).unwrap();
                let expected_score = if norm { 0.5 } else { 2.0 };
                assert_relative_eq!(r.score, expected_score);
            }
        }
    }

    #[test]
    fn test_length_is_terminal_step_minus_one() {
        let beam = build(HypothesisShape::Plain);
        // Treat the step-3 survivors as terminals too.
        assert_eq!(reconstruct(&beam, 3, 0).unwrap().0, vec![11, 12]);
        assert_eq!(reconstruct(&beam, 3, 1).unwrap().0, vec![10, 13]);
        for step in 1..=4 {
            let (tokens, _) = reconstruct(&beam, step, 0).unwrap();
            assert_eq!(tokens.len(), step - 1);
        }
    }

    #[test]
    fn test_immediate_end_is_empty() {
        let mut beam = BeamStore::<()>::new(HypothesisShape::Plain);
        beam.reset(3, 1, 0.0, None).unwrap();
        beam.append(1, plain(0.3, END, 0)).unwrap();
        let (tokens, loss) = reconstruct(&beam, 1, 0).unwrap();
        assert!(tokens.is_empty());
        assert_relative_eq!(loss, 0.3);
    }

    #[test]
    fn test_bad_terminal_is_invalid_argument() {
        let beam = build(HypothesisShape::Plain);
        for (step, pos) in [(0, 0), (7, 0), (4, 1), (5, 0)] {
            let err = reconstruct(&beam, step, pos).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "({}, {})", step, pos);
        }
    }

    fn plain(loss: f32, token: u32, back: usize) -> Hypothesis<()> {
        Hypothesis::Plain { loss, token, back }
    }

    #[test]
    fn test_corrupt_back_pointer() {
        let mut beam = BeamStore::<()>::new(HypothesisShape::Plain);
        beam.reset(3, 2, 0.0, None).unwrap();
        beam.append(1, plain(0.1, 9, 0)).unwrap();
        beam.append(2, plain(0.2, 8, 0)).unwrap();
        beam.push_unchecked(2, plain(0.3, 7, 4));
        beam.append(3, plain(0.4, END, 1)).unwrap();

        let err = reconstruct(&beam, 3, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::CorruptBeam {
                step: 1,
                pointer: 4,
                slot_len: 1
            }
        );
        assert_eq!(err.kind(), ErrorKind::CorruptBeam);
    }

    #[test]
    fn test_corrupt_pointer_into_seed() {
        let mut beam = BeamStore::<()>::new(HypothesisShape::Plain);
        beam.reset(2, 2, 0.0, None).unwrap();
        beam.push_unchecked(1, plain(0.1, 9, 1));
        beam.append(2, plain(0.2, END, 0)).unwrap();
        let err = reconstruct(&beam, 2, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptBeam);
    }

    #[test]
    fn test_step_one_terminal_pointer_is_checked() {
        let mut beam = BeamStore::<()>::new(HypothesisShape::Plain);
        beam.reset(3, 2, 0.0, None).unwrap();
        beam.push_unchecked(1, plain(0.3, END, 5));
        let err = reconstruct(&beam, 1, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::CorruptBeam {
                step: 0,
                pointer: 5,
                slot_len: 1
            }
        );
    }
}
