use nd_search::{reconstruct, select_k_smallest, BeamStore, ErrorKind, HypothesisShape};
use nd_vocab::{filter_structural, remap_and_filter, render, RemapTable, Vocab, BEGIN, END, PAD};

/// Per-step losses over a restricted vocabulary of six:
/// reserved 0..=3, then restricted 4 -> "the" and 5 -> "cat".
#[rustfmt::skip]
const STEPS: [[f32; 6]; 3] = [
    [9.0, 9.0, 9.0, 5.0, 0.2, 1.0],
    [9.0, 9.0, 9.0, 4.0, 2.0, 0.3],
    [9.0, 9.0, 9.0, 0.1, 3.0, 3.0],
];

/// Drive the primitives the way an external decoder would: extend the best
/// survivor of each step (always at position 0), append the two cheapest
/// continuations and stop at the first END.
fn drive(shape: HypothesisShape) -> (BeamStore<usize>, usize, usize) {
    let mut beam = BeamStore::new(shape);
    beam.reset(STEPS.len(), 2, 0.0, Some(0)).unwrap();
    let parent = 0;
    for (i, losses) in STEPS.iter().enumerate() {
        let step = i + 1;
        let base = beam.get(step - 1, parent).unwrap().loss();
        let picks = select_k_smallest(losses, 2).unwrap();
        for &token in &picks {
            let loss = base + losses[token];
            let hyp = shape
                .record(loss, loss / step as f32, Some(step), token as u32, parent)
                .unwrap();
            beam.append(step, hyp).unwrap();
        }
        if picks[0] as u32 == END {
            return (beam, step, 0);
        }
    }
    panic!("no END emitted");
}

#[test]
fn it_reconstructs_and_renders_for_every_shape() {
    let table = RemapTable::with_reserved([100, 200]);
    let vocab: Vocab = [(BEGIN, "<b>"), (END, "<e>"), (100, "the"), (200, "cat")]
        .into_iter()
        .collect();

    for norm in [false, true] {
        for detail in [false, true] {
            let shape = HypothesisShape::from_flags(norm, detail);
            let (beam, terminal_step, terminal_pos) = drive(shape);

            let (tokens, loss) = reconstruct(&beam, terminal_step, terminal_pos).unwrap();
            assert_eq!(tokens.len(), terminal_step - 1);
            assert_eq!(tokens, vec![4, 5]);
            assert!((loss - 0.6).abs() < 1e-6);

            let ids = remap_and_filter(&tokens, Some(&table)).unwrap();
            assert_eq!(ids, vec![100, 200]);
            assert_eq!(render(&ids, &vocab).unwrap(), "the cat");
        }
    }
}

#[test]
fn it_rejects_selection_outside_the_restricted_vocabulary() {
    let table = RemapTable::with_reserved([100]);
    let err = remap_and_filter(&[4, 5], Some(&table)).unwrap_err();
    let err: nd_search::DecodeError = err.into();
    assert_eq!(err.kind(), ErrorKind::CorruptBeam);
}

#[test]
fn it_filters_padding_from_references() {
    let vocab = Vocab::from_words(["<pad>", "unk", "<b>", "<e>", "the", "cat"]);
    let mut reference = vocab.encode("the cat");
    reference.extend([PAD, PAD]);
    let reference = filter_structural(&reference);
    assert_eq!(render(&reference, &vocab).unwrap(), "the cat");
}
