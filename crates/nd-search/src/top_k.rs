use ordered_float::OrderedFloat;

use crate::error::{DecodeError, Result};

/// Indices of the `k` smallest values in `scores`, ordered by ascending
/// value. Ties go to the lower index.
///
/// The indices are partitioned first so that only the `k` survivors are
/// sorted, keeping the cost near O(N + k log k) rather than a full sort.
/// NaN compares greater than every number.
pub fn select_k_smallest(scores: &[f32], k: usize) -> Result<Vec<usize>> {
    if k == 0 || k > scores.len() {
        return Err(DecodeError::InvalidArgument(format!(
            "k must be in 1..={}, got {}",
            scores.len(),
            k
        )));
    }

    let key = |&i: &usize| (OrderedFloat(scores[i]), i);
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    if k < indices.len() {
        pdqselect::select_by_key(&mut indices, k - 1, key);
        indices.truncate(k);
    }
    indices.sort_unstable_by_key(key);
    Ok(indices)
}

/// [`select_k_smallest`] over a row-major candidate matrix of `row_len`
/// columns, returning `(row, column)` pairs.
///
/// Each row holds the candidate scores of one live hypothesis, so the row
/// is the parent and the column the next token.
pub fn select_k_smallest_flat(
    scores: &[f32],
    row_len: usize,
    k: usize,
) -> Result<Vec<(usize, usize)>> {
    if row_len == 0 || scores.len() % row_len != 0 {
        return Err(DecodeError::InvalidArgument(format!(
            "{} scores do not form rows of {}",
            scores.len(),
            row_len
        )));
    }
    Ok(select_k_smallest(scores, k)?
        .into_iter()
        .map(|flat| (flat / row_len, flat % row_len))
        .collect())
}
