use crate::error::Result;
use crate::remap::RemapTable;
use crate::tokens::{Reserved, PAD};
use crate::vocab::Vocab;

/// Translate a decoded index sequence to full-vocabulary ids and drop the
/// sentence boundary markers.
///
/// With a remap table every index must be in the table; an unmapped index
/// means the search selected outside the restricted vocabulary and is
/// reported as `UnmappedIndex`. `PAD` is not removed here.
pub fn remap_and_filter(indices: &[u32], remap: Option<&RemapTable>) -> Result<Vec<u32>> {
    let full: Vec<u32> = match remap {
        Some(table) => indices
            .iter()
            .map(|&i| table.to_full(i))
            .collect::<Result<_>>()?,
        None => indices.to_vec(),
    };
    Ok(full
        .into_iter()
        .filter(|&id| !Reserved::is_boundary(id))
        .collect())
}

/// Drop every `PAD` from a raw sequence, preserving order.
pub fn filter_structural(sequence: &[u32]) -> Vec<u32> {
    sequence.iter().copied().filter(|&id| id != PAD).collect()
}

/// Render ids as space-joined words. No tokens are stripped.
pub fn render(ids: &[u32], vocab: &Vocab) -> Result<String> {
    let words = ids
        .iter()
        .map(|&id| vocab.try_word(id))
        .collect::<Result<Vec<&str>>>()?;
    Ok(words.join(" "))
}

/// [`remap_and_filter`] followed by [`render`], returning the text together
/// with the full-vocabulary ids it was rendered from.
pub fn remap_and_render(
    indices: &[u32],
    remap: Option<&RemapTable>,
    vocab: &Vocab,
) -> Result<(String, Vec<u32>)> {
    let ids = remap_and_filter(indices, remap)?;
    let text = render(&ids, vocab)?;
    Ok((text, ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VocabError;
    use crate::tokens::{BEGIN, END, UNK};

    fn sample_table() -> RemapTable {
        RemapTable::from_pairs([(0, 0), (1, 1), (5, 3), (2, 8), (3, 10), (4, 100)]).unwrap()
    }

    #[test]
    fn test_remap_and_filter_maps_through_table() {
        let table = sample_table();
        let out = remap_and_filter(&[4, 2, 3], Some(&table)).unwrap();
        assert_eq!(out, vec![100, 8, 10]);
    }

    #[test]
    fn test_remap_and_filter_strips_boundaries_after_mapping() {
        let table = sample_table();
        // restricted 5 -> END; restricted 3 -> 10 even though 3 is END in the
        // full vocabulary.
        let out = remap_and_filter(&[4, 3, 5], Some(&table)).unwrap();
        assert_eq!(out, vec![100, 10]);
    }

    #[test]
    fn test_remap_and_filter_without_table() {
        let out = remap_and_filter(&[BEGIN, 7, 0, 9, END], None).unwrap();
        assert_eq!(out, vec![7, 0, 9]);
    }

    #[test]
    fn test_remap_and_filter_unmapped_index() {
        let table = sample_table();
        assert_eq!(
            remap_and_filter(&[4, 6], Some(&table)),
            Err(VocabError::UnmappedIndex { index: 6, len: 6 })
        );
    }

    #[test]
    fn test_filter_structural() {
        assert_eq!(filter_structural(&[0, 5, 0, 0, 9, UNK, 0]), vec![5, 9, UNK]);
        assert!(filter_structural(&[0, 0]).is_empty());
    }

    #[test]
    fn test_render_keeps_boundaries() {
        let vocab: Vocab = [(2, "<b>"), (7, "the"), (9, "cat"), (3, "<e>")]
            .into_iter()
            .collect();
        assert_eq!(render(&[2, 7, 9, 3], &vocab).unwrap(), "<b> the cat <e>");
        assert_eq!(render(&[], &vocab).unwrap(), "");
    }

    #[test]
    fn test_render_unknown_id() {
        let vocab: Vocab = [(7, "the")].into_iter().collect();
        assert_eq!(render(&[7, 8], &vocab), Err(VocabError::UnknownId(8)));
    }

    #[test]
    fn test_remap_and_render() {
        let table = sample_table();
        let vocab: Vocab = [(8, "a"), (100, "word")].into_iter().collect();
        let (text, ids) = remap_and_render(&[2, 4, 5], Some(&table), &vocab).unwrap();
        assert_eq!(ids, vec![8, 100]);
        assert_eq!(text, "a word");
    }
}
