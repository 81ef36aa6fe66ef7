use std::collections::HashMap;

use crate::error::{Result, VocabError};
use crate::tokens::Reserved;

/// Bijective mapping from restricted-vocabulary index to full-vocabulary id.
///
/// Restricted index `i` is the position of its full id in `full_ids`. The
/// table is built once per input and never mutated during a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapTable {
    full_ids: Vec<u32>,
    restricted_of: HashMap<u32, u32>,
}

impl RemapTable {
    /// Build a table where restricted index `i` maps to `full_ids[i]`.
    ///
    /// Fails with `DuplicateEntry` if a full id appears twice.
    pub fn new(full_ids: Vec<u32>) -> Result<RemapTable> {
        let mut restricted_of = HashMap::with_capacity(full_ids.len());
        for (restricted, &full) in full_ids.iter().enumerate() {
            if restricted_of.insert(full, restricted as u32).is_some() {
                return Err(VocabError::DuplicateEntry(full));
            }
        }
        Ok(RemapTable {
            full_ids,
            restricted_of,
        })
    }

    /// Build a table from `(restricted, full)` pairs in any order.
    ///
    /// The restricted keys must be exactly `0..n`.
    pub fn from_pairs<I>(pairs: I) -> Result<RemapTable>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let pairs: Vec<(u32, u32)> = pairs.into_iter().collect();
        let n = pairs.len();
        let mut slots: Vec<Option<u32>> = vec![None; n];
        for &(restricted, full) in &pairs {
            let slot = slots.get_mut(restricted as usize).ok_or_else(|| {
                VocabError::InvalidTable(format!(
                    "restricted index {} out of range for {} entries",
                    restricted, n
                ))
            })?;
            if slot.replace(full).is_some() {
                return Err(VocabError::InvalidTable(format!(
                    "restricted index {} given twice",
                    restricted
                )));
            }
        }
        // Every slot is filled: n distinct keys, all below n.
        RemapTable::new(slots.into_iter().flatten().collect())
    }

    /// Build the table for a per-input candidate list.
    ///
    /// The reserved tokens always occupy restricted indices 0..=3 so that
    /// structural ids keep their values in both vocabularies. Candidates
    /// follow in first-seen order; repeats and reserved ids are skipped.
    pub fn with_reserved<I>(candidates: I) -> RemapTable
    where
        I: IntoIterator<Item = u32>,
    {
        let mut full_ids: Vec<u32> = Reserved::ALL.iter().map(|r| r.id()).collect();
        let mut restricted_of: HashMap<u32, u32> = full_ids
            .iter()
            .enumerate()
            .map(|(i, &full)| (full, i as u32))
            .collect();
        for full in candidates {
            if !restricted_of.contains_key(&full) {
                restricted_of.insert(full, full_ids.len() as u32);
                full_ids.push(full);
            }
        }
        tracing::debug!(size = full_ids.len(), "built restricted vocabulary");
        RemapTable {
            full_ids,
            restricted_of,
        }
    }

    /// Full-vocabulary id for a restricted index.
    pub fn to_full(&self, restricted: u32) -> Result<u32> {
        self.full_ids
            .get(restricted as usize)
            .copied()
            .ok_or(VocabError::UnmappedIndex {
                index: restricted,
                len: self.full_ids.len(),
            })
    }

    /// Restricted index for a full-vocabulary id, if the id is in the table.
    pub fn to_restricted(&self, full: u32) -> Option<u32> {
        self.restricted_of.get(&full).copied()
    }

    /// Full ids in restricted-index order.
    pub fn full_ids(&self) -> &[u32] {
        &self.full_ids
    }

    /// Number of restricted indices.
    pub fn len(&self) -> usize {
        self.full_ids.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.full_ids.is_empty()
    }
}
