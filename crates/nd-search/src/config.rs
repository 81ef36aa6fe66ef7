use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};
use crate::hypothesis::HypothesisShape;

/// Search strategy run by the decode driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Greedy,
    Beam,
    CubePruning,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchMode::Greedy => "greedy search",
            SearchMode::Beam => "naive beam search",
            SearchMode::CubePruning => "cube pruning",
        })
    }
}

/// Parameters controlling decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub search_mode: SearchMode,
    /// Survivors kept per step.
    pub beam_size: usize,
    /// Longest output, in tokens, before a hypothesis is closed.
    pub max_length: usize,
    /// Rank by loss divided by length instead of raw cumulative loss.
    pub length_norm: bool,
    /// Keep a decoder-state snapshot in every record.
    pub detail: bool,
    /// Score over a per-input restricted vocabulary.
    pub vocab_manipulation: bool,
    /// Decode the sequences of a batch in parallel.
    pub batch_decoding: bool,
    /// Perturb candidate losses with Gumbel noise drawn from this seed.
    pub sampling_seed: Option<u64>,
    /// Finished hypotheses returned per input.
    pub n_best: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            search_mode: SearchMode::Beam,
            beam_size: 10,
            max_length: 50,
            length_norm: false,
            detail: false,
            vocab_manipulation: false,
            batch_decoding: false,
            sampling_seed: None,
            n_best: 1,
        }
    }
}

impl DecodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.beam_size == 0 {
            return Err(DecodeError::InvalidArgument("beam_size must be at least 1".into()));
        }
        if self.max_length == 0 {
            return Err(DecodeError::InvalidArgument("max_length must be at least 1".into()));
        }
        if self.n_best == 0 {
            return Err(DecodeError::InvalidArgument("n_best must be at least 1".into()));
        }
        Ok(())
    }

    /// Record shape implied by `length_norm` and `detail`.
    pub fn shape(&self) -> HypothesisShape {
        HypothesisShape::from_flags(self.length_norm, self.detail)
    }

    /// Survivors per step after applying the search mode.
    pub fn effective_beam_size(&self) -> usize {
        match self.search_mode {
            SearchMode::Greedy => 1,
            SearchMode::Beam | SearchMode::CubePruning => self.beam_size,
        }
    }
}

impl fmt::Display for DecodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.search_mode)?;
        writeln!(f, "  beam size: {}", self.effective_beam_size())?;
        writeln!(f, "  max length: {}", self.max_length)?;
        writeln!(f, "  batch decoding: {}", self.batch_decoding)?;
        writeln!(f, "  length normalized: {}", self.length_norm)?;
        writeln!(f, "  manipulate vocab: {}", self.vocab_manipulation)?;
        writeln!(f, "  record shape: {}", self.shape())?;
        match self.sampling_seed {
            Some(seed) => write!(f, "  gumbel seed: {}", seed),
            None => write!(f, "  gumbel seed: off"),
        }
    }
}
