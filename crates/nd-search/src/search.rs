use std::time::Instant;

use nd_vocab::{remap_and_filter, render, RemapTable, Vocab, END};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::back_track::reconstruct_hypothesis;
use crate::beam::BeamStore;
use crate::config::{DecodeConfig, SearchMode};
use crate::error::{DecodeError, Result};
use crate::gumbel::GumbelNoise;
use crate::scorer::Scorer;
use crate::timing::format_elapsed;
use crate::top_k::select_k_smallest_flat;

/// One sequence to decode: the scorer's initial state and, under vocabulary
/// manipulation, its restricted vocabulary.
#[derive(Debug, Clone)]
pub struct DecodeInput<S> {
    pub state: S,
    pub remap: Option<RemapTable>,
}

impl<S> DecodeInput<S> {
    pub fn new(state: S) -> Self {
        Self { state, remap: None }
    }

    pub fn with_remap(state: S, remap: RemapTable) -> Self {
        Self {
            state,
            remap: Some(remap),
        }
    }
}

/// A finished output sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// Full-vocabulary ids without BEGIN/END.
    pub ids: Vec<u32>,
    /// Rendered words, when the searcher has a vocabulary.
    pub text: Option<String>,
    /// Cumulative loss.
    pub loss: f32,
    /// Ranking score (equal to `loss` unless length-normalized).
    pub score: f32,
}

/// Step-synchronous beam search over a [`Scorer`].
pub struct BeamSearcher<'a, Sc: Scorer> {
    scorer: &'a Sc,
    vocab: Option<&'a Vocab>,
    config: DecodeConfig,
}

impl<'a, Sc: Scorer> BeamSearcher<'a, Sc> {
    /// Create a searcher, validating the configuration.
    ///
    /// Cube pruning merges candidates in a way this driver does not
    /// implement and is rejected.
    pub fn new(scorer: &'a Sc, config: DecodeConfig) -> Result<Self> {
        config.validate()?;
        if config.search_mode == SearchMode::CubePruning {
            return Err(DecodeError::InvalidArgument(
                "cube pruning needs an external driver".to_string(),
            ));
        }
        info!("constructed decoder: {}", config);
        Ok(Self {
            scorer,
            vocab: None,
            config,
        })
    }

    /// Render outputs with `vocab`.
    pub fn with_vocab(mut self, vocab: &'a Vocab) -> Self {
        self.vocab = Some(vocab);
        self
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode one sequence, returning up to `n_best` translations, best
    /// first.
    pub fn decode(&self, input: &DecodeInput<Sc::State>) -> Result<Vec<Translation>> {
        let start = Instant::now();
        let remap = self.remap_for(input)?;
        let n_vocab = remap.map_or(self.scorer.vocab_size(), RemapTable::len);
        let end = match remap {
            Some(table) => table.to_restricted(END).ok_or_else(|| {
                DecodeError::InvalidArgument("remap table has no END entry".to_string())
            })?,
            None => END,
        };

        let shape = self.config.shape();
        let width = self.config.effective_beam_size();
        let max_length = self.config.max_length;
        let mut noise = self.config.sampling_seed.map(GumbelNoise::new);

        // One extra slot to close hypotheses still open at max_length.
        let mut beam = BeamStore::new(shape);
        beam.reset(max_length + 1, width, 0.0, Some(input.state.clone()))?;

        // (position in the previous slot, decoder state) of open hypotheses.
        let mut live: Vec<(usize, Sc::State)> = vec![(0, input.state.clone())];
        // (step, position) of END emitters.
        let mut finished: Vec<(usize, usize)> = Vec::new();
        let mut remaining = width;
        let mut last_step = 0;

        for step in 1..=max_length {
            if live.is_empty() || remaining == 0 {
                break;
            }
            last_step = step;

            let mut losses = Vec::with_capacity(live.len() * n_vocab);
            let mut next_states = Vec::with_capacity(live.len());
            for (pos, state) in &live {
                let parent = beam.get(step - 1, *pos).ok_or(DecodeError::CorruptBeam {
                    step: step - 1,
                    pointer: *pos,
                    slot_len: beam.len_at(step - 1),
                })?;
                let (scores, next) = self.scorer.score(state, parent.token())?;
                if scores.len() != n_vocab {
                    return Err(DecodeError::InvalidArgument(format!(
                        "scorer returned {} scores for a vocabulary of {}",
                        scores.len(),
                        n_vocab
                    )));
                }
                let base = parent.loss();
                losses.extend(scores.iter().map(|s| base + s));
                next_states.push(next);
            }

            let mut keys = if shape.is_normalized() {
                losses.iter().map(|l| l / step as f32).collect()
            } else {
                losses.clone()
            };
            if let Some(noise) = noise.as_mut() {
                noise.perturb(&mut keys);
            }

            let k = remaining.min(keys.len());
            let mut next_live = Vec::with_capacity(k);
            for (row, column) in select_k_smallest_flat(&keys, n_vocab, k)? {
                let loss = losses[row * n_vocab + column];
                let token = column as u32;
                let state = next_states[row].clone();
                let snapshot = shape.is_detailed().then(|| state.clone());
                let hyp = shape.record(loss, loss / step as f32, snapshot, token, live[row].0)?;
                let pos = beam.len_at(step);
                beam.append(step, hyp)?;
                if token == end {
                    finished.push((step, pos));
                } else {
                    next_live.push((pos, state));
                }
            }
            remaining = width.saturating_sub(finished.len());
            debug!(
                step,
                live = next_live.len(),
                finished = finished.len(),
                "search step"
            );
            live = next_live;
        }

        if !live.is_empty() && finished.len() < self.config.n_best {
            warn!(
                max_length,
                open = live.len(),
                "reached max length, closing open hypotheses"
            );
            let close = last_step + 1;
            for (pos, state) in live {
                let parent = beam.get(last_step, pos).ok_or(DecodeError::CorruptBeam {
                    step: last_step,
                    pointer: pos,
                    slot_len: beam.len_at(last_step),
                })?;
                let loss = parent.loss();
                let hyp = shape.record(loss, loss / close as f32, Some(state), end, pos)?;
                let slot_pos = beam.len_at(close);
                beam.append(close, hyp)?;
                finished.push((close, slot_pos));
            }
        }

        let mut paths = finished
            .into_iter()
            .map(|(step, pos)| reconstruct_hypothesis(&beam, step, pos))
            .collect::<Result<Vec<_>>>()?;
        paths.sort_by_key(|r| OrderedFloat(r.score));
        paths.truncate(self.config.n_best);

        let translations = paths
            .into_iter()
            .map(|r| -> Result<Translation> {
                let ids = remap_and_filter(&r.tokens, remap)?;
                let text = self.vocab.map(|v| render(&ids, v)).transpose()?;
                Ok(Translation {
                    ids,
                    text,
                    loss: r.loss,
                    score: r.score,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            hypotheses = translations.len(),
            elapsed = %format_elapsed(start.elapsed()),
            "decoded sequence"
        );
        Ok(translations)
    }

    /// Decode every input independently, in parallel when
    /// `batch_decoding` is set. Results keep input order.
    pub fn decode_batch(
        &self,
        inputs: &[DecodeInput<Sc::State>],
    ) -> Vec<Result<Vec<Translation>>>
    where
        Sc: Sync,
        Sc::State: Send + Sync,
    {
        if self.config.batch_decoding {
            inputs.par_iter().map(|input| self.decode(input)).collect()
        } else {
            inputs.iter().map(|input| self.decode(input)).collect()
        }
    }

    fn remap_for<'i>(&self, input: &'i DecodeInput<Sc::State>) -> Result<Option<&'i RemapTable>> {
        match (self.config.vocab_manipulation, input.remap.as_ref()) {
            (true, Some(table)) => Ok(Some(table)),
            (true, None) => Err(DecodeError::InvalidArgument(
                "vocabulary manipulation needs a remap table per input".to_string(),
            )),
            (false, Some(_)) => {
                debug!("ignoring remap table, vocabulary manipulation is off");
                Ok(None)
            }
            (false, None) => Ok(None),
        }
    }
}
