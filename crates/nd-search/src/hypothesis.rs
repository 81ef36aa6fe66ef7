use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};

/// Which record variant a beam holds, fixed once per decode.
///
/// Length normalization adds an accumulated score; detail mode keeps a
/// decoder-state snapshot so the scorer can resume without recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisShape {
    Plain,
    Normalized,
    Detailed,
    NormalizedDetailed,
}

impl HypothesisShape {
    pub fn from_flags(length_norm: bool, detail: bool) -> Self {
        match (length_norm, detail) {
            (false, false) => HypothesisShape::Plain,
            (true, false) => HypothesisShape::Normalized,
            (false, true) => HypothesisShape::Detailed,
            (true, true) => HypothesisShape::NormalizedDetailed,
        }
    }

    pub fn is_normalized(self) -> bool {
        matches!(
            self,
            HypothesisShape::Normalized | HypothesisShape::NormalizedDetailed
        )
    }

    pub fn is_detailed(self) -> bool {
        matches!(
            self,
            HypothesisShape::Detailed | HypothesisShape::NormalizedDetailed
        )
    }

    /// Build a record of this shape.
    ///
    /// `accum` is dropped for non-normalized shapes and `state` for
    /// non-detailed ones. Detailed shapes require a state.
    pub fn record<S>(
        self,
        loss: f32,
        accum: f32,
        state: Option<S>,
        token: u32,
        back: usize,
    ) -> Result<Hypothesis<S>> {
        let hyp = match self {
            HypothesisShape::Plain => Hypothesis::Plain { loss, token, back },
            HypothesisShape::Normalized => Hypothesis::Normalized {
                loss,
                accum,
                token,
                back,
            },
            HypothesisShape::Detailed => Hypothesis::Detailed {
                loss,
                state: state.ok_or_else(|| missing_state(self))?,
                token,
                back,
            },
            HypothesisShape::NormalizedDetailed => Hypothesis::NormalizedDetailed {
                loss,
                accum,
                state: state.ok_or_else(|| missing_state(self))?,
                token,
                back,
            },
        };
        Ok(hyp)
    }
}

fn missing_state(shape: HypothesisShape) -> DecodeError {
    DecodeError::InvalidArgument(format!("{} records need a decoder state", shape))
}

impl fmt::Display for HypothesisShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HypothesisShape::Plain => "plain",
            HypothesisShape::Normalized => "normalized",
            HypothesisShape::Detailed => "detailed",
            HypothesisShape::NormalizedDetailed => "normalized+detailed",
        };
        f.write_str(name)
    }
}

/// One partial or finished candidate at a given step.
///
/// `loss` is cumulative (lower is better), `token` is what this step emitted
/// and `back` is the parent's position in the previous step's slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Hypothesis<S> {
    Plain {
        loss: f32,
        token: u32,
        back: usize,
    },
    Normalized {
        loss: f32,
        accum: f32,
        token: u32,
        back: usize,
    },
    Detailed {
        loss: f32,
        state: S,
        token: u32,
        back: usize,
    },
    NormalizedDetailed {
        loss: f32,
        accum: f32,
        state: S,
        token: u32,
        back: usize,
    },
}

impl<S> Hypothesis<S> {
    pub fn shape(&self) -> HypothesisShape {
        match self {
            Hypothesis::Plain { .. } => HypothesisShape::Plain,
            Hypothesis::Normalized { .. } => HypothesisShape::Normalized,
            Hypothesis::Detailed { .. } => HypothesisShape::Detailed,
            Hypothesis::NormalizedDetailed { .. } => HypothesisShape::NormalizedDetailed,
        }
    }

    pub fn loss(&self) -> f32 {
        match *self {
            Hypothesis::Plain { loss, .. }
            | Hypothesis::Normalized { loss, .. }
            | Hypothesis::Detailed { loss, .. }
            | Hypothesis::NormalizedDetailed { loss, .. } => loss,
        }
    }

    pub fn token(&self) -> u32 {
        match *self {
            Hypothesis::Plain { token, .. }
            | Hypothesis::Normalized { token, .. }
            | Hypothesis::Detailed { token, .. }
            | Hypothesis::NormalizedDetailed { token, .. } => token,
        }
    }

    pub fn back(&self) -> usize {
        match *self {
            Hypothesis::Plain { back, .. }
            | Hypothesis::Normalized { back, .. }
            | Hypothesis::Detailed { back, .. }
            | Hypothesis::NormalizedDetailed { back, .. } => back,
        }
    }

    /// Accumulated length-normalized score, if this shape carries one.
    pub fn accum(&self) -> Option<f32> {
        match *self {
            Hypothesis::Normalized { accum, .. } | Hypothesis::NormalizedDetailed { accum, .. } => {
                Some(accum)
            }
            Hypothesis::Plain { .. } | Hypothesis::Detailed { .. } => None,
        }
    }

    /// Score used for ranking: the accumulated score when normalized,
    /// otherwise the cumulative loss.
    pub fn rank_score(&self) -> f32 {
        self.accum().unwrap_or_else(|| self.loss())
    }

    /// Decoder-state snapshot, if this shape carries one.
    pub fn state(&self) -> Option<&S> {
        match self {
            Hypothesis::Detailed { state, .. } | Hypothesis::NormalizedDetailed { state, .. } => {
                Some(state)
            }
            Hypothesis::Plain { .. } | Hypothesis::Normalized { .. } => None,
        }
    }
}
