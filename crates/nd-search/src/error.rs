use nd_vocab::VocabError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("corrupt beam: back pointer {pointer} at step {step} exceeds slot of {slot_len}")]
    CorruptBeam {
        step: usize,
        pointer: usize,
        slot_len: usize,
    },
    #[error("vocabulary error: {0}")]
    Vocab(#[from] VocabError),
    #[error("scorer error: {0}")]
    Scorer(String),
}

/// Coarse classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input, rejected before any mutation.
    InvalidArgument,
    /// An upstream invariant was broken; the current decode is abandoned.
    CorruptBeam,
    /// Rendering met an id with no vocabulary entry.
    UnknownId,
    /// The external scorer failed.
    Scorer,
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DecodeError::CorruptBeam { .. } => ErrorKind::CorruptBeam,
            DecodeError::Vocab(VocabError::UnmappedIndex { .. }) => ErrorKind::CorruptBeam,
            DecodeError::Vocab(VocabError::UnknownId(_)) => ErrorKind::UnknownId,
            DecodeError::Vocab(VocabError::DuplicateEntry(_))
            | DecodeError::Vocab(VocabError::InvalidTable(_)) => ErrorKind::InvalidArgument,
            DecodeError::Scorer(_) => ErrorKind::Scorer,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
