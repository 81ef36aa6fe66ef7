use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VocabError {
    #[error("unknown token id: {0}")]
    UnknownId(u32),
    #[error("restricted index {index} is not in the remap table (size {len})")]
    UnmappedIndex { index: u32, len: usize },
    #[error("duplicate vocabulary entry: {0}")]
    DuplicateEntry(u32),
    #[error("invalid remap table: {0}")]
    InvalidTable(String),
}

pub type Result<T> = std::result::Result<T, VocabError>;
