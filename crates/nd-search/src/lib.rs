pub mod back_track;
pub mod beam;
pub mod config;
pub mod error;
pub mod gumbel;
pub mod hypothesis;
pub mod scorer;
pub mod search;
pub mod timing;
pub mod top_k;

pub use back_track::{reconstruct, reconstruct_hypothesis, Reconstruction};
pub use beam::BeamStore;
pub use config::{DecodeConfig, SearchMode};
pub use error::{DecodeError, ErrorKind, Result};
pub use gumbel::GumbelNoise;
pub use hypothesis::{Hypothesis, HypothesisShape};
pub use scorer::Scorer;
pub use search::{BeamSearcher, DecodeInput, Translation};
pub use top_k::{select_k_smallest, select_k_smallest_flat};
