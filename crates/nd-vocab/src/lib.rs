//! `nd-vocab` - vocabulary side of nmt-decode.
//!
//! This crate provides:
//! - The reserved structural token ids (`PAD`, `UNK`, `BEGIN`, `END`)
//! - A sparse id <-> word `Vocab` table
//! - `RemapTable` for restricted-vocabulary decoding
//! - Remapping, structural filtering and rendering of id sequences

pub mod error;
pub mod filter;
pub mod remap;
pub mod tokens;
pub mod vocab;

pub use error::{Result, VocabError};
pub use filter::{filter_structural, remap_and_filter, remap_and_render, render};
pub use remap::RemapTable;
pub use tokens::{Reserved, BEGIN, END, PAD, UNK};
pub use vocab::Vocab;
