//! The reflexion-matching engine.
//!
//! Pure functions over two fully loaded collections: the high-level model
//! (designer-declared dataflows) and the source model (facts extracted from
//! code). Nothing here performs I/O.

pub mod classify;
pub mod dataflow;
pub mod entry;
pub mod error;
pub mod names;
pub mod normalize;
pub mod process;
pub mod state;
pub mod types;
