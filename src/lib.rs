//! Checks an intended architecture against the dataflows observed in code.
//!
//! Every declared component and dataflow, and every extracted source fact, is
//! classified as Convergence (in both models), Absence (declared only) or
//! Divergence (in code only), with the facts that support each verdict.

pub mod config;
pub mod core;
pub mod mapping;

pub use crate::core::classify::{classify, Reflexion, ReflexionModel, Summary};
pub use crate::core::entry::ReflexionEntry;
pub use crate::core::error::ReflexionError;
pub use crate::core::state::{Category, EntityType};
pub use crate::core::types::{
    Component, ComponentType, Dataflow, Direction, HlmEntity, Location, RawSmEntity, SmEntity,
};
