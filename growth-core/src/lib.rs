//! Differential growth on half-edge meshes.
//!
//! A mesh expands by splitting long edges, keeps its vertices apart through
//! collision springs, holds its edges near a target length and resists sharp
//! folds. Each vertex moves by the weighted mean of every suggestion it
//! received during a step.
//!
//! Main components:
//! - [`engine`]: [`engine::GrowthEngine`], which owns the mesh and runs steps.
//! - [`phases`]: growth, the constraint passes and the integrator.
//! - [`mesh`]: half-edge topology with edge and face splitting.
//! - [`spatial`]: R-tree radius queries for collision candidates.
//! - [`accumulator`]: per-step weighted move buffers.
//! - [`attractor`]: optional attractor gate.
//! - [`config`]: step parameters and policy switches.
//! - [`seed`]: starting meshes.
//! - [`error`] and [`types`]: errors and shared ids.

pub mod accumulator;
pub mod attractor;
pub mod config;
pub mod engine;
pub mod error;
pub mod mesh;
pub mod phases;
pub mod seed;
pub mod spatial;
pub mod types;

pub use config::Config;
pub use engine::{GrowthEngine, StepReport};
pub use error::GrowthError;
