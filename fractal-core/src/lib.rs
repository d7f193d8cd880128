//! Hierarchical parallel transform propagation for a five-way branching fractal.
//!
//! Main components:
//! - [`part`] — per-node state and the five canonical slot orientations.
//! - [`level_store`] — one flat array of parts and matrices per level.
//! - [`builder`] — builds the level arrays from a config and a random source.
//! - [`kernel`] — the per-part spin, sag and position update.
//! - [`scheduler`] — runs the kernel level by level on a rayon pool.
//! - [`render_sync`] — hands matrices and materials to a render backend.
//! - [`fractal`] — activate / tick / render / deactivate lifecycle.
//! - [`config`], [`error`], [`matrix`], [`types`] — shared plumbing.

pub mod builder;
pub mod config;
pub mod error;
pub mod fractal;
pub mod kernel;
pub mod level_store;
pub mod matrix;
pub mod part;
pub mod render_sync;
pub mod scheduler;
pub mod types;

pub use config::{ColorGradient, DegreeRange, FractalConfig};
pub use error::{FractalError, FractalResult};
pub use fractal::Fractal;
pub use kernel::RootPose;
pub use matrix::PackedMatrix;
pub use render_sync::{Bounds, InstancedDraw, LevelMaterial, MeshKind, RenderBackend};
