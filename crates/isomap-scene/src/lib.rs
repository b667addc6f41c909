//! Isomap Scene - Marker layout, hit testing and pointer routing
//!
//! This crate sits between a host surface and `isomap-core`: it turns raw
//! screen coordinates into pointer targets by hit testing device markers,
//! owns the device list of one map surface, and loads scene files and
//! scripted gestures.

pub mod markers;
pub mod scene;
pub mod types;

pub use scene::{Scene, SceneError};
pub use types::*;
