//! Isomap Core - Projection, interaction and dial math for device maps
//!
//! This crate provides the numeric heart of an isometric device map:
//! - Device records with positions, orientations and neighbor measurements
//! - The fixed isometric projection and its inverse
//! - The pointer state machine that drags devices and adjusts elevation
//! - Orientation dial geometry for drawing bearing and tilt
//! - Neighbor ranging between devices

pub mod device;
pub mod dial;
pub mod interaction;
pub mod projection;
pub mod ranging;

pub use device::{Device, MacAddress, Neighbor, Orientation, Vector3, POSITION_LIMIT};
pub use dial::{compute_dial, ArcDescriptor, AxisDescriptor, DialGeometry};
pub use interaction::{InteractionError, InteractionState, Mode, Outcome, PointerTarget, Selection};
pub use projection::{build_projection, Projection, ProjectionMatrix, Viewport, PROJECTION};
