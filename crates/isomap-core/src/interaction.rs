//! Pointer interaction state machine
//!
//! Turns pointer gestures into bounded edits of the selected device:
//! dragging a marker moves the device across the horizontal plane,
//! dragging the elevation handle raises or lowers it.
//!
//! Gestures are `pointer_down`, any number of `pointer_move`, then one
//! `pointer_up`. The device list stays owned by the caller and is passed
//! into every handler; the state only remembers which device is selected
//! (by MAC address) and what the current gesture is doing.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::device::{clamp_horizontal, Device, MacAddress, Orientation, Vector3};
use crate::projection::{Projection, Viewport};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InteractionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("No device is selected")]
    NoSelection,
}

/// What the current gesture is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    /// Moving the selected device across the horizontal plane
    Dragging,
    /// Moving the selected device up or down with the elevation handle
    AdjustingTilt,
}

/// Where a pointer press landed, as resolved by the host's hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The elevation handle of the selected device's marker
    ElevationHandle,
    /// The marker of a device
    Marker(MacAddress),
    /// Anything else
    Background,
}

/// Result of a pointer press: the selected device after the press
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub device: Option<Device>,
}

/// Discrete result of one handler call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "device", rename_all = "snake_case")]
pub enum Outcome {
    None,
    Moved(Device),
    Ended(Device),
    Reoriented(Device),
}

impl Outcome {
    pub fn device(&self) -> Option<&Device> {
        match self {
            Outcome::None => None,
            Outcome::Moved(d) | Outcome::Ended(d) | Outcome::Reoriented(d) => Some(d),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Outcome::None)
    }
}

/// Anchor of a device's marker on the world plane.
///
/// Elevation shifts the marker diagonally so that raised devices appear
/// above their ground position in the isometric view.
pub fn marker_anchor(position: &Vector3) -> DVec2 {
    DVec2::new(-position.x + position.y, position.z - position.y)
}

/// Horizontal position whose marker anchor is `anchor` at `elevation`,
/// snapped to whole centimeters. Not clamped.
///
/// Snapping rounds to the nearest centimeter rather than flooring, so an
/// anchor of `(-50.7, 10.7)` at elevation 0 gives `(51, 11)`, not `(50, 10)`.
pub fn position_from_anchor(anchor: DVec2, elevation: f64) -> (f64, f64) {
    ((-anchor.x).round() + elevation, anchor.y.round() + elevation)
}

/// Selection and gesture state of one map surface
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    selected: Option<MacAddress>,
    mode: Mode,
    projection: Projection,
    viewport: Viewport,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    /// Idle state with nothing selected, screen space equal to projected space
    pub fn new() -> Self {
        Self::with_viewport(Viewport::identity())
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            selected: None,
            mode: Mode::Idle,
            projection: Projection::default(),
            viewport,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected(&self) -> Option<MacAddress> {
        self.selected
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Replace the viewport, e.g. after the host surface was resized
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The selected device within `devices`, if it is still present
    pub fn selected_device<'a>(&self, devices: &'a [Device]) -> Option<&'a Device> {
        let mac = self.selected?;
        devices.iter().find(|d| d.mac == mac)
    }

    fn selected_device_mut<'a>(&self, devices: &'a mut [Device]) -> Option<&'a mut Device> {
        let mac = self.selected?;
        devices.iter_mut().find(|d| d.mac == mac)
    }

    /// Handle a pointer press on `target`
    pub fn pointer_down(&mut self, devices: &[Device], target: PointerTarget) -> Selection {
        if target == PointerTarget::ElevationHandle {
            if let Some(device) = self.selected_device(devices) {
                debug!(mac = %device.mac, "Elevation adjustment started");
                self.mode = Mode::AdjustingTilt;
                return Selection {
                    device: Some(device.clone()),
                };
            }
        }

        let hit = match target {
            PointerTarget::Marker(mac) => devices.iter().find(|d| d.mac == mac),
            _ => None,
        };

        match hit {
            Some(device) => {
                debug!(mac = %device.mac, "Device selected, dragging");
                self.selected = Some(device.mac);
                self.mode = Mode::Dragging;
                Selection {
                    device: Some(device.clone()),
                }
            }
            None => {
                if self.selected.take().is_some() {
                    debug!("Selection cleared");
                }
                self.mode = Mode::Idle;
                Selection { device: None }
            }
        }
    }

    /// Handle pointer motion, degrading any failure to [`Outcome::None`]
    pub fn pointer_move(
        &mut self,
        devices: &mut [Device],
        screen_x: f64,
        screen_y: f64,
        movement_y: f64,
    ) -> Outcome {
        match self.try_pointer_move(devices, screen_x, screen_y, movement_y) {
            Ok(outcome) => outcome,
            Err(InteractionError::NoSelection) => {
                debug!(mode = ?self.mode, "Pointer move without a selected device");
                Outcome::None
            }
            Err(e) => {
                warn!(error = %e, "Ignoring pointer move");
                Outcome::None
            }
        }
    }

    /// Handle pointer motion, reporting why nothing changed
    pub fn try_pointer_move(
        &mut self,
        devices: &mut [Device],
        screen_x: f64,
        screen_y: f64,
        movement_y: f64,
    ) -> Result<Outcome, InteractionError> {
        match self.mode {
            Mode::Idle => Ok(Outcome::None),
            Mode::Dragging => self.drag(devices, screen_x, screen_y),
            Mode::AdjustingTilt => self.adjust_elevation(devices, movement_y),
        }
    }

    fn drag(
        &self,
        devices: &mut [Device],
        screen_x: f64,
        screen_y: f64,
    ) -> Result<Outcome, InteractionError> {
        if !(screen_x.is_finite() && screen_y.is_finite()) {
            return Err(InteractionError::InvalidInput(format!(
                "pointer at ({screen_x}, {screen_y})"
            )));
        }
        let device = self
            .selected_device_mut(devices)
            .ok_or(InteractionError::NoSelection)?;

        let anchor = self
            .viewport
            .screen_to_world(&self.projection, screen_x, screen_y);
        let (x, z) = position_from_anchor(anchor, device.position.y);
        // Infinities clamp to the bounds; NaN has no meaningful clamp
        if x.is_nan() || z.is_nan() {
            return Err(InteractionError::InvalidInput(format!(
                "pointer at ({screen_x}, {screen_y}) maps to ({x}, {z})"
            )));
        }

        device.position.x = clamp_horizontal(x);
        device.position.z = clamp_horizontal(z);
        Ok(Outcome::Moved(device.clone()))
    }

    fn adjust_elevation(
        &self,
        devices: &mut [Device],
        movement_y: f64,
    ) -> Result<Outcome, InteractionError> {
        if !movement_y.is_finite() {
            return Err(InteractionError::InvalidInput(format!(
                "vertical movement {movement_y}"
            )));
        }
        let device = self
            .selected_device_mut(devices)
            .ok_or(InteractionError::NoSelection)?;

        let current = device.position.y;
        // The step is clamped to the current elevation, not the result
        let step = (movement_y * 2.0).min(current);
        let elevation = (current - step).max(0.0);
        if !elevation.is_finite() {
            return Err(InteractionError::InvalidInput(format!(
                "elevation {current} moved by {step}"
            )));
        }

        device.position.y = elevation;
        Ok(Outcome::Moved(device.clone()))
    }

    /// Handle a pointer release; ends any gesture, keeps the selection
    pub fn pointer_up(&mut self, devices: &[Device]) -> Outcome {
        let was_active = self.mode != Mode::Idle;
        self.mode = Mode::Idle;
        if !was_active {
            return Outcome::None;
        }

        match self.selected_device(devices) {
            Some(device) => {
                debug!(mac = %device.mac, x = device.position.x, y = device.position.y, z = device.position.z, "Gesture ended");
                Outcome::Ended(device.clone())
            }
            None => Outcome::None,
        }
    }

    /// Set the orientation of the selected device.
    ///
    /// Out of range angles are clamped; non-finite angles are rejected.
    pub fn set_orientation(&mut self, devices: &mut [Device], orientation: Orientation) -> Outcome {
        if !orientation.is_finite() {
            warn!(?orientation, "Ignoring non-finite orientation");
            return Outcome::None;
        }
        let Some(device) = self.selected_device_mut(devices) else {
            debug!("Orientation change without a selected device");
            return Outcome::None;
        };
        device.orientation = Orientation::clamped(orientation.bearing, orientation.tilt);
        Outcome::Reoriented(device.clone())
    }
}
