//! Shared types for scene files, gesture scripts and marker layout

use glam::DVec2;
use isomap_core::{Device, MacAddress, Outcome, Selection};
use serde::{Deserialize, Serialize};

/// Edge length of a marker cube face, in world units
pub const MARKER_SIZE: f64 = 40.0;

/// Center of the elevation handle in marker-local coordinates
pub const HANDLE_CENTER: DVec2 = DVec2::new(36.0, -36.0);

/// Radius of the elevation handle
pub const HANDLE_RADIUS: f64 = 8.0;

/// Half the stroke width of the elevation stem and its arrowhead
pub const STEM_HALF_WIDTH: f64 = 2.5;

/// Half length of each arrowhead stroke at the end of the stem
pub const ARROW_HALF_LENGTH: f64 = 10.0;

/// Device list as stored in a scene file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default, rename = "device")]
    pub devices: Vec<Device>,
}

/// One step of a scripted pointer gesture, in host screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureEvent {
    Down {
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        movement_y: f64,
    },
    Up,
    Orient {
        bearing: f64,
        tilt: f64,
    },
}

/// A scripted sequence of gesture events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GestureScript {
    #[serde(default, rename = "event")]
    pub events: Vec<GestureEvent>,
}

/// What the scene reported for one gesture event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneEvent {
    Selection(Selection),
    Outcome(Outcome),
}

/// Where and how a renderer should draw one device marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerLayout {
    pub mac: MacAddress,
    /// Marker origin on the world plane
    pub anchor: DVec2,
    pub selected: bool,
    /// Length of the elevation stem, absent for devices on the ground
    pub stem_length: Option<f64>,
}

impl MarkerLayout {
    /// SVG `transform` placing the marker group
    pub fn svg_transform(&self) -> String {
        format!("translate({} {})", self.anchor.x, self.anchor.y)
    }
}
