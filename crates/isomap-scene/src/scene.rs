//! Scene facade: devices plus interaction state, driven by raw pointer events

use std::collections::HashSet;
use std::path::Path;

use glam::DVec2;
use isomap_core::device::clamp_horizontal;
use isomap_core::{
    Device, InteractionState, MacAddress, Orientation, Outcome, PointerTarget, Selection, Viewport,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::markers;
use crate::types::{GestureEvent, GestureScript, MarkerLayout, SceneEvent, SceneFile};

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scene: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid device {mac}: {reason}")]
    InvalidDevice { mac: MacAddress, reason: String },
}

/// Validate a loaded device and bring its position into world bounds
fn normalize_device(mut device: Device) -> Result<Device, SceneError> {
    let invalid = |reason: &str| SceneError::InvalidDevice {
        mac: device.mac,
        reason: reason.to_string(),
    };
    if !device.position.is_finite() {
        return Err(invalid("position is not finite"));
    }
    if !device.orientation.is_finite() {
        return Err(invalid("orientation is not finite"));
    }

    if !device.is_in_bounds() {
        warn!(mac = %device.mac, position = ?device.position, "Clamping device into world bounds");
        device.position.x = clamp_horizontal(device.position.x);
        device.position.z = clamp_horizontal(device.position.z);
        device.position.y = device.position.y.max(0.0);
    }
    device.orientation = Orientation::clamped(device.orientation.bearing, device.orientation.tilt);
    Ok(device)
}

/// A map surface: the device list, its selection and the viewport
#[derive(Debug, Clone, Default)]
pub struct Scene {
    devices: Vec<Device>,
    interaction: InteractionState,
}

impl Scene {
    pub fn new(devices: Vec<Device>) -> Self {
        Self::with_viewport(devices, Viewport::identity())
    }

    pub fn with_viewport(devices: Vec<Device>, viewport: Viewport) -> Self {
        Self {
            devices,
            interaction: InteractionState::with_viewport(viewport),
        }
    }

    /// Parse a scene from TOML, validating every device
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        let file: SceneFile = toml::from_str(content)?;
        let mut seen = HashSet::new();
        let mut devices = Vec::with_capacity(file.devices.len());
        for device in file.devices {
            if !seen.insert(device.mac) {
                return Err(SceneError::InvalidDevice {
                    mac: device.mac,
                    reason: "duplicate MAC address".to_string(),
                });
            }
            devices.push(normalize_device(device)?);
        }
        Ok(Self::new(devices))
    }

    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        let scene = Self::from_toml(&content)?;
        info!(path = %path.display(), devices = scene.devices.len(), "Loaded scene");
        Ok(scene)
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Mutable access for collaborators updating the list between gestures
    pub fn devices_mut(&mut self) -> &mut Vec<Device> {
        &mut self.devices
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.interaction.set_viewport(viewport);
    }

    pub fn selected_device(&self) -> Option<&Device> {
        self.interaction.selected_device(&self.devices)
    }

    /// Map a screen point onto the world plane
    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> DVec2 {
        self.interaction
            .viewport()
            .screen_to_world(self.interaction.projection(), screen_x, screen_y)
    }

    /// What a press at this screen point would land on
    pub fn target_at(&self, screen_x: f64, screen_y: f64) -> PointerTarget {
        let point = self.screen_to_world(screen_x, screen_y);
        markers::hit_test(&self.devices, self.interaction.selected(), point)
    }

    /// Press at a screen point. A non-finite point changes nothing.
    pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64) -> Selection {
        if !(screen_x.is_finite() && screen_y.is_finite()) {
            warn!(screen_x, screen_y, "Ignoring pointer press");
            return Selection {
                device: self.selected_device().cloned(),
            };
        }
        let target = self.target_at(screen_x, screen_y);
        self.interaction.pointer_down(&self.devices, target)
    }

    pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64, movement_y: f64) -> Outcome {
        self.interaction
            .pointer_move(&mut self.devices, screen_x, screen_y, movement_y)
    }

    pub fn pointer_up(&mut self) -> Outcome {
        self.interaction.pointer_up(&self.devices)
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> Outcome {
        self.interaction
            .set_orientation(&mut self.devices, orientation)
    }

    /// Apply one scripted gesture event
    pub fn apply(&mut self, event: &GestureEvent) -> SceneEvent {
        match *event {
            GestureEvent::Down { x, y } => SceneEvent::Selection(self.pointer_down(x, y)),
            GestureEvent::Move { x, y, movement_y } => {
                SceneEvent::Outcome(self.pointer_move(x, y, movement_y))
            }
            GestureEvent::Up => SceneEvent::Outcome(self.pointer_up()),
            GestureEvent::Orient { bearing, tilt } => {
                SceneEvent::Outcome(self.set_orientation(Orientation::new(bearing, tilt)))
            }
        }
    }

    /// Apply a whole script, returning one scene event per step
    pub fn replay(&mut self, script: &GestureScript) -> Vec<SceneEvent> {
        script.events.iter().map(|event| self.apply(event)).collect()
    }

    pub fn markers(&self) -> Vec<MarkerLayout> {
        markers::layout(&self.devices, self.interaction.selected())
    }
}

impl GestureScript {
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isomap_core::interaction::marker_anchor;
    use isomap_core::{Mode, Vector3};

    const SCENE: &str = r#"
[[device]]
mac = 1
position = { x = 0, y = 0, z = 0 }

[[device]]
mac = 2
position = { x = -200, y = 40, z = 100 }
orientation = { bearing = 90, tilt = -20 }

[[device.neighbor]]
mac = 1
distance = 229.0
bearing = -60
tilt = 10
"#;

    fn screen_of(scene: &Scene, world: DVec2) -> DVec2 {
        let interaction = scene.interaction();
        interaction
            .viewport()
            .world_to_screen(interaction.projection(), world)
    }

    #[test]
    fn test_from_toml() {
        let scene = Scene::from_toml(SCENE).unwrap();
        assert_eq!(scene.devices().len(), 2);
        let device = &scene.devices()[1];
        assert_eq!(device.position, Vector3::new(-200.0, 40.0, 100.0));
        assert_eq!(device.orientation, Orientation::new(90.0, -20.0));
        assert_eq!(device.neighbors.len(), 1);
        assert_eq!(device.neighbors[0].mac, MacAddress(1));
    }

    #[test]
    fn test_from_toml_clamps_out_of_bounds() {
        let scene = Scene::from_toml(
            r#"
[[device]]
mac = 5
position = { x = 900, y = -10, z = -700 }
orientation = { bearing = 500, tilt = 0 }
"#,
        )
        .unwrap();
        let device = &scene.devices()[0];
        assert_eq!(device.position, Vector3::new(560.0, 0.0, -560.0));
        assert_eq!(device.orientation.bearing, 180.0);
    }

    #[test]
    fn test_from_toml_rejects_duplicates() {
        let err = Scene::from_toml(
            r#"
[[device]]
mac = 5
[[device]]
mac = 5
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::InvalidDevice { .. }));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(matches!(
            Scene::from_toml("[[device]]\nmac = \"x\""),
            Err(SceneError::ParseError(_))
        ));
    }

    #[test]
    fn test_press_selects_and_drags() {
        let mut scene = Scene::from_toml(SCENE).unwrap();
        let anchor = marker_anchor(&scene.devices()[1].position);
        let press = screen_of(&scene, anchor + DVec2::new(20.0, -20.0));

        let selection = scene.pointer_down(press.x, press.y);
        assert_eq!(selection.device.map(|d| d.mac), Some(MacAddress(2)));
        assert_eq!(scene.interaction().mode(), Mode::Dragging);

        let target = screen_of(&scene, marker_anchor(&Vector3::new(100.0, 40.0, -100.0)));
        let outcome = scene.pointer_move(target.x, target.y, 0.0);
        assert!(matches!(outcome, Outcome::Moved(_)));
        assert_eq!(scene.devices()[1].position, Vector3::new(100.0, 40.0, -100.0));

        assert!(matches!(scene.pointer_up(), Outcome::Ended(_)));
        assert_eq!(scene.selected_device().map(|d| d.mac), Some(MacAddress(2)));
    }

    #[test]
    fn test_handle_press_adjusts_elevation() {
        let mut scene = Scene::from_toml(SCENE).unwrap();
        let anchor = marker_anchor(&scene.devices()[1].position);
        let body = screen_of(&scene, anchor + DVec2::new(20.0, -20.0));
        scene.pointer_down(body.x, body.y);
        scene.pointer_up();

        let handle = screen_of(&scene, anchor + DVec2::new(36.0, -36.0));
        scene.pointer_down(handle.x, handle.y);
        assert_eq!(scene.interaction().mode(), Mode::AdjustingTilt);

        scene.pointer_move(handle.x, handle.y + 5.0, 5.0);
        assert_eq!(scene.devices()[1].position.y, 30.0);
    }

    #[test]
    fn test_press_on_background_clears() {
        let mut scene = Scene::from_toml(SCENE).unwrap();
        let anchor = marker_anchor(&scene.devices()[0].position);
        let body = screen_of(&scene, anchor + DVec2::new(20.0, -20.0));
        scene.pointer_down(body.x, body.y);
        assert!(scene.selected_device().is_some());

        let empty = screen_of(&scene, DVec2::new(500.0, 500.0));
        let selection = scene.pointer_down(empty.x, empty.y);
        assert!(selection.device.is_none());
        assert!(scene.selected_device().is_none());
    }

    #[test]
    fn test_non_finite_press_keeps_selection() {
        let mut scene = Scene::from_toml(SCENE).unwrap();
        let anchor = marker_anchor(&scene.devices()[0].position);
        let body = screen_of(&scene, anchor + DVec2::new(20.0, -20.0));
        scene.pointer_down(body.x, body.y);
        scene.pointer_up();

        let selection = scene.pointer_down(f64::NAN, 0.0);
        assert_eq!(selection.device.map(|d| d.mac), Some(MacAddress(1)));
        assert_eq!(scene.interaction().mode(), Mode::Idle);
    }

    #[test]
    fn test_gesture_script_parse() {
        let script = GestureScript::from_toml(
            r#"
[[event]]
kind = "down"
x = 1.5
y = 2

[[event]]
kind = "move"
x = 3
y = 4

[[event]]
kind = "up"

[[event]]
kind = "orient"
bearing = 45
tilt = -10
"#,
        )
        .unwrap();
        assert_eq!(
            script.events,
            vec![
                GestureEvent::Down { x: 1.5, y: 2.0 },
                GestureEvent::Move {
                    x: 3.0,
                    y: 4.0,
                    movement_y: 0.0
                },
                GestureEvent::Up,
                GestureEvent::Orient {
                    bearing: 45.0,
                    tilt: -10.0
                },
            ]
        );
    }
}
