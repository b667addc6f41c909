//! Printing results as text or JSON

use anyhow::Result;
use isomap_core::dial::REFERENCE_AXES;
use isomap_core::{Device, DialGeometry, Outcome, Projection};
use isomap_scene::{GestureEvent, GestureScript, SceneEvent};
use serde::Serialize;
use serde_json::json;

use crate::config::OutputFormat;

pub struct Report {
    format: OutputFormat,
}

fn describe_device(device: &Device) -> String {
    let p = device.position;
    let o = device.orientation;
    format!(
        "{} at ({}, {}, {}) bearing {} tilt {}",
        device.mac, p.x, p.y, p.z, o.bearing, o.tilt
    )
}

fn describe_event(event: &SceneEvent) -> String {
    match event {
        SceneEvent::Selection(selection) => match &selection.device {
            Some(device) => format!("select {}", describe_device(device)),
            None => "select none".to_string(),
        },
        SceneEvent::Outcome(outcome) => match outcome {
            Outcome::None => "none".to_string(),
            Outcome::Moved(device) => format!("moved {}", describe_device(device)),
            Outcome::Ended(device) => format!("ended {}", describe_device(device)),
            Outcome::Reoriented(device) => format!("reoriented {}", describe_device(device)),
        },
    }
}

fn describe_gesture(event: &GestureEvent) -> String {
    match event {
        GestureEvent::Down { x, y } => format!("down ({x}, {y})"),
        GestureEvent::Move { x, y, movement_y } => format!("move ({x}, {y}) dy={movement_y}"),
        GestureEvent::Up => "up".to_string(),
        GestureEvent::Orient { bearing, tilt } => format!("orient {bearing}/{tilt}"),
    }
}

impl Report {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn projection(&self, projection: &Projection) -> Result<()> {
        let m = projection.coefficients();
        let inverse = projection.inverse_coefficients();
        match self.format {
            OutputFormat::Json => self.json(&json!({
                "matrix": m,
                "inverse": inverse,
                "svg": m.svg_transform(),
                "css": projection.css_matrix3d(),
            })),
            OutputFormat::Pretty => {
                println!("a = {}", m.a);
                println!("b = {}", m.b);
                println!("c = {}", m.c);
                println!("d = {}", m.d);
                println!("e = {}", m.e);
                println!("f = {}", m.f);
                println!("svg:     {}", m.svg_transform());
                println!("inverse: {}", inverse.svg_transform());
                println!("css:     {}", projection.css_matrix3d());
                Ok(())
            }
        }
    }

    pub fn dial(&self, dial: &DialGeometry) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(&json!({
                "dial": dial,
                "radius": dial.radius(),
                "stroke_width": dial.stroke_width(),
                "view_box": dial.view_box(),
                "reference_axes": REFERENCE_AXES,
            })),
            OutputFormat::Pretty => {
                let (x, y, w, h) = dial.view_box();
                println!("view box:     {x} {y} {w} {h}");
                println!("radius:       {}", dial.radius());
                println!("stroke width: {}", dial.stroke_width());
                let (dash, gap) = dial.bearing_arc.dash_array();
                println!("bearing arc:  dash {dash} {gap}, {}", dial.bearing_arc.css_transform());
                let (dash, gap) = dial.tilt_arc.dash_array();
                println!("tilt arc:     dash {dash} {gap}, {}", dial.tilt_arc.css_transform());
                println!("depth axis:   {}", dial.depth_axis.css_transform());
                println!("planar axis:  {}", dial.planar_axis.css_transform());
                Ok(())
            }
        }
    }

    pub fn replay(
        &self,
        script: &GestureScript,
        events: &[SceneEvent],
        devices: &[Device],
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(&json!({
                "events": events,
                "devices": devices,
            })),
            OutputFormat::Pretty => {
                for (gesture, event) in script.events.iter().zip(events) {
                    println!("{:<32} -> {}", describe_gesture(gesture), describe_event(event));
                }
                println!();
                self.devices(devices)
            }
        }
    }

    pub fn devices(&self, devices: &[Device]) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(&devices),
            OutputFormat::Pretty => {
                for device in devices {
                    println!("{}", describe_device(device));
                    for neighbor in &device.neighbors {
                        println!(
                            "    {} distance {:.1} bearing {} tilt {}",
                            neighbor.mac, neighbor.distance, neighbor.bearing, neighbor.tilt
                        );
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isomap_core::{MacAddress, Selection, Vector3};

    #[test]
    fn test_describe_event() {
        let device = Device::new(MacAddress(0x12), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(
            describe_event(&SceneEvent::Outcome(Outcome::Moved(device.clone()))),
            "moved 00:12 at (1, 2, 3) bearing 0 tilt 0"
        );
        assert_eq!(
            describe_event(&SceneEvent::Selection(Selection { device: None })),
            "select none"
        );
    }

    #[test]
    fn test_describe_gesture() {
        assert_eq!(describe_gesture(&GestureEvent::Up), "up");
        assert_eq!(
            describe_gesture(&GestureEvent::Move {
                x: 1.0,
                y: 2.5,
                movement_y: -3.0
            }),
            "move (1, 2.5) dy=-3"
        );
    }
}
