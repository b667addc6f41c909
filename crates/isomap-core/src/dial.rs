//! Orientation dial geometry
//!
//! A dial draws a bearing and a tilt as two arcs of a 3D-rotated circle,
//! plus two value axes pointing along the heading. Everything here is a
//! pure function of the two angles.

use serde::{Deserialize, Serialize};

use crate::device::Orientation;

/// Fixed size unit of both arc view boxes.
///
/// With a circle radius of `a / 4` the circumference is exactly 360, so a
/// stroke dash of `|angle|` draws an arc of `|angle|` degrees.
pub const DIAL_UNIT: f64 = (0.5 / std::f64::consts::PI) * 360.0 * 4.0;

/// Full circle, second entry of every arc dash array
pub const FULL_TURN: f64 = 360.0;

/// Fixed reference axes drawn behind the dial
pub const REFERENCE_AXES: [AxisDescriptor; 3] = [
    // x
    AxisDescriptor {
        rotate_z: -180.0,
        rotate_x: 0.0,
        rotate_y: None,
    },
    // y
    AxisDescriptor {
        rotate_z: -90.0,
        rotate_x: 0.0,
        rotate_y: None,
    },
    // z
    AxisDescriptor {
        rotate_z: 0.0,
        rotate_x: -90.0,
        rotate_y: None,
    },
];

/// One arc: how far it sweeps and how its circle is rotated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcDescriptor {
    /// Arc length in degrees, always non-negative
    pub sweep: f64,
    pub rotate_z: f64,
    pub rotate_x: f64,
}

impl ArcDescriptor {
    /// `stroke-dasharray` pair drawing the arc
    pub fn dash_array(&self) -> (f64, f64) {
        (self.sweep, FULL_TURN)
    }

    pub fn css_transform(&self) -> String {
        format!("rotateZ({}deg) rotateX({}deg)", self.rotate_z, self.rotate_x)
    }
}

/// A value axis pointing along the heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    pub rotate_z: f64,
    pub rotate_x: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_y: Option<f64>,
}

impl AxisDescriptor {
    pub fn css_transform(&self) -> String {
        let mut transform = format!("rotateZ({}deg) rotateX({}deg)", self.rotate_z, self.rotate_x);
        if let Some(y) = self.rotate_y {
            transform.push_str(&format!(" rotateY({}deg)", y));
        }
        transform
    }
}

/// Everything a renderer needs to draw a bearing/tilt dial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DialGeometry {
    pub unit: f64,
    pub bearing_arc: ArcDescriptor,
    pub tilt_arc: ArcDescriptor,
    /// Value axis turned a quarter around Y, giving depth
    pub depth_axis: AxisDescriptor,
    pub planar_axis: AxisDescriptor,
}

impl DialGeometry {
    /// Compute the dial for a bearing in [-180, 180] and a tilt in [-90, 90].
    ///
    /// Angles outside their range are clamped and non-finite angles are
    /// read as zero, so the result is always finite.
    pub fn compute(bearing: f64, tilt: f64) -> Self {
        let Orientation { bearing, tilt } = Orientation::clamped(bearing, tilt);

        let tilt_flip = if tilt > 0.0 {
            90.0
        } else if tilt < 0.0 {
            -90.0
        } else {
            0.0
        };

        Self {
            unit: DIAL_UNIT,
            bearing_arc: ArcDescriptor {
                sweep: bearing.abs(),
                rotate_z: 90.0,
                rotate_x: if bearing > 0.0 { 0.0 } else { 180.0 },
            },
            tilt_arc: ArcDescriptor {
                sweep: tilt.abs(),
                rotate_z: 90.0 + bearing,
                rotate_x: tilt_flip,
            },
            depth_axis: AxisDescriptor {
                rotate_z: 180.0 + bearing,
                rotate_x: 0.0 - tilt,
                rotate_y: Some(90.0),
            },
            planar_axis: AxisDescriptor {
                rotate_z: 180.0 + bearing,
                rotate_x: 0.0 - tilt,
                rotate_y: None,
            },
        }
    }

    /// Radius of the arc circles
    pub fn radius(&self) -> f64 {
        self.unit / 4.0
    }

    /// Stroke width filling the circle from center to rim
    pub fn stroke_width(&self) -> f64 {
        self.unit / 2.0
    }

    /// `(min_x, min_y, width, height)` of both arc view boxes
    pub fn view_box(&self) -> (f64, f64, f64, f64) {
        (-self.unit / 2.0, -self.unit / 2.0, self.unit, self.unit)
    }
}

/// Dial geometry for a bearing and tilt
pub fn compute_dial(bearing: f64, tilt: f64) -> DialGeometry {
    DialGeometry::compute(bearing, tilt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_finite(dial: &DialGeometry) -> bool {
        let arcs = [dial.bearing_arc, dial.tilt_arc];
        let axes = [dial.depth_axis, dial.planar_axis];
        dial.unit.is_finite()
            && arcs
                .iter()
                .all(|a| a.sweep.is_finite() && a.rotate_z.is_finite() && a.rotate_x.is_finite())
            && axes.iter().all(|a| {
                a.rotate_z.is_finite()
                    && a.rotate_x.is_finite()
                    && a.rotate_y.map_or(true, f64::is_finite)
            })
    }

    #[test]
    fn test_unit_gives_360_circumference() {
        let dial = compute_dial(0.0, 0.0);
        let circumference = 2.0 * std::f64::consts::PI * dial.radius();
        assert!((circumference - FULL_TURN).abs() < 1e-9);
        assert_eq!(dial.stroke_width(), dial.unit / 2.0);
        assert_eq!(dial.view_box().2, dial.unit);
    }

    #[test]
    fn test_origin() {
        let dial = compute_dial(0.0, 0.0);
        assert_eq!(dial.bearing_arc.sweep, 0.0);
        assert_eq!(dial.tilt_arc.sweep, 0.0);
        assert_eq!(dial.bearing_arc.rotate_z, 90.0);
        assert_eq!(dial.bearing_arc.rotate_x, 180.0);
        assert_eq!(dial.tilt_arc.rotate_z, 90.0);
        assert_eq!(dial.tilt_arc.rotate_x, 0.0);
        assert_eq!(dial.depth_axis.rotate_z, 180.0);
        assert_eq!(dial.depth_axis.rotate_y, Some(90.0));
        assert_eq!(dial.planar_axis.rotate_z, 180.0);
        assert_eq!(dial.planar_axis.rotate_y, None);
    }

    #[test]
    fn test_angle_relations() {
        let dial = compute_dial(-30.0, 45.0);
        assert_eq!(dial.bearing_arc.sweep, 30.0);
        assert_eq!(dial.bearing_arc.rotate_x, 180.0);
        assert_eq!(dial.tilt_arc.sweep, 45.0);
        assert_eq!(dial.tilt_arc.rotate_z, 60.0);
        assert_eq!(dial.tilt_arc.rotate_x, 90.0);
        assert_eq!(dial.depth_axis.rotate_z, 150.0);
        assert_eq!(dial.depth_axis.rotate_x, -45.0);
        assert_eq!(dial.planar_axis.rotate_x, -45.0);

        let dial = compute_dial(120.0, -10.0);
        assert_eq!(dial.bearing_arc.rotate_x, 0.0);
        assert_eq!(dial.tilt_arc.rotate_x, -90.0);
        assert_eq!(dial.planar_axis.rotate_z, 300.0);
        assert_eq!(dial.planar_axis.rotate_x, 10.0);
    }

    #[test]
    fn test_boundaries_are_finite() {
        for &bearing in &[-180.0, 0.0, 180.0] {
            for &tilt in &[-90.0, 0.0, 90.0] {
                let dial = compute_dial(bearing, tilt);
                assert!(all_finite(&dial), "bearing={bearing} tilt={tilt}");
                assert_eq!(dial.bearing_arc.sweep, f64::abs(bearing));
                assert_eq!(dial.tilt_arc.sweep, f64::abs(tilt));
            }
        }
    }

    #[test]
    fn test_non_finite_input_is_sanitized() {
        let dial = compute_dial(f64::NAN, f64::NEG_INFINITY);
        assert!(all_finite(&dial));
        assert_eq!(dial, compute_dial(0.0, 0.0));
        assert_eq!(compute_dial(400.0, 200.0), compute_dial(180.0, 90.0));
    }

    #[test]
    fn test_continuity_at_zero() {
        let eps = 1e-9;

        let pos = compute_dial(eps, 20.0);
        let neg = compute_dial(-eps, 20.0);
        assert_eq!(pos.bearing_arc.rotate_x, 0.0);
        assert_eq!(neg.bearing_arc.rotate_x, 180.0);
        assert!((pos.bearing_arc.sweep - neg.bearing_arc.sweep).abs() < 1e-8);
        assert!((pos.tilt_arc.rotate_z - neg.tilt_arc.rotate_z).abs() < 1e-8);
        assert!((pos.planar_axis.rotate_z - neg.planar_axis.rotate_z).abs() < 1e-8);

        let pos = compute_dial(45.0, eps);
        let neg = compute_dial(45.0, -eps);
        assert_eq!(pos.tilt_arc.rotate_x, 90.0);
        assert_eq!(neg.tilt_arc.rotate_x, -90.0);
        assert!((pos.tilt_arc.sweep - neg.tilt_arc.sweep).abs() < 1e-8);
        assert!((pos.depth_axis.rotate_x - neg.depth_axis.rotate_x).abs() < 1e-8);
    }

    #[test]
    fn test_css_transforms() {
        let dial = compute_dial(10.0, 20.0);
        assert_eq!(dial.bearing_arc.css_transform(), "rotateZ(90deg) rotateX(0deg)");
        assert_eq!(
            dial.depth_axis.css_transform(),
            "rotateZ(190deg) rotateX(-20deg) rotateY(90deg)"
        );
        assert_eq!(REFERENCE_AXES[2].css_transform(), "rotateZ(0deg) rotateX(-90deg)");
    }

    #[test]
    fn test_orientation_dial() {
        let orientation = Orientation::new(15.0, -5.0);
        assert_eq!(orientation.dial(), compute_dial(15.0, -5.0));
    }
}
