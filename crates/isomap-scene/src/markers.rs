//! Marker layout and hit testing on the world plane
//!
//! A marker is drawn as three faces of a cube: the top face as a plain
//! square, the two side faces skewed by 45°. Raised devices also get a
//! dashed stem with an arrowhead reaching back toward the ground.

use glam::DVec2;
use isomap_core::interaction::marker_anchor;
use isomap_core::{Device, MacAddress, PointerTarget};

use crate::types::{
    MarkerLayout, ARROW_HALF_LENGTH, HANDLE_CENTER, HANDLE_RADIUS, MARKER_SIZE, STEM_HALF_WIDTH,
};

/// Undo `skewY(-45°)`, which maps `(x, y)` to `(x, y - x)`
fn unskew_y(p: DVec2) -> DVec2 {
    DVec2::new(p.x, p.y + p.x)
}

/// Undo `skewX(-45°)`, which maps `(x, y)` to `(x - y, y)`
fn unskew_x(p: DVec2) -> DVec2 {
    DVec2::new(p.x + p.y, p.y)
}

fn in_rect(p: DVec2, min: DVec2, max: DVec2) -> bool {
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Stem and arrowhead strokes of a raised marker, in marker-local space
fn stem_segments(elevation: f64) -> [(DVec2, DVec2); 3] {
    let skew_y = |p: DVec2| DVec2::new(p.x, p.y - p.x);
    let skew_x = |p: DVec2| DVec2::new(p.x + p.y, p.y);
    let tip = -(MARKER_SIZE + elevation);
    let head_a = DVec2::new(tip, -ARROW_HALF_LENGTH);
    let head_b = DVec2::new(tip, ARROW_HALF_LENGTH);
    [
        (
            skew_y(DVec2::new(-MARKER_SIZE, 0.0)),
            skew_y(DVec2::new(tip, 0.0)),
        ),
        (skew_y(head_a), skew_y(head_b)),
        (skew_y(skew_x(head_a)), skew_y(skew_x(head_b))),
    ]
}

/// Whether a marker-local point lies on the marker body
pub fn marker_contains(local: DVec2, elevation: f64) -> bool {
    let size = MARKER_SIZE;
    let top = in_rect(local, DVec2::new(0.0, -size), DVec2::new(size, 0.0));
    let left = in_rect(unskew_y(local), DVec2::new(-size, -size), DVec2::ZERO);
    let right = in_rect(unskew_x(local), DVec2::ZERO, DVec2::new(size, size));
    if top || left || right {
        return true;
    }
    elevation != 0.0
        && stem_segments(elevation)
            .iter()
            .any(|&(a, b)| distance_to_segment(local, a, b) <= STEM_HALF_WIDTH)
}

/// Whether a marker-local point lies on the elevation handle
pub fn handle_contains(local: DVec2) -> bool {
    local.distance(HANDLE_CENTER) <= HANDLE_RADIUS
}

/// Resolve what a point of the world plane lands on.
///
/// Later devices are drawn over earlier ones, so they are tested first.
/// The handle only exists on the selected device's marker.
pub fn hit_test(devices: &[Device], selected: Option<MacAddress>, point: DVec2) -> PointerTarget {
    if !point.is_finite() {
        return PointerTarget::Background;
    }
    for device in devices.iter().rev() {
        let local = point - marker_anchor(&device.position);
        if selected == Some(device.mac) && handle_contains(local) {
            return PointerTarget::ElevationHandle;
        }
        if marker_contains(local, device.position.y) {
            return PointerTarget::Marker(device.mac);
        }
    }
    PointerTarget::Background
}

/// Layout of every marker, in drawing order
pub fn layout(devices: &[Device], selected: Option<MacAddress>) -> Vec<MarkerLayout> {
    devices
        .iter()
        .map(|device| MarkerLayout {
            mac: device.mac,
            anchor: marker_anchor(&device.position),
            selected: selected == Some(device.mac),
            stem_length: (device.position.y != 0.0).then(|| MARKER_SIZE + device.position.y),
        })
        .collect()
}
