//! Neighbor ranging between devices
//!
//! Computes the distance, azimuth and elevation at which one device sees
//! another, taking the observer's orientation into account. Hosts use it
//! to fill `Device::neighbors`; the interaction engine never calls it.

use glam::{DQuat, DVec3, EulerRot};

use crate::device::{Device, Neighbor, Orientation};

/// Rotation taking world directions into the observer's frame.
///
/// Z-X-Y Euler order with roll fixed at zero: tilt about X, bearing about Y.
fn observer_rotation(orientation: &Orientation) -> DQuat {
    DQuat::from_euler(
        EulerRot::ZXY,
        0.0,
        orientation.tilt.to_radians(),
        orientation.bearing.to_radians(),
    )
}

/// Azimuth of a direction in degrees, 0 along +Z, positive toward +X
fn azimuth(direction: DVec3) -> f64 {
    direction.x.atan2(direction.z).to_degrees()
}

/// Elevation of a direction above the XZ plane, in degrees
fn elevation(direction: DVec3) -> f64 {
    let horizontal = (direction.x * direction.x + direction.z * direction.z).sqrt();
    direction.y.atan2(horizontal).to_degrees()
}

/// Range and angles of `to` as seen from `from`.
///
/// Angles are rounded to whole degrees and stay within [-180, 180] and
/// [-90, 90]. Coincident devices report a zero distance and zero angles.
pub fn measure(from: &Device, to: &Device) -> Neighbor {
    let delta = to.position.to_dvec3() - from.position.to_dvec3();
    let direction = observer_rotation(&from.orientation) * delta;

    let (bearing, tilt) = if direction.is_finite() && direction.length_squared() > 0.0 {
        (
            azimuth(direction).round().clamp(-180.0, 180.0),
            elevation(direction).round().clamp(-90.0, 90.0),
        )
    } else {
        (0.0, 0.0)
    };

    Neighbor {
        mac: to.mac,
        distance: delta.length(),
        bearing,
        tilt,
    }
}

/// Rebuild every device's neighbor list from current positions.
///
/// Each device gets one measurement per other device, in list order.
pub fn refresh_neighbors(devices: &mut [Device]) {
    let snapshot: Vec<Device> = devices.to_vec();
    for device in devices.iter_mut() {
        device.neighbors = snapshot
            .iter()
            .filter(|other| other.mac != device.mac)
            .map(|other| measure(device, other))
            .collect();
    }
    tracing::debug!(devices = devices.len(), "Neighbor measurements refreshed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Vector3;

    fn at(x: f64, y: f64, z: f64) -> Device {
        Device::new(2, Vector3::new(x, y, z))
    }

    fn facing(bearing: f64, tilt: f64) -> Device {
        Device::new(1, Vector3::ZERO).with_orientation(Orientation::new(bearing, tilt))
    }

    #[test]
    fn test_range() {
        let origin = facing(0.0, 0.0);
        assert_eq!(measure(&origin, &at(10.0, 0.0, 0.0)).distance, 10.0);
        assert_eq!(measure(&origin, &at(-10.0, 0.0, 0.0)).distance, 10.0);
        let n = measure(&origin, &at(10.0, 10.0, 0.0));
        assert!((n.distance - 200f64.sqrt()).abs() < 1e-9);
        let n = measure(&origin, &at(-10.0, -10.0, -10.0));
        assert!((n.distance - 300f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_azimuth_without_rotation() {
        let origin = facing(0.0, 0.0);
        let cases = [
            ((10.0, 10.0), 45.0),
            ((-10.0, 10.0), -45.0),
            ((10.0, -10.0), 135.0),
            ((-10.0, -10.0), -135.0),
        ];
        for ((x, z), expected) in cases {
            let n = measure(&origin, &at(x, 0.0, z));
            assert_eq!(n.bearing, expected, "target ({x}, 0, {z})");
            assert_eq!(n.tilt, 0.0);
        }
    }

    #[test]
    fn test_elevation_without_rotation() {
        let origin = facing(0.0, 0.0);
        let n = measure(&origin, &at(0.0, 10.0, 10.0));
        assert_eq!((n.bearing, n.tilt), (0.0, 45.0));
        let n = measure(&origin, &at(0.0, -10.0, 10.0));
        assert_eq!((n.bearing, n.tilt), (0.0, -45.0));
        let n = measure(&origin, &at(0.0, 10.0, -10.0));
        assert_eq!(n.bearing.abs(), 180.0);
        assert_eq!(n.tilt, 45.0);
    }

    #[test]
    fn test_rotation_only() {
        let target = at(0.0, 0.0, 10.0);
        let n = measure(&facing(45.0, 0.0), &target);
        assert_eq!((n.bearing, n.tilt), (45.0, 0.0));
        let n = measure(&facing(0.0, 45.0), &target);
        assert_eq!((n.bearing, n.tilt), (0.0, -45.0));
    }

    #[test]
    fn test_rotation_complex_position() {
        let target = at(10.0, 10.0, 10.0);
        let n = measure(&facing(0.0, 0.0), &target);
        assert_eq!((n.bearing, n.tilt), (45.0, 35.0));
        let n = measure(&facing(90.0, 0.0), &target);
        assert_eq!((n.bearing, n.tilt), (135.0, 35.0));
        let n = measure(&facing(0.0, 90.0), &target);
        assert_eq!((n.bearing, n.tilt), (45.0, -35.0));
    }

    #[test]
    fn test_coincident_devices() {
        let n = measure(&facing(30.0, 10.0), &at(0.0, 0.0, 0.0));
        assert_eq!((n.distance, n.bearing, n.tilt), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_refresh_neighbors() {
        let mut devices = vec![
            Device::new(1, Vector3::ZERO),
            Device::new(2, Vector3::new(0.0, 0.0, 100.0)),
            Device::new(3, Vector3::new(100.0, 0.0, 0.0)),
        ];
        refresh_neighbors(&mut devices);

        let macs: Vec<u64> = devices[0].neighbors.iter().map(|n| n.mac.0).collect();
        assert_eq!(macs, vec![2, 3]);
        assert_eq!(devices[0].neighbors[1].bearing, 90.0);
        assert_eq!(devices[1].neighbors.len(), 2);
        assert_eq!(devices[2].neighbors[0].distance, 100.0);
    }
}
