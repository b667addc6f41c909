//! Device records shared between the host and the interaction engine

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::dial::DialGeometry;

/// Half extent of the square world plane, in centimeters
pub const WORLD_HALF_EXTENT: f64 = 600.0;

/// Distance kept between a marker and the edge of the world plane
pub const WORLD_MARGIN: f64 = 40.0;

/// Largest absolute horizontal coordinate a device may take
pub const POSITION_LIMIT: f64 = WORLD_HALF_EXTENT - WORLD_MARGIN;

/// Unique identifier for a device, its UWB MAC address as an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(pub u64);

impl MacAddress {
    /// Whether the address fits the two byte short form
    pub fn is_short(&self) -> bool {
        self.0 <= u16::MAX as u64
    }
}

impl From<u64> for MacAddress {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.0.to_be_bytes();
        let bytes = if self.is_short() { &bytes[6..] } else { &bytes[..] };
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// World-space position in centimeters; `y` is the elevation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl From<DVec3> for Vector3 {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Heading of a device: bearing in [-180, 180] and tilt in [-90, 90] degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    #[serde(default)]
    pub bearing: f64,
    #[serde(default)]
    pub tilt: f64,
}

impl Orientation {
    pub const fn new(bearing: f64, tilt: f64) -> Self {
        Self { bearing, tilt }
    }

    /// Build an orientation the way the input controls do: each angle is
    /// clamped to its range and non-finite values fall back to zero.
    pub fn clamped(bearing: f64, tilt: f64) -> Self {
        let clamp = |angle: f64, limit: f64| {
            if angle.is_finite() {
                angle.clamp(-limit, limit)
            } else {
                0.0
            }
        };
        Self {
            bearing: clamp(bearing, 180.0),
            tilt: clamp(tilt, 90.0),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.bearing.is_finite() && self.tilt.is_finite()
    }

    /// Dial geometry drawing this orientation
    pub fn dial(&self) -> DialGeometry {
        DialGeometry::compute(self.bearing, self.tilt)
    }
}

/// Ranging measurement of one neighbor as seen from the owning device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub mac: MacAddress,
    /// Distance in centimeters
    pub distance: f64,
    /// Azimuth in degrees, [-180, 180]
    pub bearing: f64,
    /// Elevation angle in degrees, [-90, 90]
    pub tilt: f64,
}

impl Neighbor {
    /// Dial geometry for the neighbor's bearing and tilt
    pub fn dial(&self) -> DialGeometry {
        DialGeometry::compute(self.bearing, self.tilt)
    }
}

/// A device placed in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub mac: MacAddress,
    #[serde(default)]
    pub position: Vector3,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default, rename = "neighbor")]
    pub neighbors: Vec<Neighbor>,
}

impl Device {
    /// Create a device at `position` facing the reference direction
    pub fn new(mac: impl Into<MacAddress>, position: Vector3) -> Self {
        Self {
            mac: mac.into(),
            position,
            orientation: Orientation::default(),
            neighbors: Vec::new(),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Elevation above the ground plane
    pub fn elevation(&self) -> f64 {
        self.position.y
    }

    /// Whether the position satisfies the world bounds
    pub fn is_in_bounds(&self) -> bool {
        let p = self.position;
        p.is_finite()
            && p.x.abs() <= POSITION_LIMIT
            && p.z.abs() <= POSITION_LIMIT
            && p.y >= 0.0
    }

    pub fn dial(&self) -> DialGeometry {
        self.orientation.dial()
    }

    /// Look up the measurement to `mac`, if any
    pub fn neighbor(&self, mac: MacAddress) -> Option<&Neighbor> {
        self.neighbors.iter().find(|n| n.mac == mac)
    }
}

/// Clamp a horizontal coordinate into `[-POSITION_LIMIT, POSITION_LIMIT]`
pub fn clamp_horizontal(value: f64) -> f64 {
    value.clamp(-POSITION_LIMIT, POSITION_LIMIT)
}
