//! Fixed isometric projection between the world plane and the screen
//!
//! The projection is the composition `Rx(atan √2) · Rz(-45°) · S(0.7)`,
//! applied in that order to an identity matrix. Its 2D affine part is
//! what renderers use as the `matrix(a b c d e f)` transform of the map
//! surface; the inverse of that affine interprets pointer positions.

use std::sync::LazyLock;

use glam::{DAffine2, DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Rotation about the world Z axis, in degrees
pub const Z_ROTATION_DEGREES: f64 = -45.0;

/// Uniform scale applied after both rotations
pub const SCALE: f64 = 0.7;

/// Rotation about the world X axis giving the isometric tilt (≈54.736°)
pub fn isometric_tilt_degrees() -> f64 {
    std::f64::consts::SQRT_2.atan().to_degrees()
}

/// Process-wide projection, computed on first use and never modified
pub static PROJECTION: LazyLock<Projection> = LazyLock::new(Projection::isometric);

/// Build the isometric projection
pub fn build_projection() -> Projection {
    Projection::isometric()
}

/// The six coefficients of a 2D affine transform
///
/// A point maps as `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl ProjectionMatrix {
    pub fn to_affine(self) -> DAffine2 {
        DAffine2::from_cols_array(&[self.a, self.b, self.c, self.d, self.e, self.f])
    }

    pub fn from_affine(affine: DAffine2) -> Self {
        let [a, b, c, d, e, f] = affine.to_cols_array();
        Self { a, b, c, d, e, f }
    }

    /// SVG `transform` attribute value
    pub fn svg_transform(&self) -> String {
        format!(
            "matrix({} {} {} {} {} {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

/// Immutable isometric projection with its precomputed inverse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    matrix: DMat4,
    forward: DAffine2,
    inverse: DAffine2,
}

impl Projection {
    /// Compose the fixed rotate-rotate-scale sequence
    pub fn isometric() -> Self {
        let matrix = DMat4::IDENTITY
            * DMat4::from_rotation_x(isometric_tilt_degrees().to_radians())
            * DMat4::from_rotation_z(Z_ROTATION_DEGREES.to_radians())
            * DMat4::from_scale(DVec3::splat(SCALE));
        Self::from_matrix(matrix)
    }

    fn from_matrix(matrix: DMat4) -> Self {
        let forward = DAffine2::from_cols_array(&[
            matrix.x_axis.x,
            matrix.x_axis.y,
            matrix.y_axis.x,
            matrix.y_axis.y,
            matrix.w_axis.x,
            matrix.w_axis.y,
        ]);
        Self {
            matrix,
            forward,
            inverse: forward.inverse(),
        }
    }

    /// Full 3D matrix, for renderers applying the projection in 3D
    pub fn matrix(&self) -> DMat4 {
        self.matrix
    }

    /// Affine coefficients of the forward transform
    pub fn coefficients(&self) -> ProjectionMatrix {
        ProjectionMatrix::from_affine(self.forward)
    }

    /// Affine coefficients of the inverse transform
    pub fn inverse_coefficients(&self) -> ProjectionMatrix {
        ProjectionMatrix::from_affine(self.inverse)
    }

    pub fn forward(&self) -> DAffine2 {
        self.forward
    }

    pub fn inverse(&self) -> DAffine2 {
        self.inverse
    }

    /// Map a point of the world plane to screen space
    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        self.forward.transform_point2(world)
    }

    /// Map a screen point back onto the world plane
    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> DVec2 {
        self.inverse.transform_point2(DVec2::new(screen_x, screen_y))
    }

    /// CSS `matrix3d(...)` value, column-major like the CSS function
    pub fn css_matrix3d(&self) -> String {
        let values: Vec<String> = self
            .matrix
            .to_cols_array()
            .iter()
            .map(|v| v.to_string())
            .collect();
        format!("matrix3d({})", values.join(", "))
    }
}

impl Default for Projection {
    fn default() -> Self {
        *PROJECTION
    }
}

/// Side length of the square world plane shown by the map surface
pub const VIEW_EXTENT: f64 = 1200.0;

/// Placement of the projected map surface in host screen space
///
/// The surface is scaled uniformly to fit its box and projected about
/// the box center, so `screen = center + scale · A(world)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: DVec2,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport {
    /// Screen space equal to projected world space
    pub const fn identity() -> Self {
        Self {
            center: DVec2::ZERO,
            scale: 1.0,
        }
    }

    /// Fit the world plane into a host box, keeping its aspect ratio
    pub fn fit(left: f64, top: f64, width: f64, height: f64) -> Self {
        let scale = width.min(height) / VIEW_EXTENT;
        let center = DVec2::new(left + width / 2.0, top + height / 2.0);
        if !(scale.is_finite() && scale > 0.0 && center.is_finite()) {
            tracing::warn!(width, height, "Degenerate viewport box, using identity");
            return Self::identity();
        }
        Self { center, scale }
    }

    pub fn world_to_screen(&self, projection: &Projection, world: DVec2) -> DVec2 {
        self.center + projection.world_to_screen(world) * self.scale
    }

    pub fn screen_to_world(&self, projection: &Projection, screen_x: f64, screen_y: f64) -> DVec2 {
        let local = (DVec2::new(screen_x, screen_y) - self.center) / self.scale;
        projection.screen_to_world(local.x, local.y)
    }
}
