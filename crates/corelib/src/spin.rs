//! Per-frame rotation state for the spinning model.

use crate::Mat4;

/// Angle window below 360.0 in which the next step wraps to 0.0.
const WRAP_EPSILON: f32 = 0.01;

/// Rotation angle in degrees, advanced once per displayed frame.
///
/// The angle wraps to 0.0 when it lands within [`WRAP_EPSILON`] of 360.0,
/// so it never reaches or exceeds a full turn.
#[derive(Clone, Copy, Debug)]
pub struct RotationState {
    degrees: f32,
    step: f32,
}

impl RotationState {
    /// Per-frame increment matching the original demo cadence.
    pub const DEFAULT_STEP: f32 = 0.01;

    pub fn new(step: f32) -> Self {
        Self { degrees: 0.0, step }
    }

    pub fn angle(&self) -> f32 {
        self.degrees
    }

    /// Advance by one frame step, wrapping at the full-turn boundary.
    /// Angles in `[360.0 - WRAP_EPSILON, 360.0)` reset to 0.0 instead of
    /// advancing past a full turn.
    pub fn advance(&mut self) {
        if self.degrees >= 360.0 - WRAP_EPSILON {
            self.degrees = 0.0;
        } else {
            self.degrees += self.step;
        }
    }

    /// Column-major in-plane rotation matrix for the current angle.
    pub fn matrix(&self) -> Mat4 {
        let rad = self.degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        Mat4::from_cols_array(&[
            cos, -sin, 0.0, 0.0, //
            sin, cos, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP)
    }
}
