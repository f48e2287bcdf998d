//! Perspective orbit camera and damped orbit controls.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat4, Vec3};

/// Perspective camera orbiting a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Horizontal angle in radians, measured from +Z toward +X.
    pub yaw: f32,
    /// Elevation above the XZ plane in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Field of view, clip planes and start position of the galaxy view.
    pub const DEFAULT_FOV_Y: f32 = 75.0;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 100.0;
    pub const DEFAULT_POSITION: Vec3 = Vec3::new(1.5, 10.0, 7.0);

    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            target: Vec3::ZERO,
            fov_y: Self::DEFAULT_FOV_Y,
            aspect,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
        };
        camera.look_from(Self::DEFAULT_POSITION);
        camera
    }

    /// Place the camera at `position`, keeping the current target.
    pub fn look_from(&mut self, position: Vec3) {
        let offset = position - self.target;
        self.distance = offset.length().max(f32::EPSILON);
        self.pitch = (offset.y / self.distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

/// Pointer-driven orbit controls with inertia.
///
/// Input adds to pending deltas; [`OrbitControls::update`] applies a
/// fraction of them each frame and decays the rest, so motion eases out
/// after the pointer stops.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub damping: Option<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    yaw_delta: f32,
    pitch_delta: f32,
    zoom_scale: f32,
}

impl OrbitControls {
    /// Residual motion below this is dropped.
    const REST_EPSILON: f32 = 1e-6;
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 1e-3;

    pub fn new() -> Self {
        Self {
            damping: Some(0.05),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 80.0,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            zoom_scale: 1.0,
        }
    }

    pub fn with_damping(mut self, damping: Option<f32>) -> Self {
        self.damping = damping.map(|d| d.clamp(f32::EPSILON, 1.0));
        self
    }

    /// Pointer drag by `(dx, dy)` pixels on a viewport `height` pixels tall.
    /// A drag across the full height turns the camera once around.
    pub fn rotate(&mut self, dx: f32, dy: f32, height: f32) {
        let height = height.max(1.0);
        self.yaw_delta -= TAU * dx / height * self.rotate_speed;
        self.pitch_delta += TAU * dy / height * self.rotate_speed;
    }

    /// Wheel movement; positive values move toward the target.
    pub fn zoom(&mut self, scroll: f32) {
        self.zoom_scale *= 0.95_f32.powf(scroll * self.zoom_speed);
    }

    /// Apply pending motion to `camera`. Returns `true` while moving.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let factor = self.damping.unwrap_or(1.0);

        camera.yaw = (camera.yaw + self.yaw_delta * factor).rem_euclid(TAU);
        camera.pitch =
            (camera.pitch + self.pitch_delta * factor).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        camera.distance =
            (camera.distance * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.zoom_scale = 1.0;

        if self.damping.is_some() {
            self.yaw_delta *= 1.0 - factor;
            self.pitch_delta *= 1.0 - factor;
        } else {
            self.yaw_delta = 0.0;
            self.pitch_delta = 0.0;
        }
        if self.yaw_delta.abs() < Self::REST_EPSILON {
            self.yaw_delta = 0.0;
        }
        if self.pitch_delta.abs() < Self::REST_EPSILON {
            self.pitch_delta = 0.0;
        }

        self.is_moving()
    }

    pub fn is_moving(&self) -> bool {
        self.yaw_delta != 0.0 || self.pitch_delta != 0.0
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let camera = Camera::new(1.0);
        let p = camera.position();
        assert!((p - Camera::DEFAULT_POSITION).length() < 1e-4, "{:?}", p);
    }

    #[test]
    fn test_projection_uses_aspect() {
        let mut camera = Camera::new(1.0);
        camera.set_aspect(2.0);
        let proj = camera.projection_matrix();
        // x scale is y scale divided by aspect
        assert!((proj.x_axis.x * 2.0 - proj.y_axis.y).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_aspect_ignored() {
        let mut camera = Camera::new(1.5);
        camera.set_aspect(f32::NAN);
        camera.set_aspect(0.0);
        assert_eq!(camera.aspect, 1.5);
    }

    #[test]
    fn test_damping_spreads_motion_over_frames() {
        let mut camera = Camera::new(1.0);
        let mut controls = OrbitControls::new();
        let start_yaw = camera.yaw;

        controls.rotate(100.0, 0.0, 600.0);
        controls.update(&mut camera);
        let first_step = (camera.yaw - start_yaw).abs();
        assert!(controls.is_moving());

        let mut frames = 0;
        while controls.update(&mut camera) {
            frames += 1;
            assert!(frames < 10_000);
        }
        assert!(frames > 10);
        let total = TAU * 100.0 / 600.0;
        let moved = (start_yaw - camera.yaw).rem_euclid(TAU);
        assert!((moved - total).abs() < 1e-2, "moved {} expected {}", moved, total);
        assert!(first_step < total * 0.1);
    }

    #[test]
    fn test_undamped_applies_immediately() {
        let mut camera = Camera::new(1.0);
        let mut controls = OrbitControls::new().with_damping(None);
        let pitch = camera.pitch;
        controls.rotate(0.0, -30.0, 600.0);
        assert!(!controls.update(&mut camera));
        assert!((camera.pitch - (pitch - TAU * 30.0 / 600.0)).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new(1.0);
        let mut controls = OrbitControls::new().with_damping(None);
        controls.rotate(0.0, 10_000.0, 100.0);
        controls.update(&mut camera);
        assert!(camera.pitch < FRAC_PI_2);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = Camera::new(1.0);
        let mut controls = OrbitControls::new();
        let before = camera.distance;
        controls.zoom(1.0);
        controls.update(&mut camera);
        assert!(camera.distance < before);

        controls.zoom(1000.0);
        controls.update(&mut camera);
        assert_eq!(camera.distance, controls.min_distance);
    }
}
