//! Orbit camera for the sequence viewer

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// nalgebra produces OpenGL clip space (z in [-1, 1]); wgpu expects [0, 1]
#[rustfmt::skip]
pub fn opengl_to_wgpu_matrix() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

const MIN_DISTANCE: f32 = 1e-4;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// World axis that points up on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpAxis {
    Y,
    Z,
}

impl UpAxis {
    pub fn vector(self) -> Vector3<f32> {
        match self {
            UpAxis::Y => Vector3::y(),
            UpAxis::Z => Vector3::z(),
        }
    }

    /// Unit offset from the target for the given yaw and pitch
    fn orbit_direction(self, yaw: f32, pitch: f32) -> Vector3<f32> {
        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        match self {
            UpAxis::Z => Vector3::new(cp * cy, cp * sy, sp),
            UpAxis::Y => Vector3::new(cp * sy, sp, cp * cy),
        }
    }
}

/// Orbit state kept so `reset` can return to it
#[derive(Debug, Clone, Copy, PartialEq)]
struct Home {
    target: Point3<f32>,
    distance: f32,
    yaw: f32,
    pitch: f32,
}

/// A camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Point3<f32>,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub up: UpAxis,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    home: Home,
}

impl Camera {
    /// Create a new camera
    pub fn new(target: Point3<f32>, distance: f32, up: UpAxis, fov: f32, aspect_ratio: f32) -> Self {
        let yaw = -std::f32::consts::FRAC_PI_2;
        let pitch = 0.35;
        Self {
            target,
            distance,
            yaw,
            pitch,
            up,
            fov,
            aspect_ratio,
            near: distance * 0.01,
            far: distance * 100.0,
            home: Home { target, distance, yaw, pitch },
        }
    }

    /// Eye position
    pub fn position(&self) -> Point3<f32> {
        self.target + self.up.orbit_direction(self.yaw, self.pitch) * self.distance
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.up.vector())
    }

    /// Get the projection matrix in wgpu clip space
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        opengl_to_wgpu_matrix() * perspective.into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Rotate around the target; angles in radians
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        self.yaw -= horizontal;
        self.pitch = (self.pitch + vertical).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move the target in the view plane, in units of the orbit distance
    pub fn pan(&mut self, horizontal: f32, vertical: f32) {
        let forward = (self.target - self.position()).normalize();
        let right = forward.cross(&self.up.vector()).normalize();
        let up = right.cross(&forward);
        self.target += (-right * horizontal + up * vertical) * self.distance;
    }

    /// Positive values move closer
    pub fn zoom(&mut self, amount: f32) {
        let factor = (1.0 - amount).clamp(0.1, 10.0);
        self.distance = (self.distance * factor).max(MIN_DISTANCE);
    }

    /// Frame the box `[min, max]` and make the result the reset position
    pub fn fit(&mut self, min: Point3<f32>, max: Point3<f32>) {
        let radius = ((max - min).norm() * 0.5).max(MIN_DISTANCE);
        self.target = nalgebra::center(&min, &max);
        self.distance = radius / (self.fov * 0.5).sin() * 1.1;
        self.near = self.distance * 0.01;
        self.far = self.distance + radius * 10.0;
        self.home = Home {
            target: self.target,
            distance: self.distance,
            yaw: self.yaw,
            pitch: self.pitch,
        };
    }

    /// Return to the last fitted position
    pub fn reset(&mut self) {
        self.target = self.home.target;
        self.distance = self.home.distance;
        self.yaw = self.home.yaw;
        self.pitch = self.home.pitch;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::origin(),
            5.0,
            UpAxis::Z,
            std::f32::consts::FRAC_PI_4,
            1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_z_up_orbit_direction() {
        let mut camera = Camera::default();
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        assert_relative_eq!(camera.position(), Point3::new(5.0, 0.0, 0.0), epsilon = 1e-5);

        camera.pitch = 1.0;
        assert!(camera.position().z > 0.0);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.orbit(0.0, -20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = Camera::default();
        camera.fit(Point3::new(-1.0, 2.0, 0.0), Point3::new(3.0, 4.0, 2.0));
        let clip = camera.view_projection() * camera.target.to_homogeneous();
        let ndc = clip / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_zoom_and_reset() {
        let mut camera = Camera::default();
        camera.fit(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let fitted = camera.distance;

        camera.zoom(0.5);
        assert_relative_eq!(camera.distance, fitted * 0.5, epsilon = 1e-5);
        camera.pan(0.1, 0.0);
        camera.orbit(0.3, 0.2);

        camera.reset();
        assert_relative_eq!(camera.distance, fitted, epsilon = 1e-6);
        assert_relative_eq!(camera.target, Point3::new(0.5, 0.5, 0.5), epsilon = 1e-6);
    }

    #[test]
    fn test_y_up() {
        let mut camera = Camera::new(Point3::origin(), 2.0, UpAxis::Y, 0.8, 1.0);
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        assert_relative_eq!(camera.position(), Point3::new(0.0, 0.0, 2.0), epsilon = 1e-5);
    }
}
