//! Perspective camera for viewing the projected tesseract.

use glam::{Mat4, Vec3};

/// Fixed camera looking at the origin from the +z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Width over height of the output surface.
    pub aspect: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// World position of the eye.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
}

impl PerspectiveCamera {
    /// Create a camera with default positioning for the given aspect ratio.
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y_degrees: 75.0,
            aspect,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 4.0),
            target: Vec3::ZERO,
        }
    }

    /// Camera whose aspect matches a `width` x `height` surface.
    pub fn for_size(width: u32, height: u32) -> Self {
        let mut camera = Self::new(1.0);
        camera.resize(width, height);
        camera
    }

    /// Track a new output size. A zero height leaves the aspect unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined projection * view.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
