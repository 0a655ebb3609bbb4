//! Camera and viewer abstractions
//!
//! Provides camera types for 3D rendering.

use glam::{Mat4, Vec2, Vec3};

/// Viewport information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// A viewport anchored at the origin.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Get the aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Convert a pointer position in physical pixels (origin top-left) to
    /// normalized device coordinates in `[-1, 1]`, y up.
    ///
    /// Returns `None` when the pointer lies outside the viewport.
    pub fn to_ndc(&self, pointer: (f32, f32)) -> Option<Vec2> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let px = pointer.0 - self.x as f32;
        let py = pointer.1 - self.y as f32;
        let (w, h) = (self.width as f32, self.height as f32);
        if !(0.0..w).contains(&px) || !(0.0..h).contains(&py) {
            return None;
        }
        Some(Vec2::new(px / w * 2.0 - 1.0, -(py / h) * 2.0 + 1.0))
    }
}

/// Projection mode for a camera.
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov: f32,
        /// Aspect ratio (width / height).
        aspect: f32,
        /// Near clipping plane.
        near: f32,
        /// Far clipping plane.
        far: f32,
    },
    /// Orthographic projection.
    Orthographic {
        /// Width of the view.
        width: f32,
        /// Height of the view.
        height: f32,
        /// Near clipping plane.
        near: f32,
        /// Far clipping plane.
        far: f32,
    },
}

impl Projection {
    /// Create a perspective projection.
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::Perspective {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Get the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov, aspect, near, far),
            Projection::Orthographic {
                width,
                height,
                near,
                far,
            } => Mat4::orthographic_rh(
                -width / 2.0,
                width / 2.0,
                -height / 2.0,
                height / 2.0,
                near,
                far,
            ),
        }
    }

    /// Update the aspect ratio.
    ///
    /// Orthographic projections keep their height and derive the width.
    pub fn set_aspect(&mut self, new_aspect: f32) {
        match self {
            Projection::Perspective { aspect, .. } => *aspect = new_aspect,
            Projection::Orthographic { width, height, .. } => *width = *height * new_aspect,
        }
    }

    /// Current aspect ratio.
    pub fn aspect(&self) -> f32 {
        match *self {
            Projection::Perspective { aspect, .. } => aspect,
            Projection::Orthographic { width, height, .. } => width / height,
        }
    }
}

/// Trait for objects that can view a scene.
pub trait Viewer {
    /// Get the camera position.
    fn position(&self) -> Vec3;

    /// Get the view matrix.
    fn view_matrix(&self) -> Mat4;

    /// Get the projection matrix.
    fn projection_matrix(&self) -> Mat4;

    /// Get the combined view-projection matrix.
    fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get the viewport.
    fn viewport(&self) -> Viewport;
}

/// A 3D camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Projection mode.
    pub projection: Projection,
    viewport: Viewport,
}

impl Camera {
    /// Create a new perspective camera.
    pub fn new_perspective(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            projection: Projection::perspective(fov_degrees, aspect, near, far),
            viewport: Viewport::new(1, 1),
        }
    }

    /// Create a new orthographic camera.
    pub fn new_orthographic(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            projection: Projection::Orthographic {
                width,
                height,
                near,
                far,
            },
            viewport: Viewport::new(1, 1),
        }
    }

    /// Set the viewport and update aspect ratio.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.projection.set_aspect(viewport.aspect());
    }

    /// Current projection aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.projection.aspect()
    }

    /// Get the forward direction (from camera to target).
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Get the right direction.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Map a point in normalized device coordinates (wgpu depth range
    /// `[0, 1]`) back to world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection_matrix().inverse().project_point3(ndc)
    }
}

impl Viewer for Camera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// View matrix, used for view-space fog depth.
    pub view: [[f32; 4]; 4],
    /// Camera eye position (w component unused).
    pub eye: [f32; 4],
}

impl CameraUniform {
    /// Create a new camera uniform from a viewer.
    pub fn from_viewer(viewer: &dyn Viewer) -> Self {
        let vp = viewer.view_projection_matrix();
        let pos = viewer.position();
        Self {
            view_proj: vp.to_cols_array_2d(),
            view: viewer.view_matrix().to_cols_array_2d(),
            eye: [pos.x, pos.y, pos.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new_perspective(
            Vec3::new(0.0, 40.0, 60.0),
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::Y,
            75.0,
            16.0 / 9.0,
            0.1,
            200.0,
        )
    }

    #[test]
    fn test_ndc_corners_and_center() {
        let viewport = Viewport::new(800, 600);
        let center = viewport.to_ndc((400.0, 300.0)).unwrap();
        assert!(center.length() < 1e-6);
        let top_left = viewport.to_ndc((0.0, 0.0)).unwrap();
        assert_eq!(top_left, Vec2::new(-1.0, 1.0));
        let lower = viewport.to_ndc((600.0, 450.0)).unwrap();
        assert!((lower.x - 0.5).abs() < 1e-6);
        assert!((lower.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ndc_outside_viewport_is_none() {
        let viewport = Viewport::new(800, 600);
        assert!(viewport.to_ndc((800.0, 10.0)).is_none());
        assert!(viewport.to_ndc((-1.0, 10.0)).is_none());
        assert!(viewport.to_ndc((10.0, 600.5)).is_none());
        assert!(Viewport::new(0, 0).to_ndc((0.0, 0.0)).is_none());
    }

    #[test]
    fn test_set_viewport_updates_aspect() {
        let mut camera = camera();
        camera.set_viewport(Viewport::new(1000, 500));
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
        assert_eq!(camera.viewport().width, 1000);
    }

    #[test]
    fn test_unproject_center_lies_on_view_axis() {
        let camera = camera();
        let point = camera.unproject(Vec3::new(0.0, 0.0, 0.5));
        let direction = (point - camera.position).normalize();
        assert!(direction.dot(camera.forward()) > 0.9999);
    }

    #[test]
    fn test_unproject_inverts_projection() {
        let camera = camera();
        let world = Vec3::new(-20.0, 5.0, -10.0);
        let ndc = camera.view_projection_matrix().project_point3(world);
        let back = camera.unproject(ndc);
        assert!((back - world).length() < 0.1);
    }
}
