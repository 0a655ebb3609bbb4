//! Resize handling
//!
//! A resize notification updates the camera projection and every
//! [`Resizable`] surface together, before the next frame renders.

use crate::renderer::viewer::{Camera, Viewport};

/// A drawing surface whose size follows the window.
pub trait Resizable {
    fn resize(&mut self, width: u32, height: u32);

    /// Current size in physical pixels.
    fn size(&self) -> (u32, u32);
}

/// Outcome of a handled resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionUpdated {
    pub width: u32,
    pub height: u32,
    pub aspect: f32,
}

/// Tracks the drawable size and propagates changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportService {
    viewport: Viewport,
}

impl ViewportService {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Apply a new window size. Zero-sized notifications are ignored and
    /// return `None`.
    pub fn handle_resize(
        &mut self,
        size: (u32, u32),
        camera: &mut Camera,
        surfaces: &mut [&mut dyn Resizable],
    ) -> Option<ProjectionUpdated> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring zero-sized resize");
            return None;
        }

        self.viewport = Viewport::new(width, height);
        camera.set_viewport(self.viewport);
        for surface in surfaces.iter_mut() {
            surface.resize(width, height);
        }

        let aspect = camera.aspect();
        tracing::debug!(width, height, aspect, "viewport resized");
        Some(ProjectionUpdated {
            width,
            height,
            aspect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[derive(Default)]
    struct FakeSurface {
        size: (u32, u32),
        resizes: usize,
    }

    impl Resizable for FakeSurface {
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.resizes += 1;
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }
    }

    fn camera() -> Camera {
        Camera::new_perspective(
            Vec3::new(0.0, 40.0, 60.0),
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::Y,
            75.0,
            1.0,
            0.1,
            200.0,
        )
    }

    #[test]
    fn test_resize_updates_camera_and_surfaces() {
        let mut service = ViewportService::new(800, 600);
        let mut camera = camera();
        let mut window = FakeSurface::default();
        let mut composer = FakeSurface::default();

        let update = service
            .handle_resize((1920, 1080), &mut camera, &mut [&mut window, &mut composer])
            .unwrap();

        assert!((update.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert!((camera.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(window.size(), (1920, 1080));
        assert_eq!(composer.size(), (1920, 1080));
        assert_eq!(service.viewport(), Viewport::new(1920, 1080));
    }

    #[test]
    fn test_zero_size_is_ignored() {
        let mut service = ViewportService::new(800, 600);
        let mut camera = camera();
        let mut surface = FakeSurface::default();

        assert!(service
            .handle_resize((0, 600), &mut camera, &mut [&mut surface])
            .is_none());
        assert_eq!(surface.resizes, 0);
        assert_eq!(service.viewport(), Viewport::new(800, 600));
        assert!((camera.aspect() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_every_notification_is_applied() {
        let mut service = ViewportService::new(800, 600);
        let mut camera = camera();
        let mut surface = FakeSurface::default();
        for size in [(640, 480), (641, 480), (1000, 500)] {
            service.handle_resize(size, &mut camera, &mut [&mut surface]);
        }
        assert_eq!(surface.resizes, 3);
        assert_eq!(surface.size(), (1000, 500));
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
    }
}
