//! Showcase configuration

use glam::Vec3;

use crate::effect::{OutlineSettings, ToneMapping};
use crate::renderer::control::OrbitControl;
use crate::renderer::viewer::Camera;
use crate::scene::SceneLayout;
use crate::window::WindowSettings;

/// Initial camera placement and lens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 40.0, 60.0),
            target: Vec3::new(0.0, 5.0, 0.0),
            fov_degrees: 75.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl CameraSettings {
    pub fn build(&self, aspect: f32) -> Camera {
        Camera::new_perspective(
            self.position,
            self.target,
            Vec3::Y,
            self.fov_degrees,
            aspect,
            self.near,
            self.far,
        )
    }
}

/// Orbit behaviour around the camera target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSettings {
    /// `None` disables damping.
    pub damping_factor: Option<f32>,
    /// `None` disables auto-rotation.
    pub auto_rotate_speed: Option<f32>,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            damping_factor: Some(0.05),
            auto_rotate_speed: Some(2.0),
        }
    }
}

impl ControlSettings {
    pub fn build(&self, target: Vec3) -> OrbitControl {
        let mut control = OrbitControl::new(target);
        if let Some(factor) = self.damping_factor {
            control = control.with_damping(factor);
        }
        if let Some(speed) = self.auto_rotate_speed {
            control = control.with_auto_rotate(speed);
        }
        control
    }
}

/// Display mapping of the post-processing chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererSettings {
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    /// Run FXAA as the last pass.
    pub antialias: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 2.0,
            antialias: true,
        }
    }
}

/// Everything the showcase is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseSettings {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub control: ControlSettings,
    pub renderer: RendererSettings,
    pub outline: OutlineSettings,
    /// Scene content, background and fog.
    pub layout: SceneLayout,
    /// Largest pointer travel in pixels between press and release that
    /// still counts as a click. Longer moves are orbit drags and do not
    /// pick. `f32::INFINITY` makes every release re-pick, drags included.
    pub click_threshold: f32,
}

impl Default for ShowcaseSettings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            control: ControlSettings::default(),
            renderer: RendererSettings::default(),
            outline: OutlineSettings::default(),
            layout: SceneLayout::showcase(),
            click_threshold: 5.0,
        }
    }
}

impl ShowcaseSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(mut self, window: WindowSettings) -> Self {
        self.window = window;
        self
    }

    pub fn renderer(mut self, renderer: RendererSettings) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn outline(mut self, outline: OutlineSettings) -> Self {
        self.outline = outline;
        self
    }

    pub fn click_threshold(mut self, pixels: f32) -> Self {
        self.click_threshold = pixels;
        self
    }

    pub fn control(mut self, control: ControlSettings) -> Self {
        self.control = control;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::viewer::Viewer;

    #[test]
    fn test_camera_defaults() {
        let camera = CameraSettings::default().build(16.0 / 9.0);
        assert_eq!(camera.position(), Vec3::new(0.0, 40.0, 60.0));
        assert_eq!(camera.target, Vec3::new(0.0, 5.0, 0.0));
        assert!((camera.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_control_defaults_damped_and_rotating() {
        let control = ControlSettings::default().build(Vec3::new(0.0, 5.0, 0.0));
        assert!(control.enable_damping);
        assert_eq!(control.damping_factor, 0.05);
        assert!(control.auto_rotate);
        assert_eq!(control.auto_rotate_speed, 2.0);

        let still = ControlSettings {
            damping_factor: None,
            auto_rotate_speed: None,
        }
        .build(Vec3::ZERO);
        assert!(!still.enable_damping && !still.auto_rotate);
    }

    #[test]
    fn test_renderer_defaults() {
        let settings = ShowcaseSettings::default();
        assert_eq!(settings.renderer.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(settings.renderer.exposure, 2.0);
        assert!(settings.renderer.antialias);
        assert_eq!(settings.click_threshold, 5.0);
    }
}
