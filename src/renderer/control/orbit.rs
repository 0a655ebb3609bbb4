//! Orbit camera control
//!
//! Orbits the camera around a target point. Pointer input and
//! auto-rotation accumulate into pending spherical deltas which
//! [`OrbitControl::update`] applies once per frame, optionally damped.

use std::f32::consts::PI;

use glam::Vec3;

use crate::renderer::viewer::{Camera, Projection, Viewer};
use crate::window::event::{Event, MouseButton};

const EPS: f32 = 1e-6;

/// Camera offset from the target in spherical coordinates, y up.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y.
    phi: f32,
    /// Azimuth around +Y, measured from +Z toward +X.
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < EPS {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit camera control that rotates around a target point.
pub struct OrbitControl {
    /// The point to orbit around.
    pub target: Vec3,
    /// Minimum distance from target.
    pub min_distance: f32,
    /// Maximum distance from target.
    pub max_distance: f32,
    /// Lower bound of the polar angle, radians from +Y.
    pub min_polar_angle: f32,
    /// Upper bound of the polar angle, radians from +Y.
    pub max_polar_angle: f32,
    /// Apply only a fraction of the pending motion each update.
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update when damping.
    pub damping_factor: f32,
    /// Keep orbiting around the target while no button is held.
    pub auto_rotate: bool,
    /// Auto-rotation speed; 2.0 is one orbit every 30 seconds.
    pub auto_rotate_speed: f32,
    /// Rotation speed multiplier.
    pub rotate_speed: f32,
    /// Zoom speed multiplier.
    pub zoom_speed: f32,
    /// Pan speed multiplier.
    pub pan_speed: f32,

    // Pending motion
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,

    left_mouse_pressed: bool,
    right_mouse_pressed: bool,
    middle_mouse_pressed: bool,
}

impl OrbitControl {
    /// Create a new orbit control with the usual orbit defaults: no damping,
    /// no auto-rotation, unit speeds, unbounded distance.
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            enable_damping: false,
            damping_factor: 0.05,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            left_mouse_pressed: false,
            right_mouse_pressed: false,
            middle_mouse_pressed: false,
        }
    }

    /// Enable damping with the given factor.
    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = damping_factor;
        self
    }

    /// Enable auto-rotation with the given speed.
    pub fn with_auto_rotate(mut self, speed: f32) -> Self {
        self.auto_rotate = true;
        self.auto_rotate_speed = speed;
        self
    }

    /// Set the distance bounds.
    pub fn with_distance_range(mut self, min_distance: f32, max_distance: f32) -> Self {
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self
    }

    /// Whether a pointer button is currently held.
    pub fn is_dragging(&self) -> bool {
        self.left_mouse_pressed || self.right_mouse_pressed || self.middle_mouse_pressed
    }

    /// Handle events and queue the resulting camera motion.
    ///
    /// Drags and wheel events are marked handled; presses and releases are
    /// left for other consumers such as click picking.
    pub fn handle_events(&mut self, camera: &Camera, events: &mut [Event]) {
        for event in events.iter_mut() {
            if event.is_handled() {
                continue;
            }

            match event {
                Event::MousePress { button, .. } => match button {
                    MouseButton::Left => self.left_mouse_pressed = true,
                    MouseButton::Right => self.right_mouse_pressed = true,
                    MouseButton::Middle => self.middle_mouse_pressed = true,
                },
                Event::MouseRelease { button, .. } => match button {
                    MouseButton::Left => self.left_mouse_pressed = false,
                    MouseButton::Right => self.right_mouse_pressed = false,
                    MouseButton::Middle => self.middle_mouse_pressed = false,
                },
                Event::MouseMotion { delta, .. } => {
                    if self.left_mouse_pressed {
                        self.rotate(camera, delta.0, delta.1);
                        event.set_handled();
                    } else if self.right_mouse_pressed || self.middle_mouse_pressed {
                        self.pan(camera, delta.0, delta.1);
                        event.set_handled();
                    }
                }
                Event::MouseWheel { delta, .. } => {
                    self.zoom(delta.1);
                    event.set_handled();
                }
                Event::Resize { .. } => {}
            }
        }
    }

    /// Apply one step of pending motion and auto-rotation to the camera.
    ///
    /// Returns `true` if the camera moved noticeably.
    pub fn update(&mut self, camera: &mut Camera, delta_time: f32) -> bool {
        let previous_position = camera.position;
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        if self.auto_rotate && !self.is_dragging() {
            self.delta_theta -= self.auto_rotation_angle(delta_time);
        }

        let applied = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.delta_theta * applied;
        spherical.phi += self.delta_phi * applied;

        let min_phi = self.min_polar_angle.max(EPS);
        let max_phi = self.max_polar_angle.min(PI - EPS);
        spherical.phi = spherical.phi.clamp(min_phi, max_phi);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * applied;

        camera.position = self.target + spherical.to_offset();
        camera.target = self.target;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(previous_position) > EPS
    }

    fn auto_rotation_angle(&self, delta_time: f32) -> f32 {
        let step = if delta_time > 0.0 {
            delta_time
        } else {
            1.0 / 60.0
        };
        2.0 * PI / 60.0 * self.auto_rotate_speed * step
    }

    fn rotate(&mut self, camera: &Camera, dx: f32, dy: f32) {
        let height = camera.viewport().height.max(1) as f32;
        self.delta_theta -= 2.0 * PI * dx / height * self.rotate_speed;
        self.delta_phi -= 2.0 * PI * dy / height * self.rotate_speed;
    }

    fn zoom(&mut self, wheel: f32) {
        let zoom_scale = 0.95_f32.powf(self.zoom_speed);
        if wheel > 0.0 {
            self.scale *= zoom_scale;
        } else if wheel < 0.0 {
            self.scale /= zoom_scale;
        }
    }

    fn pan(&mut self, camera: &Camera, dx: f32, dy: f32) {
        let height = camera.viewport().height.max(1) as f32;
        let right = camera.right();
        let up = right.cross(camera.forward()).normalize();

        // World units covered by one screen height at the target distance.
        let extent = match camera.projection {
            Projection::Perspective { fov, .. } => {
                (camera.position - self.target).length() * (fov / 2.0).tan() * 2.0
            }
            Projection::Orthographic { height, .. } => height,
        };

        let pan_x = dx * self.pan_speed * extent / height;
        let pan_y = dy * self.pan_speed * extent / height;
        self.pan_offset += -right * pan_x + up * pan_y;
    }
}

impl Default for OrbitControl {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::viewer::Viewport;

    fn camera() -> Camera {
        let mut camera = Camera::new_perspective(
            Vec3::new(0.0, 40.0, 60.0),
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::Y,
            75.0,
            4.0 / 3.0,
            0.1,
            200.0,
        );
        camera.set_viewport(Viewport::new(800, 600));
        camera
    }

    fn theta_of(camera: &Camera, target: Vec3) -> f32 {
        let offset = camera.position - target;
        offset.x.atan2(offset.z)
    }

    fn drag(control: &mut OrbitControl, camera: &Camera, delta: (f32, f32)) {
        let mut events = vec![
            Event::MousePress {
                button: MouseButton::Left,
                position: (400.0, 300.0),
                handled: false,
            },
            Event::MouseMotion {
                delta,
                position: (400.0 + delta.0, 300.0 + delta.1),
                handled: false,
            },
            Event::MouseRelease {
                button: MouseButton::Left,
                position: (400.0 + delta.0, 300.0 + delta.1),
                handled: false,
            },
        ];
        control.handle_events(camera, &mut events);
        assert!(events[1].is_handled());
        assert!(!events[0].is_handled());
    }

    #[test]
    fn test_spherical_round_trip_matches_offset() {
        let offset = Vec3::new(3.0, -2.0, 5.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-4);
    }

    #[test]
    fn test_auto_rotate_keeps_distance() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut camera = camera();
        let mut control = OrbitControl::new(target).with_auto_rotate(2.0);
        let distance = camera.position.distance(target);

        for _ in 0..120 {
            control.update(&mut camera, 1.0 / 60.0);
        }

        assert!((camera.position.distance(target) - distance).abs() < 1e-3);
        // Two seconds at one orbit per thirty seconds.
        let expected = -2.0 * PI * 2.0 / 30.0;
        assert!((theta_of(&camera, target) - expected).abs() < 1e-3);
        assert_eq!(camera.target, target);
    }

    #[test]
    fn test_auto_rotate_without_delta_uses_fixed_step() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut camera = camera();
        let mut control = OrbitControl::new(target).with_auto_rotate(2.0);
        control.update(&mut camera, 0.0);
        let expected = -2.0 * PI / 60.0 / 60.0 * 2.0;
        assert!((theta_of(&camera, target) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_damped_rotation_converges_to_full_drag() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut camera = camera();
        let mut control = OrbitControl::new(target).with_damping(0.05);
        drag(&mut control, &camera, (100.0, 0.0));

        let mut previous = theta_of(&camera, target);
        let mut last_step = f32::INFINITY;
        for _ in 0..40 {
            control.update(&mut camera, 1.0 / 60.0);
            let theta = theta_of(&camera, target);
            let step = (theta - previous).abs();
            assert!(step < last_step);
            last_step = step;
            previous = theta;
        }
        for _ in 0..400 {
            control.update(&mut camera, 1.0 / 60.0);
        }

        let full = -2.0 * PI * 100.0 / 600.0;
        assert!((theta_of(&camera, target) - full).abs() < 1e-3);
    }

    #[test]
    fn test_undamped_rotation_applies_at_once() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut camera = camera();
        let mut control = OrbitControl::new(target);
        drag(&mut control, &camera, (60.0, 0.0));
        control.update(&mut camera, 1.0 / 60.0);
        let after_first = camera.position;
        assert!(!control.update(&mut camera, 1.0 / 60.0));
        assert!((camera.position - after_first).length() < 1e-5);
        let full = -2.0 * PI * 60.0 / 600.0;
        assert!((theta_of(&camera, target) - full).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut camera = camera();
        let mut control = OrbitControl::new(target);
        drag(&mut control, &camera, (0.0, 5000.0));
        control.update(&mut camera, 1.0 / 60.0);
        let offset = camera.position - target;
        assert!(offset.x.is_finite() && offset.y.is_finite() && offset.z.is_finite());
        assert!(offset.y > 0.0);
    }

    #[test]
    fn test_wheel_zoom_scales_distance() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut camera = camera();
        let mut control = OrbitControl::new(target).with_distance_range(10.0, 100.0);
        let distance = camera.position.distance(target);
        let mut events = vec![Event::MouseWheel {
            delta: (0.0, 1.0),
            position: (0.0, 0.0),
            handled: false,
        }];
        control.handle_events(&camera, &mut events);
        control.update(&mut camera, 1.0 / 60.0);
        assert!((camera.position.distance(target) - distance * 0.95).abs() < 1e-3);
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut camera = camera();
        let start = camera.position;
        let mut control = OrbitControl::new(Vec3::new(0.0, 5.0, 0.0));
        let mut events = vec![Event::MouseMotion {
            delta: (50.0, 20.0),
            position: (10.0, 10.0),
            handled: false,
        }];
        control.handle_events(&camera, &mut events);
        assert!(!events[0].is_handled());
        control.update(&mut camera, 1.0 / 60.0);
        assert!((camera.position - start).length() < 1e-4);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let mut camera = camera();
        let mut control = OrbitControl::new(target);
        let offset_before = camera.position - target;
        let mut events = vec![
            Event::MousePress {
                button: MouseButton::Right,
                position: (0.0, 0.0),
                handled: false,
            },
            Event::MouseMotion {
                delta: (30.0, 0.0),
                position: (30.0, 0.0),
                handled: false,
            },
        ];
        control.handle_events(&camera, &mut events);
        control.update(&mut camera, 1.0 / 60.0);
        assert!(control.target.x < 0.0);
        let offset_after = camera.position - control.target;
        assert!((offset_after - offset_before).length() < 1e-3);
    }
}
