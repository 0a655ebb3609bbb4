//! Light types

use glam::Vec3;

/// Light uniform data for GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniforms {
    /// Direction the light travels (w = 1 when a light is bound).
    pub direction: [f32; 4],
    /// Light color and intensity (rgb = linear color, a = intensity).
    pub color_intensity: [f32; 4],
}

impl LightUniforms {
    /// Uniform block for "no light": surfaces render black.
    pub fn none() -> Self {
        Self {
            direction: [0.0, -1.0, 0.0, 0.0],
            color_intensity: [0.0; 4],
        }
    }
}

/// Trait for light sources.
pub trait Light {
    /// Get the light uniforms for GPU.
    fn uniforms(&self) -> LightUniforms;
}

/// Directional light that illuminates from a direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Light intensity. Physically based: irradiance at normal incidence.
    pub intensity: f32,
    /// Light color (linear RGB).
    pub color: [f32; 3],
    /// Light direction (normalized), pointing from the light into the scene.
    pub direction: Vec3,
}

impl DirectionalLight {
    /// Create a new directional light.
    pub fn new(intensity: f32, color: [f32; 3], direction: Vec3) -> Self {
        Self {
            intensity,
            color,
            direction: direction.normalize(),
        }
    }

    /// A light placed at `position` shining toward `target`.
    pub fn from_position(intensity: f32, color: [f32; 3], position: Vec3, target: Vec3) -> Self {
        Self::new(intensity, color, target - position)
    }

    /// Create a white directional light.
    pub fn white(intensity: f32, direction: Vec3) -> Self {
        Self::new(intensity, [1.0, 1.0, 1.0], direction)
    }
}

impl Light for DirectionalLight {
    fn uniforms(&self) -> LightUniforms {
        LightUniforms {
            direction: [self.direction.x, self.direction.y, self.direction.z, 1.0],
            color_intensity: [self.color[0], self.color[1], self.color[2], self.intensity],
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::white(1.0, Vec3::new(-0.3, -1.0, -0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_from_position_points_at_target() {
        let light = DirectionalLight::from_position(4.0, [1.0; 3], Vec3::new(10.0, 20.0, 10.0), Vec3::ZERO);
        let expected = Vec3::new(-10.0, -20.0, -10.0).normalize();
        assert!((light.direction - expected).length() < 1e-6);
        let uniforms = light.uniforms();
        assert_eq!(uniforms.color_intensity[3], 4.0);
        assert_eq!(uniforms.direction[3], 1.0);
    }
}
