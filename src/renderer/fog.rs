//! Linear distance fog

/// Linear fog blended in by view-space depth between `near` and `far`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Fog colour (linear RGB).
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

impl Fog {
    pub fn new(color: [f32; 3], near: f32, far: f32) -> Self {
        Self { color, near, far }
    }

    /// Blend factor toward the fog colour at view-space `depth`; matches the
    /// `smoothstep` in the standard material shader.
    pub fn factor(&self, depth: f32) -> f32 {
        let t = ((depth - self.near) / (self.far - self.near)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_ramps_between_near_and_far() {
        let fog = Fog::new([0.0; 3], 10.0, 170.0);
        assert_eq!(fog.factor(0.0), 0.0);
        assert_eq!(fog.factor(10.0), 0.0);
        assert!((fog.factor(90.0) - 0.5).abs() < 1e-6);
        assert_eq!(fog.factor(170.0), 1.0);
        assert_eq!(fog.factor(500.0), 1.0);
    }
}
