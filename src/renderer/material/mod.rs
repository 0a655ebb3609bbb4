//! Material abstractions
//!
//! [`MaterialDesc`] describes a surface on the CPU; [`StandardMaterial`]
//! is its lit GPU realisation.

mod standard;
mod traits;

pub use standard::{StandardMaterial, StandardUniform};
pub use traits::{Material, ModelUniform};

use std::path::PathBuf;

use crate::core::render_states::CullState;

/// Which faces of a surface are rendered and hit by picking rays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Counter-clockwise faces only.
    #[default]
    Front,
    /// Both faces; back faces shade with a flipped normal.
    Double,
}

impl Side {
    /// Rasterizer culling for this side.
    pub fn cull_state(self) -> CullState {
        match self {
            Side::Front => CullState::Back,
            Side::Double => CullState::None,
        }
    }
}

/// Image map applied to a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// Image file, resolved by the scene loader.
    pub path: PathBuf,
    /// UV repeat count along u and v.
    pub repeat: [f32; 2],
    /// Sample the nearest texel when magnifying.
    pub nearest_magnification: bool,
}

/// Surface description of a standard lit material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    /// Base colour (linear RGB).
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    /// Colour map multiplied into the base colour.
    pub map: Option<TextureDesc>,
    pub side: Side,
}

impl MaterialDesc {
    /// A fully rough dielectric of the given colour.
    pub fn standard(color: [f32; 3]) -> Self {
        Self {
            color,
            roughness: 1.0,
            metalness: 0.0,
            map: None,
            side: Side::Front,
        }
    }

    pub fn with_map(mut self, map: TextureDesc) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self::standard([1.0, 1.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_culling() {
        assert_eq!(Side::Front.cull_state(), CullState::Back);
        assert_eq!(Side::Double.cull_state(), CullState::None);
    }

    #[test]
    fn test_standard_defaults_are_rough_dielectric() {
        let desc = MaterialDesc::standard([0.5, 0.5, 0.5]);
        assert_eq!(desc.roughness, 1.0);
        assert_eq!(desc.metalness, 0.0);
        assert_eq!(desc.side, Side::Front);
        assert!(desc.map.is_none());
    }
}
