//! Scene lights and colour helpers.
//!
//! Colours are authored as sRGB hex values and converted to linear space
//! before they reach the GPU.

/// Converts one sRGB channel to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Splits `0xRRGGBB` into sRGB channels in `[0, 1]`.
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Linear RGB for an sRGB hex colour.
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_srgb(hex).map(srgb_to_linear)
}

/// Uniform light reaching every surface equally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Light emitted from a point in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
}

/// Parallel light shining from `position` toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light.
    pub fn direction(&self) -> [f32; 3] {
        let [x, y, z] = self.position;
        let length = (x * x + y * y + z * z).sqrt();
        if length > 0.0 {
            [x / length, y / length, z / length]
        } else {
            [0.0, 0.0, 0.0]
        }
    }
}

/// The fixed light rig every scene carries; unlit scenes leave it dark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub point: PointLight,
    pub directional: DirectionalLight,
}

impl Lighting {
    /// White lights at the given intensities and positions.
    pub fn white(
        ambient: f32,
        point: f32,
        point_position: [f32; 3],
        directional: f32,
        directional_position: [f32; 3],
    ) -> Self {
        Self {
            ambient: AmbientLight {
                color: [1.0; 3],
                intensity: ambient,
            },
            point: PointLight {
                color: [1.0; 3],
                intensity: point,
                position: point_position,
            },
            directional: DirectionalLight {
                color: [1.0; 3],
                intensity: directional,
                position: directional_position,
            },
        }
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::white(0.0, 0.0, [0.0; 3], 0.0, [0.0, 0.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex_to_srgb(0xFF8000), [1.0, 128.0 / 255.0, 0.0]);
        let linear = hex_to_linear(0xF0F0EE);
        assert!(linear[0] > 0.85 && linear[0] < 0.9);
        assert_eq!(hex_to_linear(0x000000), [0.0; 3]);
    }

    #[test]
    fn test_directional_direction_is_normalised() {
        let light = DirectionalLight {
            color: [1.0; 3],
            intensity: 0.5,
            position: [0.0, 3.0, 4.0],
        };
        assert_eq!(light.direction(), [0.0, 0.6, 0.8]);
    }
}
