//! Surface materials for room meshes
//!
//! A material only carries what the forward shader consumes: a base colour with alpha,
//! a roughness factor for the specular lobe, and which faces are visible (and pickable).

/// Which triangle faces a material renders and accepts ray hits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Only faces wound counter-clockwise toward the viewer
    #[default]
    Front,
    /// Both faces
    Double,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Linear RGBA base colour
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub side: Side,
}

impl Material {
    /// Creates an opaque, front-sided material from a `0xRRGGBB` colour
    pub fn from_hex(name: &str, hex: u32) -> Self {
        Self {
            name: name.to_string(),
            base_color: hex_to_rgba(hex),
            roughness: 1.0,
            side: Side::Front,
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.base_color[3] = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.side = Side::Double;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.base_color[3] < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from_hex("default", 0xcccccc)
    }
}

/// Converts a `0xRRGGBB` colour into RGBA floats with full opacity
pub fn hex_to_rgba(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}
