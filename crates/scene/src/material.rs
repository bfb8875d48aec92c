use primview_common::{Color, NodeId};

/// Blinn-Phong surface material shared by all primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct PhongMaterial {
    pub id: NodeId,
    pub color: Color,
    pub emissive: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            id: NodeId::new(),
            color: Color::from_hex(0xffffff),
            emissive: Color::from_hex(0x000000),
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
        }
    }
}
