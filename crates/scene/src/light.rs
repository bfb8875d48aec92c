use glam::Vec3;
use primview_common::{Color, NodeId};

/// Fill light that blends between a sky and a ground color by surface
/// orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereLight {
    pub id: NodeId,
    pub sky_color: Color,
    pub ground_color: Color,
    pub intensity: f32,
}

impl HemisphereLight {
    pub fn new(sky_color: Color, ground_color: Color, intensity: f32) -> Self {
        Self {
            id: NodeId::new(),
            sky_color,
            ground_color,
            intensity,
        }
    }
}

/// Omnidirectional light at a position, attenuated with distance.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub id: NodeId,
    pub color: Color,
    pub intensity: f32,
    /// Cutoff distance; zero means no cutoff.
    pub distance: f32,
    pub decay: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
}

impl PointLight {
    pub fn new(color: Color, intensity: f32, distance: f32) -> Self {
        Self {
            id: NodeId::new(),
            color,
            intensity,
            distance,
            decay: 2.0,
            position: Vec3::ZERO,
            cast_shadow: false,
        }
    }

    /// Inverse-power falloff with a smooth window toward `distance`. The
    /// falloff is capped at 100 for surfaces touching the light.
    pub fn attenuation(&self, light_distance: f32) -> f32 {
        let falloff = 1.0 / light_distance.powf(self.decay).max(0.01);
        if self.distance > 0.0 {
            let ratio = light_distance / self.distance;
            let window = (1.0 - ratio.powi(4)).clamp(0.0, 1.0);
            falloff * window * window
        } else {
            falloff
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuation_falls_off_and_cuts_off() {
        let light = PointLight::new(Color::WHITE, 2.0, 100.0);
        assert!(light.attenuation(1.0) > light.attenuation(2.0));
        assert_eq!(light.attenuation(100.0), 0.0);
        assert_eq!(light.attenuation(150.0), 0.0);
    }

    #[test]
    fn falloff_is_capped_near_the_light() {
        let light = PointLight::new(Color::WHITE, 2.0, 100.0);
        assert!((light.attenuation(0.05) - 100.0).abs() < 1e-3);
        assert!((light.attenuation(0.0) - 100.0).abs() < 1e-3);
        assert!((light.attenuation(0.5) - 4.0).abs() < 1e-3);
    }

    #[test]
    fn zero_distance_means_no_cutoff() {
        let light = PointLight::new(Color::WHITE, 1.0, 0.0);
        assert!(light.attenuation(1000.0) > 0.0);
    }
}
