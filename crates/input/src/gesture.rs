use glam::Vec2;

/// A high-level camera gesture produced from raw pointer input.
///
/// The orbit controller consumes gestures, never raw window events, so any
/// input source that can produce these can drive the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitGesture {
    /// Orbit around the target by a pointer delta in backing (physical) pixels.
    Rotate(Vec2),
    /// Slide the target across the view plane by a pointer delta in backing
    /// (physical) pixels.
    Pan(Vec2),
    /// Move toward (positive) or away from (negative) the target, in wheel notches.
    Dolly(f32),
}

impl OrbitGesture {
    /// Whether applying this gesture would be a no-op.
    pub fn is_zero(&self) -> bool {
        match self {
            OrbitGesture::Rotate(d) | OrbitGesture::Pan(d) => *d == Vec2::ZERO,
            OrbitGesture::Dolly(amount) => *amount == 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gestures() {
        assert!(OrbitGesture::Rotate(Vec2::ZERO).is_zero());
        assert!(OrbitGesture::Dolly(0.0).is_zero());
        assert!(!OrbitGesture::Pan(Vec2::X).is_zero());
    }
}
