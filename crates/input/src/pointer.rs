use crate::gesture::OrbitGesture;
use glam::Vec2;

/// Pointer-drag pixels that count as one wheel notch when dollying.
const DRAG_PIXELS_PER_NOTCH: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Tracks pointer position and the held button, turning drags and wheel
/// ticks into [`OrbitGesture`]s.
///
/// Primary drag rotates, secondary drag pans, middle drag dollies.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Option<Vec2>,
    held: Option<PointerButton>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<PointerButton> {
        self.held
    }

    /// Record a button press or release. Only one button drives a drag at a
    /// time; pressing a second button while dragging is ignored.
    pub fn button(&mut self, button: PointerButton, pressed: bool) {
        match (pressed, self.held) {
            (true, None) => self.held = Some(button),
            (false, Some(current)) if current == button => self.held = None,
            _ => {}
        }
    }

    /// Record a new cursor position in pixels. Returns a gesture when
    /// a button is held and the pointer moved.
    pub fn moved(&mut self, position: Vec2) -> Option<OrbitGesture> {
        let previous = self.position.replace(position)?;
        let delta = position - previous;
        if delta == Vec2::ZERO {
            return None;
        }
        match self.held? {
            PointerButton::Primary => Some(OrbitGesture::Rotate(delta)),
            PointerButton::Secondary => Some(OrbitGesture::Pan(delta)),
            PointerButton::Middle => Some(OrbitGesture::Dolly(-delta.y / DRAG_PIXELS_PER_NOTCH)),
        }
    }

    /// Pointer left the surface: forget the position and drop any drag.
    pub fn left(&mut self) {
        self.position = None;
        self.held = None;
    }

    /// Wheel scroll in notches; positive scrolls away from the user.
    pub fn wheel_lines(&self, lines: f32) -> Option<OrbitGesture> {
        (lines != 0.0).then_some(OrbitGesture::Dolly(lines))
    }

    /// Wheel scroll reported in pixels (touchpads).
    pub fn wheel_pixels(&self, pixels: f32) -> Option<OrbitGesture> {
        self.wheel_lines(pixels / DRAG_PIXELS_PER_NOTCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_without_button_yields_nothing() {
        let mut p = PointerTracker::new();
        assert_eq!(p.moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(p.moved(Vec2::new(20.0, 10.0)), None);
    }

    #[test]
    fn primary_drag_rotates() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::new(10.0, 10.0));
        p.button(PointerButton::Primary, true);
        assert_eq!(
            p.moved(Vec2::new(15.0, 8.0)),
            Some(OrbitGesture::Rotate(Vec2::new(5.0, -2.0)))
        );
    }

    #[test]
    fn secondary_drag_pans() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::ZERO);
        p.button(PointerButton::Secondary, true);
        assert_eq!(
            p.moved(Vec2::new(3.0, 4.0)),
            Some(OrbitGesture::Pan(Vec2::new(3.0, 4.0)))
        );
    }

    #[test]
    fn middle_drag_dollies() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::ZERO);
        p.button(PointerButton::Middle, true);
        assert_eq!(p.moved(Vec2::new(0.0, -100.0)), Some(OrbitGesture::Dolly(1.0)));
    }

    #[test]
    fn release_ends_drag() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::ZERO);
        p.button(PointerButton::Primary, true);
        p.button(PointerButton::Secondary, true);
        assert_eq!(p.held(), Some(PointerButton::Primary));
        p.button(PointerButton::Secondary, false);
        assert_eq!(p.held(), Some(PointerButton::Primary));
        p.button(PointerButton::Primary, false);
        assert_eq!(p.held(), None);
        assert_eq!(p.moved(Vec2::ONE), None);
    }

    #[test]
    fn leaving_resets_position() {
        let mut p = PointerTracker::new();
        p.moved(Vec2::ZERO);
        p.button(PointerButton::Primary, true);
        p.left();
        assert_eq!(p.moved(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn wheel_maps_to_dolly() {
        let p = PointerTracker::new();
        assert_eq!(p.wheel_lines(0.0), None);
        assert_eq!(p.wheel_lines(2.0), Some(OrbitGesture::Dolly(2.0)));
        assert_eq!(p.wheel_pixels(-50.0), Some(OrbitGesture::Dolly(-0.5)));
    }
}
