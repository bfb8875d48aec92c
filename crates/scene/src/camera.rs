use glam::{Mat4, Vec3};

/// Perspective camera with a cached projection matrix.
///
/// Changing `fov_degrees`, `aspect`, `near` or `far` has no effect on
/// [`projection_matrix`](Self::projection_matrix) until
/// [`update_projection_matrix`](Self::update_projection_matrix) is called.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    projection: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        let mut camera = Self::new(70.0, 1.0, 0.1, 1000.0);
        camera.set_position(Vec3::new(2.0, 1.0, 2.0));
        camera.look_at(Vec3::ZERO);
        camera
    }
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }

    /// Orient the camera toward `target`. A target at the camera position
    /// keeps the previous orientation.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() > f32::EPSILON {
            self.forward = dir.normalize();
        }
    }

    /// Recompute the projection from the current fov, aspect and clip planes.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_at_origin() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.fov_degrees, 70.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 1000.0);
        assert_eq!(cam.position(), Vec3::new(2.0, 1.0, 2.0));
        let expected = (Vec3::ZERO - cam.position()).normalize();
        assert!(cam.forward().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = PerspectiveCamera::default();
        let clip = cam.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn projection_is_cached_until_update() {
        let mut cam = PerspectiveCamera::default();
        let before = cam.projection_matrix();
        cam.aspect = 2.0;
        assert_eq!(cam.projection_matrix(), before);
        cam.update_projection_matrix();
        assert_ne!(cam.projection_matrix(), before);
    }

    #[test]
    fn look_at_own_position_keeps_orientation() {
        let mut cam = PerspectiveCamera::default();
        let fwd = cam.forward();
        cam.look_at(cam.position());
        assert_eq!(cam.forward(), fwd);
    }
}
