use crate::gesture::OrbitGesture;
use glam::{Vec2, Vec3};
use primview_scene::PerspectiveCamera;
use std::f32::consts::{PI, TAU};
use std::time::Duration;

/// Smallest polar angle kept away from the poles so the view never flips.
const POLE_EPSILON: f32 = 1e-6;

/// Frame rate at which `damping_factor` is the per-frame applied fraction.
const DAMPING_REFERENCE_HZ: f32 = 60.0;

/// Spherical coordinates around the +Y axis; `phi` is measured from +Y,
/// `theta` around Y starting at +Z.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_vec(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_vec(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Orbit camera controller: rotates, pans and dollies a camera around a
/// target point, with optional inertial damping.
///
/// Gestures only accumulate pending motion. [`update`](Self::update) applies
/// it once per frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub enable_damping: bool,
    /// Fraction of pending motion applied per frame at 60 Hz.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    spherical_delta: Spherical,
    pan_offset: Vec3,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Controller with damping enabled at the given factor.
    pub fn damped(target: Vec3, damping_factor: f32) -> Self {
        Self {
            enable_damping: true,
            damping_factor: damping_factor.clamp(0.0, 1.0),
            ..Self::new(target)
        }
    }

    /// Whether any motion is still waiting to be applied.
    pub fn is_settled(&self) -> bool {
        self.spherical_delta.theta.abs() < 1e-6
            && self.spherical_delta.phi.abs() < 1e-6
            && self.pan_offset.length_squared() < 1e-12
            && self.scale == 1.0
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    pub fn dolly_in(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale *= scale;
        }
    }

    pub fn dolly_out(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale /= scale;
        }
    }

    /// Pan by a pointer delta in pixels. The target moves so that a
    /// point at target depth follows the pointer.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, camera: &PerspectiveCamera) {
        if viewport_height <= 0.0 {
            return;
        }
        let distance = (camera.position() - self.target).length();
        let target_distance = distance * (camera.fov_degrees.to_radians() * 0.5).tan();
        let left = 2.0 * delta.x * target_distance / viewport_height * self.pan_speed;
        let up = 2.0 * delta.y * target_distance / viewport_height * self.pan_speed;

        let right = camera.right();
        let camera_up = right.cross(camera.forward()).normalize_or_zero();
        self.pan_offset += right * -left + camera_up * up;
    }

    /// Feed one gesture into the pending motion.
    pub fn handle(&mut self, gesture: OrbitGesture, viewport_height: f32, camera: &PerspectiveCamera) {
        if !self.enabled || gesture.is_zero() || viewport_height <= 0.0 {
            return;
        }
        match gesture {
            OrbitGesture::Rotate(delta) => {
                self.rotate_left(TAU * delta.x / viewport_height * self.rotate_speed);
                self.rotate_up(TAU * delta.y / viewport_height * self.rotate_speed);
            }
            OrbitGesture::Pan(delta) => self.pan(delta, viewport_height, camera),
            OrbitGesture::Dolly(amount) => {
                let scale = self.zoom_scale(amount);
                if amount > 0.0 {
                    self.dolly_in(scale);
                } else {
                    self.dolly_out(scale);
                }
            }
        }
    }

    fn zoom_scale(&self, notches: f32) -> f32 {
        0.95_f32.powf(self.zoom_speed * notches.abs())
    }

    /// Apply pending motion to `camera`, advancing damping by `dt`.
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, dt: Duration) -> bool {
        let applied = if self.enable_damping {
            let retained = (1.0 - self.damping_factor).powf(dt.as_secs_f32() * DAMPING_REFERENCE_HZ);
            1.0 - retained
        } else {
            1.0
        };

        let offset = camera.position() - self.target;
        let mut spherical = Spherical::from_vec(offset);

        spherical.theta += self.spherical_delta.theta * applied;
        spherical.phi += self.spherical_delta.phi * applied;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);

        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * applied;

        let old_position = camera.position();
        camera.set_position(self.target + spherical.to_vec());
        camera.look_at(self.target);

        if self.enable_damping {
            let keep = 1.0 - applied;
            self.spherical_delta.theta *= keep;
            self.spherical_delta.phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position().distance_squared(old_position) > 1e-10
    }
}
