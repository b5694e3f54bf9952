//! Mouse orbit around a fixed target with exponential damping.
//!
//! Input accumulates into pending angle deltas; each [`OrbitController::update`]
//! applies `damping` of what is pending and keeps the rest, so motion eases out
//! over the following ticks. The camera never translates its target.

use glam::Vec3;

use crate::camera::Camera;

/// Keeps the camera off the poles, where the up vector degenerates.
const POLAR_EPSILON: f32 = 1e-3;

/// Below this the controller counts as settled.
const SETTLE_THRESHOLD: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitController {
    pub target: Vec3,
    radius: f32,
    /// Azimuth around +Y, measured from +Z towards +X.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_zoom: f32,
    damping: f32,
    orbit_sensitivity: f32,
    zoom_sensitivity: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitController {
    /// Starts from the camera's current position relative to `target`.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, std::f32::consts::FRAC_PI_2)
        };
        Self {
            target,
            radius,
            theta,
            phi,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_zoom: 0.0,
            damping: 0.05,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }

    /// `damping` outside (0, 1] applies input immediately.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = if damping > 0.0 && damping <= 1.0 {
            damping
        } else {
            1.0
        };
        self
    }

    pub fn with_sensitivity(mut self, orbit: f32, zoom: f32) -> Self {
        self.orbit_sensitivity = orbit;
        self.zoom_sensitivity = zoom;
        self
    }

    /// Also clamps the starting radius into range.
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.min(max);
        self.max_distance = max.max(min);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);
        self
    }

    /// Queues a drag of `dx`/`dy` pixels. Dragging right swings the camera left
    /// around the target, dragging down raises it.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_theta -= dx * self.orbit_sensitivity;
        self.pending_phi -= dy * self.orbit_sensitivity;
    }

    /// Queues `lines` wheel notches; positive zooms in.
    pub fn zoom(&mut self, lines: f32) {
        self.pending_zoom += lines;
    }

    /// Advances one tick. Returns true while the camera is still moving.
    pub fn update(&mut self) -> bool {
        let step_theta = self.pending_theta * self.damping;
        let step_phi = self.pending_phi * self.damping;
        self.theta += step_theta;
        self.phi = (self.phi + step_phi).clamp(
            POLAR_EPSILON,
            std::f32::consts::PI - POLAR_EPSILON,
        );

        if self.pending_zoom != 0.0 {
            let scale = (1.0 - self.zoom_sensitivity).powf(self.pending_zoom);
            self.radius = (self.radius * scale).clamp(self.min_distance, self.max_distance);
            self.pending_zoom = 0.0;
        }

        self.pending_theta -= step_theta;
        self.pending_phi -= step_phi;
        if self.pending_theta.abs() < SETTLE_THRESHOLD {
            self.pending_theta = 0.0;
        }
        if self.pending_phi.abs() < SETTLE_THRESHOLD {
            self.pending_phi = 0.0;
        }

        step_theta.abs() > SETTLE_THRESHOLD || step_phi.abs() > SETTLE_THRESHOLD
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.target = self.target;
    }
}
