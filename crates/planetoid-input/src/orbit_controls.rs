//! Orbit-style camera controls around a fixed target.
//!
//! Left-dragging queues a rotation in spherical coordinates, right-dragging
//! queues a pan of the target and the wheel queues a dolly. Each
//! [`OrbitControls::update`] applies a `damping_factor` share of the queued
//! rotation and pan and keeps the rest, so the camera eases to a stop after
//! the pointer is released.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use planetoid_render::Camera;
use tracing::debug;
use winit::event::MouseButton;

use crate::mouse::MouseState;

/// Keeps the polar angle off the exact poles, where `look_at` has no
/// well-defined right vector.
const POLAR_EPSILON: f32 = 1e-6;

/// Zoom factor per wheel line at `zoom_speed` 1.0.
const ZOOM_STEP: f32 = 0.95;

/// Position relative to the target. `phi` is the polar angle from +Y and
/// `theta` the azimuth around Y measured from +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Tuning for [`OrbitControls`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSettings {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.05,
            zoom_speed: 1.0,
            enable_damping: true,
            damping_factor: 0.05,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

impl OrbitSettings {
    /// `(min, max)` distance limits, reordered when a config swapped them.
    pub fn distance_range(&self) -> (f32, f32) {
        if self.min_distance <= self.max_distance {
            (self.min_distance, self.max_distance)
        } else {
            (self.max_distance, self.min_distance)
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub settings: OrbitSettings,
    /// Queued (theta, phi) change not yet applied to the camera.
    pending: Vec2,
    /// Queued (right, down) pan in viewport heights.
    pending_pan: Vec2,
    scale: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3, settings: OrbitSettings) -> Self {
        Self {
            target,
            settings,
            pending: Vec2::ZERO,
            pending_pan: Vec2::ZERO,
            scale: 1.0,
        }
    }

    /// Queue a rotation from a pointer drag. A drag across the full viewport
    /// height turns `TAU * rotate_speed`.
    pub fn rotate(&mut self, drag_px: Vec2, viewport_height: f32) {
        if !self.settings.enable_rotate {
            return;
        }
        let per_pixel = TAU * self.settings.rotate_speed / viewport_height.max(1.0);
        self.pending.x -= drag_px.x * per_pixel;
        self.pending.y -= drag_px.y * per_pixel;
    }

    /// Queue a dolly. Positive wheel lines move toward the target.
    pub fn dolly(&mut self, wheel_lines: f32) {
        if !self.settings.enable_zoom || wheel_lines == 0.0 {
            return;
        }
        self.scale *= ZOOM_STEP.powf(wheel_lines * self.settings.zoom_speed);
    }

    /// Queue a pan from a pointer drag. A drag across the full viewport
    /// height moves the target by the visible height at the target's depth,
    /// so the scene follows the pointer.
    pub fn pan(&mut self, drag_px: Vec2, viewport_height: f32) {
        if !self.settings.enable_pan {
            return;
        }
        self.pending_pan += drag_px * self.settings.pan_speed / viewport_height.max(1.0);
    }

    /// Feed one frame of pointer state: left-drag rotates, right-drag pans,
    /// the wheel dollies.
    pub fn handle_mouse(&mut self, mouse: &MouseState, viewport_height: f32) {
        self.rotate(mouse.drag_delta(MouseButton::Left), viewport_height);
        self.pan(mouse.drag_delta(MouseButton::Right), viewport_height);
        self.dolly(mouse.scroll());
    }

    /// Rotation still waiting to be applied.
    pub fn pending_rotation(&self) -> Vec2 {
        self.pending
    }

    /// Pan still waiting to be applied, in viewport heights.
    pub fn pending_pan(&self) -> Vec2 {
        self.pending_pan
    }

    /// Move `camera` by the queued motion and aim it at the target.
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let before = camera.position;
        let share = if self.settings.enable_damping {
            self.settings.damping_factor
        } else {
            1.0
        };

        if self.pending_pan != Vec2::ZERO {
            let step = self.pending_pan * share;
            let visible_height =
                2.0 * (camera.position - self.target).length() * (camera.fov_y * 0.5).tan();
            let right = camera.rotation * Vec3::X;
            let offset = (camera.up() * step.y - right * step.x) * visible_height;
            self.target += offset;
            camera.position += offset;
        }

        let mut spherical = Spherical::from_offset(camera.position - self.target);
        let step = self.pending * share;
        spherical.theta += step.x;
        spherical.phi = (spherical.phi + step.y).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let (min_distance, max_distance) = self.settings.distance_range();
        let requested = spherical.radius * self.scale;
        spherical.radius = requested.max(min_distance).min(max_distance);
        if self.scale != 1.0 && spherical.radius != requested {
            debug!(
                requested,
                clamped = spherical.radius,
                "Dolly stopped at distance limit"
            );
        }

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target, Vec3::Y);

        if self.settings.enable_damping {
            self.pending *= 1.0 - share;
            self.pending_pan *= 1.0 - share;
        } else {
            self.pending = Vec2::ZERO;
            self.pending_pan = Vec2::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(before) > f32::EPSILON
    }
}
