//! The running session: everything the per-frame update touches.

use std::time::Instant;

use glam::Vec3;
use planetoid_config::{CameraConfig, Config};
use planetoid_input::{MouseState, OrbitControls, OrbitSettings};
use planetoid_render::Camera;
use tracing::{debug, warn};

use crate::clock::SessionClock;
use crate::uniforms::SurfaceUniforms;
use crate::world::World;

/// Orbit-control tuning from the camera section of the config.
pub fn orbit_settings(camera: &CameraConfig) -> OrbitSettings {
    OrbitSettings {
        rotate_speed: camera.rotate_speed,
        damping_factor: camera.damping_factor,
        enable_damping: camera.damping_factor > 0.0,
        enable_zoom: camera.enable_zoom,
        enable_rotate: camera.enable_rotate,
        enable_pan: camera.enable_pan,
        min_distance: camera.min_distance,
        max_distance: camera.max_distance,
        ..OrbitSettings::default()
    }
}

pub struct Session {
    pub uniforms: SurfaceUniforms,
    /// `None` until the shaders are ready and the world has been assembled.
    pub world: Option<World>,
    pub clock: SessionClock,
    pub camera: Camera,
    pub controls: OrbitControls,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let mut camera = Camera::perspective(
            config.camera.fov_deg,
            aspect,
            config.camera.near,
            config.camera.far,
        );
        camera.position = Vec3::new(0.0, 0.0, config.camera.distance);
        camera.look_at(Vec3::ZERO, Vec3::Y);

        let uniforms = SurfaceUniforms::new(
            config.world.planet_radius,
            Vec3::from(config.world.light_position),
            camera.position,
        );

        Self {
            uniforms,
            world: None,
            clock: SessionClock::new(),
            camera,
            controls: OrbitControls::new(Vec3::ZERO, orbit_settings(&config.camera)),
        }
    }

    /// Install the assembled world. Only the first call has any effect.
    pub fn install_world(&mut self, world: World) -> bool {
        if self.world.is_some() {
            warn!("World already assembled, ignoring second assembly");
            return false;
        }
        self.world = Some(world);
        true
    }

    pub fn is_ready(&self) -> bool {
        self.world.is_some()
    }

    /// Feed one frame of pointer input to the orbit controls.
    pub fn handle_mouse(&mut self, mouse: &MouseState, viewport_height: f32) {
        self.controls.handle_mouse(mouse, viewport_height);
    }

    /// Per-frame update: publish the elapsed time, turn the moon orbit,
    /// ease the camera and publish its position. Returns the elapsed time.
    pub fn advance_frame(&mut self, now: Instant) -> f32 {
        let elapsed = self.clock.elapsed_at(now);
        if let Err(e) = self.uniforms.shared.set("time", elapsed) {
            warn!("Failed to update time uniform: {e}");
        }

        if let Some(world) = self.world.as_mut() {
            let speed = self.uniforms.moon.float("moonSpeed").unwrap_or(0.0);
            world.moon_orbit.advance(&mut world.graph, speed);
        }

        if self.controls.update(&mut self.camera) {
            debug!(position = ?self.camera.position, "Camera moved");
        }
        if let Err(e) = self.uniforms.shared.set("cameraPos", self.camera.position) {
            warn!("Failed to update camera uniform: {e}");
        }

        elapsed
    }

    /// Apply a window resize to the camera. Zero dimensions count as 1.
    /// Returns the clamped size.
    pub fn resize(&mut self, width: u32, height: u32) -> (u32, u32) {
        let (w, h) = (width.max(1), height.max(1));
        self.camera.set_aspect_ratio(w as f32, h as f32);
        (w, h)
    }
}
