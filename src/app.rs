//! Per-frame application state
//!
//! Owns the camera, the active mesh, and the model animation, and derives
//! the combined MVP matrix the rasterizer consumes. Input arrives as
//! terminal-agnostic commands so the crossterm layer stays in main.

use glam::{Mat4, Vec3};

use crate::config::RenderConfig;
use crate::rasterizer::{Camera, Mesh, RasterSettings};

/// One decoded input action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RotateLeft,
    RotateRight,
    PitchUp,
    PitchDown,
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    ToggleMode,
    SelectCube,
    SelectPyramid,
    Quit,
}

pub struct AppState {
    pub camera: Camera,
    pub mesh: Mesh,
    pub settings: RasterSettings,
    pub running: bool,

    /// Model spin angle about the (1,1,1) axis
    angle: f32,
    spin_rate: f32,
    fov: f32,
    aspect: f32,
    camera_speed: f32,
    camera_speed_right: f32,
    rotate_speed: f32,
}

impl AppState {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            camera: Camera::new(config.camera_position),
            mesh: Mesh::cube(),
            settings: config.raster_settings(),
            running: true,
            angle: 0.0,
            spin_rate: config.spin_rate,
            fov: config.fov_radians(),
            aspect: config.aspect_ratio(),
            camera_speed: config.camera_speed,
            camera_speed_right: config.camera_speed_right,
            rotate_speed: config.rotate_speed,
        }
    }

    pub fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::RotateLeft => self.camera.rotate(0.0, self.rotate_speed),
            Command::RotateRight => self.camera.rotate(0.0, -self.rotate_speed),
            Command::PitchUp => self.camera.rotate(self.rotate_speed, 0.0),
            Command::PitchDown => self.camera.rotate(-self.rotate_speed, 0.0),
            Command::MoveForward => {
                self.camera.position += self.camera.forward * self.camera_speed;
            }
            Command::MoveBack => {
                self.camera.position -= self.camera.forward * self.camera_speed;
            }
            Command::StrafeLeft => {
                self.camera.position -= self.camera.right * self.camera_speed_right;
            }
            Command::StrafeRight => {
                self.camera.position += self.camera.right * self.camera_speed_right;
            }
            Command::ToggleMode => self.settings.mode = self.settings.mode.toggled(),
            Command::SelectCube => self.mesh = Mesh::cube(),
            Command::SelectPyramid => self.mesh = Mesh::pyramid(),
            Command::Quit => self.running = false,
        }
    }

    /// Advance the model animation by the measured frame delta
    pub fn update(&mut self, delta_seconds: f32) {
        self.angle += self.spin_rate * delta_seconds;
    }

    /// Combined projection * view * model for the current frame
    pub fn mvp(&self) -> Mat4 {
        let projection = Mat4::perspective_rh_gl(
            self.fov,
            self.aspect,
            self.settings.near,
            self.settings.far,
        );
        let view = self.camera.view_matrix();
        let model = Mat4::from_axis_angle(Vec3::ONE.normalize(), self.angle);
        projection * view * model
    }
}
