//! Core types for the rasterizer

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A mapped grid position with its NDC depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32, depth: f32) -> Self {
        Self { x, y, depth }
    }

    /// Treat the point as a 3D position (grid xy + depth)
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.depth)
    }
}

/// An assembled, on-grid triangle. Lives for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub a: ScreenPoint,
    pub b: ScreenPoint,
    pub c: ScreenPoint,
}

impl Triangle {
    pub fn new(a: ScreenPoint, b: ScreenPoint, c: ScreenPoint) -> Self {
        Self { a, b, c }
    }
}

/// Error type for mesh loading
#[derive(Debug)]
pub enum MeshError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for MeshError {
    fn from(e: std::io::Error) -> Self {
        MeshError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for MeshError {
    fn from(e: ron::error::SpannedError) -> Self {
        MeshError::ParseError(e)
    }
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::IoError(e) => write!(f, "IO error: {}", e),
            MeshError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for MeshError {}

/// A static model: vertex positions plus triangle indices (3 per face)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Unit cube centered on the origin
    pub fn cube() -> Self {
        let vertices = vec![
            // Front face
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            // Back face
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ];

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2,  2, 3, 0, // front
            4, 5, 6,  6, 7, 4, // back
            4, 0, 3,  3, 7, 4, // left
            1, 5, 6,  6, 2, 1, // right
            3, 2, 6,  6, 7, 3, // top
            4, 5, 1,  1, 0, 4, // bottom
        ];

        Self { vertices, indices }
    }

    /// Square pyramid: 4 base corners plus an apex
    pub fn pyramid() -> Self {
        let vertices = vec![
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.0, 0.5, 0.0), // apex
        ];

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2,  2, 3, 0, // base
            0, 1, 4, // sides
            1, 2, 4,
            2, 3, 4,
            3, 0, 4,
        ];

        Self { vertices, indices }
    }

    /// Load a mesh from a RON file.
    ///
    /// Indices are not validated here; out-of-range ones are dropped at
    /// primitive assembly like any other bad triangle.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let contents = std::fs::read_to_string(path)?;
        let mesh: Mesh = ron::from_str(&contents)?;
        Ok(mesh)
    }
}

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32, // Pitch
    pub rotation_y: f32, // Yaw

    // Computed basis vectors
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut cam = Self {
            position,
            rotation_x: 0.0,
            rotation_y: 0.0,
            forward: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
        };
        cam.update_basis();
        cam
    }

    /// Recompute forward/right from the rotation angles
    pub fn update_basis(&mut self) {
        let rotation = Mat4::from_rotation_y(self.rotation_y) * Mat4::from_rotation_x(self.rotation_x);
        self.forward = rotation.transform_vector3(Vec3::new(0.0, 0.0, -1.0)).normalize();
        self.right = self.forward.cross(self.up).normalize();
    }

    pub fn rotate(&mut self, d_pitch: f32, d_yaw: f32) {
        self.rotation_y += d_yaw;
        self.rotation_x = (self.rotation_x + d_pitch).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
        self.update_basis();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(2.0, 0.0, 2.0))
    }
}

/// Directional + point light, constant for a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Light {
    /// Unit direction the light shines along
    pub direction: Vec3,
    /// Point-light position for distance falloff
    pub position: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vec3::new(1.0, -1.0, -1.0).normalize(),
            position: Vec3::new(1.0, -1.0, 0.0),
        }
    }
}

/// How assembled triangles are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Depth-tested scanline fill with shading
    Filled,
    /// Depth-tested edges only
    Wireframe,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Filled => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::Filled,
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone)]
pub struct RasterSettings {
    pub mode: RenderMode,
    pub light: Light,
    /// Near clip distance (NDC z below or at this is rejected)
    pub near: f32,
    /// Far clip distance (NDC z at or beyond this is rejected)
    pub far: f32,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Filled,
            light: Light::default(),
            near: 0.1,
            far: 7.0,
        }
    }
}
