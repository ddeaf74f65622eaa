//! Lighting and intensity-to-glyph mapping
//!
//! The directional term is flat (one value per triangle); the point-light
//! falloff is evaluated per cell. Combined intensity picks a glyph from a
//! fixed four-step ramp.

use glam::Vec3;

use super::types::Light;

/// Point-light distances are clamped into [1, MAX_LIGHT_DISTANCE]
const MAX_LIGHT_DISTANCE: f32 = 50.0;

/// Glyph drawn by the wireframe rasterizer
pub const WIRE_GLYPH: char = '*';

/// Glyph for an empty cell
pub const BLANK_GLYPH: char = ' ';

/// Face normal for a triangle of grid-space positions, flipped so it never
/// points toward the camera. Degenerate triangles yield a zero normal.
pub fn face_normal(p1: Vec3, p2: Vec3, p3: Vec3, camera_pos: Vec3) -> Vec3 {
    let normal = (p2 - p1).cross(p3 - p1).normalize_or_zero();
    let view_dir = (camera_pos - p1).normalize_or_zero();
    if normal.dot(view_dir) > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Flat directional term: how squarely the face points at the light
pub fn directional_intensity(normal: Vec3, light: &Light) -> f32 {
    normal.dot(-light.direction).clamp(0.0, 1.0).powf(1.5)
}

/// Per-cell point-light falloff. The cell position is normalized before the
/// distance is taken, and the distance is clamped to [1, 50] so the
/// inverse-square term stays bounded.
pub fn distance_intensity(cell_pos: Vec3, light: &Light) -> f32 {
    let pos = cell_pos.normalize_or_zero();
    let distance = pos.distance(light.position).clamp(1.0, MAX_LIGHT_DISTANCE);
    1.0 / (distance * distance)
}

/// Map a combined intensity to a display glyph.
///
/// First matching band wins. The `*` band requires an intensity above 0.5
/// and below 0.125 at once, so it can never match; the bands are kept as
/// given rather than redefined.
pub fn shade_char(intensity: f32) -> char {
    if intensity > 0.13 {
        '@'
    } else if intensity > 0.125 && intensity < 0.13 {
        '#'
    } else if intensity > 0.5 && intensity < 0.125 {
        '*'
    } else {
        '.'
    }
}
