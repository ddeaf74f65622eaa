//! Core rendering functions
//!
//! Depth-tested line and scanline-fill rasterization into a character grid,
//! plus the double-buffered text surface the outer loop prints from.

use glam::{Mat4, Vec3};
use log::trace;

use super::shade::{
    directional_intensity, distance_intensity, face_normal, shade_char, BLANK_GLYPH, WIRE_GLYPH,
};
use super::transform::{assemble_triangles, transform_vertices};
use super::types::{Camera, Light, Mesh, RasterSettings, RenderMode, ScreenPoint, Triangle};

/// Depth a cleared cell holds; beyond any accepted NDC depth
const FAR_DEPTH: f32 = 1.0;
/// Bias added to line depths so shared edges do not z-fight a fill
const EDGE_BIAS: f32 = 1e-6;
/// Guard against zero-width spans
const SPAN_EPSILON: f32 = 1e-6;

/// Character grid with a parallel z-buffer
pub struct FrameGrid {
    pub chars: Vec<char>,
    pub depth: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl FrameGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            chars: vec![BLANK_GLYPH; width * height],
            depth: vec![FAR_DEPTH; width * height],
            width,
            height,
        }
    }

    /// Reset every cell to blank and every depth to the far sentinel
    pub fn clear(&mut self) {
        self.chars.fill(BLANK_GLYPH);
        self.depth.fill(FAR_DEPTH);
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.chars[y * self.width + x]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width + x]
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Write a glyph at (x, y) if z passes the strict depth test.
    /// Out-of-bounds coordinates are ignored.
    pub fn set_cell_with_depth(&mut self, x: i32, y: i32, z: f32, glyph: char) -> bool {
        if self.in_bounds(x, y) {
            let idx = y as usize * self.width + x as usize;
            if z < self.depth[idx] {
                self.depth[idx] = z;
                self.chars[idx] = glyph;
                return true;
            }
        }
        false
    }
}

/// Draw a depth-tested wireframe segment between two screen points.
///
/// Steps along the truncated hypotenuse with integer x/y interpolation.
/// Coincident endpoints degrade to a single depth-tested cell.
pub fn draw_line(grid: &mut FrameGrid, p1: ScreenPoint, p2: ScreenPoint) {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let steps = ((dx * dx + dy * dy) as f64).sqrt() as i32;

    if steps == 0 {
        grid.set_cell_with_depth(p1.x, p1.y, p1.depth + EDGE_BIAS, WIRE_GLYPH);
        return;
    }

    for i in 0..=steps {
        let x = p1.x + (dx * i) / steps;
        let y = p1.y + (dy * i) / steps;
        let t = i as f32 / steps as f32;
        let z = p1.depth + (p2.depth - p1.depth) * t + EDGE_BIAS;
        grid.set_cell_with_depth(x, y, z, WIRE_GLYPH);
    }
}

/// X and depth where the edge `from`-`to` crosses scanline y.
/// Horizontal edges report their starting corner.
fn interpolate_edge(y: i32, from: ScreenPoint, to: ScreenPoint) -> (i32, f32) {
    if to.y == from.y {
        return (from.x, from.depth);
    }
    let t = (y - from.y) as f32 / (to.y - from.y) as f32;
    let x = (from.x as f32 + t * (to.x - from.x) as f32) as i32;
    let z = from.depth + t * (to.depth - from.depth);
    (x, z)
}

/// Fill one scanline between two edge crossings, shading each cell that
/// passes the depth test.
fn fill_span(
    grid: &mut FrameGrid,
    y: i32,
    left: (i32, f32),
    right: (i32, f32),
    angle_intensity: f32,
    light: &Light,
) {
    let ((mut xa, mut za), (mut xb, mut zb)) = (left, right);
    if xa > xb {
        std::mem::swap(&mut xa, &mut xb);
        std::mem::swap(&mut za, &mut zb);
    }

    for x in xa..=xb {
        let t = (x - xa) as f32 / ((xb - xa) as f32 + SPAN_EPSILON);
        let z = za + (zb - za) * t;

        if !grid.in_bounds(x, y) {
            continue;
        }
        if z >= grid.depth_at(x as usize, y as usize) {
            continue;
        }

        let cell_pos = Vec3::new(x as f32, y as f32, z);
        let intensity = angle_intensity * distance_intensity(cell_pos, light);
        grid.set_cell_with_depth(x, y, z, shade_char(intensity));
    }
}

/// Scanline-fill a triangle with flat directional shading and per-cell
/// point-light falloff.
pub fn fill_triangle(grid: &mut FrameGrid, tri: &Triangle, camera_pos: Vec3, light: &Light) {
    let (mut p1, mut p2, mut p3) = (tri.a, tri.b, tri.c);

    // Sort corners by ascending y
    if p2.y < p1.y {
        std::mem::swap(&mut p1, &mut p2);
    }
    if p3.y < p1.y {
        std::mem::swap(&mut p1, &mut p3);
    }
    if p3.y < p2.y {
        std::mem::swap(&mut p2, &mut p3);
    }

    let normal = face_normal(p1.as_vec3(), p2.as_vec3(), p3.as_vec3(), camera_pos);
    let angle_intensity = directional_intensity(normal, light);

    // Upper part: long edge p1-p3 against short edge p1-p2
    for y in p1.y..=p2.y {
        let left = interpolate_edge(y, p1, p3);
        let right = interpolate_edge(y, p1, p2);
        fill_span(grid, y, left, right, angle_intensity, light);
    }

    // Lower part: long edge against short edge p2-p3
    for y in p2.y..=p3.y {
        let left = interpolate_edge(y, p1, p3);
        let right = interpolate_edge(y, p2, p3);
        fill_span(grid, y, left, right, angle_intensity, light);
    }
}

/// Run the whole pipeline for one frame: transform, assemble, rasterize.
pub fn render_frame(
    grid: &mut FrameGrid,
    mesh: &Mesh,
    mvp: Mat4,
    camera: &Camera,
    settings: &RasterSettings,
) {
    grid.clear();

    let transformed = transform_vertices(mesh, mvp, settings.near, settings.far);
    let triangles = assemble_triangles(&transformed, &mesh.indices, grid.width, grid.height);
    trace!(
        "assembled {} of {} triangles",
        triangles.len(),
        mesh.indices.len() / 3
    );

    for tri in &triangles {
        match settings.mode {
            RenderMode::Filled => fill_triangle(grid, tri, camera.position, &settings.light),
            RenderMode::Wireframe => {
                draw_line(grid, tri.a, tri.b);
                draw_line(grid, tri.b, tri.c);
                draw_line(grid, tri.c, tri.a);
            }
        }
    }
}

/// Double-buffered text surface.
///
/// The back buffer is rebuilt from the grid each frame and swapped in whole,
/// so the front buffer always holds a complete frame.
#[derive(Default)]
pub struct FrameBuffer {
    front: String,
    back: String,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the grid row-major into the back buffer and swap it to the
    /// front. Returns the newly presented frame.
    pub fn present(&mut self, grid: &FrameGrid) -> &str {
        self.back.clear();
        self.back.reserve(grid.height * (grid.width + 1));

        for y in 0..grid.height {
            for x in 0..grid.width {
                self.back.push(grid.char_at(x, y));
            }
            self.back.push('\n');
        }

        std::mem::swap(&mut self.front, &mut self.back);
        &self.front
    }

    /// The last fully rendered frame
    pub fn front(&self) -> &str {
        &self.front
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn far_point_light() -> Light {
        Light {
            direction: Vec3::NEG_Z,
            position: Vec3::new(1000.0, 1000.0, 1000.0),
        }
    }

    #[test]
    fn test_empty_frame_serialization() {
        let mut grid = FrameGrid::new(4, 3);
        grid.clear();

        let mut fb = FrameBuffer::new();
        let frame = fb.present(&grid);

        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.len() == 4 && l.chars().all(|c| c == ' ')));
    }

    #[test]
    fn test_single_triangle_scenario() {
        let mut grid = FrameGrid::new(30, 30);
        // Light shines along -z at this triangle's +z normal, so the
        // directional term is exactly 1; the point light is far enough that
        // the combined intensity lands in the darkest band.
        let light = far_point_light();
        let camera_pos = Vec3::new(15.0, 15.0, -10.0);

        let tri = Triangle::new(
            ScreenPoint::new(10, 10, 0.5),
            ScreenPoint::new(20, 10, 0.5),
            ScreenPoint::new(15, 20, 0.5),
        );
        fill_triangle(&mut grid, &tri, camera_pos, &light);

        let mut painted = 0;
        for y in 0..30 {
            for x in 0..30 {
                match grid.char_at(x, y) {
                    ' ' => assert_eq!(grid.depth_at(x, y), FAR_DEPTH),
                    '.' => {
                        painted += 1;
                        assert_eq!(grid.depth_at(x, y), 0.5);
                        assert!((10..=20).contains(&x) && (10..=20).contains(&y));
                    }
                    other => panic!("unexpected glyph {:?} at ({}, {})", other, x, y),
                }
            }
        }
        assert!(painted > 0);
        assert_eq!(grid.char_at(15, 15), '.');
    }

    #[test]
    fn test_overlapping_triangles_keep_nearest() {
        let corners = |z: f32| {
            Triangle::new(
                ScreenPoint::new(10, 10, z),
                ScreenPoint::new(20, 10, z),
                ScreenPoint::new(15, 20, z),
            )
        };
        let light = far_point_light();
        let camera_pos = Vec3::new(15.0, 15.0, -10.0);

        for order in [[0.3, 0.7], [0.7, 0.3]] {
            let mut grid = FrameGrid::new(30, 30);
            for z in order {
                fill_triangle(&mut grid, &corners(z), camera_pos, &light);
            }
            assert_eq!(grid.depth_at(15, 15), 0.3, "order {:?}", order);
        }
    }

    #[test]
    fn test_depth_never_increases() {
        let mut grid = FrameGrid::new(30, 30);
        let light = far_point_light();
        let camera_pos = Vec3::new(15.0, 15.0, -10.0);

        let tris = [
            Triangle::new(
                ScreenPoint::new(5, 5, 0.8),
                ScreenPoint::new(25, 5, 0.8),
                ScreenPoint::new(15, 25, 0.8),
            ),
            Triangle::new(
                ScreenPoint::new(5, 5, 0.2),
                ScreenPoint::new(25, 5, 0.2),
                ScreenPoint::new(15, 25, 0.2),
            ),
            Triangle::new(
                ScreenPoint::new(5, 5, 0.6),
                ScreenPoint::new(25, 5, 0.6),
                ScreenPoint::new(15, 25, 0.6),
            ),
        ];

        let mut before = grid.depth.clone();
        for tri in &tris {
            fill_triangle(&mut grid, tri, camera_pos, &light);
            for (old, new) in before.iter().zip(grid.depth.iter()) {
                assert!(new <= old);
            }
            before = grid.depth.clone();
        }
        assert_eq!(grid.depth_at(15, 15), 0.2);
    }

    #[test]
    fn test_degenerate_triangle_no_panic() {
        let mut grid = FrameGrid::new(30, 30);
        let light = far_point_light();
        let p = ScreenPoint::new(5, 5, 0.5);

        fill_triangle(&mut grid, &Triangle::new(p, p, p), Vec3::ZERO, &light);

        // Two coincident corners
        let q = ScreenPoint::new(12, 5, 0.5);
        fill_triangle(&mut grid, &Triangle::new(p, p, q), Vec3::ZERO, &light);
    }

    #[test]
    fn test_draw_line_zero_length() {
        let mut grid = FrameGrid::new(10, 10);
        let p = ScreenPoint::new(3, 4, 0.5);
        draw_line(&mut grid, p, p);

        assert_eq!(grid.char_at(3, 4), '*');
        assert!((grid.depth_at(3, 4) - 0.5).abs() < 1e-5);
        let painted = grid.chars.iter().filter(|&&c| c != ' ').count();
        assert_eq!(painted, 1);
    }

    #[test]
    fn test_draw_line_depth_tested() {
        let mut grid = FrameGrid::new(20, 20);
        draw_line(
            &mut grid,
            ScreenPoint::new(0, 5, 0.2),
            ScreenPoint::new(19, 5, 0.2),
        );
        let near_depth = grid.depth_at(10, 5);

        // A farther line across the same row changes nothing
        draw_line(
            &mut grid,
            ScreenPoint::new(0, 5, 0.9),
            ScreenPoint::new(19, 5, 0.9),
        );
        assert_eq!(grid.depth_at(10, 5), near_depth);
    }

    #[test]
    fn test_draw_line_endpoints_touched() {
        let mut grid = FrameGrid::new(20, 20);
        draw_line(
            &mut grid,
            ScreenPoint::new(2, 3, 0.5),
            ScreenPoint::new(9, 12, 0.5),
        );
        assert_eq!(grid.char_at(2, 3), '*');
        assert_eq!(grid.char_at(9, 12), '*');
    }

    #[test]
    fn test_render_frame_cube_smoke() {
        let mesh = Mesh::cube();
        let camera = Camera::new(Vec3::new(0.0, 0.0, 2.5));
        let view = camera.view_matrix();
        let proj = Mat4::perspective_rh_gl(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 7.0);
        let mvp = proj * view;

        for mode in [RenderMode::Filled, RenderMode::Wireframe] {
            let mut grid = FrameGrid::new(40, 40);
            let settings = RasterSettings {
                mode,
                ..Default::default()
            };
            render_frame(&mut grid, &mesh, mvp, &camera, &settings);

            let painted = grid.chars.iter().filter(|&&c| c != ' ').count();
            assert!(painted > 0, "mode {:?} painted nothing", mode);
            assert!(grid.depth.iter().any(|&d| d < FAR_DEPTH));
        }
    }

    #[test]
    fn test_render_frame_clears_previous_frame() {
        let mesh = Mesh::cube();
        let camera = Camera::new(Vec3::new(0.0, 0.0, 2.5));
        let proj = Mat4::perspective_rh_gl(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 7.0);
        let mvp = proj * camera.view_matrix();
        let settings = RasterSettings::default();

        let mut grid = FrameGrid::new(40, 40);
        render_frame(&mut grid, &mesh, mvp, &camera, &settings);

        // An empty mesh on the second frame leaves a fully blank grid
        let empty = Mesh {
            vertices: vec![],
            indices: vec![],
        };
        render_frame(&mut grid, &empty, mvp, &camera, &settings);
        assert!(grid.chars.iter().all(|&c| c == ' '));
        assert!(grid.depth.iter().all(|&d| d == FAR_DEPTH));
    }
}
