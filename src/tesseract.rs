//! Rotating tesseract (4D hypercube) wireframe.
//!
//! The 16 corners of the hypercube are rotated in 4D by a slowly morphing
//! matrix and then projected into 3D by perspective division along the w axis:
//!
//! ```text
//! (x, y, z, w)  ->  (x, y, z) / (w + d)
//! ```
//!
//! where `d` is the viewer distance (4 by default). The resulting 3D segments
//! are handed to the renderer, which views them through an ordinary
//! perspective camera.
//!
//! The edge topology is computed once from the canonical corners and reused
//! every frame. Once rotated, corners no longer differ in exactly one
//! coordinate, so recomputing adjacency from transformed positions would lose
//! edges.
//!
//! # Example
//!
//! ```
//! use hyperfield::tesseract::{Tesseract, TesseractConfig};
//!
//! let mut tesseract = Tesseract::new(&TesseractConfig::default());
//! tesseract.advance();
//! assert_eq!(tesseract.segments().len(), 32);
//! ```

use glam::{Mat4, Vec3, Vec4};

use crate::camera::PerspectiveCamera;

/// Corners of the 4D hypercube.
pub const VERTEX_COUNT: usize = 16;

/// Edges of the 4D hypercube.
pub const EDGE_COUNT: usize = 32;

/// Distance of the 4D viewer along the w axis.
pub const DEFAULT_VIEWER_DISTANCE: f32 = 4.0;

/// Smallest perspective denominator still considered projectable.
const MIN_DEPTH: f32 = 1e-4;

/// The 16 corners of the `[-1, 1]^4` hypercube in binary counting order.
///
/// Bit `j` of the corner index selects the sign of coordinate `j`
/// (set: +1, clear: -1).
pub fn tesseract_vertices() -> Vec<Vec4> {
    (0..VERTEX_COUNT)
        .map(|i| {
            let sign = |bit: usize| if (i >> bit) & 1 == 1 { 1.0 } else { -1.0 };
            Vec4::new(sign(0), sign(1), sign(2), sign(3))
        })
        .collect()
}

/// An undirected edge between two vertex indices, `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

/// Pairs of vertices that differ in exactly one coordinate.
pub fn generate_edges(vertices: &[Vec4]) -> Vec<Edge> {
    let mut edges = Vec::new();
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            let a = vertices[i].to_array();
            let b = vertices[j].to_array();
            let differing = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
            if differing == 1 {
                edges.push(Edge { a: i, b: j });
            }
        }
    }
    edges
}

/// Perspective-divide a 4D point into 3D.
///
/// Returns `None` when the point sits at or behind the viewer
/// (`w + viewer_distance` not clearly positive) or the result is not finite.
pub fn project_to_3d(v: Vec4, viewer_distance: f32) -> Option<Vec3> {
    let depth = v.w + viewer_distance;
    if !(depth > MIN_DEPTH) {
        return None;
    }
    let p = v.truncate() / depth;
    p.is_finite().then_some(p)
}

/// How the rotation is applied from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Rotate the canonical corners by the current matrix every frame.
    ///
    /// The shape only ever reflects the latest matrix, so drift stays bounded
    /// by how far the matrix itself has morphed.
    #[default]
    Fresh,
    /// Rotate the previous frame's corners again every frame.
    ///
    /// Transforms compound. Because the morphed matrix is no longer
    /// orthogonal, the shape grows without bound and eventually stops being
    /// projectable.
    Cumulative,
}

/// A 4x4 matrix that starts as a rotation in the (0,1) and (2,3) planes and
/// drifts away from orthogonality a little every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphingRotation {
    matrix: Mat4,
    morph_step: f32,
    morph_diagonal: [bool; 4],
}

impl MorphingRotation {
    /// Rotation by `angle` radians in both the (0,1) and (2,3) planes.
    pub fn new(angle: f32, morph_step: f32, morph_diagonal: [bool; 4]) -> Self {
        let (s, c) = angle.sin_cos();
        let rows = [
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, c, -s],
            [0.0, 0.0, s, c],
        ];
        Self {
            // from_cols_array_2d reads columns, the literal above is rows
            matrix: Mat4::from_cols_array_2d(&rows).transpose(),
            morph_step,
            morph_diagonal,
        }
    }

    /// Output coordinate `i` is row `i` dotted with `v`.
    pub fn apply(&self, v: Vec4) -> Vec4 {
        self.matrix * v
    }

    /// Nudge the selected diagonal entries by the morph step.
    pub fn morph(&mut self) {
        for (i, enabled) in self.morph_diagonal.iter().enumerate() {
            if *enabled {
                self.matrix.col_mut(i)[i] += self.morph_step;
            }
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

/// Settings for the tesseract layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TesseractConfig {
    /// Initial rotation angle (radians) in each of the two planes.
    pub angle: f32,
    /// Amount added to each morphing diagonal entry per frame.
    pub morph_step: f32,
    /// Which diagonal entries morph.
    pub morph_diagonal: [bool; 4],
    /// Perspective viewer distance along w.
    pub viewer_distance: f32,
    pub mode: RotationMode,
    /// Wireframe color (RGBA, 0.0-1.0).
    pub color: Vec4,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            angle: 0.01,
            morph_step: 0.001,
            morph_diagonal: [true, true, true, false],
            viewer_distance: DEFAULT_VIEWER_DISTANCE,
            mode: RotationMode::Fresh,
            color: Vec4::new(0.0, 1.0, 0.0, 1.0),
        }
    }
}

impl TesseractConfig {
    pub fn with_mode(mut self, mode: RotationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_morph(mut self, step: f32, diagonal: [bool; 4]) -> Self {
        self.morph_step = step;
        self.morph_diagonal = diagonal;
        self
    }

    pub fn with_viewer_distance(mut self, distance: f32) -> Self {
        self.viewer_distance = distance;
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.viewer_distance > 1.0) || !self.viewer_distance.is_finite() {
            // The unit hypercube reaches w = -1, so anything closer clips
            // the shape on the very first frame.
            return Err(format!(
                "tesseract viewer distance must be greater than 1, got {}",
                self.viewer_distance
            ));
        }
        if !self.angle.is_finite() || !self.morph_step.is_finite() {
            return Err("tesseract angle and morph step must be finite".to_string());
        }
        Ok(())
    }
}

/// A projected edge, ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec3,
    pub b: Vec3,
}

/// The tesseract layer's state.
#[derive(Debug, Clone)]
pub struct Tesseract {
    canonical: Vec<Vec4>,
    vertices: Vec<Vec4>,
    edges: Vec<Edge>,
    segments: Vec<Segment>,
    rotation: MorphingRotation,
    mode: RotationMode,
    viewer_distance: f32,
    frame: u64,
    clipped_reported: bool,
}

impl Tesseract {
    pub fn new(config: &TesseractConfig) -> Self {
        let canonical = tesseract_vertices();
        let edges = generate_edges(&canonical);
        let mut tesseract = Self {
            vertices: canonical.clone(),
            canonical,
            edges,
            segments: Vec::with_capacity(EDGE_COUNT),
            rotation: MorphingRotation::new(config.angle, config.morph_step, config.morph_diagonal),
            mode: config.mode,
            viewer_distance: config.viewer_distance,
            frame: 0,
            clipped_reported: false,
        };
        tesseract.rebuild_segments();
        tesseract
    }

    /// Advance one frame: rotate with the current matrix, then morph it for
    /// the next frame.
    pub fn advance(&mut self) {
        match self.mode {
            RotationMode::Fresh => {
                for (live, canonical) in self.vertices.iter_mut().zip(&self.canonical) {
                    *live = self.rotation.apply(*canonical);
                }
            }
            RotationMode::Cumulative => {
                for live in self.vertices.iter_mut() {
                    *live = self.rotation.apply(*live);
                }
            }
        }
        self.rotation.morph();
        self.frame += 1;
        self.rebuild_segments();
    }

    fn rebuild_segments(&mut self) {
        let d = self.viewer_distance;
        let vertices = &self.vertices;
        self.segments.clear();
        self.segments.extend(self.edges.iter().filter_map(|e| {
            let a = project_to_3d(vertices[e.a], d)?;
            let b = project_to_3d(vertices[e.b], d)?;
            Some(Segment { a, b })
        }));

        let dropped = self.edges.len() - self.segments.len();
        if dropped > 0 && !self.clipped_reported {
            log::warn!(
                "tesseract frame {}: {} of {} edges no longer projectable",
                self.frame,
                dropped,
                self.edges.len()
            );
            self.clipped_reported = true;
        }
    }

    /// The unrotated corners.
    pub fn canonical(&self) -> &[Vec4] {
        &self.canonical
    }

    /// The corners as of the last [`advance`](Self::advance).
    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Projected edges as of the last [`advance`](Self::advance).
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The matrix the next [`advance`](Self::advance) will apply.
    pub fn rotation(&self) -> &MorphingRotation {
        &self.rotation
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// The tesseract together with the camera it is viewed through.
#[derive(Debug, Clone)]
pub struct TesseractView {
    tesseract: Tesseract,
    camera: PerspectiveCamera,
}

impl TesseractView {
    pub fn new(config: &TesseractConfig, width: u32, height: u32) -> Self {
        Self {
            tesseract: Tesseract::new(config),
            camera: PerspectiveCamera::for_size(width, height),
        }
    }

    pub fn advance(&mut self) {
        self.tesseract.advance();
    }

    /// Match the camera to a new output size. Nothing else changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    pub fn segments(&self) -> &[Segment] {
        self.tesseract.segments()
    }

    pub fn view_proj(&self) -> Mat4 {
        self.camera.view_proj()
    }

    pub fn tesseract(&self) -> &Tesseract {
        &self.tesseract
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn signs(v: Vec4) -> [i8; 4] {
        v.to_array().map(|c| if c > 0.0 { 1 } else { -1 })
    }

    #[test]
    fn test_vertices_are_all_sign_vectors_once() {
        let vertices = tesseract_vertices();
        assert_eq!(vertices.len(), VERTEX_COUNT);

        let unique: HashSet<[i8; 4]> = vertices.iter().map(|v| signs(*v)).collect();
        assert_eq!(unique.len(), 16);
        for v in &vertices {
            assert!(v.to_array().iter().all(|c| *c == 1.0 || *c == -1.0));
        }
    }

    #[test]
    fn test_vertices_binary_order() {
        let vertices = tesseract_vertices();
        assert_eq!(vertices[0], Vec4::splat(-1.0));
        assert_eq!(vertices[1], Vec4::new(1.0, -1.0, -1.0, -1.0));
        assert_eq!(vertices[6], Vec4::new(-1.0, 1.0, 1.0, -1.0));
        assert_eq!(vertices[15], Vec4::ONE);
    }

    #[test]
    fn test_edges_form_regular_hypercube() {
        let vertices = tesseract_vertices();
        let edges = generate_edges(&vertices);
        assert_eq!(edges.len(), EDGE_COUNT);

        let mut degree = [0usize; VERTEX_COUNT];
        for e in &edges {
            assert!(e.a < e.b);
            // adjacent corners differ in exactly one bit of their index
            assert_eq!((e.a ^ e.b).count_ones(), 1);
            degree[e.a] += 1;
            degree[e.b] += 1;
        }
        assert!(degree.iter().all(|d| *d == 4));
    }

    #[test]
    fn test_rotated_coordinates_lose_adjacency() {
        let rotation = MorphingRotation::new(0.01, 0.0, [false; 4]);
        let rotated: Vec<Vec4> = tesseract_vertices().into_iter().map(|v| rotation.apply(v)).collect();
        assert!(generate_edges(&rotated).is_empty());
    }

    #[test]
    fn test_initial_matrix_is_orthogonal() {
        let m = MorphingRotation::new(0.01, 0.001, [true; 4]).matrix();
        assert!((m.transpose() * m).abs_diff_eq(Mat4::IDENTITY, 1e-6));
        assert!((m.row(0).x - 0.01f32.cos()).abs() < 1e-7);
        assert!((m.row(0).y + 0.01f32.sin()).abs() < 1e-7);
        assert!((m.row(3).z - 0.01f32.sin()).abs() < 1e-7);
    }

    #[test]
    fn test_apply_is_row_dot_vector() {
        let rotation = MorphingRotation::new(0.3, 0.0, [false; 4]);
        let v = Vec4::new(1.0, -2.0, 0.5, 3.0);
        let out = rotation.apply(v);
        for i in 0..4 {
            assert!((out[i] - rotation.matrix().row(i).dot(v)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_morph_touches_selected_diagonal_only() {
        let mut rotation = MorphingRotation::new(0.01, 0.001, [true, true, true, false]);
        let before = rotation.matrix();
        rotation.morph();
        let diff = rotation.matrix() - before;

        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j && i < 3 { 0.001 } else { 0.0 };
                assert!((diff.row(i)[j] - expected).abs() < 1e-6, "entry ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_projection_bounded_for_unit_coordinates() {
        let steps = [-1.0, -0.5, 0.0, 0.5, 1.0];
        for &x in &steps {
            for &y in &steps {
                for &z in &steps {
                    for &w in &steps {
                        let v = Vec4::new(x, y, z, w);
                        let depth = w + DEFAULT_VIEWER_DISTANCE;
                        assert!((3.0..=5.0).contains(&depth));
                        let p = project_to_3d(v, DEFAULT_VIEWER_DISTANCE).unwrap();
                        assert!(p.is_finite());
                        assert!(p.abs().max_element() <= 1.0 / 3.0 + 1e-6);
                    }
                }
            }
        }
    }

    #[test]
    fn test_projection_rejects_viewer_plane() {
        assert!(project_to_3d(Vec4::new(1.0, 1.0, 1.0, -4.0), 4.0).is_none());
        assert!(project_to_3d(Vec4::new(1.0, 1.0, 1.0, -5.0), 4.0).is_none());
        assert!(project_to_3d(Vec4::new(f32::NAN, 0.0, 0.0, 0.0), 4.0).is_none());
    }

    #[test]
    fn test_projection_divides_by_depth() {
        let p = project_to_3d(Vec4::new(1.0, -1.0, 1.0, 1.0), 4.0).unwrap();
        assert!(p.abs_diff_eq(Vec3::new(0.2, -0.2, 0.2), 1e-6));
    }

    #[test]
    fn test_fresh_mode_uses_latest_matrix_on_canonical() {
        let config = TesseractConfig::default();
        let mut tesseract = Tesseract::new(&config);

        let mut expected = MorphingRotation::new(config.angle, config.morph_step, config.morph_diagonal);
        expected.morph();
        expected.morph();

        for _ in 0..3 {
            tesseract.advance();
        }

        for (live, canonical) in tesseract.vertices().iter().zip(tesseract.canonical()) {
            assert!(live.abs_diff_eq(expected.apply(*canonical), 1e-5));
        }
        assert_eq!(tesseract.edges(), generate_edges(&tesseract_vertices()).as_slice());
        assert_eq!(tesseract.frame(), 3);
    }

    #[test]
    fn test_cumulative_mode_compounds() {
        let config = TesseractConfig::default().with_mode(RotationMode::Cumulative);
        let mut tesseract = Tesseract::new(&config);

        let m0 = MorphingRotation::new(config.angle, config.morph_step, config.morph_diagonal);
        let mut m1 = m0.clone();
        m1.morph();

        tesseract.advance();
        tesseract.advance();

        for (live, canonical) in tesseract.vertices().iter().zip(tesseract.canonical()) {
            assert!(live.abs_diff_eq(m1.apply(m0.apply(*canonical)), 1e-5));
        }
    }

    #[test]
    fn test_fresh_mode_stays_projectable() {
        let mut tesseract = Tesseract::new(&TesseractConfig::default());
        for _ in 0..10_000 {
            tesseract.advance();
        }
        // The w row never morphs, so w stays within cos + sin of the angle.
        assert!(tesseract.vertices().iter().all(|v| v.w.abs() < 1.02));
        assert_eq!(tesseract.segments().len(), EDGE_COUNT);
    }

    #[test]
    fn test_cumulative_mode_eventually_clips() {
        let config = TesseractConfig::default()
            .with_mode(RotationMode::Cumulative)
            .with_morph(0.05, [true; 4]);
        let mut tesseract = Tesseract::new(&config);
        for _ in 0..200 {
            tesseract.advance();
        }
        assert!(tesseract.segments().len() < EDGE_COUNT);
    }

    #[test]
    fn test_segments_before_first_frame_are_canonical() {
        let tesseract = Tesseract::new(&TesseractConfig::default());
        assert_eq!(tesseract.segments().len(), EDGE_COUNT);
        let s = tesseract.segments()[0];
        let e = tesseract.edges()[0];
        let expected_a = project_to_3d(tesseract.canonical()[e.a], DEFAULT_VIEWER_DISTANCE).unwrap();
        assert_eq!(s.a, expected_a);
    }

    #[test]
    fn test_view_resize_only_touches_camera() {
        let mut view = TesseractView::new(&TesseractConfig::default(), 1280, 720);
        view.advance();
        let vertices = view.tesseract().vertices().to_vec();

        view.resize(600, 600);
        assert_eq!(view.camera().aspect, 1.0);
        assert_eq!(view.tesseract().vertices(), vertices.as_slice());
        assert_eq!(view.tesseract().frame(), 1);
    }

    #[test]
    fn test_config_validation() {
        assert!(TesseractConfig::default().validate().is_ok());
        assert!(TesseractConfig::default().with_viewer_distance(0.5).validate().is_err());
        assert!(TesseractConfig::default().with_angle(f32::INFINITY).validate().is_err());
    }
}
