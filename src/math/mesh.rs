#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryBuffer {
    pub positions: Vec<f32>,
    pub tex_coords: Vec<f32>,
}

impl GeometryBuffer {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            tex_coords: Vec::with_capacity(vertices * 2),
        }
    }

    pub fn push_vertex(&mut self, position: [f64; 3], tex_coord: [f64; 2]) {
        self.positions.extend(position.map(|c| c as f32));
        self.tex_coords.extend(tex_coord.map(|c| c as f32));
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub fn video_quad() -> GeometryBuffer {
    GeometryBuffer {
        positions: vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0,
        ],
        tex_coords: vec![
            1.0, 1.0, //
            0.0, 1.0, //
            0.0, 0.0, //
            0.0, 0.0, //
            1.0, 0.0, //
            1.0, 1.0,
        ],
    }
}
