use glam::Vec3;

pub const CUBE_COUNT: usize = 3;
/// Distance between neighbouring cube centers along X.
pub const CUBE_SPACING: f32 = 3.0;
pub const VERTEX_ALPHA: f32 = 0.4;
/// 6 faces, 2 triangles each.
pub const INDEX_COUNT: u32 = 36;

/// Static vertex data for one cube: 24 vertices (4 per face), 36 indices.
///
/// Attributes live in separate arrays, one GPU buffer each.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeGeometry {
    pub index: usize,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u16>,
}

impl CubeGeometry {
    /// Build cube `index`: a 2-unit cube centered at `offset(index)`, colored
    /// `(index / 3, 0, 1, 0.4)`.
    pub fn build(index: usize) -> Self {
        let x1 = -1.0 + Self::offset(index).x;
        let x2 = 1.0 + Self::offset(index).x;
        let (z1, z2) = (-1.0, 1.0);

        #[rustfmt::skip]
        let positions = vec![
            // front
            [x1, -1.0, z2], [x2, -1.0, z2], [x2,  1.0, z2], [x1,  1.0, z2],
            // back
            [x1, -1.0, z1], [x1,  1.0, z1], [x2,  1.0, z1], [x2, -1.0, z1],
            // top
            [x1,  1.0, z1], [x1,  1.0, z2], [x2,  1.0, z2], [x2,  1.0, z1],
            // bottom
            [x1, -1.0, z1], [x2, -1.0, z1], [x2, -1.0, z2], [x1, -1.0, z2],
            // right
            [x2, -1.0, z1], [x2,  1.0, z1], [x2,  1.0, z2], [x2, -1.0, z2],
            // left
            [x1, -1.0, z1], [x1, -1.0, z2], [x1,  1.0, z2], [x1,  1.0, z1],
        ];

        let face_normals: [[f32; 3]; 6] = [
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
        ];
        let normals = face_normals.iter().flat_map(|n| [*n; 4]).collect();

        let color = [index as f32 / CUBE_COUNT as f32, 0.0, 1.0, VERTEX_ALPHA];
        let colors = vec![color; positions.len()];

        let indices = (0..6u16)
            .flat_map(|face| {
                let b = face * 4;
                [b, b + 1, b + 2, b, b + 2, b + 3]
            })
            .collect();

        Self {
            index,
            positions,
            normals,
            colors,
            indices,
        }
    }

    /// The full set, indexed `0..CUBE_COUNT`.
    pub fn all() -> [CubeGeometry; CUBE_COUNT] {
        std::array::from_fn(Self::build)
    }

    /// Center of cube `index` in its local (pre-camera) frame.
    pub fn offset(index: usize) -> Vec3 {
        Vec3::new(index as f32 * CUBE_SPACING, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_counts() {
        let g = CubeGeometry::build(0);
        assert_eq!(g.positions.len(), 24);
        assert_eq!(g.normals.len(), 24);
        assert_eq!(g.colors.len(), 24);
        assert_eq!(g.indices.len(), INDEX_COUNT as usize);
        assert!(g.indices.iter().all(|&i| (i as usize) < g.positions.len()));
        assert_eq!(&g.indices[..6], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(&g.indices[30..], &[20, 21, 22, 20, 22, 23]);
    }

    #[test]
    fn x_range_follows_index() {
        for (i, g) in CubeGeometry::all().iter().enumerate() {
            let min = g.positions.iter().map(|p| p[0]).fold(f32::MAX, f32::min);
            let max = g.positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
            assert_eq!(min, -1.0 + 3.0 * i as f32);
            assert_eq!(max, 1.0 + 3.0 * i as f32);
        }
    }

    #[test]
    fn neighbours_differ_only_in_x_and_red() {
        let a = CubeGeometry::build(0);
        let b = CubeGeometry::build(1);
        assert_eq!(a.normals, b.normals);
        assert_eq!(a.indices, b.indices);
        for (pa, pb) in a.positions.iter().zip(&b.positions) {
            assert_eq!(pb[0] - pa[0], CUBE_SPACING);
            assert_eq!(pa[1..], pb[1..]);
        }
        for (ca, cb) in a.colors.iter().zip(&b.colors) {
            assert_eq!(ca[0], 0.0);
            assert_eq!(cb[0], 1.0 / 3.0);
            assert_eq!(ca[1..], cb[1..]);
        }
    }

    #[test]
    fn normals_point_out_of_their_face() {
        let g = CubeGeometry::build(2);
        let center = CubeGeometry::offset(2);
        for (p, n) in g.positions.iter().zip(&g.normals) {
            let rel = Vec3::from_array(*p) - center;
            let n = Vec3::from_array(*n);
            assert_eq!(rel.dot(n), 1.0);
        }
    }

    #[test]
    fn vertex_alpha_is_translucent() {
        let g = CubeGeometry::build(1);
        assert!(g.colors.iter().all(|c| c[3] == VERTEX_ALPHA));
    }
}
