use crate::geometry::CubeGeometry;
use glam::{Mat4, Vec3};
use std::f64::consts::TAU;

/// Fixed perspective camera looking down -Z at the row of cubes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// How far in front of the eye the row of cubes sits.
    pub distance: f32,
    /// Shift applied to every cube so the middle one lands on the view axis.
    pub row_shift: f32,
    /// Axis every cube spins around (normalized on use).
    pub rotation_axis: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            distance: 20.0,
            row_shift: -3.0,
            rotation_axis: Vec3::new(0.0, 1.0, 1.0),
        }
    }
}

impl Camera {
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Model-view for cube `index`: spin around the cube's own center, then
    /// shift into the row and push out to the viewing distance.
    pub fn model_view(&self, index: usize, rotation_angle: f64) -> Mat4 {
        let center = CubeGeometry::offset(index);
        // reduce in f64 so long sessions keep full f32 precision
        let angle = (rotation_angle + 10.0 * index as f64).rem_euclid(TAU) as f32;

        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_translation(center + Vec3::new(self.row_shift, 0.0, 0.0))
            * Mat4::from_axis_angle(self.rotation_axis.normalize(), angle)
            * Mat4::from_translation(-center)
    }

    /// Inverse-transpose of the model-view, for transforming normals.
    pub fn normal_matrix(model_view: Mat4) -> Mat4 {
        model_view.inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        let p = cam.projection_matrix();
        assert!(!p.col(0).x.is_nan());
        assert!((cam.fov - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut cam = Camera::default();
        cam.set_viewport(800, 400);
        assert_eq!(cam.aspect, 2.0);
        cam.set_viewport(800, 0);
        assert_eq!(cam.aspect, 800.0);
    }

    #[test]
    fn cubes_spin_about_their_own_center() {
        let cam = Camera::default();
        for index in 0..3 {
            let center = CubeGeometry::offset(index);
            let expected = Vec3::new(3.0 * index as f32 - 3.0, 0.0, -20.0);
            for angle in [0.0, 0.7, 2.5, 1234.5] {
                let mv = cam.model_view(index, angle);
                assert!(approx(mv.transform_point3(center), expected));
            }
        }
    }

    #[test]
    fn cubes_have_distinct_phase() {
        let cam = Camera::default();
        let corner = |i: usize| {
            let mv = cam.model_view(i, 0.0);
            mv.transform_point3(CubeGeometry::offset(i) + Vec3::ONE)
                - mv.transform_point3(CubeGeometry::offset(i))
        };
        assert!(!approx(corner(0), corner(1)));
    }

    #[test]
    fn angle_reduction_matches_unreduced() {
        let cam = Camera::default();
        let a = cam.model_view(1, 1.25);
        let b = cam.model_view(1, 1.25 + 4.0 * TAU);
        assert!(a.abs_diff_eq(b, 1e-4));
    }

    #[test]
    fn normal_matrix_of_rigid_transform_is_its_rotation() {
        let cam = Camera::default();
        let mv = cam.model_view(2, 0.9);
        let nm = Camera::normal_matrix(mv);
        for n in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.0, -1.0, 0.0)] {
            assert!(approx(nm.transform_vector3(n), mv.transform_vector3(n)));
        }
    }

    #[test]
    fn middle_cube_projects_to_screen_center() {
        let cam = Camera::default();
        let mv = cam.model_view(1, 0.3);
        let clip = cam.projection_matrix() * mv * CubeGeometry::offset(1).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
