use glam::{Mat4, Vec3};

pub const FAR_PLANE: f32 = 50.0;
pub const SURFACE_DISTANCE: f32 = 20.0;
pub const EYE_MODEL_OFFSET: f32 = 0.03;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn model_offset(self) -> f32 {
        match self {
            Eye::Left => -EYE_MODEL_OFFSET,
            Eye::Right => EYE_MODEL_OFFSET,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StereoCameraConfig {
    pub eye_separation: f32,
    pub convergence: f32,
    pub aspect_ratio: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl StereoCameraConfig {
    pub fn new(eye_separation: f32, convergence: f32, aspect_ratio: f32, fov: f32, near: f32) -> Self {
        Self {
            eye_separation,
            convergence,
            aspect_ratio,
            fov,
            near,
            far: FAR_PLANE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrustumBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl FrustumBounds {
    /// Off-axis bounds for `eye`. The two eyes get horizontally skewed
    /// mirror images of the same box; no camera is rotated.
    ///
    /// `convergence` must be non-zero and `fov` inside `(0, π)`. Neither is
    /// checked here.
    pub fn for_eye(camera: &StereoCameraConfig, eye: Eye) -> Self {
        let half_fov_tan = (camera.fov / 2.0).tan();
        let top = camera.near * half_fov_tan;
        let bottom = -top;

        let a = camera.aspect_ratio * half_fov_tan * camera.convergence;
        let b = a - camera.eye_separation / 2.0;
        let c = a + camera.eye_separation / 2.0;

        let scale = camera.near / camera.convergence;
        let (left, right) = match eye {
            Eye::Left => (-b * scale, c * scale),
            Eye::Right => (-c * scale, b * scale),
        };

        Self {
            left,
            right,
            bottom,
            top,
            near: camera.near,
            far: camera.far,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

pub fn build_frustum(camera: &StereoCameraConfig, eye: Eye) -> Mat4 {
    FrustumBounds::for_eye(camera, eye).to_matrix()
}

pub fn eye_model_view(eye: Eye, rotation: Mat4) -> Mat4 {
    Mat4::from_translation(Vec3::new(eye.model_offset(), 0.0, -SURFACE_DISTANCE)) * rotation
}

pub fn background_projection() -> Mat4 {
    Mat4::orthographic_rh(0.0, 1.0, 0.0, 1.0, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use glam::Vec4;

    fn camera() -> StereoCameraConfig {
        StereoCameraConfig::new(0.5, 10.0, 16.0 / 9.0, 0.4, 10.0)
    }

    #[test]
    fn eyes_are_horizontal_mirror_images() {
        let cfg = camera();
        let left = FrustumBounds::for_eye(&cfg, Eye::Left);
        let right = FrustumBounds::for_eye(&cfg, Eye::Right);

        assert_relative_eq!(left.left, -right.right);
        assert_relative_eq!(left.right, -right.left);
        assert_eq!(left.top, right.top);
        assert_eq!(left.bottom, right.bottom);
        assert_eq!(left.near, right.near);
        assert_eq!(left.far, right.far);
    }

    #[test]
    fn zero_separation_collapses_stereo() {
        let cfg = StereoCameraConfig {
            eye_separation: 0.0,
            ..camera()
        };
        assert_eq!(build_frustum(&cfg, Eye::Left), build_frustum(&cfg, Eye::Right));
    }

    #[test]
    fn bounds_follow_closed_form() {
        let cfg = camera();
        let t = (0.2f32).tan();
        let a = cfg.aspect_ratio * t * cfg.convergence;

        let left = FrustumBounds::for_eye(&cfg, Eye::Left);
        assert_relative_eq!(left.top, 10.0 * t);
        assert_relative_eq!(left.bottom, -10.0 * t);
        assert_relative_eq!(left.left, -(a - 0.25) * 10.0 / 10.0);
        assert_relative_eq!(left.right, (a + 0.25) * 10.0 / 10.0);
        assert_eq!(left.far, FAR_PLANE);
    }

    #[test]
    fn separation_skews_frustum_by_half_separation_times_near_over_convergence() {
        let cfg = StereoCameraConfig::new(1.0, 20.0, 1.0, 1.0, 5.0);
        let centered = FrustumBounds::for_eye(
            &StereoCameraConfig {
                eye_separation: 0.0,
                ..cfg
            },
            Eye::Left,
        );
        let left = FrustumBounds::for_eye(&cfg, Eye::Left);
        let shift = 0.5 * 5.0 / 20.0;

        assert_relative_eq!(left.left, centered.left + shift, epsilon = 1e-6);
        assert_relative_eq!(left.right, centered.right + shift, epsilon = 1e-6);
    }

    #[test]
    fn matrix_maps_bounds_to_clip_box() {
        let cfg = camera();
        for eye in [Eye::Left, Eye::Right] {
            let bounds = FrustumBounds::for_eye(&cfg, eye);
            let m = bounds.to_matrix();

            let near_corner = m * Vec4::new(bounds.left, bounds.bottom, -bounds.near, 1.0);
            assert_abs_diff_eq!(near_corner.x, -1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(near_corner.y, -1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(near_corner.z, 0.0, epsilon = 1e-5);

            let far_corner = m * Vec4::new(bounds.right, bounds.top, -bounds.far, 1.0);
            assert_abs_diff_eq!(far_corner.x, 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(far_corner.y, 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(far_corner.z, 1.0, epsilon = 1e-5);
            assert_eq!(far_corner.w, 1.0);
        }
    }

    #[test]
    fn model_view_places_surface_in_front_of_both_eyes() {
        for eye in [Eye::Left, Eye::Right] {
            let p = eye_model_view(eye, Mat4::IDENTITY).transform_point3(Vec3::ZERO);
            assert_eq!(p, Vec3::new(eye.model_offset(), 0.0, -SURFACE_DISTANCE));
        }
        assert!(Eye::Left.model_offset() < 0.0);
        assert_eq!(Eye::Left.model_offset(), -Eye::Right.model_offset());
    }

    #[test]
    fn surface_depth_lies_between_default_planes() {
        let cfg = camera();
        let m = build_frustum(&cfg, Eye::Left) * eye_model_view(Eye::Left, Mat4::IDENTITY);
        let clip = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn background_projection_maps_unit_square() {
        let m = background_projection();
        let lo = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let hi = m * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert_abs_diff_eq!(lo.x, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lo.y, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(hi.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(hi.y, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(lo.z, 0.5, epsilon = 1e-6);
    }
}
