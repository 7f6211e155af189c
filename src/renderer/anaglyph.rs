use glam::Mat4;

use crate::math::stereo::background_projection;
use crate::math::{Eye, StereoCameraConfig, build_frustum, eye_model_view};
use crate::renderer::camera::DrawUniform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Background,
    Surface(Eye),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassPlan {
    pub label: &'static str,
    pub layer: Layer,
    pub clear_color: bool,
}

impl PassPlan {
    pub fn write_mask(&self) -> wgpu::ColorWrites {
        match self.layer {
            Layer::Background => wgpu::ColorWrites::ALL,
            Layer::Surface(eye) => eye_color_mask(eye),
        }
    }
}

pub const FRAME_PASSES: [PassPlan; 3] = [
    PassPlan {
        label: "Background Pass",
        layer: Layer::Background,
        clear_color: true,
    },
    PassPlan {
        label: "Left Eye Pass",
        layer: Layer::Surface(Eye::Left),
        clear_color: false,
    },
    PassPlan {
        label: "Right Eye Pass",
        layer: Layer::Surface(Eye::Right),
        clear_color: false,
    },
];

pub fn eye_color_mask(eye: Eye) -> wgpu::ColorWrites {
    match eye {
        Eye::Left => wgpu::ColorWrites::RED,
        Eye::Right => wgpu::ColorWrites::GREEN | wgpu::ColorWrites::BLUE,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrameInputs {
    pub rotation: Mat4,
    pub stereo: StereoCameraConfig,
}

pub fn layer_uniform(layer: Layer, inputs: &FrameInputs) -> DrawUniform {
    match layer {
        Layer::Background => DrawUniform::new(background_projection(), Mat4::IDENTITY),
        Layer::Surface(eye) => DrawUniform::new(
            build_frustum(&inputs.stereo, eye),
            eye_model_view(eye, inputs.rotation),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_masks_are_disjoint_and_cover_rgb() {
        let left = eye_color_mask(Eye::Left);
        let right = eye_color_mask(Eye::Right);
        assert!((left & right).is_empty());
        assert_eq!(left | right, wgpu::ColorWrites::COLOR);
        assert!(!left.contains(wgpu::ColorWrites::ALPHA));
        assert!(!right.contains(wgpu::ColorWrites::ALPHA));
    }

    #[test]
    fn background_then_left_then_right() {
        let layers: Vec<_> = FRAME_PASSES.iter().map(|p| p.layer).collect();
        assert_eq!(
            layers,
            vec![
                Layer::Background,
                Layer::Surface(Eye::Left),
                Layer::Surface(Eye::Right)
            ]
        );
    }

    #[test]
    fn only_background_clears_color() {
        assert!(FRAME_PASSES[0].clear_color);
        assert!(FRAME_PASSES[1..].iter().all(|p| !p.clear_color));
        assert_eq!(FRAME_PASSES[0].write_mask(), wgpu::ColorWrites::ALL);
        assert_eq!(FRAME_PASSES[1].write_mask(), wgpu::ColorWrites::RED);
    }

    #[test]
    fn layer_uniforms_use_per_eye_matrices() {
        let inputs = FrameInputs {
            rotation: Mat4::from_rotation_y(0.3),
            stereo: StereoCameraConfig::new(0.5, 10.0, 1.5, 0.4, 10.0),
        };

        let background = layer_uniform(Layer::Background, &inputs);
        assert_eq!(background.model_view, Mat4::IDENTITY.to_cols_array_2d());

        let left = layer_uniform(Layer::Surface(Eye::Left), &inputs);
        let right = layer_uniform(Layer::Surface(Eye::Right), &inputs);
        assert_ne!(left.projection, right.projection);
        assert_ne!(left.model_view, right.model_view);
        assert_eq!(
            left.projection,
            build_frustum(&inputs.stereo, Eye::Left).to_cols_array_2d()
        );
    }

    #[test]
    fn zero_separation_still_offsets_model_per_eye() {
        let inputs = FrameInputs {
            rotation: Mat4::IDENTITY,
            stereo: StereoCameraConfig::new(0.0, 10.0, 1.5, 0.4, 10.0),
        };
        let left = layer_uniform(Layer::Surface(Eye::Left), &inputs);
        let right = layer_uniform(Layer::Surface(Eye::Right), &inputs);
        assert_eq!(left.projection, right.projection);
        assert_eq!(left.model_view[3][0], -right.model_view[3][0]);
    }
}
