use std::time::{Duration, Instant};

use glam::{Mat4, Quat, Vec2};

const DOUBLE_CLICK: Duration = Duration::from_millis(400);

pub struct Trackball {
    pub yaw: f32,
    pub pitch: f32,
    pub sensitivity: f32,
    pub dragging: bool,
    last_press: Option<Instant>,
}

impl Default for Trackball {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.01,
            dragging: false,
            last_press: None,
        }
    }
}

impl Trackball {
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw))
    }

    pub fn process_mouse_movement(&mut self, delta: Vec2) {
        if !self.dragging {
            return;
        }

        self.yaw += delta.x * self.sensitivity;
        self.pitch += delta.y * self.sensitivity;

        let max_pitch = 89.0_f32.to_radians();
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
        self.yaw = self.yaw.rem_euclid(std::f32::consts::TAU);
    }

    pub fn press(&mut self, now: Instant) -> bool {
        let double = self
            .last_press
            .is_some_and(|prev| now.saturating_duration_since(prev) <= DOUBLE_CLICK);
        if double {
            self.reset();
            self.last_press = None;
        } else {
            self.last_press = Some(now);
        }
        self.dragging = true;
        double
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
}

impl DrawUniform {
    pub fn new(projection: Mat4, model_view: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
        }
    }
}
