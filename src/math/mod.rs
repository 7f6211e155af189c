pub mod mesh;
pub mod stereo;
pub mod surface;

pub use mesh::{GeometryBuffer, video_quad};
pub use stereo::{Eye, StereoCameraConfig, build_frustum, eye_model_view};
pub use surface::{DEFAULT_STEP, MAX_VERTICES, MIN_RADIUS, planned_vertices, tessellate};
