pub mod anaglyph;
pub mod camera;
pub mod gpu;
pub mod mesh;
pub mod texture;

pub use anaglyph::FrameInputs;
pub use camera::Trackball;
pub use gpu::RenderContext;
pub use texture::checkerboard;
