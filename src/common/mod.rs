pub mod duration;
pub mod render;
pub mod types;

pub use duration::*;
pub use render::*;
