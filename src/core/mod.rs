pub mod camera;
pub mod lighting;

pub use camera::{Camera, CameraKind};
pub use lighting::{Light, LightCoordinator, LightRecord};
