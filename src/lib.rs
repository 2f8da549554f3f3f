//! Interactive drone-camera engine core: flight control with collision
//! avoidance, camera switching, and an event-driven day/night light
//! schedule. Rendering is left to an external collaborator behind
//! [`engine::Renderer`].

pub mod camera_registry;
pub mod collision;
pub mod config;
pub mod core;
pub mod engine;
pub mod events;
pub mod flight;
pub mod loader;
pub mod mesh;
pub mod time;
pub mod world;

pub use crate::camera_registry::CameraRegistry;
pub use crate::collision::CollisionIndex;
pub use crate::config::EngineConfig;
pub use crate::core::{Camera, CameraKind, Light, LightCoordinator};
pub use crate::events::{EventBus, EventKind, WorldEvent};
pub use crate::flight::{FlightController, PressedKeys};
pub use crate::time::TimeScheduler;
pub use crate::world::World;
