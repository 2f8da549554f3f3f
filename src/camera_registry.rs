use glam::Vec3;
use log::info;

use crate::config::CameraConfigData;
use crate::core::{Camera, CameraKind};

/// Named camera collection with exactly one active camera.
///
/// Cycling order is registration order: drone, debug, stationary.
pub struct CameraRegistry {
    cameras: Vec<Camera>,
    active: usize,
}

impl CameraRegistry {
    pub fn new(config: &CameraConfigData) -> Self {
        let mut drone = Camera::new(CameraKind::Drone, config.position, config.look_at);
        drone.set_fov(config.fov.to_radians());

        // Debug camera hovers above the start pose for an overview
        let debug = Camera::new(
            CameraKind::Debug,
            config.position + Vec3::new(0.0, 200.0, 100.0),
            config.look_at,
        );

        // Stationary vantage over the base layout
        let stationary = Camera::new(
            CameraKind::Stationary,
            Vec3::new(400.0, 300.0, 150.0),
            Vec3::new(400.0, 0.0, -300.0),
        );

        Self {
            cameras: vec![drone, debug, stationary],
            active: 0,
        }
    }

    /// Advance to the next camera, wrapping, and return its name
    pub fn cycle(&mut self) -> &'static str {
        self.active = (self.active + 1) % self.cameras.len();
        let name = self.cameras[self.active].kind().name();
        info!("active camera: {}", name);
        name
    }

    /// Restore the drone camera to its start pose and make it active
    pub fn reset(&mut self) {
        for (index, camera) in self.cameras.iter_mut().enumerate() {
            if camera.kind() == CameraKind::Drone {
                camera.reset_pose();
                self.active = index;
                break;
            }
        }
        info!("drone camera reset");
    }

    pub fn get(&self, kind: CameraKind) -> Option<&Camera> {
        self.cameras.iter().find(|camera| camera.kind() == kind)
    }

    pub fn get_mut(&mut self, kind: CameraKind) -> Option<&mut Camera> {
        self.cameras.iter_mut().find(|camera| camera.kind() == kind)
    }

    pub fn active(&self) -> &Camera {
        &self.cameras[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.active]
    }
}
