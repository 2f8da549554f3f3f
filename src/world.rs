/// Composition root
///
/// Owns every subsystem, wires the event bus between them, and advances one
/// frame at a time for the engine shell.
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use log::{info, warn};

use crate::camera_registry::CameraRegistry;
use crate::collision::CollisionIndex;
use crate::config::EngineConfig;
use crate::core::lighting::{make_flashlight, make_sun};
use crate::core::{CameraKind, LightCoordinator};
use crate::events::{EventBus, WorldEvent};
use crate::flight::{FlightController, PressedKeys};
use crate::loader::{LoadTask, ModelLoader};
use crate::mesh::Mesh;
use crate::time::TimeScheduler;

pub struct World {
    bus: Rc<RefCell<EventBus>>,
    pub registry: CameraRegistry,
    pub flight: FlightController,
    pub collision: CollisionIndex,
    pub scheduler: TimeScheduler,
    lights: Rc<RefCell<LightCoordinator>>,
    /// Loaded scene geometry, for the renderer to consume
    pub meshes: Vec<Mesh>,
    pending_loads: Vec<LoadTask>,
}

impl World {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let bus = Rc::new(RefCell::new(EventBus::new()));

        let lights = Rc::new(RefCell::new(LightCoordinator::new()));
        let _listener = LightCoordinator::subscribe(&lights, &bus);

        let registry = CameraRegistry::new(&config.camera);
        let mut flight = FlightController::new(&config.flight);

        // The original scene's lights: sun overhead, a soft fill, and the
        // drone's flashlight, which only comes on at night
        let sun = Rc::new(RefCell::new(make_sun()));
        let fill = Rc::new(RefCell::new(make_sun()));
        let flashlight = Rc::new(RefCell::new(make_flashlight(
            config.camera.position,
            (config.camera.look_at - config.camera.position).normalize_or_zero(),
        )));
        {
            let mut coordinator = lights.borrow_mut();
            coordinator.add_light(Rc::clone(&sun), "sun", 10.0, 0.5);
            coordinator.add_light(Rc::clone(&fill), "fill", 1.0, 0.1);
            coordinator.add_light(Rc::clone(&flashlight), "flashlight", 0.0, 5.0);
        }
        flight.set_flashlight(flashlight);

        let mut scheduler = TimeScheduler::new(Rc::clone(&bus), &config.time);
        scheduler.start_updating()?;

        Ok(Self {
            bus,
            registry,
            flight,
            collision: CollisionIndex::new(),
            scheduler,
            lights,
            meshes: Vec::new(),
            pending_loads: Vec::new(),
        })
    }

    /// Start streaming a model in; its meshes register as collidable when
    /// the load completes.
    pub fn load_model(&mut self, path: &str) {
        self.pending_loads.push(ModelLoader::load(path));
    }

    /// One frame: ingest finished loads, poll the clock, fly the camera
    pub fn update(&mut self, dt: f32, pressed: &PressedKeys) -> Result<()> {
        self.poll_loads();
        self.scheduler.tick()?;
        self.flight
            .update_position(dt, pressed, &mut self.registry, &mut self.collision);
        Ok(())
    }

    /// Single writer into the collision index: finished batches land here
    /// and nowhere else.
    fn poll_loads(&mut self) {
        let pending = std::mem::take(&mut self.pending_loads);
        for mut task in pending {
            match task.try_take() {
                Some(Ok(batch)) => {
                    info!("model '{}' ready, {} meshes", task.path(), batch.len());
                    for mesh in batch {
                        self.collision.register_mesh(&mesh, true);
                        self.meshes.push(mesh);
                    }
                }
                Some(Err(_)) => {
                    // Already logged by the loader; the world keeps running
                    // with whatever geometry it has
                    warn!("continuing without '{}'", task.path());
                }
                None => self.pending_loads.push(task),
            }
        }
    }

    pub fn cycle_camera(&mut self) -> Result<&'static str> {
        let name = self.registry.cycle();
        self.bus
            .borrow_mut()
            .emit(&WorldEvent::CameraChange { name })?;
        Ok(name)
    }

    pub fn reset_camera(&mut self) -> Result<()> {
        self.registry.reset();
        self.bus.borrow_mut().emit(&WorldEvent::CameraChange {
            name: CameraKind::Drone.name(),
        })
    }

    pub fn bus(&self) -> Rc<RefCell<EventBus>> {
        Rc::clone(&self.bus)
    }

    pub fn lights(&self) -> Rc<RefCell<LightCoordinator>> {
        Rc::clone(&self.lights)
    }

    /// Intensity of a named light right now, if registered
    pub fn light_intensity(&self, name: &str) -> Option<f32> {
        self.lights
            .borrow()
            .get_light(name)
            .map(|record| record.light.borrow().intensity())
    }

    pub fn loads_in_flight(&self) -> usize {
        self.pending_loads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use glam::Vec3;
    use std::fs;
    use std::time::{Duration, Instant};

    fn world() -> World {
        World::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_startup_applies_current_schedule() {
        let world = world();
        let expected = if world.scheduler.is_day() { 10.0 } else { 0.5 };
        assert_eq!(world.light_intensity("sun"), Some(expected));

        // Flashlight visibility mirrors its intensity
        let lights = world.lights();
        let coordinator = lights.borrow();
        let flashlight = coordinator.get_light("flashlight").unwrap();
        let light = flashlight.light.borrow();
        assert_eq!(light.visible(), light.intensity() != 0.0);
    }

    #[test]
    fn test_cycle_camera_notifies_bus() {
        let mut world = world();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        world.bus().borrow_mut().add_listener(
            EventKind::CameraChange,
            Box::new(move |event| {
                if let WorldEvent::CameraChange { name } = event {
                    sink.borrow_mut().push(*name);
                }
                Ok(())
            }),
        );

        world.cycle_camera().unwrap();
        world.cycle_camera().unwrap();
        world.reset_camera().unwrap();

        assert_eq!(*seen.borrow(), vec!["debug", "stationary", "drone"]);
        assert_eq!(world.registry.active().kind(), CameraKind::Drone);
    }

    #[test]
    fn test_streamed_geometry_reaches_collision_index() {
        let path = "test_world_quad.obj";
        fs::write(
            path,
            "o quad\nv -10 -10 3\nv 10 -10 3\nv 10 10 3\nv -10 10 3\nf 1 2 3\nf 3 4 1\n",
        )
        .unwrap();

        let mut world = world();
        world.load_model(path);
        assert_eq!(world.loads_in_flight(), 1);

        let pressed = PressedKeys::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while world.loads_in_flight() > 0 {
            assert!(Instant::now() < deadline, "load timed out");
            world.update(0.016, &pressed).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(world.meshes.len(), 1);
        let hit = world
            .collision
            .raycast(Vec3::ZERO, Vec3::Z, 100.0)
            .expect("streamed quad is collidable");
        assert!((hit.distance - 3.0).abs() < 1e-4);

        // Cleanup
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_failed_load_does_not_block_flight() {
        let mut world = world();
        world.load_model("missing_model.obj");

        let pressed = PressedKeys::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while world.loads_in_flight() > 0 {
            assert!(Instant::now() < deadline, "load timed out");
            world.update(0.016, &pressed).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(world.meshes.is_empty());
        assert!(world.collision.is_empty());
    }
}
