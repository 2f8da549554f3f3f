/// Flight controller for the drone camera
///
/// Turns the held-key set into a velocity, integrates it into the active
/// camera's pose, and clamps movement against the collision index.
use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use winit::keyboard::KeyCode;

use crate::camera_registry::CameraRegistry;
use crate::collision::CollisionIndex;
use crate::config::FlightConfigData;
use crate::core::Light;

/// Translation axes of the flight model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Rotation axis of a look binding, resolved against the camera each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookAxis {
    /// World +Y, yaw
    WorldUp,
    /// The camera's local right axis, pitch
    CameraRight,
}

impl LookAxis {
    fn resolve(&self, camera: &crate::core::Camera) -> Vec3 {
        match self {
            LookAxis::WorldUp => Vec3::Y,
            LookAxis::CameraRight => camera.right(),
        }
    }
}

/// What a held key does to the flight model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyBinding {
    Move { axis: Axis, sign: f32 },
    Look { axis: LookAxis, degrees: f32 },
}

/// Degrees per second of look rotation at sensitivity 1
const LOOK_RATE_DEGREES: f32 = 45.0;

/// The fixed key vocabulary. Unmapped codes resolve to `None` and are
/// ignored everywhere.
pub fn binding_for(key: KeyCode) -> Option<KeyBinding> {
    match key {
        KeyCode::KeyW => Some(KeyBinding::Move {
            axis: Axis::Z,
            sign: 1.0,
        }),
        KeyCode::KeyS => Some(KeyBinding::Move {
            axis: Axis::Z,
            sign: -1.0,
        }),
        KeyCode::KeyA => Some(KeyBinding::Move {
            axis: Axis::X,
            sign: -1.0,
        }),
        KeyCode::KeyD => Some(KeyBinding::Move {
            axis: Axis::X,
            sign: 1.0,
        }),
        KeyCode::Space => Some(KeyBinding::Move {
            axis: Axis::Y,
            sign: 1.0,
        }),
        KeyCode::ControlLeft => Some(KeyBinding::Move {
            axis: Axis::Y,
            sign: -1.0,
        }),
        KeyCode::ArrowLeft => Some(KeyBinding::Look {
            axis: LookAxis::WorldUp,
            degrees: LOOK_RATE_DEGREES,
        }),
        KeyCode::ArrowRight => Some(KeyBinding::Look {
            axis: LookAxis::WorldUp,
            degrees: -LOOK_RATE_DEGREES,
        }),
        KeyCode::ArrowUp => Some(KeyBinding::Look {
            axis: LookAxis::CameraRight,
            degrees: LOOK_RATE_DEGREES,
        }),
        KeyCode::ArrowDown => Some(KeyBinding::Look {
            axis: LookAxis::CameraRight,
            degrees: -LOOK_RATE_DEGREES,
        }),
        _ => None,
    }
}

/// Currently held input identifiers, in insertion order.
///
/// UI buttons mirror their key equivalents through the same `press`/`release`
/// calls the keyboard path uses. Look rotation composes in this iteration
/// order, so the order is observable (though rarely meaningful).
#[derive(Debug, Default)]
pub struct PressedKeys {
    keys: Vec<KeyCode>,
}

impl PressedKeys {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn press(&mut self, key: KeyCode) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys.retain(|held| *held != key);
    }

    /// Drop everything; called on focus loss
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

pub struct FlightController {
    velocity: Vec3,
    acceleration: f32,
    deceleration: f32,
    max_speed: f32,
    min_distance: f32,
    look_sensitivity: f32,
    flashlight: Option<Rc<RefCell<Light>>>,
}

impl FlightController {
    pub fn new(config: &FlightConfigData) -> Self {
        Self {
            velocity: Vec3::ZERO,
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            max_speed: config.max_speed,
            min_distance: config.min_distance,
            look_sensitivity: config.look_sensitivity,
            flashlight: None,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Attach a spot light that follows the camera
    pub fn set_flashlight(&mut self, light: Rc<RefCell<Light>>) {
        self.flashlight = Some(light);
    }

    /// One frame of flight: look, velocity update, collision-aware commit.
    ///
    /// Drives the registry's active camera; a camera kind that does not
    /// accept flight input is left untouched.
    pub fn update_position(
        &mut self,
        dt: f32,
        pressed: &PressedKeys,
        registry: &mut CameraRegistry,
        collision: &mut CollisionIndex,
    ) {
        let camera = registry.active_mut();
        if !camera.kind().accepts_flight_input() {
            return;
        }

        // Look rotations compose in pressed-set iteration order
        for key in pressed.iter() {
            if let Some(KeyBinding::Look { axis, degrees }) = binding_for(key) {
                let rotation_axis = axis.resolve(camera);
                let angle = (degrees * self.look_sensitivity * dt).to_radians();
                camera.rotate_around(rotation_axis, angle);
            }
        }

        // Bleed velocity off every axis with no held movement key
        let mut held = [false; 3];
        for key in pressed.iter() {
            if let Some(KeyBinding::Move { axis, .. }) = binding_for(key) {
                held[axis.index()] = true;
            }
        }
        for index in 0..3 {
            let component = &mut self.velocity[index];
            if !held[index] && *component != 0.0 {
                let step = (self.deceleration * dt).min(component.abs());
                *component -= component.signum() * step;
            }
        }

        for key in pressed.iter() {
            if let Some(KeyBinding::Move { axis, sign }) = binding_for(key) {
                self.velocity[axis.index()] += sign * self.acceleration * dt;
            }
        }

        self.velocity = self.velocity.clamp(
            Vec3::splat(-self.max_speed),
            Vec3::splat(self.max_speed),
        );

        // Forward motion stays parallel to the ground plane, the way the
        // original pointer-lock controls move
        let forward = camera.forward();
        let forward_flat = Vec3::new(forward.x, 0.0, forward.z);
        let forward_flat = if forward_flat.length_squared() > 1e-8 {
            forward_flat.normalize()
        } else {
            Vec3::ZERO
        };

        let move_vector = (forward_flat * self.velocity.z
            + camera.right() * self.velocity.x
            + Vec3::Y * self.velocity.y)
            * dt;

        if move_vector.length_squared() > 0.0 {
            let length = move_vector.length();
            let direction = move_vector / length;
            let mut committed = move_vector;

            if camera.kind().collision_checked() {
                if let Some(hit) =
                    collision.raycast(camera.position(), direction, length + self.min_distance)
                {
                    if hit.distance - self.min_distance < length {
                        self.velocity = Vec3::ZERO;
                        committed = direction * (hit.distance - self.min_distance).max(0.0);
                    }
                }
            }

            camera.translate(committed);
        }

        if let Some(flashlight) = &self.flashlight {
            if let Light::Spot(spot) = &mut *flashlight.borrow_mut() {
                spot.position = camera.position();
                spot.direction = camera.forward();
            }
        }
    }
}
