use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use log::debug;

use crate::events::{EventBus, EventKind, ListenerId, WorldEvent};

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Cone half-angle in radians
    pub angle: f32,
    pub visible: bool,
}

/// Any light the coordinator can schedule
#[derive(Debug, Clone, Copy)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl Light {
    pub fn intensity(&self) -> f32 {
        match self {
            Light::Directional(light) => light.intensity,
            Light::Point(light) => light.intensity,
            Light::Spot(light) => light.intensity,
        }
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        match self {
            Light::Directional(light) => light.intensity = intensity,
            Light::Point(light) => light.intensity = intensity,
            Light::Spot(light) => light.intensity = intensity,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            Light::Directional(light) => light.visible,
            Light::Point(light) => light.visible,
            Light::Spot(light) => light.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Light::Directional(light) => light.visible = visible,
            Light::Point(light) => light.visible = visible,
            Light::Spot(light) => light.visible = visible,
        }
    }
}

/// A light registered with the coordinator, together with the intensities it
/// takes on at day and at night.
#[derive(Clone)]
pub struct LightRecord {
    pub light: Rc<RefCell<Light>>,
    pub name: String,
    pub day_intensity: f32,
    pub night_intensity: f32,
}

/// Applies the day/night schedule to every registered light.
///
/// A record's live intensity is always exactly `day_intensity` or
/// `night_intensity`; nothing is interpolated.
pub struct LightCoordinator {
    lights: Vec<LightRecord>,
}

impl LightCoordinator {
    pub fn new() -> Self {
        Self { lights: Vec::new() }
    }

    /// Wire a coordinator to the bus; every `DayChange` reapplies the schedule.
    pub fn subscribe(this: &Rc<RefCell<Self>>, bus: &Rc<RefCell<EventBus>>) -> ListenerId {
        let coordinator = Rc::clone(this);
        bus.borrow_mut().add_listener(
            EventKind::DayChange,
            Box::new(move |event| {
                if let WorldEvent::DayChange { is_day, .. } = event {
                    coordinator.borrow_mut().on_day_change(*is_day);
                }
                Ok(())
            }),
        )
    }

    pub fn on_day_change(&mut self, is_day: bool) {
        debug!(
            "applying {} intensities to {} lights",
            if is_day { "day" } else { "night" },
            self.lights.len()
        );
        for record in &self.lights {
            let intensity = if is_day {
                record.day_intensity
            } else {
                record.night_intensity
            };
            let mut light = record.light.borrow_mut();
            light.set_intensity(intensity);
            light.set_visible(intensity != 0.0);
        }
    }

    pub fn add_light(
        &mut self,
        light: Rc<RefCell<Light>>,
        name: &str,
        day_intensity: f32,
        night_intensity: f32,
    ) -> LightRecord {
        let record = LightRecord {
            light,
            name: name.to_string(),
            day_intensity,
            night_intensity,
        };
        self.lights.push(record.clone());
        record
    }

    pub fn get_light(&self, name: &str) -> Option<&LightRecord> {
        self.lights.iter().find(|record| record.name == name)
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}

impl Default for LightCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// The original scene's sun: white, straight down over the base layout
pub fn make_sun() -> Light {
    Light::Directional(DirectionalLight {
        direction: Vec3::new(0.0, -1.0, 0.0),
        color: Vec3::ONE,
        intensity: 10.0,
        visible: true,
    })
}

/// Drone-mounted flashlight; aimed by the flight controller every frame
pub fn make_flashlight(position: Vec3, direction: Vec3) -> Light {
    Light::Spot(SpotLight {
        position,
        direction,
        color: Vec3::ONE,
        intensity: 0.0,
        angle: 30.0_f32.to_radians(),
        visible: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_get_round_trip() {
        let mut coordinator = LightCoordinator::new();
        let light = Rc::new(RefCell::new(make_sun()));
        let record = coordinator.add_light(Rc::clone(&light), "x", 10.0, 2.0);

        assert_eq!(record.day_intensity, 10.0);
        assert_eq!(record.night_intensity, 2.0);

        let found = coordinator.get_light("x").expect("light registered");
        assert!(Rc::ptr_eq(&found.light, &light));
        assert_eq!(found.day_intensity, 10.0);
        assert_eq!(found.night_intensity, 2.0);
    }

    #[test]
    fn test_unknown_light_lookup() {
        let coordinator = LightCoordinator::new();
        assert!(coordinator.get_light("missing").is_none());
    }

    #[test]
    fn test_day_change_applies_intensity_and_visibility() {
        let mut coordinator = LightCoordinator::new();
        let sun = Rc::new(RefCell::new(make_sun()));
        let flashlight = Rc::new(RefCell::new(make_flashlight(Vec3::ZERO, Vec3::NEG_Z)));
        coordinator.add_light(Rc::clone(&sun), "sun", 10.0, 0.5);
        coordinator.add_light(Rc::clone(&flashlight), "flashlight", 0.0, 5.0);

        coordinator.on_day_change(false);
        assert_eq!(sun.borrow().intensity(), 0.5);
        assert!(sun.borrow().visible());
        assert_eq!(flashlight.borrow().intensity(), 5.0);
        assert!(flashlight.borrow().visible());

        coordinator.on_day_change(true);
        assert_eq!(sun.borrow().intensity(), 10.0);
        assert!(sun.borrow().visible());
        // Flashlight is off during the day, which also hides it
        assert_eq!(flashlight.borrow().intensity(), 0.0);
        assert!(!flashlight.borrow().visible());
    }
}
