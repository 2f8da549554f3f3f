/// Full day/night wiring: manual clock through the scheduler, events over
/// the bus, light intensities applied by the coordinator.
use std::cell::RefCell;
use std::rc::Rc;

use drone_engine::config::TimeConfigData;
use drone_engine::core::lighting::{make_flashlight, make_sun};
use drone_engine::time::{ManualClock, TimeScheduler};
use drone_engine::{EventBus, LightCoordinator};
use glam::Vec3;

const HOUR: u64 = 3600;

struct Fixture {
    scheduler: TimeScheduler,
    clock: ManualClock,
    sun: Rc<RefCell<drone_engine::Light>>,
    flashlight: Rc<RefCell<drone_engine::Light>>,
}

fn fixture(start_secs: u64) -> Fixture {
    let bus = Rc::new(RefCell::new(EventBus::new()));
    let coordinator = Rc::new(RefCell::new(LightCoordinator::new()));
    let _listener = LightCoordinator::subscribe(&coordinator, &bus);

    let sun = Rc::new(RefCell::new(make_sun()));
    let flashlight = Rc::new(RefCell::new(make_flashlight(Vec3::ZERO, Vec3::NEG_Z)));
    {
        let mut coordinator = coordinator.borrow_mut();
        coordinator.add_light(Rc::clone(&sun), "sun", 10.0, 0.5);
        coordinator.add_light(Rc::clone(&flashlight), "flashlight", 0.0, 5.0);
    }

    let clock = ManualClock::new(start_secs);
    let scheduler = TimeScheduler::with_clock(
        Rc::clone(&bus),
        &TimeConfigData::default(),
        Box::new(clock.clone()),
    );

    Fixture {
        scheduler,
        clock,
        sun,
        flashlight,
    }
}

#[test]
fn startup_applies_the_current_category() {
    let mut f = fixture(5 * HOUR); // 05:00, before dawn
    f.scheduler.start_updating().unwrap();

    assert!(!f.scheduler.is_day());
    assert_eq!(f.sun.borrow().intensity(), 0.5);
    assert_eq!(f.flashlight.borrow().intensity(), 5.0);
    assert!(f.flashlight.borrow().visible());
}

#[test]
fn dawn_crossing_relights_the_scene() {
    let mut f = fixture(5 * HOUR + 59 * 60 + 59); // 05:59:59
    f.scheduler.start_updating().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 0.5);

    f.clock.advance(1); // 06:00:00
    f.scheduler.tick().unwrap();

    assert!(f.scheduler.is_day());
    assert_eq!(f.sun.borrow().intensity(), 10.0);
    assert_eq!(f.flashlight.borrow().intensity(), 0.0);
    assert!(!f.flashlight.borrow().visible());
}

#[test]
fn dusk_crossing_emits_once_and_settles() {
    let mut f = fixture(17 * HOUR + 59 * 60); // 17:59
    f.scheduler.start_updating().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 10.0);

    // A quiet poll inside the day window changes nothing
    f.clock.advance(30);
    f.scheduler.tick().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 10.0);

    // 18:00 flips the scene to night
    f.clock.advance(30);
    f.scheduler.tick().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 0.5);
    assert_eq!(f.flashlight.borrow().intensity(), 5.0);

    // Settled: later polls inside the night leave the values alone
    f.sun.borrow_mut().set_intensity(0.123);
    f.clock.advance(HOUR);
    f.scheduler.tick().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 0.123);
}

#[test]
fn manual_override_relights_without_moving_the_clock() {
    let mut f = fixture(12 * HOUR); // noon
    f.scheduler.start_updating().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 10.0);

    f.scheduler.set_night().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 0.5);
    assert_eq!(f.flashlight.borrow().intensity(), 5.0);

    // The scheduler's own view of the day is unchanged by the override
    assert!(f.scheduler.is_day());

    // The override survives ordinary polls (no boundary is crossed) and is
    // only reverted by the next real crossing, at 18:00
    f.clock.advance(2);
    f.scheduler.tick().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 0.5);

    // Tamper with the intensity so the crossing is observable
    f.sun.borrow_mut().set_intensity(7.7);
    f.clock.set(18 * HOUR);
    f.scheduler.tick().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 0.5);
    assert_eq!(f.flashlight.borrow().intensity(), 5.0);
}

#[test]
fn set_day_override_at_night() {
    let mut f = fixture(22 * HOUR); // 22:00
    f.scheduler.start_updating().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 0.5);

    f.scheduler.set_day().unwrap();
    assert_eq!(f.sun.borrow().intensity(), 10.0);
    assert_eq!(f.flashlight.borrow().intensity(), 0.0);
    assert!(!f.scheduler.is_day());
}
