/// Wall-clock day/night tracking
///
/// The scheduler polls a clock on a fixed interval, watches the hour cross
/// the day window boundaries, and reports crossings on the event bus.
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use log::{debug, info};

use crate::config::TimeConfigData;
use crate::events::{EventBus, WorldEvent};

/// Source of the current time. Production code uses [`SystemClock`]; tests
/// and headless runs drive a [`ManualClock`].
pub trait Clock {
    fn now(&self) -> SystemTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock advanced by hand, in whole seconds since the UNIX epoch
#[derive(Clone)]
pub struct ManualClock {
    secs: Rc<std::cell::Cell<u64>>,
}

impl ManualClock {
    pub fn new(secs: u64) -> Self {
        Self {
            secs: Rc::new(std::cell::Cell::new(secs)),
        }
    }

    pub fn set(&self, secs: u64) {
        self.secs.set(secs);
    }

    pub fn advance(&self, secs: u64) {
        self.secs.set(self.secs.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.secs.get())
    }
}

fn epoch_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Hour of day (UTC) for a timestamp
fn hour_of(time: SystemTime) -> u64 {
    epoch_secs(time) / 3600 % 24
}

pub struct TimeScheduler {
    bus: Rc<RefCell<EventBus>>,
    clock: Box<dyn Clock>,
    day_start: u64,
    day_end: u64,
    update_interval: Duration,
    /// Last observed time; the day/night category is derived from it
    current_time: SystemTime,
    last_poll: SystemTime,
    running: bool,
}

impl TimeScheduler {
    pub fn new(bus: Rc<RefCell<EventBus>>, config: &TimeConfigData) -> Self {
        Self::with_clock(bus, config, Box::new(SystemClock))
    }

    pub fn with_clock(
        bus: Rc<RefCell<EventBus>>,
        config: &TimeConfigData,
        clock: Box<dyn Clock>,
    ) -> Self {
        let now = clock.now();
        Self {
            bus,
            clock,
            day_start: config.day_start,
            day_end: config.day_end,
            update_interval: Duration::from_millis(config.update_interval_ms),
            current_time: now,
            last_poll: now,
            running: false,
        }
    }

    /// Whether `time` falls inside the day window `[day_start, day_end)`
    pub fn is_day_at(&self, time: SystemTime) -> bool {
        let hour = hour_of(time);
        hour >= self.day_start && hour < self.day_end
    }

    pub fn is_day(&self) -> bool {
        self.is_day_at(self.current_time)
    }

    /// Announce the current state once, then poll on every tick
    pub fn start_updating(&mut self) -> Result<()> {
        self.current_time = self.clock.now();
        self.last_poll = self.current_time;
        self.running = true;
        info!(
            "time scheduler started, currently {}",
            if self.is_day() { "day" } else { "night" }
        );
        self.notify(self.is_day(), self.current_time, 0)
    }

    pub fn stop_updating(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frame hook; does nothing until the poll interval has elapsed.
    /// Returns the milliseconds since the previous poll when a poll ran.
    pub fn tick(&mut self) -> Result<Option<u64>> {
        if !self.running {
            return Ok(None);
        }

        let now = self.clock.now();
        let since_poll = now
            .duration_since(self.last_poll)
            .unwrap_or_default();
        if since_poll < self.update_interval {
            return Ok(None);
        }
        self.last_poll = now;

        self.update_time(now).map(Some)
    }

    /// Advance the observed time and report a day/night crossing if one
    /// happened between the previous observation and `now`.
    fn update_time(&mut self, now: SystemTime) -> Result<u64> {
        let prev_time = self.current_time;
        self.current_time = now;
        let elapsed_ms = now
            .duration_since(prev_time)
            .unwrap_or_default()
            .as_millis() as u64;

        let is_day = self.is_day_at(now);
        let was_day = self.is_day_at(prev_time);

        if is_day != was_day {
            debug!("day/night boundary crossed, now {}", if is_day { "day" } else { "night" });
            self.notify(is_day, now, elapsed_ms)?;
        }

        Ok(elapsed_ms)
    }

    /// Force a daytime event. Does not touch the tracked time, so the next
    /// natural poll may revert the override.
    pub fn set_day(&mut self) -> Result<()> {
        self.notify(true, self.clock.now(), 0)
    }

    /// Force a nighttime event. Same caveat as [`set_day`](Self::set_day).
    pub fn set_night(&mut self) -> Result<()> {
        self.notify(false, self.clock.now(), 0)
    }

    fn notify(&self, is_day: bool, time: SystemTime, elapsed_ms: u64) -> Result<()> {
        self.bus.borrow_mut().emit(&WorldEvent::DayChange {
            is_day,
            timestamp_secs: epoch_secs(time),
            elapsed_ms,
        })
    }
}
