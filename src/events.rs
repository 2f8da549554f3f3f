/// Publish/subscribe dispatch for world events
///
/// One bus instance is constructed by the composition root and handed to
/// whoever needs to emit or listen; there is no global state.
use anyhow::Result;

/// Event names listeners can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The time-of-day category flipped (or was forced)
    DayChange,
    /// The active camera changed
    CameraChange,
}

/// Events carried through the bus. Ephemeral: they exist only for the
/// duration of a synchronous `emit` call.
#[derive(Debug, Clone)]
pub enum WorldEvent {
    DayChange {
        is_day: bool,
        /// Seconds since the UNIX epoch at emit time
        timestamp_secs: u64,
        /// Milliseconds since the previous poll (0 for manual overrides)
        elapsed_ms: u64,
    },
    CameraChange {
        name: &'static str,
    },
}

impl WorldEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WorldEvent::DayChange { .. } => EventKind::DayChange,
            WorldEvent::CameraChange { .. } => EventKind::CameraChange,
        }
    }
}

/// Token returned by `add_listener`; closures have no identity of their own,
/// so removal goes through this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&WorldEvent) -> Result<()>>;

pub struct EventBus {
    listeners: Vec<(EventKind, ListenerId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((kind, id, listener));
        id
    }

    /// Returns true if a listener was removed
    pub fn remove_listener(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners
            .retain(|(listener_kind, listener_id, _)| !(*listener_kind == kind && *listener_id == id));
        self.listeners.len() != before
    }

    /// Invoke every listener registered for the event's kind, synchronously,
    /// in registration order. A failing listener aborts the remaining
    /// listeners for this call.
    pub fn emit(&mut self, event: &WorldEvent) -> Result<()> {
        let kind = event.kind();
        for (listener_kind, _, listener) in &mut self.listeners {
            if *listener_kind == kind {
                listener(event)?;
            }
        }
        Ok(())
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|(listener_kind, _, _)| *listener_kind == kind)
            .count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
