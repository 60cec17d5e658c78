pub mod outside_click;

pub use outside_click::{Anchor, OutsideClickDetector, Rect, Region, RegionRef};

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// A pointer press at a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub col: u16,
    pub row: u16,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(col: u16, row: u16, button: PointerButton) -> Self {
        Self { col, row, button }
    }

    pub fn left(col: u16, row: u16) -> Self {
        Self::new(col, row, PointerButton::Left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<RefCell<dyn FnMut(&PointerEvent)>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    fn is_registered(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

/// Screen-wide pointer listener registry.
///
/// Every press the runtime reads is dispatched to all registered listeners.
/// Registration hands back a [`Subscription`]; dropping it unregisters the
/// listener, so a widget that owns its subscription can never leak one.
#[derive(Clone, Default)]
pub struct PointerHub {
    listeners: Rc<RefCell<Listeners>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&PointerEvent) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = ListenerId(listeners.next_id);
        listeners.next_id = listeners.next_id.saturating_add(1);
        let listener: Listener = Rc::new(RefCell::new(listener));
        listeners.entries.push((id, listener));
        trace!(id = id.0, total = listeners.entries.len(), "pointer listener registered");

        Subscription {
            listeners: Rc::downgrade(&self.listeners),
            id,
            active: true,
        }
    }

    /// Delivers `event` to every listener registered when dispatch started
    /// and still registered when its turn comes.
    pub fn dispatch(&self, event: &PointerEvent) {
        let snapshot: Vec<(ListenerId, Listener)> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if !self.listeners.borrow().is_registered(id) {
                continue;
            }
            // A listener dispatching into the hub again must not re-enter itself.
            let Ok(mut callback) = listener.try_borrow_mut() else {
                continue;
            };
            (&mut *callback)(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

/// Registration handle returned by [`PointerHub::subscribe`].
pub struct Subscription {
    listeners: Weak<RefCell<Listeners>>,
    id: ListenerId,
    active: bool,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Unregisters the listener now instead of at drop.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut listeners = listeners.borrow_mut();
        listeners.entries.retain(|(id, _)| *id != self.id);
        trace!(id = self.id.0, total = listeners.entries.len(), "pointer listener released");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
