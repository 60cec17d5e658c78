use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug, Clone)]
struct Pending<T> {
    due_at: Instant,
    generation: u64,
    args: T,
}

/// Single-slot debounce timer.
///
/// Every `trigger` replaces whatever was pending, so only the arguments of
/// the most recent call are ever handed back by `take_due`. Each instance owns
/// its own slot; independent debouncers never interfere.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    generation: u64,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: 0,
        }
    }

    /// Schedules `args` to become due after the quiet period, discarding any
    /// earlier pending call. Returns the generation of the new schedule.
    pub fn trigger(&mut self, args: T, now: Instant) -> u64 {
        self.generation = self.generation.saturating_add(1);
        if self.pending.is_some() {
            trace!(generation = self.generation, "debounce replaced pending call");
        }
        self.pending = Some(Pending {
            due_at: now + self.delay,
            generation: self.generation,
            args,
        });
        self.generation
    }

    /// Drops the pending call, if any. Returns whether something was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    /// Hands back the pending arguments once their quiet period has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.due_at <= now);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        trace!(generation = pending.generation, "debounce fired");
        Some(pending.args)
    }
}

/// A debounced action: `trigger` collapses bursts of calls into one
/// invocation of the wrapped action with the last arguments.
pub struct Debounced<T, F>
where
    F: FnMut(T),
{
    slot: Debouncer<T>,
    action: F,
}

/// Wraps `action` so that it only runs after `delay` without further triggers.
pub fn wrap<T, F>(action: F, delay: Duration) -> Debounced<T, F>
where
    F: FnMut(T),
{
    Debounced {
        slot: Debouncer::new(delay),
        action,
    }
}

impl<T, F> Debounced<T, F>
where
    F: FnMut(T),
{
    pub fn trigger(&mut self, args: T, now: Instant) {
        self.slot.trigger(args, now);
    }

    pub fn cancel(&mut self) -> bool {
        self.slot.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.slot.deadline()
    }

    /// Runs the action if the pending call is due. Returns whether it ran.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.slot.take_due(now) {
            Some(args) => {
                (self.action)(args);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Debouncer, wrap};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn burst_of_triggers_fires_once_with_last_args() {
        let calls = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&calls);
        let mut debounced = wrap(move |value: String| sink.borrow_mut().push(value), DELAY);

        let start = Instant::now();
        for (idx, value) in ["c", "ca", "can", "cana"].into_iter().enumerate() {
            debounced.trigger(value.to_string(), start + Duration::from_millis(100 * idx as u64));
        }

        let last = start + Duration::from_millis(300);
        assert!(!debounced.fire_due(last + Duration::from_millis(499)));
        assert!(calls.borrow().is_empty());

        assert!(debounced.fire_due(last + DELAY));
        assert!(!debounced.fire_due(last + DELAY * 4));
        assert_eq!(*calls.borrow(), vec!["cana".to_string()]);
    }

    #[test]
    fn cancel_discards_pending_call() {
        let calls = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&calls);
        let mut debounced = wrap(move |_: ()| *sink.borrow_mut() += 1, DELAY);

        let start = Instant::now();
        debounced.trigger((), start);
        assert!(debounced.is_pending());
        assert!(debounced.cancel());
        assert!(!debounced.cancel());

        assert!(!debounced.fire_due(start + DELAY * 2));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn dropping_the_wrapper_never_invokes_the_action() {
        let calls = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&calls);
        {
            let mut debounced = wrap(move |_: u8| *sink.borrow_mut() += 1, DELAY);
            debounced.trigger(1, Instant::now());
        }
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn independent_debouncers_do_not_interfere() {
        let start = Instant::now();
        let mut left = Debouncer::new(DELAY);
        let mut right = Debouncer::new(Duration::from_millis(100));

        left.trigger("left", start);
        right.trigger("right", start);
        right.trigger("right again", start + Duration::from_millis(50));

        assert_eq!(right.take_due(start + Duration::from_millis(150)), Some("right again"));
        assert_eq!(left.take_due(start + Duration::from_millis(150)), None);
        assert_eq!(left.take_due(start + DELAY), Some("left"));
    }

    #[test]
    fn deadline_moves_with_each_trigger() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert_eq!(debouncer.deadline(), None);

        assert_eq!(debouncer.trigger(7u8, start), 1);
        assert_eq!(debouncer.deadline(), Some(start + DELAY));

        let later = start + Duration::from_millis(450);
        assert_eq!(debouncer.trigger(8u8, later), 2);
        assert_eq!(debouncer.deadline(), Some(later + DELAY));

        assert_eq!(debouncer.take_due(later + DELAY), Some(8));
        assert_eq!(debouncer.deadline(), None);
    }
}
