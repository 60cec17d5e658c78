use crate::pointer::{PointerEvent, PointerHub, Subscription};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        let col_end = u32::from(self.col) + u32::from(self.width);
        let row_end = u32::from(self.row) + u32::from(self.height);
        col >= self.col && u32::from(col) < col_end && row >= self.row && u32::from(row) < row_end
    }
}

/// Screen area occupied by a widget: the union of its rectangles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.push(rect);
        self
    }

    pub fn push(&mut self, rect: Rect) {
        if rect.width > 0 && rect.height > 0 {
            self.rects.push(rect);
        }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.rects.iter().any(|rect| rect.contains(col, row))
    }
}

/// Attachment state of a watched region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Not laid out yet; nothing to compare against.
    #[default]
    Unmounted,
    Attached(Region),
    /// Was laid out before and is now gone.
    Detached,
}

impl Anchor {
    /// `None` when there is no region to decide against yet.
    pub fn is_outside(&self, col: u16, row: u16) -> Option<bool> {
        match self {
            Self::Unmounted => None,
            Self::Attached(region) => Some(!region.contains(col, row)),
            Self::Detached => Some(true),
        }
    }
}

/// Shared handle to a widget's on-screen region. The owner updates it after
/// each layout; watchers read it when a click arrives.
#[derive(Debug, Clone, Default)]
pub struct RegionRef {
    anchor: Rc<RefCell<Anchor>>,
}

impl RegionRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, region: Region) {
        *self.anchor.borrow_mut() = Anchor::Attached(region);
    }

    pub fn detach(&self) {
        let mut anchor = self.anchor.borrow_mut();
        if !matches!(*anchor, Anchor::Unmounted) {
            *anchor = Anchor::Detached;
        }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor.borrow().clone()
    }

    pub fn is_outside(&self, col: u16, row: u16) -> Option<bool> {
        self.anchor.borrow().is_outside(col, row)
    }
}

/// Reports presses that land outside a watched region.
///
/// The listener lives exactly as long as the detector: dropping it (or calling
/// [`OutsideClickDetector::release`]) removes the registration from the hub.
pub struct OutsideClickDetector {
    subscription: Subscription,
}

impl OutsideClickDetector {
    pub fn watch<F>(hub: &PointerHub, region: RegionRef, mut on_outside: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let subscription = hub.subscribe(move |event: &PointerEvent| {
            match region.is_outside(event.col, event.row) {
                Some(true) => {
                    trace!(col = event.col, row = event.row, "press outside watched region");
                    on_outside();
                }
                Some(false) => {}
                None => trace!("press before region was laid out; ignored"),
            }
        });
        Self { subscription }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn release(self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::{Anchor, OutsideClickDetector, Rect, Region, RegionRef};
    use crate::pointer::{PointerEvent, PointerHub};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<usize>>, impl FnMut() + 'static) {
        let hits = Rc::new(Cell::new(0usize));
        let sink = Rc::clone(&hits);
        (hits, move || sink.set(sink.get() + 1))
    }

    #[test]
    fn rect_bounds_are_half_open() {
        let rect = Rect::new(2, 1, 3, 2);
        assert!(rect.contains(2, 1));
        assert!(rect.contains(4, 2));
        assert!(!rect.contains(5, 1));
        assert!(!rect.contains(2, 3));
        assert!(!rect.contains(1, 1));
        assert!(Rect::new(u16::MAX - 1, 0, 1, 1).contains(u16::MAX - 1, 0));
    }

    #[test]
    fn zero_sized_rects_are_not_part_of_a_region() {
        let region = Region::new().with_rect(Rect::new(0, 0, 0, 5));
        assert!(region.rects().is_empty());
        assert!(!region.contains(0, 0));
    }

    #[test]
    fn reports_only_presses_outside_the_region() {
        let hub = PointerHub::new();
        let region = RegionRef::new();
        region.attach(
            Region::new()
                .with_rect(Rect::new(0, 0, 20, 1))
                .with_rect(Rect::new(2, 1, 10, 3)),
        );
        let (hits, on_outside) = counter();
        let _detector = OutsideClickDetector::watch(&hub, region, on_outside);

        hub.dispatch(&PointerEvent::left(5, 0));
        hub.dispatch(&PointerEvent::left(3, 2));
        assert_eq!(hits.get(), 0);

        hub.dispatch(&PointerEvent::left(15, 2));
        hub.dispatch(&PointerEvent::left(0, 9));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn unmounted_region_ignores_presses_and_detached_region_reports_them() {
        let hub = PointerHub::new();
        let region = RegionRef::new();
        let (hits, on_outside) = counter();
        let _detector = OutsideClickDetector::watch(&hub, region.clone(), on_outside);

        hub.dispatch(&PointerEvent::left(0, 0));
        assert_eq!(hits.get(), 0);

        region.detach();
        assert_eq!(region.anchor(), Anchor::Unmounted);

        region.attach(Region::new().with_rect(Rect::new(0, 0, 4, 1)));
        region.detach();
        assert_eq!(region.anchor(), Anchor::Detached);
        hub.dispatch(&PointerEvent::left(0, 0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn release_stops_reporting_and_frees_the_listener() {
        let hub = PointerHub::new();
        let region = RegionRef::new();
        region.attach(Region::new().with_rect(Rect::new(0, 0, 4, 1)));
        let (hits, on_outside) = counter();

        let detector = OutsideClickDetector::watch(&hub, region, on_outside);
        assert!(detector.is_active());
        assert_eq!(hub.listener_count(), 1);

        detector.release();
        assert_eq!(hub.listener_count(), 0);
        hub.dispatch(&PointerEvent::left(30, 30));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn detectors_for_separate_widgets_are_independent() {
        let hub = PointerHub::new();
        let left = RegionRef::new();
        left.attach(Region::new().with_rect(Rect::new(0, 0, 10, 1)));
        let right = RegionRef::new();
        right.attach(Region::new().with_rect(Rect::new(20, 0, 10, 1)));

        let (left_hits, on_left) = counter();
        let (right_hits, on_right) = counter();
        let _left = OutsideClickDetector::watch(&hub, left, on_left);
        let right_detector = OutsideClickDetector::watch(&hub, right, on_right);

        hub.dispatch(&PointerEvent::left(1, 0));
        assert_eq!((left_hits.get(), right_hits.get()), (0, 1));

        drop(right_detector);
        assert_eq!(hub.listener_count(), 1);
        hub.dispatch(&PointerEvent::left(25, 0));
        assert_eq!((left_hits.get(), right_hits.get()), (1, 1));
    }
}
