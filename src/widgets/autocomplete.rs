use crate::core::candidates::CandidateList;
use crate::core::controller::{AutocompleteController, FILTER_DEBOUNCE};
use crate::core::matcher;
use crate::pointer::{
    OutsideClickDetector, PointerButton, PointerEvent, PointerHub, Rect, Region, RegionRef,
};
use crate::terminal::{CursorPos, KeyEvent};
use crate::ui::highlight::highlight_spans;
use crate::ui::span::{Span, SpanLine};
use crate::ui::spinner::Spinner;
use crate::ui::style::{Color, Style};
use crate::widgets::suggestion_list::SuggestionList;
use crate::widgets::text_field::TextField;
use crate::widgets::traits::{
    DrawOutput, Drawable, InteractionResult, Interactive, RenderContext, WidgetAction,
};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interactivity {
    /// Dropdown, filtering and outside-click dismissal are all live.
    Live,
    /// Plain text input: the environment could not provide pointer events.
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted(Interactivity),
    TornDown,
}

/// Where the widget was last drawn, in screen rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    origin_row: u16,
    /// First screen row of the suggestion list, if the dropdown is mounted.
    list_row: Option<u16>,
}

/// Autocomplete input: a text field, a debounced filter over a fixed
/// candidate list, and a dropdown of highlighted suggestions that closes on
/// selection or on a press anywhere outside the widget.
pub struct Autocomplete {
    id: String,
    label: String,
    input: TextField,
    controller: Rc<RefCell<AutocompleteController>>,
    region: RegionRef,
    detector: Option<OutsideClickDetector>,
    lifecycle: Lifecycle,
    spinner: Spinner,
    max_visible: usize,
    placement: Option<Placement>,
}

impl Autocomplete {
    pub fn new(id: impl Into<String>, label: impl Into<String>, candidates: CandidateList) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            input: TextField::new("Type to search..."),
            controller: Rc::new(RefCell::new(AutocompleteController::with_debounce(
                candidates,
                FILTER_DEBOUNCE,
            ))),
            region: RegionRef::new(),
            detector: None,
            lifecycle: Lifecycle::Created,
            spinner: Spinner::default(),
            max_visible: 8,
            placement: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.input = TextField::new(placeholder);
        self
    }

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    pub fn with_debounce(self, delay: Duration) -> Self {
        let candidates = self.controller.borrow().candidates().clone();
        *self.controller.borrow_mut() = AutocompleteController::with_debounce(candidates, delay);
        self
    }

    /// Installs the outside-click listener. Without a pointer hub the widget
    /// falls back to a plain text input.
    pub fn mount(&mut self, hub: Option<&PointerHub>) {
        if self.lifecycle != Lifecycle::Created {
            warn!(id = %self.id, "autocomplete mounted twice; ignoring");
            return;
        }

        let Some(hub) = hub else {
            warn!(id = %self.id, "no pointer events available; autocomplete runs without dropdown");
            self.lifecycle = Lifecycle::Mounted(Interactivity::Static);
            return;
        };

        let controller = Rc::downgrade(&self.controller);
        self.detector = Some(OutsideClickDetector::watch(
            hub,
            self.region.clone(),
            move || {
                let Some(controller) = controller.upgrade() else {
                    return;
                };
                match controller.try_borrow_mut() {
                    Ok(mut controller) => controller.on_outside_click(),
                    Err(_) => warn!("outside click arrived while controller was busy; dropped"),
                };
            },
        ));
        self.lifecycle = Lifecycle::Mounted(Interactivity::Live);
        debug!(id = %self.id, "autocomplete mounted");
    }

    /// Cancels the pending filter pass and releases the listener. Safe to
    /// call more than once; only the first call does anything.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.cancel_pending();
        }
        if let Some(detector) = self.detector.take() {
            detector.release();
        }
        self.region.detach();
        self.placement = None;
        self.lifecycle = Lifecycle::TornDown;
        debug!(id = %self.id, "autocomplete torn down");
    }

    pub fn interactivity(&self) -> Option<Interactivity> {
        match self.lifecycle {
            Lifecycle::Mounted(mode) => Some(mode),
            Lifecycle::Created | Lifecycle::TornDown => None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.interactivity() == Some(Interactivity::Live)
    }

    pub fn controller(&self) -> Ref<'_, AutocompleteController> {
        self.controller.borrow()
    }

    pub fn value(&self) -> String {
        self.controller.borrow().query().to_string()
    }

    /// Records where the widget was drawn and publishes its on-screen region.
    /// Every row the widget occupies counts at the full render width, so a
    /// press beside the text is still inside. Call after every draw.
    pub fn layout(&mut self, origin_row: u16, ctx: &RenderContext) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        let rows = self.draw(ctx).lines.len().clamp(1, usize::from(u16::MAX)) as u16;
        let region = Region::new().with_rect(Rect::new(0, origin_row, ctx.width, rows));

        let list_row = (rows > 1).then(|| {
            let loading_rows = u16::from(self.controller.borrow().is_loading());
            origin_row.saturating_add(1).saturating_add(loading_rows)
        });

        self.region.attach(region);
        self.placement = Some(Placement {
            origin_row,
            list_row,
        });
    }

    fn input_prefix(&self, focused: bool) -> String {
        let marker = if focused { ">" } else { " " };
        format!("{marker} {}: ", self.label)
    }

    fn dropdown_lines(&self, controller: &AutocompleteController) -> Vec<SpanLine> {
        if !self.is_live() || !controller.shows_dropdown() {
            return Vec::new();
        }

        let mut lines = Vec::new();
        if controller.is_loading() {
            lines.push(vec![
                self.spinner.span(),
                Span::styled(" Loading...", Style::new().color(Color::DarkGrey)),
            ]);
            // Nothing stale to show yet; the first pass decides between rows and "no matches".
            if controller.results().is_empty() {
                return lines;
            }
        }

        let query = controller.query();
        let emphasis = Style::new().color(Color::Cyan).bold();
        let list = SuggestionList::new(controller.results()).with_max_visible(self.max_visible);
        lines.extend(list.draw(|item, row_style| {
            highlight_spans(&matcher::highlight(item, query), row_style, emphasis)
        }));
        lines
    }

    fn select(&mut self, value: String) -> InteractionResult {
        self.controller.borrow_mut().on_item_select(value.clone());
        self.input.move_to_end(&value);
        InteractionResult::with_action(WidgetAction::Selected {
            id: self.id.clone(),
            value,
        })
    }
}

impl Drop for Autocomplete {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Drawable for Autocomplete {
    fn id(&self) -> &str {
        &self.id
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let controller = self.controller.borrow();
        let mut input_line = vec![Span::new(self.input_prefix(ctx.focused))];
        input_line.extend(self.input.spans(controller.query()));

        let mut lines = vec![input_line];
        lines.extend(self.dropdown_lines(&controller));
        DrawOutput { lines }
    }
}

impl Interactive for Autocomplete {
    fn on_key(&mut self, key: KeyEvent, now: Instant) -> InteractionResult {
        let Some(mode) = self.interactivity() else {
            return InteractionResult::ignored();
        };

        let current = self.controller.borrow().query().to_string();
        let mut changed = None;
        let handled = self.input.on_key(&current, key, |next| changed = Some(next.to_string()));
        if !handled {
            return InteractionResult::ignored();
        }
        let Some(value) = changed else {
            return InteractionResult::handled();
        };

        {
            let mut controller = self.controller.borrow_mut();
            match mode {
                Interactivity::Live => controller.on_input_change(value.clone(), now),
                Interactivity::Static => controller.set_query(value.clone()),
            }
        }
        InteractionResult::with_action(WidgetAction::ValueChanged {
            id: self.id.clone(),
            value,
        })
    }

    fn on_pointer(&mut self, event: PointerEvent) -> InteractionResult {
        if !self.is_live() || event.button != PointerButton::Left {
            return InteractionResult::ignored();
        }
        let Some(list_row) = self.placement.and_then(|placement| placement.list_row) else {
            return InteractionResult::ignored();
        };
        if event.row < list_row {
            return InteractionResult::ignored();
        }
        if self.region.is_outside(event.col, event.row) != Some(false) {
            return InteractionResult::ignored();
        }

        let clicked = {
            let controller = self.controller.borrow();
            if !controller.shows_dropdown() {
                return InteractionResult::ignored();
            }
            let list = SuggestionList::new(controller.results()).with_max_visible(self.max_visible);
            let mut clicked = None;
            list.click(usize::from(event.row - list_row), |item| {
                clicked = Some(item.to_string())
            });
            clicked
        };

        match clicked {
            Some(value) => self.select(value),
            None => InteractionResult::ignored(),
        }
    }

    fn on_tick(&mut self, now: Instant) -> InteractionResult {
        if !self.is_live() {
            return InteractionResult::ignored();
        }
        let (fired, loading) = {
            let mut controller = self.controller.borrow_mut();
            (controller.tick(now), controller.is_loading())
        };
        if loading {
            self.spinner.tick();
        }
        if fired || loading {
            return InteractionResult {
                handled: fired,
                request_render: true,
                actions: Vec::new(),
            };
        }
        InteractionResult::ignored()
    }

    fn next_deadline(&self) -> Option<Instant> {
        if !self.is_live() {
            return None;
        }
        self.controller.borrow().next_deadline()
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        let placement = self.placement?;
        let controller = self.controller.borrow();
        let prefix = self.input_prefix(true);
        let col = UnicodeWidthStr::width(prefix.as_str()) + self.input.cursor_offset(controller.query());
        Some(CursorPos {
            col: col.min(usize::from(u16::MAX)) as u16,
            row: placement.origin_row,
        })
    }
}
