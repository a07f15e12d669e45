//! Picker session - the interaction adapter.
//!
//! Maps discrete surface events onto wheel-controller calls, owns the
//! open/close lifecycle of the presentation surface, the idle auto-close
//! timer, and the host-form notification contract. All processing is
//! single-threaded and non-blocking; the only asynchronous piece is the
//! deadline the host polls through [`PickerSession::tick`].

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::PickerConfig;
use crate::render::{self, AnchorRect, RenderInstruction};
use crate::selection::{Bounds, SelectionState};
use crate::wheel::{NavOutcome, StepDirection, WheelController, WheelId, WheelValue};

/// Idle delay armed when the field gains focus.
const FOCUS_IDLE: Duration = Duration::from_millis(2000);
/// Idle delay armed when the pointer leaves the panel.
const POINTER_LEAVE_IDLE: Duration = Duration::from_millis(1000);

/// Host-form side of the value contract. Both callbacks fire together
/// after every completed navigation, carrying the canonical string.
pub trait HostForm {
    fn on_change(&mut self, value: &str);
    fn on_touched(&mut self, value: &str);
}

/// Sink for render instructions; whatever draws the picker implements this.
pub trait PresentationSurface {
    fn apply(&mut self, instruction: RenderInstruction);
}

/// Discrete interaction events reported by the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerEvent {
    /// The host field gained focus; carries its on-screen rectangle so the
    /// panel can be placed.
    Focus {
        anchor: AnchorRect,
        viewport_width: i32,
    },
    PointerEnter,
    PointerLeave,
    /// One scroll notch on a wheel; a negative delta scrolls up.
    Scroll { wheel: WheelId, delta_sign: i32 },
    ItemClick { wheel: WheelId, value: WheelValue },
}

/// Cancellable deadline for the idle auto-close, polled by the host loop.
/// Re-arming replaces any pending deadline; cancelling guarantees it will
/// not fire afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleTimer {
    deadline: Option<Instant>,
}

impl IdleTimer {
    /// (Re)arms the timer to fire `delay` after `now`.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once the deadline has passed; disarms itself so it fires once.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// One picker instance: selection state, wheel controller, bounds, and the
/// attached collaborators.
pub struct PickerSession {
    controller: WheelController,
    state: SelectionState,
    bounds: Bounds,
    config: PickerConfig,
    timer: IdleTimer,
    open: bool,
    disabled: bool,
    surface: Option<Box<dyn PresentationSurface>>,
    host: Option<Box<dyn HostForm>>,
}

impl PickerSession {
    /// Builds a session from construction options; the `*_is_now` bound
    /// flags are resolved against the clock here, once.
    pub fn new(config: PickerConfig) -> Self {
        let controller = WheelController::new(config.step_minutes);
        let bounds = config.resolve_bounds();
        Self {
            controller,
            state: SelectionState::default(),
            bounds,
            config,
            timer: IdleTimer::default(),
            open: false,
            disabled: false,
            surface: None,
            host: None,
        }
    }

    /// Attaches the rendering collaborator. Instructions emitted while no
    /// surface is attached are dropped.
    pub fn attach_surface(&mut self, surface: Box<dyn PresentationSurface>) {
        self.surface = Some(surface);
    }

    /// Detaches and returns the surface, closing the panel first.
    pub fn detach_surface(&mut self) -> Option<Box<dyn PresentationSurface>> {
        self.close();
        self.surface.take()
    }

    /// Registers the host-form callbacks.
    pub fn register_host(&mut self, host: Box<dyn HostForm>) {
        self.host = Some(host);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn canonical(&self) -> Option<String> {
        self.state.to_canonical()
    }

    pub fn display(&self) -> Option<String> {
        self.state.to_display()
    }

    /// Host-initiated value write. Malformed input, impossible dates, and
    /// times off the slot table are ignored without touching the state; a
    /// well-formed write commits and notifies the host once.
    pub fn write(&mut self, value: &str) {
        let parsed = match SelectionState::parse_canonical(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!("ignoring external write: {err}");
                return;
            }
        };
        if let Some(time) = parsed.time {
            if !self.controller.slots().contains(&time) {
                debug!("ignoring external write: {time} is not on the slot table");
                return;
            }
        }
        self.state
            .apply(parsed.year, parsed.month, parsed.day, parsed.time);
        self.notify_host();
        self.render_wheels(&[WheelId::Year, WheelId::Month, WheelId::Day, WheelId::Time]);
    }

    /// Host-side disabled flag; accepted and stored, no behavioral effect.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Feeds one surface event through the state machine. `now` drives the
    /// idle-timer arithmetic.
    pub fn handle_event(&mut self, event: PickerEvent, now: Instant) {
        match event {
            PickerEvent::Focus {
                anchor,
                viewport_width,
            } => self.open(anchor, viewport_width, now),
            PickerEvent::PointerEnter => self.timer.cancel(),
            PickerEvent::PointerLeave => {
                if self.open {
                    self.timer.arm(now, POINTER_LEAVE_IDLE);
                }
            }
            PickerEvent::Scroll { wheel, delta_sign } => {
                if !self.open {
                    debug!("scroll event while closed, ignoring");
                    return;
                }
                let direction = if delta_sign < 0 {
                    StepDirection::Up
                } else {
                    StepDirection::Down
                };
                let outcome = self
                    .controller
                    .step(&mut self.state, &self.bounds, wheel, direction);
                self.finish_nav(outcome);
            }
            PickerEvent::ItemClick { wheel, value } => {
                if !self.open {
                    debug!("click event while closed, ignoring");
                    return;
                }
                if value.wheel() != wheel {
                    debug!("click value does not belong to wheel {wheel:?}, ignoring");
                    return;
                }
                let outcome = self.controller.go_to(&mut self.state, &self.bounds, value);
                // Clicking a month keeps an already-selected (clamped) day
                // and seeds day 1 otherwise
                if matches!(value, WheelValue::Month(_))
                    && outcome.is_committed()
                    && self.state.day.is_none()
                {
                    let _ = self
                        .controller
                        .go_to(&mut self.state, &self.bounds, WheelValue::Day(1));
                }
                self.finish_nav(outcome);
            }
        }
    }

    /// Drives the idle auto-close; the host calls this from its loop. The
    /// timer never fires after an explicit close, which cancels it.
    pub fn tick(&mut self, now: Instant) {
        if self.timer.fire(now) {
            self.close();
        }
    }

    /// Closes the panel: tears down the rendered surface, restores host
    /// scrolling, cancels the idle timer. The last committed selection is
    /// kept for the next open.
    pub fn close(&mut self) {
        if self.open {
            self.emit(RenderInstruction::TearDown);
            self.emit(RenderInstruction::UnlockHostScroll);
        }
        self.open = false;
        self.timer.cancel();
    }

    fn open(&mut self, anchor: AnchorRect, viewport_width: i32, now: Instant) {
        self.open = true;
        self.emit(render::panel_placement(
            anchor,
            viewport_width,
            self.config.base_z_index,
        ));
        self.emit(RenderInstruction::LockHostScroll);
        // Full render pass re-aligns every wheel to the kept selection
        self.render_wheels(&[WheelId::Year, WheelId::Month, WheelId::Day, WheelId::Time]);
        self.timer.arm(now, FOCUS_IDLE);
    }

    /// After a committed navigation: push the canonical value to the host,
    /// then re-render the wheels the move touched.
    fn finish_nav(&mut self, outcome: NavOutcome) {
        let NavOutcome::Committed { changed } = outcome else {
            return;
        };
        self.notify_host();
        self.render_wheels(&changed);
    }

    /// Fires `on_change` and `on_touched` together, once, with the
    /// canonical string; silent while the selection is incomplete.
    fn notify_host(&mut self) {
        let Some(canonical) = self.state.to_canonical() else {
            return;
        };
        if let Some(host) = self.host.as_mut() {
            host.on_change(&canonical);
            host.on_touched(&canonical);
        }
    }

    fn render_wheels(&mut self, wheels: &[WheelId]) {
        if !self.open {
            return;
        }
        for wheel in wheels {
            match wheel {
                WheelId::Year => {
                    if let Some(instruction) = render::year_label(&self.state) {
                        self.emit(instruction);
                    }
                }
                WheelId::Month => {
                    let instruction = render::month_wheel(&self.state);
                    self.emit(instruction);
                }
                WheelId::Day => {
                    if let Some(instruction) = render::day_grid(&self.state, &self.bounds) {
                        self.emit(instruction);
                    }
                }
                WheelId::Time => {
                    let instruction = render::time_wheel(self.controller.slots(), &self.state);
                    self.emit(instruction);
                }
            }
        }
    }

    fn emit(&mut self, instruction: RenderInstruction) {
        match self.surface.as_mut() {
            Some(surface) => surface.apply(instruction),
            None => debug!("render target missing, dropping instruction"),
        }
    }
}
