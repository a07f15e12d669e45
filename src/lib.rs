//! Wheel date-time picker core
//!
//! A headless date-and-time picker built around four interdependent
//! selection wheels (year, month, day, time-of-day). The crate owns the
//! wheel-navigation state machine and the canonical string exchanged with
//! a host form; rendering is delegated to an external presentation surface
//! through plain render instructions.
//!
//! Typical wiring:
//!
//! ```
//! use wheel_picker::{PickerConfig, PickerSession};
//!
//! let mut session = PickerSession::new(PickerConfig::default());
//! session.write("2021-05-20 18:00");
//! assert_eq!(session.display().as_deref(), Some("20/05/2021 18:00"));
//! ```

pub mod calendar;
pub mod config;
pub mod locale;
pub mod render;
pub mod selection;
pub mod session;
pub mod wheel;

pub use config::{config_dir, config_path, ConfigError, PickerConfig, DEFAULT_STEP_MINUTES};
pub use render::{AnchorRect, PanelSide, RenderInstruction, WheelItem};
pub use selection::{time_slots, Bounds, ParseError, SelectionState, TimeSlot};
pub use session::{HostForm, IdleTimer, PickerEvent, PickerSession, PresentationSurface};
pub use wheel::{NavOutcome, StepDirection, WheelController, WheelId, WheelValue};
