//! Render instructions for the presentation surface.
//!
//! The session describes what to show as plain data; whatever renders the
//! picker (DOM, canvas, terminal) consumes these instructions and reports
//! interaction events back. Keeping the emission separate from the wheel
//! controller lets the state machine be tested without any surface.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::{days_in_month, week_bucket, weekday_of};
use crate::locale;
use crate::selection::{Bounds, SelectionState, TimeSlot};
use crate::wheel::{WheelId, WheelValue};

/// Wheel row height in pixels, as the surface lays items out.
pub const ITEM_HEIGHT: i32 = 24;
/// Items rendered above the selected one.
pub const ITEMS_BEFORE: i32 = 6;
/// Panel dimensions in pixels.
pub const PANEL_WIDTH: i32 = 430;
pub const PANEL_HEIGHT: i32 = 290;
/// Width used when clamping the panel against the right viewport edge.
const PANEL_CLAMP_WIDTH: i32 = 410;
/// Panels stack above the host page starting here.
const PANEL_BASE_Z: i32 = 1000;

/// One entry of an indexed wheel list.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelItem {
    pub index: usize,
    pub value: WheelValue,
    pub label: String,
}

/// On-screen rectangle of the host input field, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRect {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
}

/// Horizontal placement of the panel: offset from the viewport's left or
/// right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSide {
    Left(i32),
    Right(i32),
}

/// What the presentation surface is told to do.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    /// Replace a flat wheel list (month or time) with new items.
    RenderWheel {
        wheel: WheelId,
        items: Vec<WheelItem>,
        selected: Option<usize>,
        disabled: Vec<usize>,
    },
    /// Replace the day grid: rows of seven cells, `None` for padding.
    RenderDayGrid {
        headers: [&'static str; 7],
        weeks: Vec<[Option<u32>; 7]>,
        selected: Option<u32>,
        disabled: Vec<u32>,
    },
    /// The year wheel renders as a single highlighted label.
    HighlightYear(i32),
    /// Place the picker panel below its anchor, clamped to the viewport.
    PositionPanel {
        top: i32,
        side: PanelSide,
        z_index: i32,
    },
    /// Stop the host page from scrolling while the panel is open.
    LockHostScroll,
    UnlockHostScroll,
    /// Remove the panel and drop its listeners.
    TearDown,
}

/// The month wheel: twelve items labelled with the locale initials.
pub fn month_wheel(state: &SelectionState) -> RenderInstruction {
    let items = (1..=12u32)
        .map(|month| WheelItem {
            index: month as usize - 1,
            value: WheelValue::Month(month),
            label: locale::MONTH_INITIALS[month as usize - 1].to_string(),
        })
        .collect();
    RenderInstruction::RenderWheel {
        wheel: WheelId::Month,
        items,
        selected: state.month.map(|m| m as usize - 1),
        disabled: Vec::new(),
    }
}

/// The time wheel: one item per generated slot.
pub fn time_wheel(slots: &[TimeSlot], state: &SelectionState) -> RenderInstruction {
    let items = slots
        .iter()
        .enumerate()
        .map(|(index, slot)| WheelItem {
            index,
            value: WheelValue::Time(*slot),
            label: slot.to_string(),
        })
        .collect();
    RenderInstruction::RenderWheel {
        wheel: WheelId::Time,
        items,
        selected: state
            .time
            .and_then(|t| slots.iter().position(|slot| *slot == t)),
        disabled: Vec::new(),
    }
}

/// The year label instruction, once a year is selected.
pub fn year_label(state: &SelectionState) -> Option<RenderInstruction> {
    state.year.map(RenderInstruction::HighlightYear)
}

/// The day grid for the selected year and month: days bucketed into rows
/// of seven by [`week_bucket`], padded with empty cells, with every day
/// whose instant falls outside the bounds marked disabled.
///
/// The bounds check uses the currently selected time, or midnight while no
/// time is set. Returns `None` until both year and month are known.
pub fn day_grid(state: &SelectionState, bounds: &Bounds) -> Option<RenderInstruction> {
    let (year, month) = (state.year?, state.month?);
    let time = state.time.unwrap_or_default();

    let mut weeks: BTreeMap<u32, [Option<u32>; 7]> = BTreeMap::new();
    let mut disabled = Vec::new();
    for day in 1..=days_in_month(year, month) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        let row = weeks.entry(week_bucket(date)).or_insert([None; 7]);
        let cell = &mut row[weekday_of(date) as usize];
        if cell.is_none() {
            *cell = Some(day);
        }
        if let Some(instant) = date.and_hms_opt(time.hour, time.minute, 0) {
            if !bounds.contains(instant) {
                disabled.push(day);
            }
        }
    }

    Some(RenderInstruction::RenderDayGrid {
        headers: locale::WEEKDAY_HEADERS,
        weeks: weeks.into_values().collect(),
        selected: state.day,
        disabled,
    })
}

/// Panel placement: two pixels below the anchor, left-aligned with it, or
/// anchored to the right viewport edge when it would not fit.
pub fn panel_placement(
    anchor: AnchorRect,
    viewport_width: i32,
    base_z_index: i32,
) -> RenderInstruction {
    let side = if anchor.left + PANEL_CLAMP_WIDTH > viewport_width {
        PanelSide::Right(viewport_width - (anchor.left + anchor.width))
    } else {
        PanelSide::Left(anchor.left)
    };
    RenderInstruction::PositionPanel {
        top: anchor.top + anchor.height + 2,
        side,
        z_index: PANEL_BASE_Z + base_z_index,
    }
}
