//! Wheel controller - the navigation state machine.
//!
//! All selection mutations funnel through [`WheelController::go_to`], the
//! single transition primitive. [`WheelController::step`] translates a
//! relative scroll gesture into a `go_to`, handling rollover: a day step
//! past the month edge rolls into the adjacent month, and a month step past
//! the year edge rolls into the adjacent year. The cascade is an explicit
//! two-level sequence (day into month, month into year), never recursion.
//!
//! Invalid navigation is a silent no-op: the controller logs a diagnostic
//! and leaves the state untouched, it never errors across the boundary.

use tracing::debug;

use crate::calendar::days_in_month;
use crate::selection::{time_slots, Bounds, SelectionState, TimeSlot};

/// Identifies one of the four selection wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelId {
    Year,
    Month,
    Day,
    Time,
}

/// Direction of a scroll gesture on a wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

/// A navigation target: one value for one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelValue {
    Year(i32),
    Month(u32),
    Day(u32),
    Time(TimeSlot),
}

impl WheelValue {
    /// The wheel this value belongs to.
    pub fn wheel(&self) -> WheelId {
        match self {
            WheelValue::Year(_) => WheelId::Year,
            WheelValue::Month(_) => WheelId::Month,
            WheelValue::Day(_) => WheelId::Day,
            WheelValue::Time(_) => WheelId::Time,
        }
    }
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// The move was applied; `changed` lists the wheels to re-render.
    Committed { changed: Vec<WheelId> },
    /// Out-of-bounds or nonexistent target; the state is unchanged.
    Rejected,
}

impl NavOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, NavOutcome::Committed { .. })
    }
}

/// The picker's transition engine. Owns the generated time-slot table and
/// mutates a [`SelectionState`] passed in by the session, so it can be
/// exercised headlessly.
#[derive(Debug, Clone)]
pub struct WheelController {
    slots: Vec<TimeSlot>,
}

impl WheelController {
    pub fn new(step_minutes: u32) -> Self {
        Self {
            slots: time_slots(step_minutes),
        }
    }

    /// The time wheel's selectable entries.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// The single state-transition primitive: navigate one wheel to an
    /// explicit value.
    ///
    /// A year or month change re-validates the day, clamping it to the new
    /// month's length. A day change is checked against the min/max bounds
    /// (using the currently selected time) and rejected when outside them.
    /// A time change must name an entry of the slot table.
    pub fn go_to(
        &self,
        state: &mut SelectionState,
        bounds: &Bounds,
        target: WheelValue,
    ) -> NavOutcome {
        match target {
            WheelValue::Year(year) => {
                let mut next = *state;
                next.year = Some(year);
                clamp_day(&mut next);
                *state = next;
                NavOutcome::Committed {
                    changed: vec![WheelId::Year, WheelId::Day],
                }
            }
            WheelValue::Month(month) => {
                if !(1..=12).contains(&month) {
                    debug!("no month wheel item for value {month}");
                    return NavOutcome::Rejected;
                }
                let mut next = *state;
                next.month = Some(month);
                clamp_day(&mut next);
                *state = next;
                NavOutcome::Committed {
                    changed: vec![WheelId::Month, WheelId::Day],
                }
            }
            WheelValue::Day(day) => {
                let mut next = *state;
                next.day = Some(day);
                if !self.day_is_selectable(&next, bounds) {
                    debug!("rejecting day {day}: no item or outside bounds");
                    return NavOutcome::Rejected;
                }
                *state = next;
                NavOutcome::Committed {
                    changed: vec![WheelId::Day],
                }
            }
            WheelValue::Time(time) => {
                if !self.slots.contains(&time) {
                    debug!("no time wheel item for {time}");
                    return NavOutcome::Rejected;
                }
                state.time = Some(time);
                NavOutcome::Committed {
                    changed: vec![WheelId::Time],
                }
            }
        }
    }

    /// Translates one scroll notch on a wheel into a `go_to`, applying the
    /// rollover policy for the month and day edges. Scrolling up moves to
    /// earlier values, down to later ones.
    pub fn step(
        &self,
        state: &mut SelectionState,
        bounds: &Bounds,
        wheel: WheelId,
        direction: StepDirection,
    ) -> NavOutcome {
        match wheel {
            WheelId::Year => {
                let Some(year) = state.year else {
                    debug!("year step with no year selected");
                    return NavOutcome::Rejected;
                };
                let next = match direction {
                    StepDirection::Up => year - 1,
                    StepDirection::Down => year + 1,
                };
                self.go_to(state, bounds, WheelValue::Year(next))
            }
            WheelId::Month => self.step_month(state, bounds, direction, None),
            WheelId::Day => self.step_day(state, bounds, direction),
            WheelId::Time => self.step_time(state, direction),
        }
    }

    /// Month step with an optional explicit day to land on. Without one the
    /// day resets to 1; the day-rollover cascade passes the target edge day.
    fn step_month(
        &self,
        state: &mut SelectionState,
        bounds: &Bounds,
        direction: StepDirection,
        target_day: Option<u32>,
    ) -> NavOutcome {
        let Some(month) = state.month else {
            debug!("month step with no month selected");
            return NavOutcome::Rejected;
        };
        let index = month as i32 - 1
            + match direction {
                StepDirection::Up => -1,
                StepDirection::Down => 1,
            };

        let mut next = *state;
        let mut changed = vec![WheelId::Month, WheelId::Day];
        if (0..12).contains(&index) {
            next.month = Some(index as u32 + 1);
        } else {
            // Past December or before January: wrap into the adjacent year
            let Some(year) = state.year else {
                debug!("month wrap with no year selected");
                return NavOutcome::Rejected;
            };
            if index > 11 {
                next.year = Some(year + 1);
                next.month = Some(1);
            } else {
                next.year = Some(year - 1);
                next.month = Some(12);
            }
            changed.insert(0, WheelId::Year);
        }
        next.day = Some(target_day.unwrap_or(1));

        if !self.day_is_selectable(&next, bounds) {
            debug!("rejecting month step: landing day outside bounds");
            return NavOutcome::Rejected;
        }
        *state = next;
        NavOutcome::Committed { changed }
    }

    /// Day step with the two-level rollover cascade: underflow lands on the
    /// previous month's last day, overflow on day 1 of the next month.
    fn step_day(
        &self,
        state: &mut SelectionState,
        bounds: &Bounds,
        direction: StepDirection,
    ) -> NavOutcome {
        let (Some(year), Some(month), Some(day)) = (state.year, state.month, state.day) else {
            debug!("day step with an incomplete date");
            return NavOutcome::Rejected;
        };
        match direction {
            StepDirection::Up => {
                if day <= 1 {
                    let last_of_previous = if month == 1 {
                        days_in_month(year - 1, 12)
                    } else {
                        days_in_month(year, month - 1)
                    };
                    self.step_month(state, bounds, StepDirection::Up, Some(last_of_previous))
                } else {
                    self.go_to(state, bounds, WheelValue::Day(day - 1))
                }
            }
            StepDirection::Down => {
                if day >= days_in_month(year, month) {
                    self.step_month(state, bounds, StepDirection::Down, Some(1))
                } else {
                    self.go_to(state, bounds, WheelValue::Day(day + 1))
                }
            }
        }
    }

    /// Time step; the table does not roll into an adjacent day, so steps
    /// past either end simply do not move.
    fn step_time(&self, state: &mut SelectionState, direction: StepDirection) -> NavOutcome {
        let Some(time) = state.time else {
            debug!("time step with no time selected");
            return NavOutcome::Rejected;
        };
        let Some(index) = self.slots.iter().position(|slot| *slot == time) else {
            debug!("selected time {time} is not on the slot table");
            return NavOutcome::Rejected;
        };
        let next = match direction {
            StepDirection::Up => index.checked_sub(1),
            StepDirection::Down => (index + 1 < self.slots.len()).then_some(index + 1),
        };
        match next {
            Some(i) => {
                state.time = Some(self.slots[i]);
                NavOutcome::Committed {
                    changed: vec![WheelId::Time],
                }
            }
            None => {
                debug!("time wheel clamped at table end");
                NavOutcome::Rejected
            }
        }
    }

    /// A day is selectable when it exists on the month grid and, once the
    /// full instant is known, lies within the configured bounds.
    fn day_is_selectable(&self, state: &SelectionState, bounds: &Bounds) -> bool {
        let Some(day) = state.day else {
            return false;
        };
        let exists = match (state.year, state.month) {
            (Some(year), Some(month)) => day >= 1 && day <= days_in_month(year, month),
            _ => (1..=31).contains(&day),
        };
        if !exists {
            return false;
        }
        match state.instant() {
            Some(instant) => bounds.contains(instant),
            // Bounds only apply once a full instant can be formed
            None => true,
        }
    }
}

/// Re-validates the day after a year or month change, clamping it to the
/// new month's length. Both changes apply the same policy.
fn clamp_day(state: &mut SelectionState) {
    if let (Some(year), Some(month), Some(day)) = (state.year, state.month, state.day) {
        let last = days_in_month(year, month);
        if day > last {
            state.day = Some(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn state(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> SelectionState {
        SelectionState {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            time: TimeSlot::new(hour, minute),
        }
    }

    fn controller() -> WheelController {
        WheelController::new(10)
    }

    fn min_bound(year: i32, month: u32, day: u32) -> Bounds {
        Bounds::new(
            NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0)),
            None,
        )
    }

    #[test]
    fn test_day_rollover_forward() {
        let wheels = controller();
        let mut s = state(2021, 4, 30, 18, 0);
        let outcome = wheels.step(&mut s, &Bounds::default(), WheelId::Day, StepDirection::Down);
        assert!(outcome.is_committed());
        assert_eq!(s, state(2021, 5, 1, 18, 0));
    }

    #[test]
    fn test_day_rollover_backward() {
        let wheels = controller();
        let mut s = state(2021, 5, 1, 18, 0);
        let outcome = wheels.step(&mut s, &Bounds::default(), WheelId::Day, StepDirection::Up);
        assert!(outcome.is_committed());
        assert_eq!(s, state(2021, 4, 30, 18, 0));
    }

    #[test]
    fn test_day_step_without_rollover() {
        let wheels = controller();
        let mut s = state(2021, 5, 20, 18, 0);
        wheels.step(&mut s, &Bounds::default(), WheelId::Day, StepDirection::Down);
        assert_eq!(s.day, Some(21));
        wheels.step(&mut s, &Bounds::default(), WheelId::Day, StepDirection::Up);
        assert_eq!(s.day, Some(20));
    }

    #[test]
    fn test_month_year_rollover() {
        let wheels = controller();
        let mut s = state(2021, 12, 15, 18, 0);
        wheels.step(&mut s, &Bounds::default(), WheelId::Month, StepDirection::Down);
        assert_eq!(s, state(2022, 1, 1, 18, 0));

        let mut s = state(2021, 1, 15, 18, 0);
        wheels.step(&mut s, &Bounds::default(), WheelId::Month, StepDirection::Up);
        assert_eq!(s, state(2020, 12, 1, 18, 0));
    }

    #[test]
    fn test_month_step_resets_day_to_one() {
        let wheels = controller();
        let mut s = state(2021, 5, 20, 18, 0);
        wheels.step(&mut s, &Bounds::default(), WheelId::Month, StepDirection::Down);
        assert_eq!(s, state(2021, 6, 1, 18, 0));
    }

    #[test]
    fn test_year_step_directions() {
        let wheels = controller();
        let mut s = state(2021, 5, 20, 18, 0);
        wheels.step(&mut s, &Bounds::default(), WheelId::Year, StepDirection::Up);
        assert_eq!(s.year, Some(2020));
        wheels.step(&mut s, &Bounds::default(), WheelId::Year, StepDirection::Down);
        assert_eq!(s.year, Some(2021));
    }

    #[test]
    fn test_year_change_clamps_day() {
        let wheels = controller();
        // Feb 29 only exists in the leap year
        let mut s = state(2024, 2, 29, 18, 0);
        wheels.go_to(&mut s, &Bounds::default(), WheelValue::Year(2025));
        assert_eq!(s, state(2025, 2, 28, 18, 0));
    }

    #[test]
    fn test_year_change_keeps_in_range_day() {
        let wheels = controller();
        // Day 31 exists in January of every year, so it must survive
        let mut s = state(2021, 1, 31, 18, 0);
        wheels.step(&mut s, &Bounds::default(), WheelId::Year, StepDirection::Down);
        assert_eq!(s, state(2022, 1, 31, 18, 0));
        wheels.step(&mut s, &Bounds::default(), WheelId::Year, StepDirection::Up);
        assert_eq!(s, state(2021, 1, 31, 18, 0));
    }

    #[test]
    fn test_month_change_clamps_day() {
        let wheels = controller();
        let mut s = state(2021, 1, 31, 18, 0);
        let outcome = wheels.go_to(&mut s, &Bounds::default(), WheelValue::Month(4));
        assert!(outcome.is_committed());
        assert_eq!(s, state(2021, 4, 30, 18, 0));
    }

    #[test]
    fn test_day_navigation_respects_bounds() {
        let wheels = controller();
        let bounds = min_bound(2021, 5, 1);

        let mut s = state(2021, 4, 29, 18, 0);
        let outcome = wheels.go_to(&mut s, &bounds, WheelValue::Day(30));
        assert_eq!(outcome, NavOutcome::Rejected);
        assert_eq!(s.day, Some(29));

        let mut s = state(2021, 5, 1, 18, 0);
        let outcome = wheels.go_to(&mut s, &bounds, WheelValue::Day(2));
        assert!(outcome.is_committed());
        assert_eq!(s.day, Some(2));
    }

    #[test]
    fn test_day_rollover_rejected_when_landing_out_of_bounds() {
        let wheels = controller();
        let bounds = min_bound(2021, 5, 1);
        // Stepping up from May 1 would land on April 30, before the minimum
        let mut s = state(2021, 5, 1, 18, 0);
        let outcome = wheels.step(&mut s, &bounds, WheelId::Day, StepDirection::Up);
        assert_eq!(outcome, NavOutcome::Rejected);
        assert_eq!(s, state(2021, 5, 1, 18, 0));
    }

    #[test]
    fn test_nonexistent_targets_are_rejected() {
        let wheels = controller();
        let mut s = state(2021, 5, 20, 18, 0);
        assert_eq!(
            wheels.go_to(&mut s, &Bounds::default(), WheelValue::Month(13)),
            NavOutcome::Rejected
        );
        assert_eq!(
            wheels.go_to(&mut s, &Bounds::default(), WheelValue::Day(32)),
            NavOutcome::Rejected
        );
        // 18:05 is not on a 10-minute table
        assert_eq!(
            wheels.go_to(
                &mut s,
                &Bounds::default(),
                WheelValue::Time(TimeSlot::new(18, 5).unwrap())
            ),
            NavOutcome::Rejected
        );
        assert_eq!(s, state(2021, 5, 20, 18, 0));
    }

    #[test]
    fn test_time_wheel_clamps_at_table_ends() {
        let wheels = controller();
        let mut s = state(2021, 5, 20, 0, 0);
        let outcome = wheels.step(&mut s, &Bounds::default(), WheelId::Time, StepDirection::Up);
        assert_eq!(outcome, NavOutcome::Rejected);
        assert_eq!(s.time, TimeSlot::new(0, 0));

        let mut s = state(2021, 5, 20, 23, 50);
        let outcome = wheels.step(&mut s, &Bounds::default(), WheelId::Time, StepDirection::Down);
        assert_eq!(outcome, NavOutcome::Rejected);
        assert_eq!(s.time, TimeSlot::new(23, 50));
    }

    #[test]
    fn test_time_step_moves_one_slot() {
        let wheels = controller();
        let mut s = state(2021, 5, 20, 18, 0);
        wheels.step(&mut s, &Bounds::default(), WheelId::Time, StepDirection::Down);
        assert_eq!(s.time, TimeSlot::new(18, 10));
        wheels.step(&mut s, &Bounds::default(), WheelId::Time, StepDirection::Up);
        assert_eq!(s.time, TimeSlot::new(18, 0));
    }

    #[test]
    fn test_steps_on_unset_wheels_are_rejected() {
        let wheels = controller();
        let mut s = SelectionState::default();
        for wheel in [WheelId::Year, WheelId::Month, WheelId::Day, WheelId::Time] {
            let outcome = wheels.step(&mut s, &Bounds::default(), wheel, StepDirection::Down);
            assert_eq!(outcome, NavOutcome::Rejected);
        }
        assert_eq!(s, SelectionState::default());
    }
}
