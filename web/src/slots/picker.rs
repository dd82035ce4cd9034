use std::collections::BTreeSet;

use super::feed::{DaySlots, FeedError, SlotFeed};
use super::labels::{day_label, DayLabel};
use super::selection::SelectionState;
use super::timestamp::SlotTime;

/// What a day button shows and whether it is the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayButton {
    pub key: String,
    pub label: DayLabel,
    pub active: bool,
}

/// What a slot button shows. Derived from the selection, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotButton {
    pub raw: String,
    pub label: String,
    pub slot: Option<SlotTime>,
    pub disabled: bool,
    pub selected: bool,
}

/// Outcome of a click on a slot button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotToggle {
    Selected,
    Deselected,
    Ignored,
}

impl SlotToggle {
    pub fn changed(self) -> bool {
        !matches!(self, SlotToggle::Ignored)
    }
}

/// A picker built from a successful feed request.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPicker {
    pub state: PickerState,
    /// Canonical seed values before past slots were dropped. This is what the
    /// server had stored when the page rendered.
    pub seeded: BTreeSet<String>,
    pub pruned: usize,
}

/// State of one picker instance once the feed has loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerState {
    feed: SlotFeed,
    active_day: usize,
    selection: SelectionState,
}

impl PickerState {
    /// Builds the picker for a freshly loaded feed. Seeded slots at or before
    /// the feed's "now" are dropped so a disabled slot is never selected.
    pub fn new(feed: SlotFeed, mut selection: SelectionState) -> Self {
        selection.prune_not_after(&feed.now);
        Self {
            feed,
            active_day: 0,
            selection,
        }
    }

    /// Applies the outcome of the feed request. A failed request yields no
    /// state, so the day row and slot grid stay empty.
    pub fn load(feed: Result<SlotFeed, FeedError>, seed: &[String]) -> Result<LoadedPicker, FeedError> {
        let feed = feed?;
        let mut selection = SelectionState::from_seed(seed);
        let seeded = selection.canonical_set();
        let pruned = selection.prune_not_after(&feed.now);
        Ok(LoadedPicker {
            state: Self::new(feed, selection),
            seeded,
            pruned,
        })
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn active_day(&self) -> Option<&DaySlots> {
        self.feed.days.get(self.active_day)
    }

    /// A slot is available only if it parsed and starts after "now".
    pub fn is_disabled(&self, slot: Option<&SlotTime>) -> bool {
        match slot {
            Some(slot) => *slot <= self.feed.now,
            None => true,
        }
    }

    /// Makes `key` the only active day. Unknown keys leave the state as is.
    pub fn select_day(&mut self, key: &str) -> bool {
        match self.feed.days.iter().position(|day| day.key == key) {
            Some(index) => {
                self.active_day = index;
                true
            }
            None => false,
        }
    }

    /// Toggles `slot` if the active day offers it and it is not in the past.
    pub fn toggle_slot(&mut self, slot: &SlotTime) -> SlotToggle {
        let offered = self
            .active_day()
            .is_some_and(|day| day.slots.iter().any(|s| s.time.as_ref() == Some(slot)));
        if !offered || self.is_disabled(Some(slot)) {
            return SlotToggle::Ignored;
        }

        if self.selection.toggle(slot) {
            SlotToggle::Selected
        } else {
            SlotToggle::Deselected
        }
    }

    pub fn day_buttons(&self) -> Vec<DayButton> {
        self.feed
            .days
            .iter()
            .enumerate()
            .map(|(index, day)| DayButton {
                key: day.key.clone(),
                label: day_label(&day.key),
                active: index == self.active_day,
            })
            .collect()
    }

    /// Buttons for the active day in feed order.
    pub fn slot_buttons(&self) -> Vec<SlotButton> {
        let Some(day) = self.active_day() else {
            return Vec::new();
        };

        day.slots
            .iter()
            .map(|feed_slot| {
                let disabled = self.is_disabled(feed_slot.time.as_ref());
                let selected = !disabled
                    && feed_slot
                        .time
                        .as_ref()
                        .is_some_and(|slot| self.selection.contains(slot));
                SlotButton {
                    raw: feed_slot.raw.clone(),
                    label: feed_slot
                        .time
                        .map(|slot| slot.time_label())
                        .unwrap_or_else(|| feed_slot.raw.clone()),
                    slot: feed_slot.time,
                    disabled,
                    selected,
                }
            })
            .collect()
    }

    pub fn hidden_input_values(&self) -> Vec<String> {
        self.selection.hidden_input_values()
    }
}

/// Day buttons for whatever the picker currently holds; none before a
/// successful load.
pub fn day_row(state: Option<&PickerState>) -> Vec<DayButton> {
    state.map(PickerState::day_buttons).unwrap_or_default()
}

pub fn slot_grid(state: Option<&PickerState>) -> Vec<SlotButton> {
    state.map(PickerState::slot_buttons).unwrap_or_default()
}

pub fn hidden_inputs(state: Option<&PickerState>) -> Vec<String> {
    state.map(PickerState::hidden_input_values).unwrap_or_default()
}
