use std::collections::BTreeSet;

use super::timestamp::SlotTime;

/// Name of the hidden inputs the surrounding form submits.
pub const PREFERRED_SLOTS_FIELD: &str = "preferred_slots";

/// The slots the user has picked, keyed by epoch millis so that differently
/// formatted strings for the same instant collapse into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<i64>,
}

impl SelectionState {
    /// Seeds the selection from previously saved slot strings. Strings that
    /// do not parse are dropped.
    pub fn from_seed<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected = seed
            .into_iter()
            .filter_map(|raw| SlotTime::parse(raw.as_ref()).ok())
            .map(|slot| slot.millis())
            .collect();
        Self { selected }
    }

    pub fn contains(&self, slot: &SlotTime) -> bool {
        self.selected.contains(&slot.millis())
    }

    /// Flips membership of `slot` and reports whether it is selected now.
    pub fn toggle(&mut self, slot: &SlotTime) -> bool {
        let millis = slot.millis();
        if self.selected.remove(&millis) {
            false
        } else {
            self.selected.insert(millis);
            true
        }
    }

    /// Drops every selected slot at or before `now`. Returns how many went.
    pub fn prune_not_after(&mut self, now: &SlotTime) -> usize {
        let before = self.selected.len();
        let cutoff = now.millis();
        self.selected.retain(|millis| *millis > cutoff);
        before - self.selected.len()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.selected.iter().filter_map(|millis| SlotTime::from_millis(*millis))
    }

    /// Values for the `preferred_slots` hidden inputs, one per selected slot,
    /// in chronological order.
    pub fn hidden_input_values(&self) -> Vec<String> {
        self.slots().map(|slot| slot.canonical()).collect()
    }

    pub fn canonical_set(&self) -> BTreeSet<String> {
        self.slots().map(|slot| slot.canonical()).collect()
    }
}
