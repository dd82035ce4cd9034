//! Availability feed, selection and render state of the time-slot picker.
//!
//! Nothing in here touches the DOM; the component in
//! `components::time_slots_picker` derives its markup from [`PickerState`].

pub mod feed;
pub mod labels;
pub mod picker;
pub mod selection;
pub mod timestamp;

pub use feed::{fetch_slot_feed, parse_slot_feed, DaySlots, FeedError, FeedSlot, SlotFeed};
pub use labels::{day_label, DayLabel};
pub use picker::{
    day_row, hidden_inputs, slot_grid, DayButton, LoadedPicker, PickerState, SlotButton, SlotToggle,
};
pub use selection::{SelectionState, PREFERRED_SLOTS_FIELD};
pub use timestamp::{SlotParseError, SlotTime};
