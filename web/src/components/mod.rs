pub mod error;
pub mod loading;
pub mod time_slots_picker;

// Re-export commonly used types
pub use error::ErrorView;
pub use loading::LoadingView;
pub use time_slots_picker::TimeSlotsPicker;
