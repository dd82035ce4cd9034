use chrono::NaiveDate;

/// Two-line label of a day button: `FRI` over `16 Jan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayLabel {
    pub weekday: String,
    pub day_month: String,
}

/// Builds the label for a `YYYY-MM-DD` day key. A key that is not a valid
/// date is shown as-is on the second line.
pub fn day_label(day_key: &str) -> DayLabel {
    match NaiveDate::parse_from_str(day_key, "%Y-%m-%d") {
        Ok(date) => DayLabel {
            weekday: date.format("%a").to_string().to_uppercase(),
            day_month: date.format("%-d %b").to_string(),
        },
        Err(_) => DayLabel {
            weekday: String::new(),
            day_month: day_key.to_string(),
        },
    }
}
