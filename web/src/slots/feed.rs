use gloo_net::http::Request;
use shared_types::DomainSlotsResponse;
use thiserror::Error;
use web_sys::{AbortSignal, RequestCredentials};

use super::timestamp::SlotTime;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeedError {
    #[error("slots request failed: {0}")]
    Request(String),
    #[error("slots endpoint answered with status {0}")]
    Status(u16),
    #[error("slots response is not valid JSON: {0}")]
    Malformed(String),
    #[error("slots response has no `{0}` field")]
    MissingField(&'static str),
    #[error("slots response has an unparseable now_iso: {0:?}")]
    InvalidNow(String),
}

/// One slot as delivered by the feed. `time` is `None` when the server sent
/// a string that does not parse; such slots are shown but never selectable.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSlot {
    pub raw: String,
    pub time: Option<SlotTime>,
}

impl FeedSlot {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let time = SlotTime::parse(&raw).ok();
        Self { raw, time }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySlots {
    pub key: String,
    pub slots: Vec<FeedSlot>,
}

/// Everything one widget load knows about availability.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotFeed {
    pub days: Vec<DaySlots>,
    pub now: SlotTime,
}

impl SlotFeed {
    pub fn from_response(response: DomainSlotsResponse) -> Result<Self, FeedError> {
        let slots = response.slots.ok_or(FeedError::MissingField("slots"))?;
        let now_raw = response.now_iso.ok_or(FeedError::MissingField("now_iso"))?;
        let now = SlotTime::parse(&now_raw).map_err(|_| FeedError::InvalidNow(now_raw))?;

        let days = slots
            .into_iter()
            .map(|(key, raw_slots)| DaySlots {
                key,
                slots: raw_slots.into_iter().map(FeedSlot::new).collect(),
            })
            .collect();

        Ok(Self { days, now })
    }
}

pub fn parse_slot_feed(body: &str) -> Result<SlotFeed, FeedError> {
    let response: DomainSlotsResponse =
        serde_json::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))?;
    SlotFeed::from_response(response)
}

/// Loads the availability feed. The request carries the AJAX marker header
/// and same-origin credentials so the session cookie goes along.
pub async fn fetch_slot_feed(
    api_url: &str,
    abort: Option<&AbortSignal>,
) -> Result<SlotFeed, FeedError> {
    let response = Request::get(api_url)
        .header("X-Requested-With", "XMLHttpRequest")
        .credentials(RequestCredentials::SameOrigin)
        .abort_signal(abort)
        .send()
        .await
        .map_err(|e| FeedError::Request(e.to_string()))?;

    if !response.ok() {
        return Err(FeedError::Status(response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FeedError::Request(e.to_string()))?;

    parse_slot_feed(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_feed() {
        let feed = parse_slot_feed(
            r#"{
                "status": "ok",
                "now_iso": "2026-01-16T09:30:00+03:00",
                "slots": {
                    "2026-01-16": ["2026-01-16T09:00:00+03:00", "2026-01-16T10:00:00+03:00"],
                    "2026-01-17": []
                }
            }"#,
        )
        .unwrap();

        assert_eq!(feed.days.len(), 2);
        assert_eq!(feed.days[0].key, "2026-01-16");
        assert_eq!(feed.days[0].slots.len(), 2);
        assert!(feed.days[0].slots.iter().all(|slot| slot.time.is_some()));
        assert_eq!(feed.days[1].key, "2026-01-17");
        assert!(feed.days[1].slots.is_empty());
        assert_eq!(feed.now, SlotTime::parse("2026-01-16T06:30:00Z").unwrap());
    }

    #[test]
    fn missing_slots_is_a_shape_error() {
        let err = parse_slot_feed(r#"{"now_iso": "2026-01-16T09:30:00+03:00"}"#).unwrap_err();

        assert_eq!(err, FeedError::MissingField("slots"));
    }

    #[test]
    fn missing_or_bad_now_is_rejected() {
        let err = parse_slot_feed(r#"{"slots": {}}"#).unwrap_err();
        assert_eq!(err, FeedError::MissingField("now_iso"));

        let err = parse_slot_feed(r#"{"slots": {}, "now_iso": "soon"}"#).unwrap_err();
        assert_eq!(err, FeedError::InvalidNow("soon".to_string()));
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_slot_feed("<html>login</html>").unwrap_err();

        assert!(matches!(err, FeedError::Malformed(_)));
    }

    #[test]
    fn unparseable_slot_is_kept_without_time() {
        let feed = parse_slot_feed(
            r#"{"now_iso": "2026-01-16T09:30:00+03:00", "slots": {"2026-01-16": ["broken"]}}"#,
        )
        .unwrap();

        let slot = &feed.days[0].slots[0];
        assert_eq!(slot.raw, "broken");
        assert!(slot.time.is_none());
    }
}
