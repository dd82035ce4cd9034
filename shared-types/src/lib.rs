use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Body of `GET /get-domain-slots/`.
///
/// Every field is optional on the wire so that a response missing `slots` or
/// `now_iso` can be reported as a shape error instead of a parse error.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DomainSlotsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub now_iso: Option<String>,
    #[serde(default)]
    pub slots: Option<OrderedDaySlots>,
}

/// Day key -> slot strings, kept in the order the server wrote the keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedDaySlots(pub Vec<(String, Vec<String>)>);

impl OrderedDaySlots {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(day, slots)| (day.as_str(), slots.as_slice()))
    }
}

impl IntoIterator for OrderedDaySlots {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<(String, Vec<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for OrderedDaySlots {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (day, slots) in &self.0 {
            map.serialize_entry(day, slots)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OrderedDaySlots {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DaySlotsVisitor;

        impl<'de> Visitor<'de> for DaySlotsVisitor {
            type Value = OrderedDaySlots;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of day keys to lists of ISO timestamps")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut days: Vec<(String, Vec<String>)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((day, slots)) = access.next_entry::<String, Vec<String>>()? {
                    // a repeated key replaces the earlier entry but keeps its position
                    match days.iter().position(|(existing, _)| *existing == day) {
                        Some(index) => days[index].1 = slots,
                        None => days.push((day, slots)),
                    }
                }
                Ok(OrderedDaySlots(days))
            }
        }

        deserializer.deserialize_map(DaySlotsVisitor)
    }
}

/// Body returned by the preferred-slots save endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SaveSlotsResponse {
    pub status: String,
    #[serde(default)]
    pub slots_count: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SaveSlotsResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_keys_keep_server_order() {
        let body = r#"{
            "status": "ok",
            "now_iso": "2026-01-16T09:30:00+03:00",
            "slots": {
                "2026-01-18": ["2026-01-18T10:00:00+03:00"],
                "2026-01-16": [],
                "2026-01-17": ["2026-01-17T09:00:00+03:00", "2026-01-17T10:00:00+03:00"]
            }
        }"#;

        let response: DomainSlotsResponse = serde_json::from_str(body).unwrap();
        let slots = response.slots.unwrap();
        let keys: Vec<&str> = slots.iter().map(|(day, _)| day).collect();

        assert_eq!(keys, vec!["2026-01-18", "2026-01-16", "2026-01-17"]);
        assert_eq!(slots.0[2].1.len(), 2);
        assert_eq!(response.now_iso.as_deref(), Some("2026-01-16T09:30:00+03:00"));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let response: DomainSlotsResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();

        assert!(response.slots.is_none());
        assert!(response.now_iso.is_none());
    }

    #[test]
    fn slots_must_be_a_map_of_string_lists() {
        let result = serde_json::from_str::<DomainSlotsResponse>(r#"{"slots": {"2026-01-16": [1, 2]}}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<DomainSlotsResponse>(r#"{"slots": ["2026-01-16"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn ordered_slots_serialize_back_to_a_json_object() {
        let slots = OrderedDaySlots(vec![
            ("2026-01-17".to_string(), vec!["2026-01-17T09:00:00+03:00".to_string()]),
            ("2026-01-16".to_string(), vec![]),
        ]);

        let json = serde_json::to_string(&slots).unwrap();
        assert_eq!(
            json,
            r#"{"2026-01-17":["2026-01-17T09:00:00+03:00"],"2026-01-16":[]}"#
        );
    }

    #[test]
    fn save_response_reports_errors() {
        let ok: SaveSlotsResponse =
            serde_json::from_str(r#"{"status": "ok", "slots_count": 3}"#).unwrap();
        assert!(ok.is_ok());
        assert_eq!(ok.slots_count, Some(3));

        let failed: SaveSlotsResponse =
            serde_json::from_str(r#"{"status": "error", "error": "slot_in_past"}"#).unwrap();
        assert!(!failed.is_ok());
        assert_eq!(failed.error.as_deref(), Some("slot_in_past"));
    }
}
