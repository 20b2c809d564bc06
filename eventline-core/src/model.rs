//! Event Model
//!
//! Wire representation of the fetched dataset. `relt` is kept as the raw JSON
//! value so events with a missing or non-numeric time survive for display.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors from loading a dataset
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// The input could not be read.
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not valid JSON or is missing a required field.
    #[error("Malformed dataset: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A single user-interaction event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Milliseconds since the session's reference event, as received
    #[serde(
        rename = "relt",
        alias = "relative_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relative_time: Option<Value>,
    /// Event category
    pub category: String,
    /// Event action
    pub action: String,
    /// Event label
    pub label: String,
    /// Creation timestamp (ISO-like)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date_created: String,
    /// Client IP
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip: String,
    /// Free-form arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<BTreeMap<String, Value>>,
    /// Any other fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Create an event without a time
    pub fn new(
        category: impl Into<String>,
        action: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            relative_time: None,
            category: category.into(),
            action: action.into(),
            label: label.into(),
            date_created: String::new(),
            ip: String::new(),
            args: None,
            extra: Map::new(),
        }
    }

    /// Set the relative time in milliseconds
    pub fn at(mut self, millis: f64) -> Self {
        self.relative_time = serde_json::Number::from_f64(millis).map(Value::Number);
        self
    }

    /// Add an argument
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Relative time when it is a JSON number
    pub fn relative_millis(&self) -> Option<f64> {
        self.relative_time.as_ref().and_then(Value::as_f64)
    }

    /// Look up an argument
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.as_ref()?.get(key)
    }
}

/// Ascending by relative time; events without a numeric time go last.
pub fn compare_relative_time(a: &Event, b: &Event) -> Ordering {
    match (a.relative_millis(), b.relative_millis()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A user and their events
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    /// Events, in source order until sorted
    pub events: Vec<Event>,
    /// Session creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    /// Session IP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Any other fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Create a user from events
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Stable sort of the events by relative time
    pub fn sort_events(&mut self) {
        self.events.sort_by(compare_relative_time);
    }

    /// Numeric relative times, in event order
    pub fn relative_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.events.iter().filter_map(Event::relative_millis)
    }
}

/// Everything fetched for one query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventsDataset {
    /// Users in source order
    pub users: Vec<User>,
}

impl EventsDataset {
    /// Create a dataset
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Parse `{"users": [...]}` or a bare `[...]` of users
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        if json.trim_start().starts_with('[') {
            let users: Vec<User> = serde_json::from_str(json)?;
            Ok(Self { users })
        } else {
            Ok(serde_json::from_str(json)?)
        }
    }

    /// Read and parse a dataset from any reader
    pub fn from_reader(mut reader: impl Read) -> Result<Self, DatasetError> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json_str(&json)
    }

    /// Read and parse a dataset file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Total number of events
    pub fn event_count(&self) -> usize {
        self.users.iter().map(|u| u.events.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wrapped_dataset() {
        let json = r#"{
            "users": [
                {
                    "date_created": "2019-05-01T10:00:00.123Z",
                    "ip": "10.0.0.1",
                    "events": [
                        {"relt": 100, "category": "page", "action": "view", "label": "home"},
                        {"relt": null, "category": "page", "action": "load", "label": "home",
                         "args": {"msisdn": "66800000000"}}
                    ]
                },
                {"events": []}
            ]
        }"#;

        let dataset = EventsDataset::from_json_str(json).unwrap();
        assert_eq!(dataset.users.len(), 2);
        assert_eq!(dataset.event_count(), 2);

        let user = &dataset.users[0];
        assert_eq!(user.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(user.events[0].relative_millis(), Some(100.0));
        assert_eq!(user.events[1].relative_millis(), None);
        assert_eq!(user.events[1].arg("msisdn"), Some(&json!("66800000000")));
        assert!(dataset.users[1].events.is_empty());
    }

    #[test]
    fn test_parse_bare_array() {
        let json = r#" [{"events": [{"relt": 5, "category": "c", "action": "a", "label": "l"}]}]"#;
        let dataset = EventsDataset::from_json_str(json).unwrap();
        assert_eq!(dataset.users.len(), 1);
        assert_eq!(dataset.users[0].events[0].relative_millis(), Some(5.0));
    }

    #[test]
    fn test_relative_time_alias() {
        let json = r#"{"relative_time": 42.5, "category": "c", "action": "a", "label": "l"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.relative_millis(), Some(42.5));
    }

    #[test]
    fn test_non_numeric_time_is_retained() {
        let json = r#"{"relt": "soon", "category": "c", "action": "a", "label": "l"}"#;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.relative_millis(), None);
        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["relt"], json!("soon"));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let json = r#"{"users": [{"events": [{"relt": 1, "category": "c", "action": "a"}]}]}"#;
        let err = EventsDataset::from_json_str(json).unwrap_err();

        assert!(matches!(err, DatasetError::Malformed(_)));
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn test_missing_events_is_malformed() {
        let err = EventsDataset::from_json_str(r#"{"users": [{"ip": "1.2.3.4"}]}"#).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed(_)));
    }

    #[test]
    fn test_extra_user_fields_pass_through() {
        let json = r#"{"users": [{"events": [], "xcid": "T0JIYg"}]}"#;
        let dataset = EventsDataset::from_json_str(json).unwrap();
        let back = serde_json::to_value(&dataset).unwrap();
        assert_eq!(back["users"][0]["xcid"], json!("T0JIYg"));
    }

    #[test]
    fn test_sort_events_is_stable_with_untimed_last() {
        let mut user = User::new(vec![
            Event::new("c", "untimed", "1"),
            Event::new("c", "a", "late").at(100.0),
            Event::new("c", "untimed", "2"),
            Event::new("c", "a", "early").at(50.0),
            Event::new("c", "a", "tie").at(100.0),
        ]);
        user.sort_events();

        let labels: Vec<_> = user.events.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["early", "late", "tie", "1", "2"]);
        assert_eq!(user.relative_times().collect::<Vec<_>>(), vec![50.0, 100.0, 100.0]);
    }

    #[test]
    fn test_event_round_trip_is_faithful() {
        let json = r#"{"relt": 1, "category": "c", "action": "a", "label": "l",
                       "event_id": 77, "xcid": "T0JIYg"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.extra.get("event_id"), Some(&json!(77)));

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(
            back,
            json!({"relt": 1, "category": "c", "action": "a", "label": "l",
                   "event_id": 77, "xcid": "T0JIYg"})
        );
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let event: Event =
            serde_json::from_str(r#"{"category": "c", "action": "a", "label": "l"}"#).unwrap();
        let back = serde_json::to_value(&event).unwrap();

        let keys: Vec<&str> = back
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["action", "category", "label"]);
        assert_eq!(event, Event::new("c", "a", "l"));
    }

    #[test]
    fn test_from_reader() {
        let json = br#"{"users": []}"#;
        let dataset = EventsDataset::from_reader(&json[..]).unwrap();
        assert!(dataset.users.is_empty());
    }
}
