//! Stored route records.
//!
//! A route document looks like:
//!
//! ```json
//! {
//!   "id": "route_81",
//!   "routeName": "Trotro 81",
//!   "origin": "Achimota",
//!   "destination": "Adenta Station",
//!   "fare": 6.0,
//!   "stops": ["Achimota", "Achimota Club House", "PWD"]
//! }
//! ```
//!
//! Only `stops` is required. `origin` and `destination` are informational;
//! matching always works on the stop sequence.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

/// Identifier of a stored route document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(String);

impl RouteId {
    /// Create a route ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transit route as read from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    /// Document identifier.
    pub id: RouteId,

    /// Display label (e.g. "Trotro 241").
    pub route_name: String,

    /// Stop names in travel order.
    pub stops: Vec<String>,

    /// Fare for the whole route, if the document carries one.
    pub fare: Option<f64>,

    /// Informational first stop of the route.
    pub origin: Option<String>,

    /// Informational last stop of the route.
    pub destination: Option<String>,
}

/// A stored document that could not be read as a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed route record {key}: {reason}")]
pub struct MalformedRecord {
    /// Document key (or position) within the collection.
    pub key: String,

    /// What was wrong with the document.
    pub reason: String,
}

impl MalformedRecord {
    /// Create a new malformed-record report.
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of decoding one stored document.
pub type RecordRead = Result<RouteRecord, MalformedRecord>;

impl RouteRecord {
    /// Create a record with the given stops and no fare.
    pub fn new<S: Into<String>>(
        id: impl Into<String>,
        route_name: impl Into<String>,
        stops: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id: RouteId::new(id),
            route_name: route_name.into(),
            stops: stops.into_iter().map(Into::into).collect(),
            fare: None,
            origin: None,
            destination: None,
        }
    }

    /// Set the route fare.
    pub fn with_fare(mut self, fare: f64) -> Self {
        self.fare = Some(fare);
        self
    }

    /// Decode a stored JSON document.
    ///
    /// `key` is the storage key of the document. The document's own `id`
    /// field takes precedence over it when present.
    pub fn from_document(key: &str, document: &Value) -> RecordRead {
        let Some(fields) = document.as_object() else {
            return Err(MalformedRecord::new(key, "document is not an object"));
        };

        let id = match fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => key.to_string(),
        };

        let stops = match fields.get("stops") {
            Some(Value::Array(values)) => values
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    value.as_str().map(str::to_owned).ok_or_else(|| {
                        MalformedRecord::new(&id, format!("stop {idx} is not a string"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(MalformedRecord::new(&id, "stops is not an array")),
            None => return Err(MalformedRecord::new(&id, "missing stops")),
        };

        let fare = match fields.get("fare") {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_f64() {
                Some(fare) if fare.is_finite() => Some(fare),
                _ => return Err(MalformedRecord::new(&id, "fare is not a number")),
            },
        };

        let route_name = informational_string(fields, "routeName", &id).unwrap_or_else(|| id.clone());
        let origin = informational_string(fields, "origin", &id);
        let destination = informational_string(fields, "destination", &id);

        Ok(Self {
            id: RouteId(id),
            route_name,
            stops,
            fare,
            origin,
            destination,
        })
    }
}

/// Read a descriptive string field. Other value types are ignored, since
/// these fields never take part in matching.
fn informational_string(fields: &Map<String, Value>, name: &str, id: &str) -> Option<String> {
    match fields.get(name) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            debug!(id, field = name, value = %other, "ignoring non-string route field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_document() {
        let doc = json!({
            "id": "route_81",
            "routeName": "Trotro 81",
            "origin": "Achimota",
            "destination": "Adenta Station",
            "fare": 6.0,
            "stops": ["Achimota", "PWD", "Adenta Station"]
        });

        let record = RouteRecord::from_document("ignored", &doc).unwrap();

        assert_eq!(record.id.as_str(), "route_81");
        assert_eq!(record.route_name, "Trotro 81");
        assert_eq!(record.stops, vec!["Achimota", "PWD", "Adenta Station"]);
        assert_eq!(record.fare, Some(6.0));
        assert_eq!(record.origin.as_deref(), Some("Achimota"));
        assert_eq!(record.destination.as_deref(), Some("Adenta Station"));
    }

    #[test]
    fn storage_key_used_when_id_absent() {
        let doc = json!({ "routeName": "Trotro 241", "stops": ["A", "B"] });

        let record = RouteRecord::from_document("route_241", &doc).unwrap();

        assert_eq!(record.id, RouteId::new("route_241"));
        assert_eq!(record.fare, None);
    }

    #[test]
    fn integer_fare_accepted() {
        let doc = json!({ "stops": ["A", "B"], "fare": 5 });
        let record = RouteRecord::from_document("r", &doc).unwrap();
        assert_eq!(record.fare, Some(5.0));
    }

    #[test]
    fn null_fare_is_absent() {
        let doc = json!({ "stops": ["A", "B"], "fare": null });
        let record = RouteRecord::from_document("r", &doc).unwrap();
        assert_eq!(record.fare, None);
    }

    #[test]
    fn route_name_defaults_to_id() {
        let doc = json!({ "id": "route_9", "stops": [] });
        let record = RouteRecord::from_document("key", &doc).unwrap();
        assert_eq!(record.route_name, "route_9");
    }

    #[test]
    fn rejects_non_object() {
        let err = RouteRecord::from_document("k", &json!(["A", "B"])).unwrap_err();
        assert_eq!(err, MalformedRecord::new("k", "document is not an object"));
    }

    #[test]
    fn rejects_missing_stops() {
        let err = RouteRecord::from_document("k", &json!({ "routeName": "X" })).unwrap_err();
        assert_eq!(err.reason, "missing stops");
    }

    #[test]
    fn rejects_non_array_stops() {
        let doc = json!({ "id": "bad", "stops": "A, B" });
        let err = RouteRecord::from_document("k", &doc).unwrap_err();
        assert_eq!(err, MalformedRecord::new("bad", "stops is not an array"));
    }

    #[test]
    fn rejects_non_string_stop() {
        let doc = json!({ "stops": ["A", 3, "B"] });
        let err = RouteRecord::from_document("k", &doc).unwrap_err();
        assert_eq!(err.reason, "stop 1 is not a string");
    }

    #[test]
    fn rejects_non_numeric_fare() {
        let doc = json!({ "stops": ["A", "B"], "fare": "3.5" });
        let err = RouteRecord::from_document("k", &doc).unwrap_err();
        assert_eq!(err.reason, "fare is not a number");
    }

    #[test]
    fn non_string_route_name_falls_back_to_id() {
        let doc = json!({ "id": "route_241", "stops": ["A"], "routeName": 241 });
        let record = RouteRecord::from_document("k", &doc).unwrap();
        assert_eq!(record.route_name, "route_241");
    }

    #[test]
    fn non_string_endpoints_are_ignored() {
        let doc = json!({
            "id": "r",
            "origin": 5,
            "destination": { "name": "Wass" },
            "stops": ["X", "Y"]
        });

        let record = RouteRecord::from_document("r", &doc).unwrap();

        assert_eq!(record.origin, None);
        assert_eq!(record.destination, None);
        assert_eq!(record.stops, vec!["X", "Y"]);
    }

    #[test]
    fn malformed_display() {
        let err = MalformedRecord::new("route_1", "missing stops");
        assert_eq!(
            err.to_string(),
            "malformed route record route_1: missing stops"
        );
    }
}
