// Normalization of raw upstream player records into display-ready form.
//
// The upstream feed is a loose list of JSON objects; only the name fields
// and the position codes get reshaped. Everything else passes through
// untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// First name substituted when the upstream record has none.
pub const DEFAULT_FIRST_NAME: &str = "No Name";

// ---------------------------------------------------------------------------
// Position codes
// ---------------------------------------------------------------------------

/// Map an upstream position code to its display label. The table is a closed
/// enumeration; any code outside 1..=6 maps to `"Unknown"`.
pub fn position_label(code: u64) -> &'static str {
    match code {
        1 => "HOK",
        2 => "MID",
        3 => "EDG",
        4 => "HLF",
        5 => "CTR",
        6 => "WFB",
        _ => "Unknown",
    }
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Deserialization target for one upstream record, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub positions: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A normalized player record as served by `/data` and `/players`. Fully
/// transient; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub first_name: String,
    pub last_name: String,
    /// Display string of position labels, or the untouched raw value when
    /// the upstream field held an empty list. Omitted when absent upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize one raw upstream record. Pure, with no failure path: missing
/// fields produce documented defaults rather than errors.
pub fn normalize(raw: RawPlayer) -> PlayerRecord {
    PlayerRecord {
        first_name: raw
            .first_name
            .unwrap_or_else(|| DEFAULT_FIRST_NAME.to_string()),
        last_name: raw.last_name.unwrap_or_default(),
        positions: raw.positions.map(map_positions),
        extra: raw.extra,
    }
}

/// Join the mapped labels of a non-empty code list into one display string.
/// An empty list (or an unexpected non-list value) is left untouched.
fn map_positions(raw: Value) -> Value {
    match raw {
        Value::Array(codes) if !codes.is_empty() => {
            let labels: Vec<&str> = codes
                .iter()
                .map(|code| code.as_u64().map(position_label).unwrap_or("Unknown"))
                .collect();
            Value::String(labels.join(", "))
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper: deserialize a raw record from a JSON literal.
    fn raw(value: Value) -> RawPlayer {
        serde_json::from_value(value).expect("raw record should deserialize")
    }

    #[test]
    fn position_label_known_codes() {
        assert_eq!(position_label(1), "HOK");
        assert_eq!(position_label(2), "MID");
        assert_eq!(position_label(3), "EDG");
        assert_eq!(position_label(4), "HLF");
        assert_eq!(position_label(5), "CTR");
        assert_eq!(position_label(6), "WFB");
    }

    #[test]
    fn position_label_unknown_codes() {
        assert_eq!(position_label(0), "Unknown");
        assert_eq!(position_label(7), "Unknown");
        assert_eq!(position_label(99), "Unknown");
    }

    #[test]
    fn positions_joined_into_display_string() {
        let player = normalize(raw(json!({
            "first_name": "Nathan",
            "last_name": "Cleary",
            "positions": [4, 6]
        })));
        assert_eq!(player.positions, Some(json!("HLF, WFB")));
    }

    #[test]
    fn unrecognized_code_maps_to_unknown() {
        let player = normalize(raw(json!({"positions": [3, 99]})));
        assert_eq!(player.positions, Some(json!("EDG, Unknown")));
    }

    #[test]
    fn non_integer_code_maps_to_unknown() {
        let player = normalize(raw(json!({"positions": ["HOK", 2]})));
        assert_eq!(player.positions, Some(json!("Unknown, MID")));
    }

    #[test]
    fn absent_positions_stays_absent() {
        let player = normalize(raw(json!({"first_name": "A"})));
        assert!(player.positions.is_none());

        // And the serialized record has no positions key at all.
        let serialized = serde_json::to_value(&player).unwrap();
        assert!(serialized.get("positions").is_none());
    }

    #[test]
    fn empty_positions_list_left_untouched() {
        let player = normalize(raw(json!({"positions": []})));
        assert_eq!(player.positions, Some(json!([])));
    }

    #[test]
    fn missing_names_get_defaults() {
        let player = normalize(raw(json!({"player_id": 1})));
        assert_eq!(player.first_name, "No Name");
        assert_eq!(player.last_name, "");
    }

    #[test]
    fn present_names_pass_through() {
        let player = normalize(raw(json!({
            "first_name": "Jahrome",
            "last_name": "Hughes"
        })));
        assert_eq!(player.first_name, "Jahrome");
        assert_eq!(player.last_name, "Hughes");
    }

    #[test]
    fn unmodeled_fields_pass_through() {
        let player = normalize(raw(json!({
            "first_name": "A",
            "player_id": 42,
            "stats": {"total_points": 812},
            "squad_id": 500011
        })));
        assert_eq!(player.extra.get("player_id"), Some(&json!(42)));
        assert_eq!(player.extra.get("stats"), Some(&json!({"total_points": 812})));
        assert_eq!(player.extra.get("squad_id"), Some(&json!(500011)));
    }
}
