// Filtering and sorting for the /players view.
//
// Operates over the live fetch result, never the persisted document.

use std::cmp::Ordering;

use serde_json::Value;

use crate::players::normalize::PlayerRecord;

/// Filter by exact position label and/or sort descending by a field.
///
/// A record matches the position filter when any of its mapped labels equals
/// the query. Records missing the sort field sort last; numeric values order
/// numerically, strings lexicographically, numbers ahead of strings. The
/// sort is stable, so ties keep their upstream order.
pub fn filter_players(
    players: Vec<PlayerRecord>,
    position: Option<&str>,
    sort_key: Option<&str>,
) -> Vec<PlayerRecord> {
    let players: Vec<PlayerRecord> = match position {
        Some(label) => players
            .into_iter()
            .filter(|p| has_position(p, label))
            .collect(),
        None => players,
    };

    match sort_key {
        Some(key) => sort_descending(players, key),
        None => players,
    }
}

/// Whether the player's normalized positions string contains `label` as one
/// of its comma-separated entries.
fn has_position(player: &PlayerRecord, label: &str) -> bool {
    match &player.positions {
        Some(Value::String(positions)) => positions.split(", ").any(|l| l == label),
        _ => false,
    }
}

fn sort_descending(players: Vec<PlayerRecord>, key: &str) -> Vec<PlayerRecord> {
    let mut keyed: Vec<(Option<Value>, PlayerRecord)> = players
        .into_iter()
        .map(|p| (sort_field(&p, key), p))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_desc(a, b));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Look up a sortable field. Names and positions live on the struct; every
/// other field in the pass-through bag.
fn sort_field(player: &PlayerRecord, key: &str) -> Option<Value> {
    match key {
        "first_name" => Some(Value::String(player.first_name.clone())),
        "last_name" => Some(Value::String(player.last_name.clone())),
        "positions" => player.positions.clone(),
        _ => player.extra.get(key).cloned(),
    }
}

/// Descending order with missing values last.
fn compare_desc(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_desc_values(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_desc_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NEG_INFINITY);
            let y = y.as_f64().unwrap_or(f64::NEG_INFINITY);
            y.partial_cmp(&x).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => y.cmp(x),
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
