//! Mapping of loosely-structured VRM records onto metric observations.
//!
//! The record shape differs between accounts and installations, so every lookup
//! degrades to «absent» instead of failing.

use serde_json::Value;

use crate::telemetry::Metric;

/// Metric family with its source field paths, in priority order.
struct Family {
    name: &'static str,
    unit: &'static str,
    candidates: &'static [&'static [&'static str]],
}

const FAMILIES: [Family; 4] = [
    Family {
        name: "pv_power_w",
        unit: "W",
        candidates: &[&["solar", "power"], &["total_solar_power"], &["pv_power"]],
    },
    Family {
        name: "ac_load_w",
        unit: "W",
        candidates: &[&["ac", "consumption"], &["total_consumption"], &["consumption"]],
    },
    Family { name: "soc_pct", unit: "%", candidates: &[&["battery", "soc"], &["soc"]] },
    Family { name: "grid_power_w", unit: "W", candidates: &[&["grid", "power"], &["grid_power"]] },
];

/// Strip one level of the `records` or `record` wrapper, if any.
///
/// A `null` wrapper counts as absent.
#[must_use]
pub fn unwrap_record(response: &Value) -> &Value {
    ["records", "record"]
        .into_iter()
        .find_map(|key| response.get(key).filter(|value| !value.is_null()))
        .unwrap_or(response)
}

/// Extract the recognized metrics from the record. Absent families produce no entry.
#[must_use]
pub fn normalize(record: &Value) -> Vec<Metric> {
    FAMILIES
        .iter()
        .filter_map(|family| {
            family
                .candidates
                .iter()
                .find_map(|path| lookup(record, path).and_then(coerce))
                .map(|value| Metric::new(family.name, value, family.unit))
        })
        .collect()
}

fn lookup<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(record, |value, key| value.get(key))
}

/// Coerce a JSON value into a finite float, treating anything else as absent.
fn coerce(value: &Value) -> Option<f64> {
    let value: Option<f64> = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    value.filter(|value| value.is_finite())
}
