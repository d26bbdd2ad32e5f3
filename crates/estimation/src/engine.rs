use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{EmissionFactors, EstimationConfig};

/// A detection only contributes above this confidence (strictly greater).
const MIN_DETECTION_CONFIDENCE: f64 = 0.2;

/// One labeled observation from the external vision call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Per-detection outcome. `estimated_kgco2` is `None` for detections that
/// were not assessed (unknown label or confidence at/below threshold),
/// which is distinct from a zero contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionDetail {
    pub label: String,
    pub confidence: f64,
    pub estimated_kgco2: Option<f64>,
}

/// Round to 4 decimal places, the precision reported at the API boundary.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Estimate transport emissions in kgCO2.
///
/// For `car_petrol`, a positive fuel quantity wins over the distance
/// estimate and is not divided by occupancy (fuel burn is already a
/// vehicle-level quantity); the distance estimate is divided by
/// `max(passengers, 1)`. Bus, train, and short-haul flights are per-km
/// per-passenger coefficients, so occupancy and fuel are ignored.
/// Unknown vehicle types contribute zero rather than failing.
pub fn estimate_transport(
    factors: &EmissionFactors,
    vehicle_type: &str,
    distance_km: f64,
    passengers: i64,
    fuel_liters: Option<f64>,
) -> f64 {
    let km = sanitize(distance_km);

    match vehicle_type {
        "car_petrol" => {
            if let Some(liters) = fuel_liters.filter(|l| l.is_finite() && *l > 0.0) {
                return liters * factors.car_petrol_per_liter;
            }
            km * factors.car_petrol_per_km / passengers.max(1) as f64
        }
        "bus" => km * factors.bus_per_km,
        "train" => km * factors.train_per_km,
        "flight_short" => km * factors.flight_short_per_km,
        _ => 0.0,
    }
}

/// Estimate electricity emissions in kgCO2. Negative or missing kWh
/// coerces to zero.
pub fn estimate_electricity(factors: &EmissionFactors, kwh: f64) -> f64 {
    sanitize(kwh) * factors.electricity_per_kwh
}

/// Estimate waste emissions in kgCO2. Negative or missing kg coerces to
/// zero.
pub fn estimate_waste(factors: &EmissionFactors, kg: f64) -> f64 {
    sanitize(kg) * factors.waste_per_kg
}

/// Estimate emissions from photo detections.
///
/// Labels are lowercased before lookup. A detection contributes only when
/// a label rule exists and confidence is strictly above 0.2; the
/// contribution is `reference_kg × factor`, with the factor falling back
/// to the per-meal average when the rule's key is absent from the table.
/// Every detection yields a detail record in input order; non-contributing
/// detections carry `estimated_kgco2: None`. The total is rounded to 4
/// decimals.
pub fn estimate_from_detections(
    config: &EstimationConfig,
    detections: &[Detection],
) -> (f64, Vec<DetectionDetail>) {
    let mut total = 0.0;
    let mut details = Vec::with_capacity(detections.len());

    for detection in detections {
        let label = detection.label.to_lowercase();
        let confidence = sanitize(detection.confidence);

        let estimate = config
            .labels
            .lookup(&label)
            .filter(|_| confidence > MIN_DETECTION_CONFIDENCE)
            .map(|rule| rule.reference_kg * config.factors.keyed_or_avg_meal(&rule.factor_key));

        if let Some(est) = estimate {
            total += est;
        }

        details.push(DetectionDetail {
            label,
            confidence,
            estimated_kgco2: estimate.map(round4),
        });
    }

    (round4(total), details)
}

/// Resolve the emissions value for a new activity entry.
///
/// A non-zero `estimated_kgco2` in the payload is a client-supplied
/// override and is used verbatim; otherwise the category dispatches to the
/// matching estimator. Categories without an estimator resolve to zero.
pub fn resolve_entry_emissions(config: &EstimationConfig, category: &str, details: &Value) -> f64 {
    let override_value = num_field(details, "estimated_kgco2");
    if override_value != 0.0 {
        return override_value;
    }

    match category {
        "transport" => estimate_transport(
            &config.factors,
            str_field(details, "vehicle_type"),
            num_field(details, "km"),
            int_field(details, "passengers", 1),
            opt_num_field(details, "fuel_liters"),
        ),
        "electricity" => estimate_electricity(&config.factors, num_field(details, "kwh")),
        "waste" => estimate_waste(&config.factors, num_field(details, "kg")),
        _ => 0.0,
    }
}

/// Coerce to a usable magnitude: negative, NaN, and infinite inputs all
/// degrade to zero instead of rejecting the entry.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn num_field(details: &Value, key: &str) -> f64 {
    match details.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn opt_num_field(details: &Value, key: &str) -> Option<f64> {
    match details.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn int_field(details: &Value, key: &str, default: i64) -> i64 {
    match details.get(key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

fn str_field<'a>(details: &'a Value, key: &str) -> &'a str {
    details.get(key).and_then(Value::as_str).unwrap_or("")
}
