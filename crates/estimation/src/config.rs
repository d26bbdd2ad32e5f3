use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Emission coefficients in kgCO2 per the unit implied by each name
/// (per km, per liter, per kWh, per kg, or a flat per-meal average).
///
/// Starter values; deployments retune these per region/authority by
/// supplying their own table instead of relying on the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionFactors {
    pub car_petrol_per_km: f64,
    pub car_petrol_per_liter: f64,
    pub bus_per_km: f64,
    pub train_per_km: f64,
    pub flight_short_per_km: f64,
    pub electricity_per_kwh: f64,
    pub waste_per_kg: f64,
    /// Flat per-meal average, also the fallback for unresolved factor keys.
    pub avg_meal: f64,
    /// Keyed factors referenced by photo label rules (kgCO2 per kg).
    pub keyed: HashMap<String, f64>,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        let keyed = HashMap::from([
            ("beef_kgco2_per_kg".to_owned(), 27.0),
            ("chicken_kgco2_per_kg".to_owned(), 6.9),
            ("avg_meal_kgco2".to_owned(), 2.5),
        ]);

        Self {
            car_petrol_per_km: 0.192,
            car_petrol_per_liter: 2.31,
            bus_per_km: 0.105,
            train_per_km: 0.041,
            flight_short_per_km: 0.255,
            electricity_per_kwh: 0.475,
            waste_per_kg: 1.0,
            avg_meal: 2.5,
            keyed,
        }
    }
}

impl EmissionFactors {
    /// Resolve a factor key referenced by a photo label rule.
    /// Unknown keys fall back to the per-meal average.
    pub fn keyed_or_avg_meal(&self, key: &str) -> f64 {
        self.keyed.get(key).copied().unwrap_or(self.avg_meal)
    }
}

/// Quick-estimation rule for one normalized (lowercase) photo label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRule {
    pub category: String,
    /// Reference quantity in kg the label is assumed to represent.
    pub reference_kg: f64,
    /// Key into [`EmissionFactors::keyed`].
    pub factor_key: String,
}

impl LabelRule {
    fn new(category: &str, reference_kg: f64, factor_key: &str) -> Self {
        Self {
            category: category.to_owned(),
            reference_kg,
            factor_key: factor_key.to_owned(),
        }
    }
}

/// Photo label → rule mapping. Labels are matched after lowercasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoLabelRules {
    pub rules: HashMap<String, LabelRule>,
}

impl Default for PhotoLabelRules {
    fn default() -> Self {
        // Extend as new labels show up in vision output.
        let rules = HashMap::from([
            (
                "beef burger".to_owned(),
                LabelRule::new("food", 0.2, "beef_kgco2_per_kg"),
            ),
            (
                "burger".to_owned(),
                LabelRule::new("food", 0.2, "beef_kgco2_per_kg"),
            ),
            (
                "beef".to_owned(),
                LabelRule::new("food", 0.25, "beef_kgco2_per_kg"),
            ),
            (
                "chicken".to_owned(),
                LabelRule::new("food", 0.2, "chicken_kgco2_per_kg"),
            ),
            (
                "chicken sandwich".to_owned(),
                LabelRule::new("food", 0.2, "chicken_kgco2_per_kg"),
            ),
            (
                "soda can".to_owned(),
                LabelRule::new("drink", 0.02, "avg_meal_kgco2"),
            ),
        ]);

        Self { rules }
    }
}

impl PhotoLabelRules {
    pub fn lookup(&self, normalized_label: &str) -> Option<&LabelRule> {
        self.rules.get(normalized_label)
    }
}

/// The full table set the estimation engine runs against. Injected at
/// construction so tests and deployments control the coefficients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimationConfig {
    pub factors: EmissionFactors,
    pub labels: PhotoLabelRules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_factors_match_reference_values() {
        let f = EmissionFactors::default();
        assert!((f.car_petrol_per_km - 0.192).abs() < 1e-9);
        assert!((f.car_petrol_per_liter - 2.31).abs() < 1e-9);
        assert!((f.bus_per_km - 0.105).abs() < 1e-9);
        assert!((f.train_per_km - 0.041).abs() < 1e-9);
        assert!((f.flight_short_per_km - 0.255).abs() < 1e-9);
        assert!((f.electricity_per_kwh - 0.475).abs() < 1e-9);
        assert!((f.waste_per_kg - 1.0).abs() < 1e-9);
        assert!((f.avg_meal - 2.5).abs() < 1e-9);
    }

    #[test]
    fn keyed_factor_resolves() {
        let f = EmissionFactors::default();
        assert!((f.keyed_or_avg_meal("beef_kgco2_per_kg") - 27.0).abs() < 1e-9);
        assert!((f.keyed_or_avg_meal("chicken_kgco2_per_kg") - 6.9).abs() < 1e-9);
    }

    #[test]
    fn unknown_factor_key_falls_back_to_avg_meal() {
        let f = EmissionFactors::default();
        assert!((f.keyed_or_avg_meal("tofu_kgco2_per_kg") - 2.5).abs() < 1e-9);
    }

    #[test]
    fn default_label_rules_resolve_into_factor_table() {
        let cfg = EstimationConfig::default();
        for (label, rule) in &cfg.labels.rules {
            assert!(
                cfg.factors.keyed.contains_key(&rule.factor_key),
                "label {label} references missing factor {}",
                rule.factor_key
            );
            assert!(rule.reference_kg > 0.0, "label {label} has zero reference kg");
        }
    }

    #[test]
    fn label_lookup_is_exact_on_normalized_form() {
        let rules = PhotoLabelRules::default();
        assert!(rules.lookup("beef").is_some());
        assert!(rules.lookup("Beef").is_none());
        assert!(rules.lookup("kite").is_none());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = EstimationConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize");
        let back: EstimationConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.labels.rules.len(), cfg.labels.rules.len());
        assert!((back.factors.avg_meal - cfg.factors.avg_meal).abs() < 1e-9);
    }
}
