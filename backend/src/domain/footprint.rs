//! Carbon footprint estimation.
//!
//! `estimate` is a pure function over the questionnaire inputs; the
//! `FootprintService` persists the snapshot so the questionnaire survives
//! restarts and is only recomputed when the inputs change.

use anyhow::Context;
use shared::{FootprintInputs, FootprintResult, FootprintSnapshot};
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::Result;
use crate::storage::KeyValueStorage;

// Annualized emission constants, kg CO2
const CAR_EMISSIONS_PER_KM: f64 = 0.2;
const ELECTRICITY_EMISSIONS_PER_KWH: f64 = 0.45;
const MEAT_MEAL_EMISSIONS: f64 = 5.0;
const SHORT_HAUL_FLIGHT_EMISSIONS: f64 = 300.0;
const LONG_HAUL_FLIGHT_EMISSIONS: f64 = 1000.0;
const CLOTHING_ITEM_EMISSIONS: f64 = 50.0;
const RECYCLING_REDUCTION_FACTOR: f64 = 0.8;

/// Flat absorption figure used to convert kilograms into trees, regardless
/// of which tree type is bought later
const CO2_ABSORPTION_PER_TREE: f64 = 20.0;

const FOOTPRINT_INPUTS_KEY: &str = "footprint_inputs";
const FOOTPRINT_RESULT_KEY: &str = "footprint_result";

/// Estimate the annual footprint for a set of lifestyle inputs.
///
/// Intermediate sums keep fractional precision; truncation happens once at
/// the end, for both the total and the tree count.
pub fn estimate(inputs: &FootprintInputs) -> FootprintResult {
    let transportation = f64::from(inputs.weekly_kilometers_driven) * CAR_EMISSIONS_PER_KM * 52.0;
    let electricity =
        f64::from(inputs.monthly_electricity_usage_kwh) * ELECTRICITY_EMISSIONS_PER_KWH * 12.0;
    let diet = f64::from(inputs.weekly_meat_meals) * MEAT_MEAL_EMISSIONS * 52.0;
    let flights = f64::from(inputs.short_haul_flights_per_year) * SHORT_HAUL_FLIGHT_EMISSIONS
        + f64::from(inputs.long_haul_flights_per_year) * LONG_HAUL_FLIGHT_EMISSIONS;
    let clothing = f64::from(inputs.new_clothing_items_per_month) * CLOTHING_ITEM_EMISSIONS * 12.0;

    let mut total = transportation + electricity + diet + flights + clothing;
    if inputs.recycles_waste {
        total *= RECYCLING_REDUCTION_FACTOR;
    }

    FootprintResult {
        total_co2_kg_per_year: total.floor() as u32,
        trees_needed: (total / CO2_ABSORPTION_PER_TREE).floor() as u32,
    }
}

/// Service that runs the estimator and caches the questionnaire snapshot in
/// the injected key-value store.
#[derive(Clone)]
pub struct FootprintService {
    storage: Arc<dyn KeyValueStorage>,
}

impl FootprintService {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Compute the footprint for `inputs`, persist the snapshot, and return
    /// the result
    pub async fn calculate(&self, inputs: &FootprintInputs) -> Result<FootprintResult> {
        let result = estimate(inputs);
        info!(
            total_co2_kg_per_year = result.total_co2_kg_per_year,
            trees_needed = result.trees_needed,
            "Calculated carbon footprint"
        );

        let inputs_json =
            serde_json::to_string(inputs).context("failed to encode footprint inputs")?;
        let result_json =
            serde_json::to_string(&result).context("failed to encode footprint result")?;
        self.storage.set(FOOTPRINT_INPUTS_KEY, &inputs_json).await?;
        self.storage.set(FOOTPRINT_RESULT_KEY, &result_json).await?;

        Ok(result)
    }

    /// Return the persisted snapshot, if the questionnaire has been completed
    pub async fn saved(&self) -> Result<Option<FootprintSnapshot>> {
        let inputs_json = self.storage.get(FOOTPRINT_INPUTS_KEY).await?;
        let result_json = self.storage.get(FOOTPRINT_RESULT_KEY).await?;

        match (inputs_json, result_json) {
            (Some(inputs_json), Some(result_json)) => {
                let inputs =
                    serde_json::from_str(&inputs_json).context("corrupt footprint inputs")?;
                let result =
                    serde_json::from_str(&result_json).context("corrupt footprint result")?;
                Ok(Some(FootprintSnapshot { inputs, result }))
            }
            _ => Ok(None),
        }
    }
}
