use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a tree the user owns.
///
/// Serialized as the literal status strings the mobile clients already
/// display, so the JSON stays compatible with existing consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeStatus {
    #[serde(rename = "Planted")]
    Planted,
    #[serde(rename = "Ready to be planted (Already bought)")]
    ReadyToBePlanted,
}

impl fmt::Display for TreeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeStatus::Planted => write!(f, "Planted"),
            TreeStatus::ReadyToBePlanted => write!(f, "Ready to be planted (Already bought)"),
        }
    }
}

/// A purchasable catalog entry: one per tree type, priced once at store
/// initialization and persisted thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreTree {
    /// One-time price in wallet currency, rounded to 2 decimals
    pub price: f64,
    pub title: String,
    pub description: String,
    pub photo_url: String,
    /// Tree type name, e.g. "OAK"
    #[serde(rename = "type")]
    pub tree_type: String,
}

/// A tree the user owns, either already planted (with a location and date)
/// or still waiting to be planted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoughtTree {
    /// Unique, monotonically assigned id (stringified count at creation time)
    pub id: String,
    pub title: String,
    pub description: String,
    /// "YYYY-MM-DD", present only for planted trees
    pub planted_date: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    #[serde(rename = "type")]
    pub tree_type: String,
    pub photo_url: String,
    pub status: TreeStatus,
}

impl BoughtTree {
    pub fn is_planted(&self) -> bool {
        self.status == TreeStatus::Planted
    }
}

/// Read-only composite view of the user's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Current wallet balance
    pub wallet: f64,
    pub user_id: String,
    pub trees_owned: usize,
}

/// Immutable questionnaire snapshot taken at calculation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintInputs {
    pub weekly_kilometers_driven: u32,
    pub monthly_electricity_usage_kwh: u32,
    /// 0..=21
    pub weekly_meat_meals: u32,
    pub short_haul_flights_per_year: u32,
    pub long_haul_flights_per_year: u32,
    pub new_clothing_items_per_month: u32,
    pub recycles_waste: bool,
}

/// Derived annual footprint, truncated to whole kilograms/trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintResult {
    pub total_co2_kg_per_year: u32,
    pub trees_needed: u32,
}

/// Inputs plus the result they produced, as cached in persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootprintSnapshot {
    pub inputs: FootprintInputs,
    pub result: FootprintResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyTreeRequest {
    /// Tree type name, e.g. "OAK"
    #[serde(rename = "type")]
    pub tree_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyTreeResponse {
    /// Id of the newly created owned tree
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMoneyRequest {
    pub amount: f64,
}
