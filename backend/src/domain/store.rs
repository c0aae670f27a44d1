//! # Tree store ledger
//!
//! The store behind the offset flow: a wallet balance, a seeded catalog of
//! offers, and the list of trees the user owns, all persisted as JSON in the
//! injected key-value store.
//!
//! Every mutating operation is a read-modify-write against the key-value
//! collaborator, so the whole store runs behind a single-writer lock: without
//! it, two concurrent purchases could both read the same balance and
//! double-spend.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use shared::{BoughtTree, StoreTree, TreeStatus, UserProfile};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::catalog::TreeType;
use crate::domain::errors::{Result, StoreError};
use crate::storage::KeyValueStorage;

const WALLET_BALANCE_KEY: &str = "wallet_balance";
const STORE_TREES_KEY: &str = "store_trees";
const BOUGHT_TREES_KEY: &str = "bought_trees";
const USER_ID_KEY: &str = "user_id";
const SESSION_KEY: &str = "session";

const INITIAL_WALLET_BALANCE: f64 = 1000.0;
const LOCAL_SESSION_TOKEN: &str = "local-session-123";

const PRICE_RANGE: std::ops::Range<f64> = 3.0..25.0;

// Simulated historical population: 20 trees around each base point
const SEED_BASE_COORDINATES: [(f64, f64); 3] = [
    (32.5681111, 34.8470833),
    (33.156175, 35.075562),
    (32.813894, 34.735973),
];
const SEED_TREES_PER_BASE_POINT: usize = 20;
const SEED_MAX_OFFSET_DISTANCE: f64 = 100.0;
const SEED_PLANTED_WINDOW_DAYS: i64 = 360;
const EARTH_RADIUS_KM: f64 = 6371.0;

/// The store contract: catalog, owned trees, purchase, deposit, profile.
///
/// A remote backend serves the identical contract over HTTP/JSON; only the
/// persistence medium differs.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Return the offer catalog, seeding it on first access
    async fn list_offers(&self) -> Result<Vec<StoreTree>>;

    /// Return the owned trees, seeding the simulated population on first access
    async fn list_owned_trees(&self) -> Result<Vec<BoughtTree>>;

    /// Buy one tree of the given type name; returns the new tree's id
    async fn purchase(&self, tree_type: &str) -> Result<String>;

    /// Credit the wallet; non-positive amounts leave the balance unchanged
    async fn deposit(&self, amount: f64) -> Result<UserProfile>;

    /// Read-only composite view of wallet, tree count, and user id
    async fn profile(&self) -> Result<UserProfile>;
}

/// Key-value-backed [`TreeStore`] implementation.
pub struct LedgerStore {
    storage: Arc<dyn KeyValueStorage>,
    // Serializes every read-modify-write; see module docs
    write_lock: Mutex<()>,
}

impl LedgerStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    async fn ensure_session(&self) -> Result<()> {
        if self.storage.get(SESSION_KEY).await?.is_none() {
            debug!("Bootstrapping local session");
            self.storage.set(SESSION_KEY, LOCAL_SESSION_TOKEN).await?;
        }
        Ok(())
    }

    async fn wallet_balance(&self) -> Result<f64> {
        match self.storage.get(WALLET_BALANCE_KEY).await? {
            Some(raw) => {
                let balance = raw
                    .parse::<f64>()
                    .with_context(|| format!("corrupt wallet balance: {raw}"))?;
                Ok(balance)
            }
            None => Ok(INITIAL_WALLET_BALANCE),
        }
    }

    async fn save_wallet_balance(&self, balance: f64) -> Result<()> {
        self.storage
            .set(WALLET_BALANCE_KEY, &balance.to_string())
            .await?;
        Ok(())
    }

    async fn load_or_seed_offers(&self) -> Result<Vec<StoreTree>> {
        if let Some(json) = self.storage.get(STORE_TREES_KEY).await? {
            let offers: Vec<StoreTree> =
                serde_json::from_str(&json).context("corrupt store offers")?;
            if !offers.is_empty() {
                return Ok(offers);
            }
        }

        let offers = generate_offers();
        self.save_offers(&offers).await?;
        info!(count = offers.len(), "Seeded store offers");
        Ok(offers)
    }

    async fn save_offers(&self, offers: &[StoreTree]) -> Result<()> {
        let json = serde_json::to_string(offers).context("failed to encode store offers")?;
        self.storage.set(STORE_TREES_KEY, &json).await?;
        Ok(())
    }

    async fn load_or_seed_owned_trees(&self) -> Result<Vec<BoughtTree>> {
        if let Some(json) = self.storage.get(BOUGHT_TREES_KEY).await? {
            let trees: Vec<BoughtTree> =
                serde_json::from_str(&json).context("corrupt owned trees")?;
            if !trees.is_empty() {
                return Ok(trees);
            }
        }

        let trees = generate_seed_population();
        self.save_owned_trees(&trees).await?;
        info!(count = trees.len(), "Seeded simulated tree population");
        Ok(trees)
    }

    async fn save_owned_trees(&self, trees: &[BoughtTree]) -> Result<()> {
        let json = serde_json::to_string(trees).context("failed to encode owned trees")?;
        self.storage.set(BOUGHT_TREES_KEY, &json).await?;
        Ok(())
    }

    /// User id is generated on first read and persisted from then on
    async fn user_id(&self) -> Result<String> {
        match self.storage.get(USER_ID_KEY).await? {
            Some(id) => Ok(id),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                self.storage.set(USER_ID_KEY, &id).await?;
                info!(user_id = %id, "Generated user id");
                Ok(id)
            }
        }
    }

    async fn profile_inner(&self) -> Result<UserProfile> {
        let wallet = self.wallet_balance().await?;
        let user_id = self.user_id().await?;
        let trees_owned = self.load_or_seed_owned_trees().await?.len();

        Ok(UserProfile {
            wallet,
            user_id,
            trees_owned,
        })
    }
}

#[async_trait]
impl TreeStore for LedgerStore {
    async fn list_offers(&self) -> Result<Vec<StoreTree>> {
        let _guard = self.write_lock.lock().await;
        self.ensure_session().await?;
        self.load_or_seed_offers().await
    }

    async fn list_owned_trees(&self) -> Result<Vec<BoughtTree>> {
        let _guard = self.write_lock.lock().await;
        self.ensure_session().await?;
        self.load_or_seed_owned_trees().await
    }

    async fn purchase(&self, tree_type: &str) -> Result<String> {
        let _guard = self.write_lock.lock().await;
        self.ensure_session().await?;

        let tree = TreeType::from_name(tree_type)
            .ok_or_else(|| StoreError::InvalidTreeType(tree_type.to_string()))?;
        let offers = self.load_or_seed_offers().await?;
        let price = offers
            .iter()
            .find(|offer| offer.tree_type == tree.name())
            .map(|offer| offer.price)
            .ok_or_else(|| StoreError::InvalidTreeType(tree_type.to_string()))?;

        let balance = self.wallet_balance().await?;
        if balance < price {
            return Err(StoreError::InsufficientBalance {
                tree_type: tree.name().to_string(),
                balance,
                price,
            });
        }

        self.save_wallet_balance(balance - price).await?;

        let mut owned = self.load_or_seed_owned_trees().await?;
        let bought = BoughtTree {
            id: (owned.len() + 1).to_string(),
            title: tree.name().to_string(),
            description: tree.description(),
            planted_date: None,
            longitude: None,
            latitude: None,
            tree_type: tree.name().to_string(),
            photo_url: tree.store_photo_url().to_string(),
            status: TreeStatus::ReadyToBePlanted,
        };
        let id = bought.id.clone();
        owned.push(bought);
        self.save_owned_trees(&owned).await?;

        info!(tree_type, id = %id, price, new_balance = balance - price, "Purchased tree");
        Ok(id)
    }

    async fn deposit(&self, amount: f64) -> Result<UserProfile> {
        let _guard = self.write_lock.lock().await;
        self.ensure_session().await?;

        if amount <= 0.0 {
            warn!(amount, "Ignoring non-positive deposit");
            return self.profile_inner().await;
        }

        let balance = self.wallet_balance().await?;
        let new_balance = balance + amount;
        self.save_wallet_balance(new_balance).await?;
        info!(amount, new_balance, "Deposited into wallet");

        self.profile_inner().await
    }

    async fn profile(&self) -> Result<UserProfile> {
        let _guard = self.write_lock.lock().await;
        self.ensure_session().await?;
        self.profile_inner().await
    }
}

/// One offer per catalog type, each with a one-time random price in
/// [3, 25), rounded to 2 decimals.
fn generate_offers() -> Vec<StoreTree> {
    let mut rng = rand::thread_rng();
    TreeType::ALL
        .iter()
        .map(|tree_type| {
            let price = (rng.gen_range(PRICE_RANGE) * 100.0).round() / 100.0;
            tree_type.to_offer(price)
        })
        .collect()
}

/// Simulated historical purchases: 20 trees around each base point, each
/// independently planted or still waiting.
fn generate_seed_population() -> Vec<BoughtTree> {
    let mut rng = rand::thread_rng();
    let mut trees = Vec::with_capacity(SEED_BASE_COORDINATES.len() * SEED_TREES_PER_BASE_POINT);
    let mut id = 1;

    for (base_lat, base_lon) in SEED_BASE_COORDINATES {
        for _ in 0..SEED_TREES_PER_BASE_POINT {
            trees.push(generate_seed_tree(id, base_lat, base_lon, &mut rng));
            id += 1;
        }
    }

    trees
}

fn generate_seed_tree(id: usize, base_lat: f64, base_lon: f64, rng: &mut impl Rng) -> BoughtTree {
    let planted = rng.gen_bool(0.5);
    let tree_type = TreeType::ALL[rng.gen_range(0..TreeType::ALL.len())];

    let (latitude, longitude) = if planted {
        let (lat, lon) = random_offset_coordinates(base_lat, base_lon, rng);
        (Some(lat), Some(lon))
    } else {
        (None, None)
    };
    let planted_date = planted.then(|| random_planted_date(rng));
    let photo_url = if planted {
        tree_type.planted_photo_url()
    } else {
        tree_type.store_photo_url()
    };

    BoughtTree {
        id: id.to_string(),
        title: tree_type.name().to_string(),
        description: tree_type.description(),
        planted_date,
        longitude,
        latitude,
        tree_type: tree_type.name().to_string(),
        photo_url: photo_url.to_string(),
        status: if planted {
            TreeStatus::Planted
        } else {
            TreeStatus::ReadyToBePlanted
        },
    }
}

/// Random point within ~100 distance-units of the base, via a random bearing
/// and distance converted into lat/lon offsets.
fn random_offset_coordinates(base_lat: f64, base_lon: f64, rng: &mut impl Rng) -> (f64, f64) {
    let angle: f64 = rng.gen_range(0.0..360.0);
    let distance: f64 = rng.gen_range(0.0..SEED_MAX_OFFSET_DISTANCE);

    let offset_lat = distance * angle.to_radians().cos() / EARTH_RADIUS_KM;
    let offset_lon =
        distance * angle.to_radians().sin() / (EARTH_RADIUS_KM * base_lat.to_radians().cos());

    (base_lat + offset_lat, base_lon + offset_lon)
}

/// Random "YYYY-MM-DD" date within the trailing 12 months
fn random_planted_date(rng: &mut impl Rng) -> String {
    let days_ago = rng.gen_range(0..SEED_PLANTED_WINDOW_DAYS);
    (Utc::now() - Duration::days(days_ago))
        .format("%Y-%m-%d")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn create_test_store() -> (Arc<MemoryStore>, LedgerStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = LedgerStore::new(storage.clone());
        (storage, store)
    }

    #[tokio::test]
    async fn offers_are_seeded_once_with_one_price_per_type() {
        let (_storage, store) = create_test_store();

        let offers = store.list_offers().await.unwrap();
        assert_eq!(offers.len(), 5);
        for tree_type in TreeType::ALL {
            let offer = offers
                .iter()
                .find(|o| o.tree_type == tree_type.name())
                .expect("one offer per catalog type");
            assert!(offer.price >= 3.0 && offer.price < 25.0);
            // Rounded to 2 decimals at seeding time
            assert!((offer.price * 100.0 - (offer.price * 100.0).round()).abs() < 1e-9);
        }

        // Second access must not reshuffle prices
        let again = store.list_offers().await.unwrap();
        assert_eq!(offers, again);
    }

    #[tokio::test]
    async fn owned_trees_are_seeded_with_sixty_simulated_purchases() {
        let (_storage, store) = create_test_store();

        let trees = store.list_owned_trees().await.unwrap();
        assert_eq!(trees.len(), 60);

        let mut ids: Vec<&str> = trees.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 60, "ids are unique");

        for tree in &trees {
            if tree.is_planted() {
                assert!(tree.latitude.is_some() && tree.longitude.is_some());
                assert!(tree.planted_date.is_some());
            } else {
                assert!(tree.latitude.is_none() && tree.longitude.is_none());
                assert!(tree.planted_date.is_none());
            }
        }

        // Seeding happens once
        let again = store.list_owned_trees().await.unwrap();
        assert_eq!(trees, again);
    }

    #[tokio::test]
    async fn planted_seeds_stay_near_a_base_point() {
        let (_storage, store) = create_test_store();

        for tree in store.list_owned_trees().await.unwrap() {
            if let (Some(lat), Some(lon)) = (tree.latitude, tree.longitude) {
                let near_base = SEED_BASE_COORDINATES.iter().any(|(base_lat, base_lon)| {
                    (lat - base_lat).abs() < 1.0 && (lon - base_lon).abs() < 1.5
                });
                assert!(near_base, "tree at ({lat}, {lon}) is far from every base point");
            }
        }
    }

    #[tokio::test]
    async fn purchase_debits_wallet_and_appends_one_tree() {
        let (_storage, store) = create_test_store();

        let offers = store.list_offers().await.unwrap();
        let price = offers
            .iter()
            .find(|o| o.tree_type == "OAK")
            .unwrap()
            .price;
        let before = store.profile().await.unwrap();
        assert_eq!(before.wallet, 1000.0);
        assert_eq!(before.trees_owned, 60);

        let id = store.purchase("OAK").await.unwrap();
        assert_eq!(id, "61");

        let after = store.profile().await.unwrap();
        assert_eq!(after.wallet, 1000.0 - price);
        assert_eq!(after.trees_owned, 61);

        let trees = store.list_owned_trees().await.unwrap();
        let bought = trees.last().unwrap();
        assert_eq!(bought.id, "61");
        assert_eq!(bought.status, TreeStatus::ReadyToBePlanted);
        assert!(bought.planted_date.is_none());
        assert!(bought.latitude.is_none() && bought.longitude.is_none());
        assert_eq!(bought.tree_type, "OAK");
    }

    #[tokio::test]
    async fn purchase_rejects_unknown_tree_type() {
        let (_storage, store) = create_test_store();
        store.list_owned_trees().await.unwrap();
        let before = store.profile().await.unwrap();

        let err = store.purchase("BAOBAB").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidTreeType(_)));

        let after = store.profile().await.unwrap();
        assert_eq!(before.wallet, after.wallet);
        assert_eq!(before.trees_owned, after.trees_owned);
    }

    #[tokio::test]
    async fn purchase_with_insufficient_balance_changes_nothing() {
        let (storage, store) = create_test_store();
        store.list_offers().await.unwrap();
        let trees_before = store.list_owned_trees().await.unwrap();

        // Every offer costs at least 3.0
        storage.set("wallet_balance", "0.5").await.unwrap();

        let err = store.purchase("PINE").await.unwrap_err();
        assert!(matches!(err, StoreError::InsufficientBalance { .. }));

        let profile = store.profile().await.unwrap();
        assert_eq!(profile.wallet, 0.5);
        assert_eq!(store.list_owned_trees().await.unwrap(), trees_before);
    }

    #[tokio::test]
    async fn non_positive_deposits_are_no_ops() {
        let (_storage, store) = create_test_store();

        let start = store.profile().await.unwrap().wallet;
        assert_eq!(store.deposit(0.0).await.unwrap().wallet, start);
        assert_eq!(store.deposit(-5.0).await.unwrap().wallet, start);
    }

    #[tokio::test]
    async fn deposit_credits_and_persists() {
        let (storage, store) = create_test_store();

        let profile = store.deposit(250.5).await.unwrap();
        assert_eq!(profile.wallet, 1250.5);

        // A fresh store over the same storage sees the credited balance
        let reopened = LedgerStore::new(storage);
        assert_eq!(reopened.profile().await.unwrap().wallet, 1250.5);
    }

    #[tokio::test]
    async fn user_id_is_generated_once_and_persisted() {
        let (storage, store) = create_test_store();

        let first = store.profile().await.unwrap().user_id;
        let second = store.profile().await.unwrap().user_id;
        assert_eq!(first, second);

        let reopened = LedgerStore::new(storage);
        assert_eq!(reopened.profile().await.unwrap().user_id, first);
    }

    #[tokio::test]
    async fn owned_trees_round_trip_through_persistence() {
        let (storage, store) = create_test_store();

        let trees = store.list_owned_trees().await.unwrap();
        let reopened = LedgerStore::new(storage);
        assert_eq!(reopened.list_owned_trees().await.unwrap(), trees);
    }

    #[tokio::test]
    async fn concurrent_purchases_cannot_double_spend() {
        let (storage, store) = create_test_store();

        let offers = store.list_offers().await.unwrap();
        let price = offers
            .iter()
            .find(|o| o.tree_type == "FIR")
            .unwrap()
            .price;
        // Enough for exactly one purchase
        storage
            .set("wallet_balance", &(price * 1.5).to_string())
            .await
            .unwrap();

        let (first, second) = tokio::join!(store.purchase("FIR"), store.purchase("FIR"));
        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one purchase may win");
        assert!([&first, &second]
            .iter()
            .any(|r| matches!(r, Err(StoreError::InsufficientBalance { .. }))));

        let profile = store.profile().await.unwrap();
        assert!((profile.wallet - price * 0.5).abs() < 1e-9);
        assert_eq!(profile.trees_owned, 61);
    }
}
