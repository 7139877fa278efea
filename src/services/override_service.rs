use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;

use crate::{
    clock::Clock,
    db::{
        dao::{OverrideDao, OverrideKey},
        entities::room_override,
    },
    error::AppError,
    services::bounds::{clamp_or, non_blank},
};

/// Fixed lifetime of every override write.
pub const OVERRIDE_TTL_MS: i64 = 3 * 60 * 1000;
pub const DEFAULT_RATE: i64 = 93;
pub const MIN_RATE: i64 = 1;
pub const MAX_RATE: i64 = 99;
pub const MIN_ROOM_NO: i64 = 1;
pub const MAX_ROOM_NO: i64 = 999_999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideHit {
    pub vendor: String,
    pub game_id: String,
    pub room_no: i64,
    pub rate: i64,
    pub expire_at: i64,
}

impl From<room_override::Model> for OverrideHit {
    fn from(model: room_override::Model) -> Self {
        Self {
            vendor: model.vendor,
            game_id: model.game_id,
            room_no: model.room_no,
            rate: model.rate,
            expire_at: model.expire_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideValue {
    pub rate: i64,
    pub expire_at: i64,
}

/// vendor -> gameId -> roomNo -> value
pub type OverrideTree = BTreeMap<String, BTreeMap<String, BTreeMap<String, OverrideValue>>>;

#[derive(Clone)]
pub struct OverrideService {
    overrides: OverrideDao,
    clock: Arc<dyn Clock>,
}

impl OverrideService {
    pub fn new(overrides: OverrideDao, clock: Arc<dyn Clock>) -> Self {
        Self { overrides, clock }
    }

    /// Builds a key from raw parameters; `None` when any part is missing or
    /// the room number is out of range.
    pub fn key(vendor: Option<&str>, game_id: Option<&str>, room_no: Option<i64>) -> Option<OverrideKey> {
        let vendor = non_blank(vendor)?;
        let game_id = non_blank(game_id)?;
        let room_no = room_no.filter(|room_no| (MIN_ROOM_NO..=MAX_ROOM_NO).contains(room_no))?;
        Some(OverrideKey {
            vendor: vendor.to_string(),
            game_id: game_id.to_string(),
            room_no,
        })
    }

    /// Drops every row that has reached its expiry.
    pub async fn sweep(&self) -> Result<u64, AppError> {
        let swept = self.overrides.sweep_expired(self.clock.now_ms()).await?;
        if swept > 0 {
            tracing::info!(swept, "swept expired overrides");
        }
        Ok(swept)
    }

    pub async fn get(&self, key: &OverrideKey) -> Result<Option<OverrideHit>, AppError> {
        let row = self.overrides.find_live(key, self.clock.now_ms()).await?;
        Ok(row.map(OverrideHit::from))
    }

    /// Upserts with `expire_at = now + OVERRIDE_TTL_MS`.
    pub async fn set(&self, key: &OverrideKey, rate: Option<i64>) -> Result<OverrideHit, AppError> {
        let rate = clamp_or(rate, MIN_RATE, MAX_RATE, DEFAULT_RATE);
        let now = self.clock.now_ms();
        let expire_at = now.saturating_add(OVERRIDE_TTL_MS);
        self.overrides.upsert(key, rate, expire_at, now).await?;
        tracing::info!(
            vendor = %key.vendor,
            game_id = %key.game_id,
            room_no = key.room_no,
            rate,
            "set override"
        );
        Ok(OverrideHit {
            vendor: key.vendor.clone(),
            game_id: key.game_id.clone(),
            room_no: key.room_no,
            rate,
            expire_at,
        })
    }

    /// Live overrides only, nested for bulk client sync.
    pub async fn list_all(&self) -> Result<OverrideTree, AppError> {
        let rows = self.overrides.list_live(self.clock.now_ms()).await?;
        let mut tree = OverrideTree::new();
        for row in rows {
            tree.entry(row.vendor)
                .or_default()
                .entry(row.game_id)
                .or_default()
                .insert(
                    row.room_no.to_string(),
                    OverrideValue {
                        rate: row.rate,
                        expire_at: row.expire_at,
                    },
                );
        }
        Ok(tree)
    }
}
