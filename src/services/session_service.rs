use std::sync::Arc;

use serde::Serialize;

use crate::{
    auth::{Principal, TokenService, password::verify_password},
    clock::Clock,
    db::{dao::UserDao, entities::user},
    error::AppError,
};

/// Length of the rolling window opened by each consumed use.
pub const CYCLE_DURATION_MS: i64 = 5 * 60 * 1000;

// Epoch values below this are seconds, not milliseconds (1e12 ms is Sept 2001).
const SECONDS_SCALE_LIMIT: i64 = 1_000_000_000_000;

// A conditional write that matched nothing is re-evaluated against a fresh read
// this many times before giving up.
const MAX_CONSUME_ATTEMPTS: usize = 3;

/// Normalises an epoch timestamp to milliseconds. Values that look like
/// seconds are scaled up; zero and negatives collapse to 0 ("no cycle").
pub fn normalize_epoch_ms(value: i64) -> i64 {
    if value <= 0 {
        0
    } else if value < SECONDS_SCALE_LIMIT {
        value.saturating_mul(1000)
    } else {
        value
    }
}

/// A cycle that was never started counts as expired.
pub fn cycle_expired(cycle_end_at: i64, now_ms: i64) -> bool {
    let end = normalize_epoch_ms(cycle_end_at);
    end == 0 || now_ms >= end
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub display_name: String,
    pub role: String,
    pub uses_left: i64,
    pub unlimited: bool,
    pub disabled: bool,
    pub cycle_end_at: i64,
}

impl From<user::Model> for SessionSnapshot {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            display_name: model.display_name,
            role: model.role,
            uses_left: model.uses_left.max(0),
            unlimited: model.unlimited,
            disabled: model.disabled,
            cycle_end_at: normalize_epoch_ms(model.cycle_end_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementState {
    Disabled,
    Unlimited,
    Exhausted,
    CycleExpired,
    Active,
}

impl EntitlementState {
    /// Recomputed on every read; never stored.
    pub fn of(snapshot: &SessionSnapshot, now_ms: i64) -> Self {
        if snapshot.disabled {
            Self::Disabled
        } else if snapshot.unlimited {
            Self::Unlimited
        } else if snapshot.uses_left <= 0 {
            Self::Exhausted
        } else if cycle_expired(snapshot.cycle_end_at, now_ms) {
            Self::CycleExpired
        } else {
            Self::Active
        }
    }

    pub fn is_locked(self) -> bool {
        !matches!(self, Self::Unlimited | Self::Active)
    }
}

/// What anyone may learn about a user without a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub display_name: String,
    pub role: String,
    pub uses_left: i64,
    pub unlimited: bool,
    pub disabled: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub sess: SessionSnapshot,
}

#[derive(Clone)]
pub struct SessionService {
    users: UserDao,
    tokens: TokenService,
    clock: Arc<dyn Clock>,
    token_ttl_secs: u64,
}

impl SessionService {
    pub fn new(
        users: UserDao,
        tokens: TokenService,
        clock: Arc<dyn Clock>,
        token_ttl_secs: u64,
    ) -> Self {
        Self {
            users,
            tokens,
            clock,
            token_ttl_secs,
        }
    }

    /// Leaves the cycle and quota untouched.
    pub async fn login(&self, id: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let Some(model) = self.users.find(id).await? else {
            tracing::debug!(id, "user login for unknown id");
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(password, &model.password_hash) {
            tracing::debug!(id, "user login with wrong password");
            return Err(AppError::InvalidCredentials);
        }
        if model.disabled {
            return Err(AppError::AccountDisabled);
        }

        let token = self
            .tokens
            .issue(&Principal::user(model.id.clone()), self.token_ttl_secs)?;
        Ok(LoginOutcome {
            token,
            sess: model.into(),
        })
    }

    pub async fn refresh(&self, principal: &Principal) -> Result<SessionSnapshot, AppError> {
        let model = self.load_enabled(&principal.id).await?;
        Ok(model.into())
    }

    /// Spends one use (unless unlimited) and restarts the cycle at
    /// `now + CYCLE_DURATION_MS`. The write is a conditional update so
    /// concurrent calls can never spend the same use twice.
    pub async fn consume_one_use(
        &self,
        principal: &Principal,
    ) -> Result<SessionSnapshot, AppError> {
        for _ in 0..MAX_CONSUME_ATTEMPTS {
            let model = self.load_enabled(&principal.id).await?;
            let now = self.clock.now_ms();
            let cycle_end_at = now.saturating_add(CYCLE_DURATION_MS);

            let applied = if model.unlimited {
                self.users
                    .renew_unlimited_cycle(&model.id, cycle_end_at, now)
                    .await?
            } else {
                if model.uses_left <= 0 {
                    return Err(AppError::NoUsesLeft);
                }
                self.users
                    .consume_limited_use(&model.id, cycle_end_at, now)
                    .await?
            };

            if applied {
                let model = self.load_enabled(&principal.id).await?;
                tracing::debug!(
                    id = %model.id,
                    uses_left = model.uses_left,
                    unlimited = model.unlimited,
                    "consumed use"
                );
                return Ok(model.into());
            }
            // Row changed between read and write; decide again from a fresh read.
        }

        Err(AppError::internal(
            "consume could not settle against concurrent updates",
        ))
    }

    pub async fn public_profile(&self, id: &str) -> Result<Option<PublicProfile>, AppError> {
        let Some(model) = self.users.find(id).await? else {
            return Ok(None);
        };
        let now = self.clock.now_ms();
        let snapshot = SessionSnapshot::from(model);
        let locked = EntitlementState::of(&snapshot, now).is_locked();
        Ok(Some(PublicProfile {
            id: snapshot.id,
            display_name: snapshot.display_name,
            role: snapshot.role,
            uses_left: snapshot.uses_left,
            unlimited: snapshot.unlimited,
            disabled: snapshot.disabled,
            locked,
        }))
    }

    async fn load_enabled(&self, id: &str) -> Result<user::Model, AppError> {
        let model = self
            .users
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found("deleted"))?;
        if model.disabled {
            return Err(AppError::AccountDisabled);
        }
        Ok(model)
    }
}
