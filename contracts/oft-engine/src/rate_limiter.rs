//! Per-pathway token bucket rate limiting.
//!
//! Each remote endpoint id has an optional bucket of `limit` tokens that
//! refills linearly over `window_seconds`. An absent bucket means unlimited
//! flow. The engine keeps two limiters, one per direction, and drives them as
//! a net-flow pair: traffic in one direction consumes that direction's
//! capacity and gives capacity back to the opposite direction.
//!
//! The clock is always passed in as seconds since epoch (block time).

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Storage, Uint128, Uint256};
use cw_storage_plus::Map;

use crate::error::ContractError;

/// Traffic direction of a pathway
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }

    /// Limiter storing the buckets of this direction
    pub const fn limiter(self) -> RateLimiter<'static> {
        match self {
            Direction::Inbound => INBOUND_RATE_LIMITER,
            Direction::Outbound => OUTBOUND_RATE_LIMITER,
        }
    }
}

/// Bucket state for one pathway
#[cw_serde]
pub struct RateLimit {
    /// Maximum capacity
    pub limit: Uint128,
    /// Seconds needed to refill from empty to full
    pub window_seconds: u64,
    /// Capacity as of `last_updated`
    pub available: Uint128,
    /// Block time (seconds) of the last regeneration
    pub last_updated: u64,
    /// Regeneration carried below one whole unit, in `1 / window_seconds` units
    #[serde(default)]
    pub remainder: u64,
}

impl RateLimit {
    pub fn new(limit: Uint128, window_seconds: u64, now: u64) -> Result<Self, ContractError> {
        if window_seconds == 0 {
            return Err(ContractError::InvalidRateLimit);
        }
        Ok(Self {
            limit,
            window_seconds,
            available: limit,
            last_updated: now,
            remainder: 0,
        })
    }

    /// Bring `available` up to date with `now`.
    ///
    /// Regeneration is `limit * elapsed / window_seconds`. The fractional part
    /// is kept in `remainder` so the total refill over any sequence of updates
    /// equals the refill of a single update spanning the same time.
    fn regenerate(&mut self, now: u64) {
        if self.available >= self.limit {
            self.available = self.limit;
            self.remainder = 0;
            self.last_updated = self.last_updated.max(now);
            return;
        }
        if now <= self.last_updated {
            return;
        }

        let elapsed = now - self.last_updated;
        self.last_updated = now;
        if elapsed >= self.window_seconds {
            self.available = self.limit;
            self.remainder = 0;
            return;
        }

        let window = Uint256::from(self.window_seconds);
        let scaled = self.limit.full_mul(elapsed) + Uint256::from(self.remainder);
        // elapsed < window, so the quotient is at most `limit` and the
        // remainder below `window_seconds`
        let regenerated = Uint128::try_from(scaled / window).unwrap_or(self.limit);
        let remainder = Uint128::try_from(scaled % window).map_or(0, |r| r.u128() as u64);

        self.available = self.available.saturating_add(regenerated).min(self.limit);
        self.remainder = if self.available == self.limit { 0 } else { remainder };
    }

    pub fn available_capacity(&self, now: u64) -> Uint128 {
        let mut bucket = self.clone();
        bucket.regenerate(now);
        bucket.available
    }

    pub fn in_flight(&self, now: u64) -> Uint128 {
        self.limit - self.available_capacity(now)
    }

    /// Returns the capacity available before the attempt on failure.
    pub fn try_consume(&mut self, amount: Uint128, now: u64) -> Result<(), Uint128> {
        self.regenerate(now);
        if amount > self.available {
            return Err(self.available);
        }
        self.available -= amount;
        Ok(())
    }

    pub fn release(&mut self, amount: Uint128, now: u64) {
        self.regenerate(now);
        self.available = self.available.saturating_add(amount).min(self.limit);
    }
}

/// Buckets for one direction, keyed by endpoint id
pub struct RateLimiter<'a> {
    buckets: Map<'a, u32, RateLimit>,
    direction: Direction,
}

/// Inbound buckets
pub const INBOUND_RATE_LIMITER: RateLimiter<'static> =
    RateLimiter::new("rate_limit_inbound", Direction::Inbound);

/// Outbound buckets
pub const OUTBOUND_RATE_LIMITER: RateLimiter<'static> =
    RateLimiter::new("rate_limit_outbound", Direction::Outbound);

impl<'a> RateLimiter<'a> {
    pub const fn new(namespace: &'a str, direction: Direction) -> Self {
        Self {
            buckets: Map::new(namespace),
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Set (or reset) the bucket for `eid`, starting full
    pub fn configure(
        &self,
        storage: &mut dyn Storage,
        eid: u32,
        limit: Uint128,
        window_seconds: u64,
        now: u64,
    ) -> Result<RateLimit, ContractError> {
        let bucket = RateLimit::new(limit, window_seconds, now)?;
        self.buckets.save(storage, eid, &bucket)?;
        Ok(bucket)
    }

    /// Remove the bucket for `eid`; the pathway becomes unlimited.
    /// Returns whether a bucket existed.
    pub fn unconfigure(&self, storage: &mut dyn Storage, eid: u32) -> bool {
        let existed = self.buckets.has(storage, eid);
        self.buckets.remove(storage, eid);
        existed
    }

    pub fn get(&self, storage: &dyn Storage, eid: u32) -> StdResult<Option<RateLimit>> {
        self.buckets.may_load(storage, eid)
    }

    /// `None` when unlimited
    pub fn available_capacity(
        &self,
        storage: &dyn Storage,
        eid: u32,
        now: u64,
    ) -> StdResult<Option<Uint128>> {
        Ok(self.get(storage, eid)?.map(|b| b.available_capacity(now)))
    }

    /// `None` when unlimited
    pub fn in_flight(&self, storage: &dyn Storage, eid: u32, now: u64) -> StdResult<Option<Uint128>> {
        Ok(self.get(storage, eid)?.map(|b| b.in_flight(now)))
    }

    pub fn try_consume(
        &self,
        storage: &mut dyn Storage,
        eid: u32,
        amount: Uint128,
        now: u64,
    ) -> Result<(), ContractError> {
        let Some(mut bucket) = self.get(storage, eid)? else {
            return Ok(());
        };
        bucket
            .try_consume(amount, now)
            .map_err(|available| ContractError::RateLimitExceeded {
                eid,
                direction: self.direction.as_str().to_string(),
                available,
                requested: amount,
            })?;
        self.buckets.save(storage, eid, &bucket)?;
        Ok(())
    }

    pub fn release(
        &self,
        storage: &mut dyn Storage,
        eid: u32,
        amount: Uint128,
        now: u64,
    ) -> Result<(), ContractError> {
        let Some(mut bucket) = self.get(storage, eid)? else {
            return Ok(());
        };
        bucket.release(amount, now);
        self.buckets.save(storage, eid, &bucket)?;
        Ok(())
    }
}
