//! In-memory memoization of provider lookups with per-kind TTL

use dashmap::DashMap;
use rust_decimal::Decimal;
use std::future::Future;
use std::time::{Duration, Instant};

use super::market_data_constants::{PROFILE_CACHE_TTL_SECS, QUOTE_CACHE_TTL_SECS};
use super::market_data_errors::MarketDataError;
use super::providers::models::AssetProfile;

/// TTL configuration for the two lookup classes
#[derive(Debug, Clone)]
pub struct MarketDataCacheConfig {
    pub quote_ttl: Duration,
    pub profile_ttl: Duration,
}

impl Default for MarketDataCacheConfig {
    fn default() -> Self {
        Self {
            quote_ttl: Duration::from_secs(QUOTE_CACHE_TTL_SECS),
            profile_ttl: Duration::from_secs(PROFILE_CACHE_TTL_SECS),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Memoizes quote and profile lookups per ticker. Quotes expire quickly
/// because they move intraday; profile data barely changes and keeps a
/// long TTL. Failed fetches are never stored, so the next caller retries.
pub struct MarketDataCache {
    quotes: DashMap<String, CacheEntry<Decimal>>,
    profiles: DashMap<String, CacheEntry<AssetProfile>>,
    config: MarketDataCacheConfig,
}

impl MarketDataCache {
    pub fn new(config: MarketDataCacheConfig) -> Self {
        Self {
            quotes: DashMap::new(),
            profiles: DashMap::new(),
            config,
        }
    }

    /// Returns the cached quote if it is still within its TTL
    pub fn get_quote(&self, ticker: &str) -> Option<Decimal> {
        self.quotes
            .get(ticker)
            .and_then(|entry| entry.is_fresh(self.config.quote_ttl).then(|| entry.value))
    }

    /// Stores a freshly fetched quote
    pub fn set_quote(&self, ticker: &str, price: Decimal) {
        self.quotes.insert(ticker.to_string(), CacheEntry::new(price));
    }

    /// Returns the cached profile if it is still within its TTL
    pub fn get_profile(&self, ticker: &str) -> Option<AssetProfile> {
        self.profiles
            .get(ticker)
            .and_then(|entry| entry.is_fresh(self.config.profile_ttl).then(|| entry.value.clone()))
    }

    /// Stores a freshly fetched profile
    pub fn set_profile(&self, ticker: &str, profile: AssetProfile) {
        self.profiles
            .insert(ticker.to_string(), CacheEntry::new(profile));
    }

    /// Serves a cached quote or runs the fetch. A fetch failure passes
    /// through uncached.
    pub async fn quote_or_fetch<F, Fut>(
        &self,
        ticker: &str,
        fetch: F,
    ) -> Result<Decimal, MarketDataError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Decimal, MarketDataError>>,
    {
        if let Some(price) = self.get_quote(ticker) {
            return Ok(price);
        }
        let price = fetch().await?;
        self.set_quote(ticker, price);
        Ok(price)
    }

    /// Serves a cached profile or runs the fetch. A fetch failure passes
    /// through uncached.
    pub async fn profile_or_fetch<F, Fut>(
        &self,
        ticker: &str,
        fetch: F,
    ) -> Result<AssetProfile, MarketDataError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AssetProfile, MarketDataError>>,
    {
        if let Some(profile) = self.get_profile(ticker) {
            return Ok(profile);
        }
        let profile = fetch().await?;
        self.set_profile(ticker, profile.clone());
        Ok(profile)
    }

    /// Drops both cache entries for a ticker
    pub fn invalidate(&self, ticker: &str) {
        self.quotes.remove(ticker);
        self.profiles.remove(ticker);
    }

    /// Clears both caches
    pub fn clear(&self) {
        self.quotes.clear();
        self.profiles.clear();
    }
}

impl Default for MarketDataCache {
    fn default() -> Self {
        Self::new(MarketDataCacheConfig::default())
    }
}
