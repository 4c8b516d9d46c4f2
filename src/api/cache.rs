// ============================================================================
// Structure : PriceCache
// ============================================================================
// Cache explicite des historiques chargés, clé = (ticker, start, end)
//
// CONCEPTS :
// 1. Expiration : une entrée vit jusqu'au prochain minuit UTC
// 2. Déduplication : deux demandes identiques en vol partagent un seul fetch
// 3. Les erreurs ne sont jamais insérées (un échec ne corrompt pas le cache)
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveTime, Utc};
use moka::future::Cache;
use moka::Expiry;

use crate::api::provider::{PriceRequest, ProviderError};
use crate::models::PriceSeries;

/// Nombre maximum d'historiques gardés en mémoire
const DEFAULT_CAPACITY: u64 = 64;

/// Politique d'expiration : jusqu'au prochain jour calendaire (UTC)
struct UntilNextDay;

impl Expiry<PriceRequest, Arc<PriceSeries>> for UntilNextDay {
    fn expire_after_create(
        &self,
        _key: &PriceRequest,
        _value: &Arc<PriceSeries>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(time_until_next_day(Utc::now()))
    }
}

/// Durée restante avant le prochain minuit UTC
fn time_until_next_day(now: DateTime<Utc>) -> Duration {
    let next_midnight = now
        .date_naive()
        .succ_opt()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc());

    next_midnight
        .and_then(|midnight| (midnight - now).to_std().ok())
        .unwrap_or(Duration::from_secs(24 * 60 * 60))
}

/// Cache des séries de prix
///
/// CONCEPT RUST : Clone bon marché
/// - moka::future::Cache est un handle Arc interne
/// - Cloner PriceCache partage le même stockage
#[derive(Clone)]
pub struct PriceCache {
    inner: Cache<PriceRequest, Arc<PriceSeries>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .expire_after(UntilNextDay)
            .build();
        Self { inner }
    }

    /// Retourne l'entrée en cache ou exécute `fetch` (une seule fois par clé en vol)
    pub async fn get_or_fetch<F>(
        &self,
        request: PriceRequest,
        fetch: F,
    ) -> Result<Arc<PriceSeries>, Arc<ProviderError>>
    where
        F: Future<Output = Result<PriceSeries, ProviderError>>,
    {
        self.inner
            .try_get_with(request, async move { fetch.await.map(Arc::new) })
            .await
    }

    /// Vérifie si une clé est présente
    pub fn contains(&self, request: &PriceRequest) -> bool {
        self.inner.contains_key(request)
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;
    use chrono::{NaiveDate, TimeZone};

    fn request(ticker: &str) -> PriceRequest {
        PriceRequest::new(
            ticker,
            DateRange::new(
                NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ),
        )
    }

    #[test]
    fn test_time_until_next_day() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        assert_eq!(time_until_next_day(now), Duration::from_secs(6 * 60 * 60));
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = PriceCache::new();
        let key = request("AAPL");

        let result = cache
            .get_or_fetch(key.clone(), async { Err::<PriceSeries, _>(ProviderError::Timeout) })
            .await;
        assert!(result.is_err());
        assert!(!cache.contains(&key));

        let series = cache
            .get_or_fetch(key.clone(), async {
                Ok::<_, ProviderError>(PriceSeries::empty("AAPL", key.range))
            })
            .await
            .unwrap();
        assert_eq!(series.ticker, "AAPL");
        assert!(cache.contains(&key));
    }

    #[tokio::test]
    async fn test_second_lookup_skips_fetch() {
        let cache = PriceCache::new();
        let key = request("MSFT");

        cache
            .get_or_fetch(key.clone(), async { Ok::<_, ProviderError>(PriceSeries::empty("MSFT", key.range)) })
            .await
            .unwrap();

        let again = cache
            .get_or_fetch(key.clone(), async {
                let fetched: Result<PriceSeries, ProviderError> =
                    Err(ProviderError::Decode("fetch must not run on a cache hit".to_string()));
                fetched
            })
            .await
            .unwrap();
        assert_eq!(again.ticker, "MSFT");
    }
}
