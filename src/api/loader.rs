// ============================================================================
// Structure : DataLoader
// ============================================================================
// Chargement de l'historique : validation du ticker, cache, nouvelle tentative
//
// Étapes :
// 1. Normalise le ticker (trim + majuscules), rejette les entrées invalides
//    AVANT tout appel réseau
// 2. Consulte le cache (ticker, start, end)
// 3. Sinon appelle le fournisseur, avec une seule nouvelle tentative sur
//    erreur transitoire
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::api::cache::PriceCache;
use crate::api::provider::{PriceProvider, PriceRequest, ProviderError};
use crate::error::DashboardError;
use crate::models::{DateRange, PriceSeries};

/// Pause avant la nouvelle tentative
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Longueur maximale d'un symbole
const MAX_TICKER_LEN: usize = 16;

/// Normalise et valide un ticker saisi par l'utilisateur
///
/// Caractères acceptés : lettres, chiffres et `. - ^ =`
/// (ex : "BRK-B", "^GSPC", "EURUSD=X", "AIR.PA")
pub fn normalize_ticker(raw: &str) -> Result<String, DashboardError> {
    let ticker = raw.trim().to_uppercase();

    if ticker.is_empty() {
        return Err(DashboardError::Input("ticker symbol is empty".to_string()));
    }

    if ticker.chars().count() > MAX_TICKER_LEN {
        return Err(DashboardError::Input(format!(
            "ticker symbol is longer than {} characters",
            MAX_TICKER_LEN
        )));
    }

    if let Some(c) = ticker
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
    {
        return Err(DashboardError::Input(format!(
            "ticker symbol contains invalid character {:?}",
            c
        )));
    }

    Ok(ticker)
}

/// Chargeur d'historique avec cache
#[derive(Clone)]
pub struct DataLoader {
    provider: Arc<dyn PriceProvider>,
    cache: PriceCache,
    retry_delay: Duration,
}

impl DataLoader {
    pub fn new(provider: Arc<dyn PriceProvider>, cache: PriceCache) -> Self {
        Self {
            provider,
            cache,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Modifie la pause avant la nouvelle tentative (les tests utilisent zéro)
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// Charge l'historique d'un ticker sur un intervalle
    ///
    /// - Ticker invalide → DashboardError::Input (aucun appel réseau)
    /// - Symbole inconnu → Ok(série vide)
    /// - Échec réseau persistant → DashboardError::TransientNetwork
    #[instrument(skip(self, range), fields(start = %range.start, end = %range.end))]
    pub async fn load(&self, ticker: &str, range: DateRange) -> Result<Arc<PriceSeries>, DashboardError> {
        let ticker = normalize_ticker(ticker)?;
        let request = PriceRequest::new(ticker, range);

        if self.cache.contains(&request) {
            debug!(ticker = %request.ticker, "Price history served from cache");
        }

        let provider = Arc::clone(&self.provider);
        let retry_delay = self.retry_delay;
        let fetch_request = request.clone();

        let series = self
            .cache
            .get_or_fetch(request, async move {
                fetch_with_retry(provider.as_ref(), &fetch_request, retry_delay).await
            })
            .await?;

        info!(ticker = %series.ticker, bars = series.len(), "Price history loaded");
        Ok(series)
    }
}

/// Appelle le fournisseur, avec au plus une nouvelle tentative
async fn fetch_with_retry(
    provider: &dyn PriceProvider,
    request: &PriceRequest,
    retry_delay: Duration,
) -> Result<PriceSeries, ProviderError> {
    debug!(provider = provider.name(), ticker = %request.ticker, "Fetching price history");

    match provider.fetch_daily(request).await {
        Err(err) if err.is_transient() => {
            warn!(error = %err, ticker = %request.ticker, "Transient provider error, retrying once");
            tokio::time::sleep(retry_delay).await;
            provider.fetch_daily(request).await
        }
        other => other,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rstest::rstest;

    use crate::models::PriceBar;

    /// Fournisseur scripté : renvoie les réponses dans l'ordre
    struct ScriptedProvider {
        calls: AtomicUsize,
        responses: Mutex<Vec<Result<PriceSeries, ProviderError>>>,
    }

    impl ScriptedProvider {
        fn new(mut responses: Vec<Result<PriceSeries, ProviderError>>) -> Self {
            responses.reverse();
            Self {
                calls: AtomicUsize::new(0),
                responses: Mutex::new(responses),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_daily(&self, request: &PriceRequest) -> Result<PriceSeries, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(PriceSeries::empty(request.ticker.clone(), request.range)))
        }
    }

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    fn one_bar_series() -> PriceSeries {
        PriceSeries::from_bars(
            "AAPL",
            range(),
            vec![PriceBar::new(
                NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
                190.0,
                192.0,
                189.0,
                191.0,
                1000,
            )],
        )
    }

    fn loader(provider: Arc<ScriptedProvider>) -> DataLoader {
        DataLoader::new(provider, PriceCache::new()).with_retry_delay(Duration::ZERO)
    }

    #[rstest]
    #[case("aapl", "AAPL")]
    #[case("  msft ", "MSFT")]
    #[case("brk-b", "BRK-B")]
    #[case("^gspc", "^GSPC")]
    #[case("eurusd=x", "EURUSD=X")]
    fn test_normalize_ticker(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_ticker(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("AA PL")]
    #[case("AAPL;DROP")]
    #[case("ABCDEFGHIJKLMNOPQ")]
    fn test_invalid_ticker(#[case] raw: &str) {
        assert!(matches!(normalize_ticker(raw), Err(DashboardError::Input(_))));
    }

    #[tokio::test]
    async fn test_empty_ticker_makes_no_call() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let result = loader(provider.clone()).load("", range()).await;

        assert!(matches!(result, Err(DashboardError::Input(_))));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_repeated_load_is_cached() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(one_bar_series())]));
        let loader = loader(provider.clone());

        let first = loader.load("AAPL", range()).await.unwrap();
        let second = loader.load("aapl", range()).await.unwrap();

        assert_eq!(*first, *second);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_transient_error_retried_once() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::Timeout),
            Ok(one_bar_series()),
        ]));
        let series = loader(provider.clone()).load("AAPL", range()).await.unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_two_failures_are_reported_and_not_cached() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::Status(503)),
            Err(ProviderError::Timeout),
            Ok(one_bar_series()),
        ]));
        let loader = loader(provider.clone());

        let result = loader.load("AAPL", range()).await;
        assert!(matches!(result, Err(DashboardError::TransientNetwork(_))));
        assert_eq!(provider.calls(), 2);

        // La tentative suivante refait un appel : l'échec n'a pas été mis en cache
        let series = loader.load("AAPL", range()).await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Decode(
            "unexpected body".to_string(),
        ))]));
        let result = loader(provider.clone()).load("AAPL", range()).await;

        assert!(matches!(result, Err(DashboardError::TransientNetwork(_))));
        assert_eq!(provider.calls(), 1);
    }
}
