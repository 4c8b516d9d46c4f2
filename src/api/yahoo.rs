// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère l'historique journalier depuis l'endpoint chart v8 de Yahoo Finance
//
// CONCEPTS RUST :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Serde : désérialisation JSON automatique
// 3. Trait impl : YahooProvider implémente PriceProvider
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::api::provider::{PriceProvider, PriceRequest, ProviderError};
use crate::models::{PriceBar, PriceSeries};

/// Endpoint public par défaut
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// User-Agent de navigateur pour éviter le blocage par Yahoo
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================
// Yahoo retourne un JSON imbriqué, on définit des structures qui matchent
// exactement la structure JSON pour que serde puisse désérialiser
//
// Un symbole inconnu donne : {"chart": {"result": null, "error": {...}}}
// ============================================================================

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Métadonnées du ticker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    symbol: Option<String>,
    /// Décalage de la place de cotation par rapport à UTC (secondes)
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

/// Données OHLCV, une valeur par timestamp (null si absente)
#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

// ============================================================================
// YahooProvider
// ============================================================================

/// Client Yahoo Finance
///
/// CONCEPT : Un seul reqwest::Client réutilisé
/// - Le pool de connexions est partagé entre les requêtes
/// - Le timeout borne chaque appel (une requête lente ne bloque pas la session)
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    /// Crée un client avec un timeout par requête
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker)
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    /// Récupère l'historique journalier d'un ticker
    ///
    /// CONCEPT RUST : #[instrument]
    /// - Ajoute un span avec le ticker et l'intervalle
    /// - Tous les logs à l'intérieur ont ce contexte
    #[instrument(skip(self), fields(ticker = %request.ticker, start = %request.range.start, end = %request.range.end))]
    async fn fetch_daily(&self, request: &PriceRequest) -> Result<PriceSeries, ProviderError> {
        let url = self.chart_url(&request.ticker);
        let query = build_query(request);
        debug!(url = %url, ?query, "Sending HTTP request to Yahoo Finance");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // 404 : symbole inconnu → série vide (pas une erreur)
        if status == reqwest::StatusCode::NOT_FOUND {
            info!("Yahoo Finance has no data for this symbol");
            return Ok(PriceSeries::empty(request.ticker.clone(), request.range));
        }

        if !status.is_success() {
            warn!(status = %status, "Yahoo Finance returned error status");
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_reqwest_error)?;
        let yahoo_response: YahooResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        let series = parse_yahoo_response(yahoo_response, request)?;
        info!(bars = series.len(), "Successfully fetched price history");
        Ok(series)
    }
}

/// Paramètres de requête : intervalle journalier, bornes en timestamps Unix
///
/// period2 est exclusif : la barre du jour `end` n'est pas demandée
fn build_query(request: &PriceRequest) -> Vec<(&'static str, String)> {
    vec![
        ("interval", "1d".to_string()),
        ("period1", midnight_timestamp(request.range.start).to_string()),
        ("period2", midnight_timestamp(request.range.end).to_string()),
        ("events", "history".to_string()),
    ]
}

fn midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn classify_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Request(err)
    }
}

/// Convertit la réponse Yahoo en PriceSeries
///
/// - Pas de résultat / erreur "Not Found" → série vide
/// - Barres avec une valeur O/H/L/C manquante ignorées
/// - Volume manquant → 0
/// - Barres hors de l'intervalle demandé écartées
fn parse_yahoo_response(
    yahoo_response: YahooResponse,
    request: &PriceRequest,
) -> Result<PriceSeries, ProviderError> {
    if let Some(err) = &yahoo_response.chart.error {
        info!(code = ?err.code, description = ?err.description, "Yahoo Finance reported no data");
        return Ok(PriceSeries::empty(request.ticker.clone(), request.range));
    }

    let Some(result) = yahoo_response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(request.ticker.clone(), request.range));
    };

    if let Some(symbol) = &result.meta.symbol {
        debug!(symbol = %symbol, "Parsing chart result");
    }

    let offset = result.meta.gmtoffset.unwrap_or(0);
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(PriceSeries::empty(request.ticker.clone(), request.range));
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&opens, i),
            value_at(&highs, i),
            value_at(&lows, i),
            value_at(&closes, i),
        ) else {
            skipped += 1;
            continue;
        };

        let volume = volumes.get(i).copied().flatten().unwrap_or(0);

        // Date locale de la place de cotation
        let date = DateTime::from_timestamp(timestamp + offset, 0)
            .ok_or_else(|| ProviderError::Decode(format!("invalid timestamp {}", timestamp)))?
            .date_naive();

        if !request.range.contains(date) {
            continue;
        }

        bars.push(PriceBar::new(date, open, high, low, close, volume));
    }

    if skipped > 0 {
        warn!(skipped, total = timestamps.len(), "Skipped bars with missing data");
    }

    Ok(PriceSeries::from_bars(request.ticker.clone(), request.range, bars))
}

fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;

    fn request() -> PriceRequest {
        PriceRequest::new(
            "AAPL",
            DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            ),
        )
    }

    fn parse(json: &str) -> PriceSeries {
        let response: YahooResponse = serde_json::from_str(json).unwrap();
        parse_yahoo_response(response, &request()).unwrap()
    }

    #[test]
    fn test_build_query() {
        let query = build_query(&request());
        assert!(query.contains(&("interval", "1d".to_string())));
        // 2024-01-01T00:00:00Z
        assert!(query.contains(&("period1", "1704067200".to_string())));
    }

    #[test]
    fn test_parse_daily_bars() {
        // 2024-01-02 et 2024-01-03 à 14:30 UTC, place New York (-5h)
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"AAPL","gmtoffset":-18000},
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{
                "open":[187.15,184.22,null],
                "high":[188.44,185.88,183.0],
                "low":[183.89,183.43,181.0],
                "close":[185.64,184.25,182.0],
                "volume":[82488700,null,1]
            }]}
        }],"error":null}}"#;

        let series = parse(json);

        assert_eq!(series.ticker, "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.bars[0].close, 185.64);
        assert_eq!(series.bars[1].volume, 0);
    }

    #[test]
    fn test_parse_unknown_symbol_is_empty() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse(json).is_empty());
    }

    #[test]
    fn test_parse_drops_bars_outside_range() {
        // 2024-01-10 14:30 UTC : date de fin exclusive
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"AAPL","gmtoffset":-18000},
            "timestamp":[1704897000],
            "indicators":{"quote":[{"open":[1.0],"high":[1.0],"low":[1.0],"close":[1.0],"volume":[1]}]}
        }],"error":null}}"#;
        assert!(parse(json).is_empty());
    }

    // ========================================================================
    // Client HTTP contre un serveur local
    // ========================================================================

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Lit l'en-tête d'une requête HTTP (jusqu'à la ligne vide)
    async fn read_head(stream: &mut tokio::net::TcpStream) -> String {
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&head).into_owned()
    }

    /// Serveur d'une seule requête : renvoie la réponse donnée,
    /// la tâche rend l'en-tête de la requête reçue
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let head = read_head(&mut stream).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            head
        });
        (base_url, handle)
    }

    fn provider(base_url: &str) -> YahooProvider {
        YahooProvider::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_chart_body() {
        let body = r#"{"chart":{"result":[{
            "meta":{"symbol":"AAPL","gmtoffset":-18000},
            "timestamp":[1704205800],
            "indicators":{"quote":[{"open":[187.15],"high":[188.44],"low":[183.89],"close":[185.64],"volume":[82488700]}]}
        }],"error":null}}"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let series = provider(&base_url).fetch_daily(&request()).await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars[0].close, 185.64);

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /v8/finance/chart/AAPL?"), "{}", head);
        assert!(head.contains("interval=1d"));
        assert!(head.contains("period1=1704067200"));
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_empty_series() {
        let (base_url, _server) = serve_once("404 Not Found", r#"{"chart":{"result":null,"error":null}}"#).await;

        let series = provider(&base_url).fetch_daily(&request()).await.unwrap();
        assert!(series.is_empty());
        assert_eq!(series.ticker, "AAPL");
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_transient_status() {
        let (base_url, _server) = serve_once("503 Service Unavailable", "").await;

        let err = provider(&base_url).fetch_daily(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(503)), "{:?}", err);
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_decode_error() {
        let (base_url, _server) = serve_once("200 OK", "<html>rate limited</html>").await;

        let err = provider(&base_url).fetch_daily(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)), "{:?}", err);
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_fetch_stalled_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        // Accepte la connexion sans jamais répondre
        let _server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_head(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });

        let provider = YahooProvider::new(&base_url, Duration::from_millis(200)).unwrap();
        let err = provider.fetch_daily(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout), "{:?}", err);
        assert!(err.is_transient());
    }
}
