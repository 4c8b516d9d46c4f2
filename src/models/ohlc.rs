// ============================================================================
// Structures : PriceBar, PriceSeries, DateRange
// ============================================================================
// Représente l'historique journalier OHLCV d'un ticker
//
// CONCEPTS RUST :
// 1. NaiveDate : date calendaire sans fuseau (une barre = un jour de bourse)
// 2. f64 : floating point 64 bits pour les prix
// 3. u64 : volume (toujours positif)
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Intervalle de dates [start, end)
///
/// CONCEPT : Borne de fin exclusive
/// - Le fournisseur ne renvoie pas la barre du jour `end`
/// - La clé de cache change donc naturellement chaque jour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Vérifie si une date appartient à l'intervalle
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Une barre journalière OHLCV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Jour de bourse (date locale de la place de cotation)
    pub date: NaiveDate,

    /// Prix d'ouverture (Open)
    pub open: f64,

    /// Prix le plus haut (High)
    pub high: f64,

    /// Prix le plus bas (Low)
    pub low: f64,

    /// Prix de clôture (Close)
    pub close: f64,

    /// Volume échangé
    pub volume: u64,
}

impl PriceBar {
    /// Constructeur : crée une nouvelle barre
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Journée haussière : close > open
    pub fn is_increase(&self) -> bool {
        self.close > self.open
    }

    /// Journée baissière : close < open
    pub fn is_decrease(&self) -> bool {
        self.close < self.open
    }
}

/// Historique journalier d'un ticker
///
/// CONCEPT RUST : Ownership
/// - PriceSeries possède le Vec de barres
/// - Immutable une fois chargée : partagée via Arc depuis le cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbole du ticker (normalisé en majuscules)
    pub ticker: String,

    /// Intervalle demandé au fournisseur
    pub range: DateRange,

    /// Barres triées par date croissante
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Crée une série vide
    pub fn empty(ticker: impl Into<String>, range: DateRange) -> Self {
        Self {
            ticker: ticker.into(),
            range,
            bars: Vec::new(),
        }
    }

    /// Crée une série à partir de barres quelconques
    ///
    /// Les barres sont triées par date (tri stable : l'ordre du fournisseur
    /// est conservé pour les dates identiques)
    pub fn from_bars(ticker: impl Into<String>, range: DateRange, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        Self {
            ticker: ticker.into(),
            range,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Les `n` dernières barres (aperçu "tail")
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bar_direction() {
        let up = PriceBar::new(day(2024, 1, 2), 100.0, 110.0, 95.0, 105.0, 1000);
        assert!(up.is_increase());
        assert!(!up.is_decrease());

        let flat = PriceBar::new(day(2024, 1, 3), 100.0, 101.0, 99.0, 100.0, 1000);
        assert!(!flat.is_increase());
        assert!(!flat.is_decrease());
    }

    #[test]
    fn test_series_sorted_and_tail() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 2, 1));
        let series = PriceSeries::from_bars(
            "AAPL",
            range,
            vec![
                PriceBar::new(day(2024, 1, 4), 3.0, 3.0, 3.0, 3.0, 0),
                PriceBar::new(day(2024, 1, 2), 1.0, 1.0, 1.0, 1.0, 0),
                PriceBar::new(day(2024, 1, 3), 2.0, 2.0, 2.0, 2.0, 0),
            ],
        );

        assert_eq!(series.bars[0].date, day(2024, 1, 2));
        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(2)[1].date, day(2024, 1, 4));
        assert_eq!(series.tail(10).len(), 3);
    }

    #[test]
    fn test_range_end_is_exclusive() {
        let range = DateRange::new(day(2015, 1, 1), day(2024, 6, 1));
        assert!(range.contains(day(2015, 1, 1)));
        assert!(range.contains(day(2024, 5, 31)));
        assert!(!range.contains(day(2024, 6, 1)));
    }
}
