// ============================================================================
// Structures : TrainingFrame, Horizon, ForecastFrame
// ============================================================================
// Les tables échangées avec le modèle de prévision
//
// - TrainingFrame : projection {ds, y} de la série de prix (Date → ds, Close → y)
// - Horizon : nombre de jours à prévoir (années × 365)
// - ForecastFrame : prévision sur l'historique + l'horizon
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::models::PriceSeries;

/// Bornes du curseur "années de prévision"
pub const MIN_YEARS: u8 = 1;
pub const MAX_YEARS: u8 = 4;

/// Nombre de jours par année de prévision
pub const DAYS_PER_YEAR: u32 = 365;

// ============================================================================
// Horizon
// ============================================================================

/// Horizon de prévision en jours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    days: u32,
}

impl Horizon {
    /// Construit l'horizon depuis la valeur du curseur (1 à 4 ans)
    pub fn from_years(years: u8) -> Result<Self, DashboardError> {
        if !(MIN_YEARS..=MAX_YEARS).contains(&years) {
            return Err(DashboardError::Input(format!(
                "years must be between {} and {}, got {}",
                MIN_YEARS, MAX_YEARS, years
            )));
        }
        Ok(Self {
            days: u32::from(years) * DAYS_PER_YEAR,
        })
    }

    /// Horizon arbitraire en jours (utilisé par le modèle et les tests)
    pub fn from_days(days: u32) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}

// ============================================================================
// TrainingFrame
// ============================================================================

/// Un point d'entraînement {ds, y}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingPoint {
    pub ds: NaiveDate,
    pub y: f64,
}

/// Table d'entraînement du modèle
///
/// Invariants :
/// - triée par ds croissante (même ordre que la PriceSeries)
/// - dates en double supprimées (la première est conservée)
/// - clôtures non finies écartées, aucun trou comblé
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingFrame {
    points: Vec<TrainingPoint>,
}

impl TrainingFrame {
    /// Projette une série de prix sur {ds, y}
    pub fn from_series(series: &PriceSeries) -> Self {
        Self::from_points(series.bars.iter().map(|bar| TrainingPoint {
            ds: bar.date,
            y: bar.close,
        }))
    }

    /// Construit la table depuis des points quelconques en appliquant les invariants
    pub fn from_points(points: impl IntoIterator<Item = TrainingPoint>) -> Self {
        let mut points: Vec<TrainingPoint> = points.into_iter().filter(|p| p.y.is_finite()).collect();
        points.sort_by_key(|p| p.ds);
        points.dedup_by_key(|p| p.ds);
        Self { points }
    }

    pub fn points(&self) -> &[TrainingPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dernière date observée
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.ds)
    }

    /// Valeur observée à une date donnée (recherche dichotomique)
    pub fn value_at(&self, ds: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&ds, |p| p.ds)
            .ok()
            .map(|i| self.points[i].y)
    }
}

// ============================================================================
// ForecastFrame
// ============================================================================

/// Composantes saisonnières du modèle additif
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonalityKind {
    Weekly,
    Yearly,
}

impl SeasonalityKind {
    /// Période en jours
    pub fn period(&self) -> f64 {
        match self {
            SeasonalityKind::Weekly => 7.0,
            SeasonalityKind::Yearly => 365.25,
        }
    }

    /// Nom de colonne dans la table de prévision
    pub fn column(&self) -> &'static str {
        match self {
            SeasonalityKind::Weekly => "weekly",
            SeasonalityKind::Yearly => "yearly",
        }
    }
}

/// Une ligne de la table de prévision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub ds: NaiveDate,
    pub trend: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    /// None quand la saisonnalité hebdomadaire est désactivée
    pub weekly: Option<f64>,
    /// None quand la saisonnalité annuelle est désactivée
    pub yearly: Option<f64>,
    pub yhat: f64,
}

/// Profil d'une saisonnalité sur une période complète
///
/// - Weekly : x = 0 (dimanche) ..= 6 (samedi)
/// - Yearly : x = jour de l'année (0 ..= 364)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub kind: SeasonalityKind,
    pub points: Vec<(f64, f64)>,
}

/// Table de prévision : historique + horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastFrame {
    /// Lignes triées par ds croissante
    pub rows: Vec<ForecastRow>,

    /// Index de la première ligne future (== longueur de l'historique)
    pub history_len: usize,

    /// Saisonnalités actives, dans l'ordre des colonnes
    pub seasonalities: Vec<SeasonalityKind>,

    /// Profils saisonniers pour le graphique des composantes
    pub profiles: Vec<SeasonalProfile>,
}

impl ForecastFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lignes couvrant l'historique
    pub fn history(&self) -> &[ForecastRow] {
        &self.rows[..self.history_len.min(self.rows.len())]
    }

    /// Lignes futures uniquement
    pub fn future(&self) -> &[ForecastRow] {
        &self.rows[self.history_len.min(self.rows.len())..]
    }

    /// Les `n` dernières lignes (aperçu "tail")
    pub fn tail(&self, n: usize) -> &[ForecastRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }

    pub fn has(&self, kind: SeasonalityKind) -> bool {
        self.seasonalities.contains(&kind)
    }

    pub fn profile(&self, kind: SeasonalityKind) -> Option<&SeasonalProfile> {
        self.profiles.iter().find(|p| p.kind == kind)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, PriceBar};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_horizon_bounds() {
        assert_eq!(Horizon::from_years(1).unwrap().days(), 365);
        assert_eq!(Horizon::from_years(4).unwrap().days(), 1460);
        assert!(matches!(Horizon::from_years(0), Err(DashboardError::Input(_))));
        assert!(matches!(Horizon::from_years(5), Err(DashboardError::Input(_))));
    }

    #[test]
    fn test_training_frame_projection() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 2, 1));
        let series = PriceSeries::from_bars(
            "AAPL",
            range,
            vec![
                PriceBar::new(day(2024, 1, 2), 1.0, 1.0, 1.0, 10.0, 0),
                PriceBar::new(day(2024, 1, 2), 1.0, 1.0, 1.0, 99.0, 0),
                PriceBar::new(day(2024, 1, 3), 1.0, 1.0, 1.0, f64::NAN, 0),
                PriceBar::new(day(2024, 1, 5), 1.0, 1.0, 1.0, 12.0, 0),
            ],
        );

        let frame = TrainingFrame::from_series(&series);

        // Doublon supprimé (premier conservé), NaN écarté, pas de trou comblé
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.points()[0].y, 10.0);
        assert_eq!(frame.last_date(), Some(day(2024, 1, 5)));
        assert_eq!(frame.value_at(day(2024, 1, 4)), None);
        assert_eq!(frame.value_at(day(2024, 1, 5)), Some(12.0));
    }
}
