// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données du tableau de bord
//
// - ohlc : historique de prix journalier
// - frames : tables d'entraînement et de prévision, horizon
// - stats : statistiques dérivées (hausses / baisses)
// ============================================================================

pub mod frames;
pub mod ohlc;
pub mod stats;

// Re-export des structures principales pour simplifier les imports
pub use frames::{
    ForecastFrame, ForecastRow, Horizon, SeasonalProfile, SeasonalityKind, TrainingFrame,
    TrainingPoint, MAX_YEARS, MIN_YEARS,
};
pub use ohlc::{DateRange, PriceBar, PriceSeries};
pub use stats::PriceChangeStats;
