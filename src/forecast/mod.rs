// ============================================================================
// Module : forecast
// ============================================================================
// Modèle de prévision de séries temporelles
//
// CONCEPT RUST : Trait comme point d'extension
// - Le pipeline ne dépend que de `Forecaster`
// - AdditiveModel est l'implémentation par défaut
// - Les tests peuvent injecter un modèle qui échoue volontairement
// ============================================================================

pub mod features; // Matrice de design (tendance + Fourier)
pub mod linalg;   // Ridge + Cholesky
pub mod model;    // AdditiveModel, FittedModel

use thiserror::Error;

use crate::models::{ForecastFrame, Horizon, TrainingFrame};

pub use model::{AdditiveModel, FittedModel, SeasonalityMode};

/// Erreurs d'ajustement du modèle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Pas assez de points pour ajuster une tendance
    #[error("at least {required} data points are required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Système numérique dégénéré (non défini positif, valeurs non finies)
    #[error("degenerate series: {0}")]
    Degenerate(String),
}

/// Prévision d'une série {ds, y} sur un horizon
///
/// Contrat :
/// - une ligne par date de l'historique, puis `horizon.days()` dates
///   journalières consécutives après la dernière date observée
/// - résultat déterministe pour une même entrée
pub trait Forecaster {
    fn forecast(&self, frame: &TrainingFrame, horizon: Horizon) -> Result<ForecastFrame, FitError>;
}
