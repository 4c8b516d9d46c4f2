// ============================================================================
// Module : error
// ============================================================================
// Taxonomie des erreurs d'un passage du pipeline
//
// - Input : ticker vide ou invalide, le pipeline s'arrête avant le fetch
// - DataUnavailable : le fournisseur ne renvoie aucune ligne
// - Fit : l'ajustement du modèle échoue (données insuffisantes ou dégénérées)
// - TransientNetwork : timeout / erreur réseau après une nouvelle tentative
//
// Toutes ces erreurs sont locales à un rendu : elles sont affichées dans la
// page et ne font jamais planter le processus.
// ============================================================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ProviderError;
use crate::forecast::FitError;

/// Erreurs remontées par le pipeline
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    /// Entrée utilisateur invalide
    #[error("invalid input: {0}")]
    Input(String),

    /// Aucune donnée pour ce ticker sur la période
    #[error("no data available for {ticker}")]
    DataUnavailable { ticker: String },

    /// Échec de l'ajustement du modèle
    #[error("model fit failed: {0}")]
    Fit(#[from] FitError),

    /// Échec réseau persistant (après une nouvelle tentative)
    ///
    /// CONCEPT RUST : Arc<E>
    /// - Le cache partage l'erreur entre les appelants en vol
    /// - Arc rend l'erreur clonable sans exiger Clone sur reqwest::Error
    #[error("network error: {0}")]
    TransientNetwork(Arc<ProviderError>),
}

/// Catégorie d'erreur sérialisable (pour l'arbre de rendu)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Input,
    DataUnavailable,
    Fit,
    TransientNetwork,
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::Input(_) => ErrorKind::Input,
            DashboardError::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            DashboardError::Fit(_) => ErrorKind::Fit,
            DashboardError::TransientNetwork(_) => ErrorKind::TransientNetwork,
        }
    }
}

impl From<Arc<ProviderError>> for DashboardError {
    fn from(err: Arc<ProviderError>) -> Self {
        DashboardError::TransientNetwork(err)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_and_display() {
        let err = DashboardError::DataUnavailable {
            ticker: "ZZZZINVALID".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
        assert!(err.to_string().contains("ZZZZINVALID"));

        let err = DashboardError::from(FitError::InsufficientData {
            required: 2,
            actual: 1,
        });
        assert_eq!(err.kind(), ErrorKind::Fit);
        assert!(err.to_string().contains("model fit failed"));

        let err = DashboardError::from(Arc::new(ProviderError::Timeout));
        assert_eq!(err.kind(), ErrorKind::TransientNetwork);
    }
}
