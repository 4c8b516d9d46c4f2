// ============================================================================
// Trait : PriceProvider
// ============================================================================
// Frontière avec le fournisseur de données de marché
//
// Requête {ticker, start, end} → barres journalières OHLCV ou série vide
//
// CONCEPT RUST : Trait objects + async
// - async-trait permet d'écrire des méthodes async dans un trait
// - Arc<dyn PriceProvider> : le loader ne connaît pas l'implémentation
// - Les tests branchent un fournisseur en mémoire
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DateRange, PriceSeries};

/// Requête d'historique journalier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceRequest {
    /// Ticker déjà normalisé (majuscules, sans espaces)
    pub ticker: String,
    pub range: DateRange,
}

impl PriceRequest {
    pub fn new(ticker: impl Into<String>, range: DateRange) -> Self {
        Self {
            ticker: ticker.into(),
            range,
        }
    }
}

/// Erreurs d'un fournisseur de données
#[derive(Debug, Error)]
pub enum ProviderError {
    /// La requête a dépassé le délai configuré
    #[error("request timed out")]
    Timeout,

    /// Erreur de transport (connexion, DNS, TLS...)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Statut HTTP d'erreur renvoyé par le fournisseur
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// Réponse illisible
    #[error("invalid provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Vrai si une nouvelle tentative a une chance d'aboutir
    ///
    /// - Timeout, erreurs de connexion, HTTP 5xx et 429 : transitoires
    /// - Réponse illisible ou autre statut : définitif
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Timeout => true,
            ProviderError::Request(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            ProviderError::Status(code) => *code == 429 || (500..600).contains(code),
            ProviderError::Decode(_) => false,
        }
    }
}

/// Source d'historique de prix
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Nom du fournisseur (pour les logs)
    fn name(&self) -> &str;

    /// Récupère l'historique journalier
    ///
    /// Un symbole inconnu renvoie Ok(série vide), pas une erreur.
    async fn fetch_daily(&self, request: &PriceRequest) -> Result<PriceSeries, ProviderError>;
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Timeout.is_transient());
        assert!(ProviderError::Status(503).is_transient());
        assert!(ProviderError::Status(429).is_transient());
        assert!(!ProviderError::Status(403).is_transient());
        assert!(!ProviderError::Decode("bad json".to_string()).is_transient());
    }
}
