// ============================================================================
// Module : api
// ============================================================================
// Récupération des données de marché : fournisseur, cache et chargeur
// ============================================================================

pub mod cache;    // Cache des historiques (expiration au jour suivant)
pub mod loader;   // Validation du ticker + cache + nouvelle tentative
pub mod provider; // Trait PriceProvider et erreurs fournisseur
pub mod yahoo;    // Client API Yahoo Finance

// Re-export des éléments principaux
pub use cache::PriceCache;
pub use loader::{normalize_ticker, DataLoader};
pub use provider::{PriceProvider, PriceRequest, ProviderError};
pub use yahoo::YahooProvider;
