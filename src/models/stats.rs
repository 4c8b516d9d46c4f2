// ============================================================================
// Structure : PriceChangeStats
// ============================================================================
// Compte les journées haussières / baissières pour le graphique camembert
//
// Règle : les journées où close == open ne comptent ni dans les hausses,
// ni dans les baisses, ni dans le total utilisé pour les proportions.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::PriceSeries;

/// Répartition des journées de hausse et de baisse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceChangeStats {
    pub increase_days: usize,
    pub decrease_days: usize,
}

impl PriceChangeStats {
    /// Compte les journées d'une série
    pub fn from_series(series: &PriceSeries) -> Self {
        series.bars.iter().fold(Self::default(), |mut stats, bar| {
            if bar.is_increase() {
                stats.increase_days += 1;
            } else if bar.is_decrease() {
                stats.decrease_days += 1;
            }
            stats
        })
    }

    /// Total des journées prises en compte (hausses + baisses)
    pub fn total_days(&self) -> usize {
        self.increase_days + self.decrease_days
    }

    /// Proportions (hausse, baisse), None quand le total est nul
    ///
    /// CONCEPT : Pas de division par zéro
    /// - total == 0 → état neutre, aucune proportion
    pub fn proportions(&self) -> Option<(f64, f64)> {
        let total = self.total_days();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some((
            self.increase_days as f64 / total,
            self.decrease_days as f64 / total,
        ))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
