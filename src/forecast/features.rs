// ============================================================================
// Matrice de design du modèle additif
// ============================================================================
// Une ligne par date :
//
//   [1, t, (t - s_1)+, ..., (t - s_k)+, fourier(weekly)..., fourier(yearly)...]
//
// - t : temps normalisé, 0 au premier jour de l'historique, 1 au dernier
// - s_j : points de rupture de tendance (en temps normalisé)
// - fourier : paires (sin, cos) d'ordre 1..=N sur la période de la saisonnalité
// ============================================================================

use std::f64::consts::PI;
use std::ops::Range;

use chrono::NaiveDate;

use crate::models::SeasonalityKind;

/// Saisonnalité active et son ordre de Fourier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalTerm {
    pub kind: SeasonalityKind,
    pub order: usize,
}

impl SeasonalTerm {
    /// Nombre de colonnes (sin + cos par ordre)
    pub fn width(&self) -> usize {
        2 * self.order
    }
}

/// Description des colonnes de la matrice de design
#[derive(Debug, Clone)]
pub struct Design {
    start: NaiveDate,
    span_days: f64,
    changepoints: Vec<f64>,
    seasonal: Vec<SeasonalTerm>,
}

impl Design {
    pub fn new(
        start: NaiveDate,
        span_days: f64,
        changepoints: Vec<f64>,
        seasonal: Vec<SeasonalTerm>,
    ) -> Self {
        Self {
            start,
            span_days,
            changepoints,
            seasonal,
        }
    }

    /// Même design sans points de rupture (première passe de l'ajustement)
    pub fn without_changepoints(&self) -> Self {
        Self {
            changepoints: Vec::new(),
            ..self.clone()
        }
    }

    pub fn changepoints(&self) -> &[f64] {
        &self.changepoints
    }

    pub fn seasonal(&self) -> &[SeasonalTerm] {
        &self.seasonal
    }

    /// Nombre total de colonnes
    pub fn width(&self) -> usize {
        self.trend_width() + self.seasonal.iter().map(SeasonalTerm::width).sum::<usize>()
    }

    /// Colonnes de tendance : intercept, pente, points de rupture
    pub fn trend_width(&self) -> usize {
        2 + self.changepoints.len()
    }

    /// Colonnes des points de rupture
    pub fn changepoint_columns(&self) -> Range<usize> {
        2..self.trend_width()
    }

    /// Colonnes d'une saisonnalité (None si elle est désactivée)
    pub fn seasonal_columns(&self, kind: SeasonalityKind) -> Option<Range<usize>> {
        let mut offset = self.trend_width();
        for term in &self.seasonal {
            if term.kind == kind {
                return Some(offset..offset + term.width());
            }
            offset += term.width();
        }
        None
    }

    /// Temps normalisé d'une date (> 1 dans le futur)
    pub fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.span_days
    }

    /// Ligne de la matrice de design pour une date
    pub fn row(&self, date: NaiveDate) -> Vec<f64> {
        let t = self.scaled_time(date);
        let mut row = Vec::with_capacity(self.width());

        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|&s| (t - s).max(0.0)));

        let day = days_since_epoch(date);
        for term in &self.seasonal {
            row.extend(fourier_terms(day, term.kind.period(), term.order));
        }

        row
    }
}

/// Jours écoulés depuis 1970-01-01
///
/// La phase des saisonnalités ne dépend que de la date calendaire, pas du
/// début de l'historique : le profil d'un jour de la semaine est le même
/// quel que soit l'intervalle chargé.
pub fn days_since_epoch(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as f64
}

/// Termes de Fourier [sin(2πkd/P), cos(2πkd/P)] pour k = 1..=order
pub fn fourier_terms(day: f64, period: f64, order: usize) -> impl Iterator<Item = f64> {
    (1..=order).flat_map(move |k| {
        let angle = 2.0 * PI * k as f64 * day / period;
        [angle.sin(), angle.cos()]
    })
}

/// Produit scalaire restreint à une plage de colonnes
pub fn partial_dot(row: &[f64], beta: &[f64], columns: Range<usize>) -> f64 {
    columns.map(|j| row[j] * beta[j]).sum()
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

    fn design() -> Design {
        Design::new(
            day(2024, 1, 1),
            100.0,
            vec![0.25, 0.5],
            vec![
                SeasonalTerm {
                    kind: SeasonalityKind::Weekly,
                    order: 3,
                },
                SeasonalTerm {
                    kind: SeasonalityKind::Yearly,
                    order: 10,
                },
            ],
        )
    }

    #[test]
    fn test_column_layout() {
        let design = design();
        assert_eq!(design.width(), 4 + 6 + 20);
        assert_eq!(design.changepoint_columns(), 2..4);
        assert_eq!(design.seasonal_columns(SeasonalityKind::Weekly), Some(4..10));
        assert_eq!(design.seasonal_columns(SeasonalityKind::Yearly), Some(10..30));
        assert_eq!(design.without_changepoints().width(), 2 + 6 + 20);
    }

    #[test]
    fn test_row_trend_part() {
        let design = design();
        let row = design.row(day(2024, 1, 1) + chrono::Duration::days(40));

        assert_eq!(row.len(), design.width());
        assert_eq!(row[0], 1.0);
        assert!((row[1] - 0.4).abs() < 1e-12);
        assert!((row[2] - 0.15).abs() < 1e-12);
        assert_eq!(row[3], 0.0);
    }

    #[test]
    fn test_fourier_period() {
        // Une semaine plus tard : mêmes termes hebdomadaires
        let a: Vec<f64> = fourier_terms(100.0, 7.0, 3).collect();
        let b: Vec<f64> = fourier_terms(107.0, 7.0, 3).collect();
        assert_eq!(a.len(), 6);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_days_since_epoch() {
        assert_eq!(days_since_epoch(day(1970, 1, 1)), 0.0);
        assert_eq!(days_since_epoch(day(1970, 1, 8)), 7.0);
    }
}
