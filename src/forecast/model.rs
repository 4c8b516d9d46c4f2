// ============================================================================
// Structure : AdditiveModel
// ============================================================================
// Modèle additif déterministe :
//
//   y(t) = tendance linéaire par morceaux + saisonnalité hebdo + annuelle + bruit
//
// Ajustement en deux passes (moindres carrés pénalisés) :
// 1. Sans points de rupture → estimation de la variance du bruit σ²
// 2. Modèle complet, pénalités λ = σ² / prior² sur les ruptures et les
//    coefficients de Fourier
//
// Intervalle : yhat ± z · sqrt(σ² + variance de tendance(h)), où h est la
// distance (temps normalisé) au-delà de la fin de l'historique.
// ============================================================================

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, info, instrument};

use crate::forecast::features::{partial_dot, Design, SeasonalTerm};
use crate::forecast::linalg::solve_ridge;
use crate::forecast::{FitError, Forecaster};
use crate::models::{
    ForecastFrame, ForecastRow, Horizon, SeasonalProfile, SeasonalityKind, TrainingFrame,
};

/// Nombre minimum de points pour ajuster une tendance
pub const MIN_TRAINING_POINTS: usize = 2;

/// Plancher de la variance du bruit (échelle normalisée)
const MIN_NOISE_VARIANCE: f64 = 1e-4;

/// Pénalité quasi nulle sur l'intercept et la pente
const TREND_PENALTY: f64 = 1e-9;

/// Pénalité sur les termes saisonniers lors de la première passe
const FIRST_PASS_SEASONAL_PENALTY: f64 = 1e-6;

/// Année de référence des profils saisonniers (commence un dimanche)
const PROFILE_YEAR: i32 = 2017;

/// Activation d'une saisonnalité
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonalityMode {
    /// Activée selon la couverture de l'historique
    Auto,
    Enabled,
    Disabled,
}

/// Paramètres du modèle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveModel {
    /// Nombre maximum de points de rupture
    pub n_changepoints: usize,

    /// Part de l'historique où placer les points de rupture
    pub changepoint_range: f64,

    /// Écart-type a priori des variations de pente
    pub changepoint_prior_scale: f64,

    /// Écart-type a priori des coefficients de Fourier
    pub seasonality_prior_scale: f64,

    /// Largeur de l'intervalle d'incertitude (0.8 → quantiles 10 % / 90 %)
    pub interval_width: f64,

    pub weekly: SeasonalityMode,
    pub weekly_order: usize,

    pub yearly: SeasonalityMode,
    pub yearly_order: usize,
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.8,
            weekly: SeasonalityMode::Auto,
            weekly_order: 3,
            yearly: SeasonalityMode::Auto,
            yearly_order: 10,
        }
    }
}

/// Modèle ajusté, prêt à prédire
#[derive(Debug, Clone)]
pub struct FittedModel {
    design: Design,
    beta: Vec<f64>,
    y_scale: f64,
    /// Variance résiduelle (échelle normalisée)
    noise_variance: f64,
    /// Amplitude moyenne des variations de pente
    mean_abs_delta: f64,
    /// Fréquence des ruptures par unité de temps normalisé
    changepoint_rate: f64,
    /// Quantile normal de l'intervalle
    z: f64,
}

impl AdditiveModel {
    /// Ajuste le modèle sur la table d'entraînement
    #[instrument(skip(self, frame), fields(points = frame.len()))]
    pub fn fit(&self, frame: &TrainingFrame) -> Result<FittedModel, FitError> {
        let points = frame.points();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(FitError::InsufficientData {
                required: MIN_TRAINING_POINTS,
                actual: points.len(),
            });
        };
        if points.len() < MIN_TRAINING_POINTS {
            return Err(FitError::InsufficientData {
                required: MIN_TRAINING_POINTS,
                actual: points.len(),
            });
        }

        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(FitError::Degenerate(format!(
                "interval width {} is outside (0, 1)",
                self.interval_width
            )));
        }

        let span_days = (last.ds - first.ds).num_days() as f64;
        if span_days <= 0.0 {
            return Err(FitError::Degenerate("history spans a single day".to_string()));
        }

        // Normalisation de y par max|y| (1 pour une série nulle)
        let max_abs = points.iter().map(|p| p.y.abs()).fold(0.0, f64::max);
        let y_scale = if max_abs > 0.0 { max_abs } else { 1.0 };
        let y: Vec<f64> = points.iter().map(|p| p.y / y_scale).collect();

        let seasonal = self.active_seasonalities(frame, span_days);
        let changepoints = self.changepoint_times(frame, first.ds, span_days);
        let design = Design::new(first.ds, span_days, changepoints, seasonal);

        debug!(
            changepoints = design.changepoints().len(),
            seasonalities = ?design.seasonal().iter().map(|s| s.kind).collect::<Vec<_>>(),
            "Design matrix prepared"
        );

        // Passe 1 : tendance linéaire simple, estimation du bruit
        let simple = design.without_changepoints();
        let simple_rows: Vec<Vec<f64>> = points.iter().map(|p| simple.row(p.ds)).collect();
        let mut simple_penalties = vec![TREND_PENALTY; simple.width()];
        for penalty in simple_penalties.iter_mut().skip(simple.trend_width()) {
            *penalty = FIRST_PASS_SEASONAL_PENALTY;
        }
        let simple_beta = solve_checked(&simple_rows, &y, &simple_penalties)?;
        let noise_variance = residual_variance(&simple_rows, &y, &simple_beta).max(MIN_NOISE_VARIANCE);

        // Passe 2 : modèle complet
        let rows: Vec<Vec<f64>> = points.iter().map(|p| design.row(p.ds)).collect();
        let changepoint_penalty = noise_variance / self.changepoint_prior_scale.powi(2);
        let seasonal_penalty = noise_variance / self.seasonality_prior_scale.powi(2);

        let mut penalties = vec![TREND_PENALTY; design.width()];
        for j in design.changepoint_columns() {
            penalties[j] = changepoint_penalty;
        }
        for penalty in penalties.iter_mut().skip(design.trend_width()) {
            *penalty = seasonal_penalty;
        }

        let beta = solve_checked(&rows, &y, &penalties)?;
        let residual = residual_variance(&rows, &y, &beta);

        let deltas = &beta[design.changepoint_columns()];
        let mean_abs_delta = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64
        };
        let changepoint_rate = deltas.len() as f64;

        let z = Normal::new(0.0, 1.0)
            .map_err(|e| FitError::Degenerate(e.to_string()))?
            .inverse_cdf(0.5 + self.interval_width / 2.0);

        info!(
            points = points.len(),
            noise = residual.sqrt() * y_scale,
            "Model fitted"
        );

        Ok(FittedModel {
            design,
            beta,
            y_scale,
            noise_variance: residual,
            mean_abs_delta,
            changepoint_rate,
            z,
        })
    }

    /// Saisonnalités actives selon la couverture de l'historique
    ///
    /// - annuelle : au moins deux ans d'historique
    /// - hebdomadaire : au moins deux semaines, avec un pas inférieur à 7 jours
    fn active_seasonalities(&self, frame: &TrainingFrame, span_days: f64) -> Vec<SeasonalTerm> {
        let min_spacing = frame
            .points()
            .windows(2)
            .map(|w| (w[1].ds - w[0].ds).num_days())
            .min()
            .unwrap_or(i64::MAX);

        let weekly = match self.weekly {
            SeasonalityMode::Auto => span_days >= 14.0 && min_spacing < 7,
            SeasonalityMode::Enabled => true,
            SeasonalityMode::Disabled => false,
        };
        let yearly = match self.yearly {
            SeasonalityMode::Auto => span_days >= 730.0,
            SeasonalityMode::Enabled => true,
            SeasonalityMode::Disabled => false,
        };

        let mut terms = Vec::new();
        if weekly && self.weekly_order > 0 {
            terms.push(SeasonalTerm {
                kind: SeasonalityKind::Weekly,
                order: self.weekly_order,
            });
        }
        if yearly && self.yearly_order > 0 {
            terms.push(SeasonalTerm {
                kind: SeasonalityKind::Yearly,
                order: self.yearly_order,
            });
        }
        terms
    }

    /// Points de rupture répartis uniformément sur le début de l'historique
    fn changepoint_times(&self, frame: &TrainingFrame, start: NaiveDate, span_days: f64) -> Vec<f64> {
        let points = frame.points();
        let hist_size = (points.len() as f64 * self.changepoint_range).floor() as usize;
        let count = self.n_changepoints.min(hist_size.saturating_sub(1));
        if count == 0 {
            return Vec::new();
        }

        let last_index = (hist_size - 1) as f64;
        (1..=count)
            .map(|i| {
                let index = (i as f64 * last_index / count as f64).round() as usize;
                (points[index].ds - start).num_days() as f64 / span_days
            })
            .collect()
    }
}

impl FittedModel {
    /// Prédit une ligne par date
    pub fn predict(&self, dates: &[NaiveDate]) -> Vec<ForecastRow> {
        let trend_columns = 0..self.design.trend_width();
        let weekly_columns = self.design.seasonal_columns(SeasonalityKind::Weekly);
        let yearly_columns = self.design.seasonal_columns(SeasonalityKind::Yearly);

        dates
            .iter()
            .map(|&ds| {
                let row = self.design.row(ds);
                let trend = partial_dot(&row, &self.beta, trend_columns.clone()) * self.y_scale;
                let weekly = weekly_columns
                    .clone()
                    .map(|cols| partial_dot(&row, &self.beta, cols) * self.y_scale);
                let yearly = yearly_columns
                    .clone()
                    .map(|cols| partial_dot(&row, &self.beta, cols) * self.y_scale);
                let yhat = trend + weekly.unwrap_or(0.0) + yearly.unwrap_or(0.0);

                let half_width = self.z * self.std_dev(self.design.scaled_time(ds)) * self.y_scale;

                ForecastRow {
                    ds,
                    trend,
                    yhat_lower: yhat - half_width,
                    yhat_upper: yhat + half_width,
                    weekly,
                    yearly,
                    yhat,
                }
            })
            .collect()
    }

    /// Écart-type prédictif (échelle normalisée) au temps t
    ///
    /// Au-delà de l'historique, les ruptures futures suivent un processus de
    /// fréquence `changepoint_rate` et d'amplitude Laplace(mean_abs_delta) :
    /// Var[tendance(1 + h)] = rate · 2λ² · h³ / 3
    fn std_dev(&self, t: f64) -> f64 {
        let h = (t - 1.0).max(0.0);
        let trend_variance =
            self.changepoint_rate * 2.0 * self.mean_abs_delta.powi(2) * h.powi(3) / 3.0;
        (self.noise_variance + trend_variance).sqrt()
    }

    /// Saisonnalités actives
    pub fn seasonalities(&self) -> Vec<SeasonalityKind> {
        self.design.seasonal().iter().map(|s| s.kind).collect()
    }

    /// Profil d'une saisonnalité sur une période complète
    pub fn seasonal_profile(&self, kind: SeasonalityKind) -> Option<SeasonalProfile> {
        let columns = self.design.seasonal_columns(kind)?;
        let base = NaiveDate::from_ymd_opt(PROFILE_YEAR, 1, 1)?;
        debug_assert_eq!(base.weekday(), Weekday::Sun);

        let length = match kind {
            SeasonalityKind::Weekly => 7,
            SeasonalityKind::Yearly => 365,
        };

        let points = (0..length)
            .map(|i| {
                let row = self.design.row(base + Duration::days(i));
                (i as f64, partial_dot(&row, &self.beta, columns.clone()) * self.y_scale)
            })
            .collect();

        Some(SeasonalProfile { kind, points })
    }
}

impl Forecaster for AdditiveModel {
    fn forecast(&self, frame: &TrainingFrame, horizon: Horizon) -> Result<ForecastFrame, FitError> {
        let fitted = self.fit(frame)?;

        let history: Vec<NaiveDate> = frame.points().iter().map(|p| p.ds).collect();
        let last = history.last().copied().ok_or(FitError::InsufficientData {
            required: MIN_TRAINING_POINTS,
            actual: 0,
        })?;

        let mut dates = history;
        dates.extend((1..=i64::from(horizon.days())).map(|i| last + Duration::days(i)));

        let rows = fitted.predict(&dates);
        if rows.iter().any(|r| !(r.yhat.is_finite() && r.yhat_lower.is_finite() && r.yhat_upper.is_finite())) {
            return Err(FitError::Degenerate("prediction is not finite".to_string()));
        }

        let seasonalities = fitted.seasonalities();
        let profiles = seasonalities
            .iter()
            .filter_map(|&kind| fitted.seasonal_profile(kind))
            .collect();

        debug!(rows = rows.len(), horizon = horizon.days(), "Forecast computed");

        Ok(ForecastFrame {
            rows,
            history_len: frame.len(),
            seasonalities,
            profiles,
        })
    }
}

/// Résolution ridge, avec contrôle des valeurs non finies
fn solve_checked(rows: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<Vec<f64>, FitError> {
    let beta = solve_ridge(rows, y, penalties)
        .ok_or_else(|| FitError::Degenerate("normal equations are not positive definite".to_string()))?;

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(FitError::Degenerate("coefficients are not finite".to_string()));
    }
    Ok(beta)
}

/// Moyenne des carrés des résidus
fn residual_variance(rows: &[Vec<f64>], y: &[f64], beta: &[f64]) -> f64 {
    let sum: f64 = rows
        .iter()
        .zip(y)
        .map(|(row, &target)| {
            let fitted: f64 = row.iter().zip(beta).map(|(x, b)| x * b).sum();
            (target - fitted).powi(2)
        })
        .sum();
    sum / rows.len().max(1) as f64
}

// ============================================================================
// Tests unitaires
// ============================================================================
