// ============================================================================
// Module : charts
// ============================================================================
// Interface typée des graphiques du tableau de bord
//
// Chaque graphique décrit explicitement ses séries, ses couleurs, ses axes et
// son titre. Le rendu terminal (ui::chart) traduit ces descriptions en widgets
// ratatui ; le mode --snapshot les sérialise en JSON.
//
// CONCEPT : Dates sur l'axe X
// - Les axes de type Date stockent x = nombre de jours depuis 0001-01-01
// - date_to_x / x_to_date font la conversion dans les deux sens
// ============================================================================

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// Couleurs et axes
// ============================================================================

/// Palette des graphiques
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartColor {
    RoyalBlue,
    Firebrick,
    Orange,
    SteelBlue,
    LightBlue,
    Green,
    Red,
    Gray,
}

impl ChartColor {
    /// Composantes RGB (couleurs nommées CSS)
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ChartColor::RoyalBlue => (65, 105, 225),
            ChartColor::Firebrick => (178, 34, 34),
            ChartColor::Orange => (255, 165, 0),
            ChartColor::SteelBlue => (70, 130, 180),
            ChartColor::LightBlue => (173, 216, 230),
            ChartColor::Green => (0, 200, 83),
            ChartColor::Red => (213, 0, 0),
            ChartColor::Gray => (128, 128, 128),
        }
    }
}

/// Interprétation des valeurs d'un axe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisScale {
    /// x = jours depuis 0001-01-01 (voir date_to_x)
    Date,
    Linear,
    /// 0 = dimanche ..= 6 = samedi
    Weekday,
    /// 0 = 1er janvier ..= 364
    DayOfYear,
}

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

impl AxisScale {
    /// Libellé d'une graduation
    pub fn format_tick(&self, x: f64) -> String {
        match self {
            AxisScale::Date => x_to_date(x)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            AxisScale::Linear => format!("{:.2}", x),
            AxisScale::Weekday => WEEKDAYS
                .get(x.round().clamp(0.0, 6.0) as usize)
                .map(|d| d.to_string())
                .unwrap_or_default(),
            AxisScale::DayOfYear => NaiveDate::from_ymd_opt(2017, 1, 1)
                .map(|jan1| jan1 + Duration::days(x.round().clamp(0.0, 364.0) as i64))
                .map(|d| d.format("%B %-d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Description d'un axe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub title: String,
    pub scale: AxisScale,
}

impl AxisSpec {
    pub fn new(title: impl Into<String>, scale: AxisScale) -> Self {
        Self {
            title: title.into(),
            scale,
        }
    }
}

/// Conversion date → abscisse
pub fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Conversion abscisse → date (None hors des bornes de chrono)
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() || x.abs() > f64::from(i32::MAX) {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

// ============================================================================
// Graphique en lignes
// ============================================================================

/// Tracé d'une série
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Line,
    Markers,
    /// Borne d'un intervalle (trait fin)
    Band,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: ChartColor,
    pub kind: SeriesKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

impl LineSeries {
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>, color: ChartColor, kind: SeriesKind) -> Self {
        Self {
            name: name.into(),
            points,
            style: SeriesStyle { color, kind },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<LineSeries>,
    /// Le graphique suit la fenêtre de zoom / défilement
    pub range_control: bool,
}

impl LineChart {
    /// Bornes X de toutes les séries
    pub fn x_bounds(&self) -> Option<[f64; 2]> {
        bounds(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))
    }

    /// Bornes Y des points dont l'abscisse est dans [x_min, x_max]
    pub fn y_bounds_within(&self, x_min: f64, x_max: f64) -> Option<[f64; 2]> {
        bounds(
            self.series
                .iter()
                .flat_map(|s| s.points.iter())
                .filter(|p| p.0 >= x_min && p.0 <= x_max)
                .map(|p| p.1),
        )
    }

    /// Copie restreinte à une fenêtre d'abscisses
    pub fn windowed(&self, x_min: f64, x_max: f64) -> LineChart {
        LineChart {
            series: self
                .series
                .iter()
                .map(|s| LineSeries {
                    points: s
                        .points
                        .iter()
                        .copied()
                        .filter(|p| p.0 >= x_min && p.0 <= x_max)
                        .collect(),
                    ..s.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// Min / max d'un itérateur de valeurs finies
pub fn bounds(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}

// ============================================================================
// Barres groupées, nuage de points, camembert
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub color: ChartColor,
}

/// Un groupe de barres (une valeur par série, None si absente à cette date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGroup {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub series: Vec<BarSeries>,
    /// Triés par date croissante
    pub groups: Vec<BarGroup>,
    pub range_control: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub color: ChartColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<ScatterSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    /// Proportion dans [0, 1]
    pub value: f64,
    pub color: ChartColor,
}

/// Camembert ; `slices` vide = état neutre (aucune journée comptée)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

/// Un graphique typé
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
    Scatter(ScatterChart),
    Pie(PieChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Line(c) => &c.title,
            Chart::Bar(c) => &c.title,
            Chart::Scatter(c) => &c.title,
            Chart::Pie(c) => &c.title,
        }
    }
}

// ============================================================================
// Fenêtre de zoom / défilement
// ============================================================================
// Équivalent terminal du curseur de plage sous les graphiques : un zoom
// (tout, 5 ans, 1 an, 6 mois, 1 mois) et un décalage vers le passé.
// ============================================================================

/// Préréglages de zoom, du plus large au plus serré
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomPreset {
    #[default]
    All,
    FiveYears,
    OneYear,
    SixMonths,
    OneMonth,
}

impl ZoomPreset {
    const ORDER: [ZoomPreset; 5] = [
        ZoomPreset::All,
        ZoomPreset::FiveYears,
        ZoomPreset::OneYear,
        ZoomPreset::SixMonths,
        ZoomPreset::OneMonth,
    ];

    /// Largeur de la fenêtre en jours (None = tout)
    pub fn days(&self) -> Option<f64> {
        match self {
            ZoomPreset::All => None,
            ZoomPreset::FiveYears => Some(5.0 * 365.0),
            ZoomPreset::OneYear => Some(365.0),
            ZoomPreset::SixMonths => Some(182.0),
            ZoomPreset::OneMonth => Some(30.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZoomPreset::All => "All",
            ZoomPreset::FiveYears => "5Y",
            ZoomPreset::OneYear => "1Y",
            ZoomPreset::SixMonths => "6M",
            ZoomPreset::OneMonth => "1M",
        }
    }

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|p| p == self).unwrap_or(0)
    }

    /// Zoom plus serré (sature sur 1M)
    pub fn zoom_in(&self) -> Self {
        Self::ORDER[(self.index() + 1).min(Self::ORDER.len() - 1)]
    }

    /// Zoom plus large (sature sur All)
    pub fn zoom_out(&self) -> Self {
        Self::ORDER[self.index().saturating_sub(1)]
    }
}

/// Fenêtre visible sur l'axe des dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeWindow {
    pub zoom: ZoomPreset,
    /// Nombre de demi-fenêtres de recul depuis la fin des données
    pub pan: u32,
}

impl RangeWindow {
    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.zoom_out();
        if self.zoom == ZoomPreset::All {
            self.pan = 0;
        }
    }

    /// Recule vers le passé
    pub fn pan_back(&mut self) {
        if self.zoom != ZoomPreset::All {
            self.pan = self.pan.saturating_add(1);
        }
    }

    /// Avance vers la fin des données
    pub fn pan_forward(&mut self) {
        self.pan = self.pan.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Applique la fenêtre à des bornes complètes [min, max]
    ///
    /// La fenêtre ne sort jamais des bornes : un recul excessif s'arrête
    /// au début des données.
    pub fn apply(&self, full: [f64; 2]) -> [f64; 2] {
        let [min, max] = full;
        let Some(width) = self.zoom.days() else {
            return full;
        };
        if max - min <= width {
            return full;
        }

        let end = (max - f64::from(self.pan) * width / 2.0).max(min + width);
        [end - width, end]
    }

    pub fn label(&self) -> String {
        if self.pan == 0 {
            self.zoom.label().to_string()
        } else {
            format!("{} -{}", self.zoom.label(), self.pan)
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
