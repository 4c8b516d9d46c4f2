// ============================================================================
// Module : pipeline
// ============================================================================
// Un passage complet : entrées → chargement → prévision → arbre de rendu
//
// - build_page : fonction pure, construit la Page à partir du résultat du
//   chargement (aucun accès réseau, résultat déterministe)
// - run : effectue le chargement puis appelle build_page
//
// Rendu des échecs :
// - Input : message d'erreur seul, aucune section
// - DataUnavailable / TransientNetwork : les huit sections en "pas de données"
// - Fit : sections brutes (1, 2, 6) affichées, sections de prévision vides
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::api::DataLoader;
use crate::charts::{
    date_to_x, AxisScale, AxisSpec, BarChart, BarGroup, BarSeries, Chart, ChartColor, LineChart,
    LineSeries, PieChart, PieSlice, ScatterChart, ScatterSeries, SeriesKind,
};
use crate::error::DashboardError;
use crate::forecast::Forecaster;
use crate::i18n::{Locale, Strings};
use crate::models::{
    DateRange, ForecastFrame, Horizon, PriceChangeStats, PriceSeries, SeasonalityKind,
    TrainingFrame,
};
use crate::page::{Message, Page, PageInputs, Section, SectionBody, SectionKind, TablePreview};

/// Nombre de lignes des aperçus "tail"
pub const TAIL_ROWS: usize = 5;

// ============================================================================
// Passage asynchrone
// ============================================================================

/// Charge l'historique puis construit la page
///
/// Les entrées invalides (ticker, années) sont rejetées avant tout appel
/// au fournisseur.
#[instrument(skip(loader, forecaster, locale), fields(ticker = %inputs.ticker, years = inputs.years))]
pub async fn run(
    loader: &DataLoader,
    forecaster: &dyn Forecaster,
    inputs: &PageInputs,
    range: DateRange,
    locale: Locale,
) -> Page {
    let loaded = match Horizon::from_years(inputs.years) {
        Ok(_) => loader.load(&inputs.ticker, range).await,
        Err(err) => Err(err),
    };

    build_page(inputs, loaded, forecaster, locale)
}

// ============================================================================
// Construction de la page (pure)
// ============================================================================

/// Construit l'arbre de rendu d'un passage
pub fn build_page(
    inputs: &PageInputs,
    loaded: Result<Arc<PriceSeries>, DashboardError>,
    forecaster: &dyn Forecaster,
    locale: Locale,
) -> Page {
    let s = locale.strings();
    let mut page = Page {
        title: s.title.to_string(),
        inputs: inputs.clone(),
        horizon_days: 0,
        error: None,
        messages: Vec::new(),
        sections: Vec::new(),
    };

    let horizon = match Horizon::from_years(inputs.years) {
        Ok(horizon) => horizon,
        Err(err) => return fail_input(page, s, &err),
    };
    page.horizon_days = horizon.days();

    let series = match loaded {
        Ok(series) if series.is_empty() => {
            let err = DashboardError::DataUnavailable {
                ticker: series.ticker.clone(),
            };
            return fail_without_data(page, s, &err);
        }
        Ok(series) => series,
        Err(err @ DashboardError::Input(_)) => return fail_input(page, s, &err),
        Err(err) => return fail_without_data(page, s, &err),
    };

    page.messages.push(Message::success(s.loading_success));

    let frame = TrainingFrame::from_series(&series);
    let forecast = forecaster.forecast(&frame, horizon);

    let mut sections = vec![
        raw_data_section(s, &series),
        raw_chart_section(s, &series),
    ];

    match &forecast {
        Ok(forecast) => {
            info!(
                ticker = %series.ticker,
                history = forecast.history_len,
                rows = forecast.len(),
                "Forecast ready"
            );
            sections.push(forecast_data_section(s, forecast));
            sections.push(forecast_chart_section(s, inputs.years, &frame, forecast));
            sections.push(components_section(s, forecast));
            sections.push(proportion_section(s, &series));
            sections.push(bar_section(s, &frame, forecast));
            sections.push(scatter_section(s, &frame, forecast));
        }
        Err(err) => {
            warn!(ticker = %series.ticker, error = %err, "Forecast failed");
            let err = DashboardError::from(err.clone());
            let reason = format!("{}: {}", s.forecast_unavailable, err);
            page.error = Some(err.kind());
            page.messages.push(Message::error(reason.clone()));

            sections.push(placeholder(s, SectionKind::ForecastData, &reason));
            sections.push(placeholder(s, SectionKind::ForecastChart, &reason));
            sections.push(placeholder(s, SectionKind::Components, &reason));
            sections.push(proportion_section(s, &series));
            sections.push(placeholder(s, SectionKind::BarComparison, &reason));
            sections.push(placeholder(s, SectionKind::ScatterComparison, &reason));
        }
    }

    page.sections = sections;
    page
}

/// Entrée invalide : message seul
fn fail_input(mut page: Page, s: &Strings, err: &DashboardError) -> Page {
    warn!(error = %err, "Invalid input, nothing loaded");
    page.error = Some(err.kind());
    page.messages.push(Message::error(format!("{}: {}", s.invalid_input, err)));
    page
}

/// Pas de données : toutes les sections deviennent des emplacements vides
fn fail_without_data(mut page: Page, s: &Strings, err: &DashboardError) -> Page {
    warn!(error = %err, "No data to render");
    let reason = match err {
        // Réponse refusée ou illisible : le réseau n'est pas en cause
        DashboardError::TransientNetwork(cause) if !cause.is_transient() => s.provider_error,
        DashboardError::TransientNetwork(_) => s.network_error,
        _ => s.no_data,
    };

    page.error = Some(err.kind());
    page.messages.push(Message::error(s.loading_failed));
    page.messages.push(Message::error(format!("{}: {}", reason, err)));
    page.sections = SectionKind::ALL
        .iter()
        .map(|&kind| placeholder(s, kind, reason))
        .collect();
    page
}

fn placeholder(s: &Strings, kind: SectionKind, reason: &str) -> Section {
    Section {
        kind,
        heading: heading(s, kind),
        body: SectionBody::Placeholder(reason.to_string()),
    }
}

/// En-tête générique d'une section
fn heading(s: &Strings, kind: SectionKind) -> String {
    match kind {
        SectionKind::RawData => s.raw_data,
        SectionKind::RawChart => s.raw_chart,
        SectionKind::ForecastData => s.forecast_data,
        SectionKind::ForecastChart => s.forecast_plot,
        SectionKind::Components => s.components,
        SectionKind::ChangeProportion => s.change_proportion,
        SectionKind::BarComparison => s.bar_comparison,
        SectionKind::ScatterComparison => s.scatter_comparison,
    }
    .to_string()
}

// ============================================================================
// Sections
// ============================================================================

fn raw_data_section(s: &Strings, series: &PriceSeries) -> Section {
    let columns = ["Date", "Open", "High", "Low", "Close", "Volume"]
        .iter()
        .map(|c| c.to_string())
        .collect();

    let rows = series
        .tail(TAIL_ROWS)
        .iter()
        .map(|bar| {
            vec![
                bar.date.to_string(),
                format!("{:.2}", bar.open),
                format!("{:.2}", bar.high),
                format!("{:.2}", bar.low),
                format!("{:.2}", bar.close),
                bar.volume.to_string(),
            ]
        })
        .collect();

    Section {
        kind: SectionKind::RawData,
        heading: format!("{} \"{}\"", s.raw_data, series.ticker),
        body: SectionBody::Table(TablePreview { columns, rows }),
    }
}

fn raw_chart_section(s: &Strings, series: &PriceSeries) -> Section {
    let opens = series.bars.iter().map(|b| (date_to_x(b.date), b.open)).collect();
    let closes = series.bars.iter().map(|b| (date_to_x(b.date), b.close)).collect();

    let chart = LineChart {
        title: s.time_series_title.to_string(),
        x_axis: AxisSpec::new(s.date, AxisScale::Date),
        y_axis: AxisSpec::new(s.price, AxisScale::Linear),
        series: vec![
            LineSeries::new(s.opening_price, opens, ChartColor::RoyalBlue, SeriesKind::Line),
            LineSeries::new(s.closing_price, closes, ChartColor::Firebrick, SeriesKind::Line),
        ],
        range_control: true,
    };

    Section {
        kind: SectionKind::RawChart,
        heading: heading(s, SectionKind::RawChart),
        body: SectionBody::Chart(Chart::Line(chart)),
    }
}

fn forecast_data_section(s: &Strings, forecast: &ForecastFrame) -> Section {
    let weekly = forecast.has(SeasonalityKind::Weekly);
    let yearly = forecast.has(SeasonalityKind::Yearly);

    let mut columns = vec!["ds", "trend", "yhat_lower", "yhat_upper"];
    if weekly {
        columns.push("weekly");
    }
    if yearly {
        columns.push("yearly");
    }
    columns.push("yhat");

    let rows = forecast
        .tail(TAIL_ROWS)
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.ds.to_string(),
                format!("{:.4}", row.trend),
                format!("{:.4}", row.yhat_lower),
                format!("{:.4}", row.yhat_upper),
            ];
            if weekly {
                cells.push(format!("{:.4}", row.weekly.unwrap_or(0.0)));
            }
            if yearly {
                cells.push(format!("{:.4}", row.yearly.unwrap_or(0.0)));
            }
            cells.push(format!("{:.4}", row.yhat));
            cells
        })
        .collect();

    Section {
        kind: SectionKind::ForecastData,
        heading: heading(s, SectionKind::ForecastData),
        body: SectionBody::Table(TablePreview {
            columns: columns.into_iter().map(String::from).collect(),
            rows,
        }),
    }
}

fn forecast_chart_section(
    s: &Strings,
    years: u8,
    frame: &TrainingFrame,
    forecast: &ForecastFrame,
) -> Section {
    let actual = frame.points().iter().map(|p| (date_to_x(p.ds), p.y)).collect();
    let column = |f: fn(&crate::models::ForecastRow) -> f64| -> Vec<(f64, f64)> {
        forecast.rows.iter().map(|r| (date_to_x(r.ds), f(r))).collect()
    };

    let chart = LineChart {
        title: format!("{} {} {}", s.forecast_plot, years, s.years_unit),
        x_axis: AxisSpec::new(s.date, AxisScale::Date),
        y_axis: AxisSpec::new(s.price, AxisScale::Linear),
        series: vec![
            LineSeries::new(s.lower_bound, column(|r| r.yhat_lower), ChartColor::LightBlue, SeriesKind::Band),
            LineSeries::new(s.upper_bound, column(|r| r.yhat_upper), ChartColor::LightBlue, SeriesKind::Band),
            LineSeries::new(s.forecast, column(|r| r.yhat), ChartColor::Orange, SeriesKind::Line),
            LineSeries::new(s.actual, actual, ChartColor::Gray, SeriesKind::Markers),
        ],
        range_control: true,
    };

    Section {
        kind: SectionKind::ForecastChart,
        heading: format!("{} {} {}", s.forecast_plot, years, s.years_unit),
        body: SectionBody::Chart(Chart::Line(chart)),
    }
}

fn components_section(s: &Strings, forecast: &ForecastFrame) -> Section {
    let mut panels = vec![Chart::Line(LineChart {
        title: s.trend.to_string(),
        x_axis: AxisSpec::new("ds", AxisScale::Date),
        y_axis: AxisSpec::new(s.trend, AxisScale::Linear),
        series: vec![LineSeries::new(
            s.trend,
            forecast.rows.iter().map(|r| (date_to_x(r.ds), r.trend)).collect(),
            ChartColor::SteelBlue,
            SeriesKind::Line,
        )],
        range_control: false,
    })];

    for profile in &forecast.profiles {
        let (title, axis) = match profile.kind {
            SeasonalityKind::Weekly => (s.weekly, AxisSpec::new(s.day_of_week, AxisScale::Weekday)),
            SeasonalityKind::Yearly => (s.yearly, AxisSpec::new(s.day_of_year, AxisScale::DayOfYear)),
        };
        panels.push(Chart::Line(LineChart {
            title: title.to_string(),
            x_axis: axis,
            y_axis: AxisSpec::new(title, AxisScale::Linear),
            series: vec![LineSeries::new(
                title,
                profile.points.clone(),
                ChartColor::SteelBlue,
                SeriesKind::Line,
            )],
            range_control: false,
        }));
    }

    Section {
        kind: SectionKind::Components,
        heading: heading(s, SectionKind::Components),
        body: SectionBody::Panels(panels),
    }
}

fn proportion_section(s: &Strings, series: &PriceSeries) -> Section {
    let stats = PriceChangeStats::from_series(series);

    let slices = match stats.proportions() {
        Some((increase, decrease)) => vec![
            PieSlice {
                label: s.price_increase.to_string(),
                value: increase,
                color: ChartColor::Green,
            },
            PieSlice {
                label: s.price_decrease.to_string(),
                value: decrease,
                color: ChartColor::Red,
            },
        ],
        None => Vec::new(),
    };

    Section {
        kind: SectionKind::ChangeProportion,
        heading: heading(s, SectionKind::ChangeProportion),
        body: SectionBody::Chart(Chart::Pie(PieChart {
            title: s.change_proportion.to_string(),
            slices,
        })),
    }
}

/// Barres groupées sur l'union des dates (réel et prévision)
///
/// Le réel vient de la table d'entraînement : même clôture que le nuage de
/// points pour une date dupliquée (première barre conservée).
fn bar_section(s: &Strings, frame: &TrainingFrame, forecast: &ForecastFrame) -> Section {
    let mut by_date: BTreeMap<NaiveDate, [Option<f64>; 2]> = BTreeMap::new();
    for point in frame.points() {
        by_date.entry(point.ds).or_default()[0] = Some(point.y);
    }
    for row in &forecast.rows {
        by_date.entry(row.ds).or_default()[1] = Some(row.yhat);
    }

    let groups = by_date
        .into_iter()
        .map(|(date, values)| BarGroup {
            date,
            values: values.to_vec(),
        })
        .collect();

    Section {
        kind: SectionKind::BarComparison,
        heading: heading(s, SectionKind::BarComparison),
        body: SectionBody::Chart(Chart::Bar(BarChart {
            title: s.actual_vs_forecasted.to_string(),
            series: vec![
                BarSeries {
                    name: s.actual_closing_price.to_string(),
                    color: ChartColor::RoyalBlue,
                },
                BarSeries {
                    name: s.forecasted_closing_price.to_string(),
                    color: ChartColor::Orange,
                },
            ],
            groups,
            range_control: true,
        })),
    }
}

/// Nuage (clôture réelle, yhat), jointure sur la date
fn scatter_section(s: &Strings, frame: &TrainingFrame, forecast: &ForecastFrame) -> Section {
    let points = forecast
        .history()
        .iter()
        .filter_map(|row| frame.value_at(row.ds).map(|close| (close, row.yhat)))
        .collect();

    Section {
        kind: SectionKind::ScatterComparison,
        heading: heading(s, SectionKind::ScatterComparison),
        body: SectionBody::Chart(Chart::Scatter(ScatterChart {
            title: s.actual_vs_forecasted.to_string(),
            x_axis: AxisSpec::new(s.actual_closing_price, AxisScale::Linear),
            y_axis: AxisSpec::new(s.forecasted_closing_price, AxisScale::Linear),
            series: vec![ScatterSeries {
                name: s.actual_vs_forecasted.to_string(),
                points,
                color: ChartColor::Green,
            }],
        })),
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::api::ProviderError;
    use crate::forecast::{AdditiveModel, FitError};
    use crate::models::{ForecastRow, PriceBar};

    /// Modèle qui échoue toujours
    struct FailingModel;

    impl Forecaster for FailingModel {
        fn forecast(&self, _frame: &TrainingFrame, _horizon: Horizon) -> Result<ForecastFrame, FitError> {
            Err(FitError::Degenerate("singular".to_string()))
        }
    }

    /// Modèle trivial : yhat = dernière valeur observée
    struct LastValueModel;

    impl Forecaster for LastValueModel {
        fn forecast(&self, frame: &TrainingFrame, horizon: Horizon) -> Result<ForecastFrame, FitError> {
            let last = frame.points().last().ok_or(FitError::InsufficientData {
                required: 1,
                actual: 0,
            })?;
            let row = |ds: NaiveDate| ForecastRow {
                ds,
                trend: last.y,
                yhat_lower: last.y,
                yhat_upper: last.y,
                weekly: None,
                yearly: None,
                yhat: last.y,
            };
            let mut rows: Vec<ForecastRow> = frame.points().iter().map(|p| row(p.ds)).collect();
            rows.extend((1..=i64::from(horizon.days())).map(|i| row(last.ds + Duration::days(i))));
            Ok(ForecastFrame {
                rows,
                history_len: frame.len(),
                seasonalities: vec![],
                profiles: vec![],
            })
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn inputs(ticker: &str, years: u8) -> PageInputs {
        PageInputs {
            ticker: ticker.to_string(),
            years,
        }
    }

    fn series(n: i64) -> Arc<PriceSeries> {
        let start = day(2024, 1, 1);
        let range = DateRange::new(start, start + Duration::days(n));
        let bars = (0..n)
            .map(|i| {
                let open = 100.0 + i as f64;
                // Alterne hausse / baisse / stable
                let close = match i % 3 {
                    0 => open + 1.0,
                    1 => open - 1.0,
                    _ => open,
                };
                PriceBar::new(start + Duration::days(i), open, open + 2.0, open - 2.0, close, 1000)
            })
            .collect();
        Arc::new(PriceSeries::from_bars("AAPL", range, bars))
    }

    #[test]
    fn test_full_page() {
        let page = build_page(&inputs("AAPL", 1), Ok(series(30)), &LastValueModel, Locale::En);

        assert!(page.is_ok());
        assert_eq!(page.horizon_days, 365);
        assert_eq!(page.sections.len(), 8);
        let kinds: Vec<SectionKind> = page.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
        assert!(page.sections.iter().all(|s| !s.is_placeholder()));
        assert_eq!(page.messages[0].text, "Loading Data... Success!");

        let Some(SectionBody::Table(raw)) = page.section(SectionKind::RawData).map(|s| &s.body) else {
            panic!("raw data must be a table");
        };
        assert_eq!(raw.rows.len(), TAIL_ROWS);
        assert_eq!(raw.columns, vec!["Date", "Open", "High", "Low", "Close", "Volume"]);
        assert_eq!(raw.rows[4][0], "2024-01-30");

        let Some(SectionBody::Table(fc)) = page.section(SectionKind::ForecastData).map(|s| &s.body) else {
            panic!("forecast data must be a table");
        };
        assert_eq!(fc.columns, vec!["ds", "trend", "yhat_lower", "yhat_upper", "yhat"]);
    }

    #[test]
    fn test_raw_chart_colors_and_range_control() {
        let page = build_page(&inputs("AAPL", 1), Ok(series(10)), &LastValueModel, Locale::En);
        let Some(SectionBody::Chart(Chart::Line(chart))) = page.section(SectionKind::RawChart).map(|s| &s.body) else {
            panic!("raw chart must be a line chart");
        };

        assert!(chart.range_control);
        assert_eq!(chart.series[0].name, "Opening Price");
        assert_eq!(chart.series[0].style.color, ChartColor::RoyalBlue);
        assert_eq!(chart.series[1].style.color, ChartColor::Firebrick);
        assert_eq!(chart.series[1].points.len(), 10);
    }

    #[test]
    fn test_pie_proportions_sum_to_one() {
        let page = build_page(&inputs("AAPL", 1), Ok(series(30)), &LastValueModel, Locale::En);
        let Some(SectionBody::Chart(Chart::Pie(pie))) = page.section(SectionKind::ChangeProportion).map(|s| &s.body) else {
            panic!("proportion must be a pie");
        };

        // 10 hausses, 10 baisses, 10 journées stables exclues
        assert_eq!(pie.slices.len(), 2);
        assert!((pie.slices[0].value - 0.5).abs() < 1e-12);
        let total: f64 = pie.slices.iter().map(|s| s.value).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bar_union_and_scatter_join() {
        let page = build_page(&inputs("AAPL", 1), Ok(series(20)), &LastValueModel, Locale::En);

        let Some(SectionBody::Chart(Chart::Bar(bar))) = page.section(SectionKind::BarComparison).map(|s| &s.body) else {
            panic!("comparison must be a bar chart");
        };
        assert_eq!(bar.groups.len(), 20 + 365);
        assert!(bar.groups[0].values.iter().all(Option::is_some));
        assert_eq!(bar.groups.last().unwrap().values[0], None);

        let Some(SectionBody::Chart(Chart::Scatter(scatter))) = page.section(SectionKind::ScatterComparison).map(|s| &s.body) else {
            panic!("comparison must be a scatter chart");
        };
        assert_eq!(scatter.series[0].points.len(), 20);
        assert_eq!(scatter.series[0].points[0].0, 101.0);
    }

    #[test]
    fn test_invalid_years_is_input_error() {
        let page = build_page(&inputs("AAPL", 9), Ok(series(5)), &LastValueModel, Locale::En);
        assert_eq!(page.error, Some(crate::error::ErrorKind::Input));
        assert!(page.sections.is_empty());
        assert_eq!(page.horizon_days, 0);
    }

    #[test]
    fn test_input_error_has_no_sections() {
        let err = DashboardError::Input("ticker symbol is empty".to_string());
        let page = build_page(&inputs("", 1), Err(err), &LastValueModel, Locale::En);

        assert_eq!(page.error, Some(crate::error::ErrorKind::Input));
        assert!(page.sections.is_empty());
        assert_eq!(page.messages.len(), 1);
    }

    #[test]
    fn test_empty_series_gives_placeholders() {
        let empty = Arc::new(PriceSeries::empty(
            "ZZZZINVALID",
            DateRange::new(day(2015, 1, 1), day(2024, 1, 1)),
        ));
        let page = build_page(&inputs("ZZZZINVALID", 1), Ok(empty), &LastValueModel, Locale::En);

        assert_eq!(page.error, Some(crate::error::ErrorKind::DataUnavailable));
        assert_eq!(page.sections.len(), 8);
        assert!(page.sections.iter().all(Section::is_placeholder));
    }

    #[test]
    fn test_network_error_gives_placeholders() {
        let err = DashboardError::from(Arc::new(ProviderError::Timeout));
        let page = build_page(&inputs("AAPL", 2), Err(err), &LastValueModel, Locale::Fr);

        assert_eq!(page.error, Some(crate::error::ErrorKind::TransientNetwork));
        assert!(page.sections.iter().all(Section::is_placeholder));
        assert_eq!(
            page.sections[0].body,
            SectionBody::Placeholder("Erreur réseau, réessayez plus tard".to_string())
        );
    }

    #[test]
    fn test_unreadable_response_is_not_a_network_error() {
        let err = DashboardError::from(Arc::new(ProviderError::Decode("expected value".to_string())));
        let page = build_page(&inputs("AAPL", 1), Err(err), &LastValueModel, Locale::En);

        assert_eq!(page.error, Some(crate::error::ErrorKind::TransientNetwork));
        assert!(page.sections.iter().all(Section::is_placeholder));
        assert_eq!(
            page.sections[0].body,
            SectionBody::Placeholder("Unexpected response from the data provider".to_string())
        );
    }

    #[test]
    fn test_duplicate_date_bar_and_scatter_agree() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 2, 1));
        let series = Arc::new(PriceSeries::from_bars(
            "AAPL",
            range,
            vec![
                PriceBar::new(day(2024, 1, 2), 100.0, 101.0, 99.0, 100.0, 10),
                PriceBar::new(day(2024, 1, 3), 100.0, 102.0, 99.0, 101.0, 10),
                PriceBar::new(day(2024, 1, 3), 100.0, 120.0, 99.0, 119.0, 10),
            ],
        ));
        let page = build_page(&inputs("AAPL", 1), Ok(series), &LastValueModel, Locale::En);

        let Some(SectionBody::Chart(Chart::Bar(bar))) = page.section(SectionKind::BarComparison).map(|s| &s.body) else {
            panic!("comparison must be a bar chart");
        };
        let group = bar.groups.iter().find(|g| g.date == day(2024, 1, 3)).unwrap();
        assert_eq!(group.values[0], Some(101.0));

        let Some(SectionBody::Chart(Chart::Scatter(scatter))) = page.section(SectionKind::ScatterComparison).map(|s| &s.body) else {
            panic!("comparison must be a scatter chart");
        };
        assert_eq!(scatter.series[0].points[1].0, 101.0);
    }

    #[test]
    fn test_fit_error_keeps_raw_sections() {
        let page = build_page(&inputs("AAPL", 1), Ok(series(10)), &FailingModel, Locale::En);

        assert_eq!(page.error, Some(crate::error::ErrorKind::Fit));
        assert_eq!(page.sections.len(), 8);
        for section in &page.sections {
            assert_eq!(section.is_placeholder(), section.kind.needs_forecast(), "{:?}", section.kind);
        }
    }

    #[test]
    fn test_additive_model_page_length() {
        let page = build_page(&inputs("AAPL", 1), Ok(series(60)), &AdditiveModel::default(), Locale::En);
        let Some(SectionBody::Chart(Chart::Line(chart))) = page.section(SectionKind::ForecastChart).map(|s| &s.body) else {
            panic!("forecast must be a line chart");
        };
        let yhat = chart.series.iter().find(|s| s.name == "Forecast").unwrap();
        assert_eq!(yhat.points.len(), 60 + 365);
        assert_eq!(yhat.style.color, ChartColor::Orange);
    }
}
