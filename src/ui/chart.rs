// ============================================================================
// Chart - Rendu des sections de la page
// ============================================================================
// Traduit le corps d'une section (tableau, graphique typé, panneaux, message)
// en widgets ratatui
//
// CONCEPTS RATATUI :
// 1. Chart widget : lignes et nuages de points (Dataset + Axis)
// 2. BarChart : barres groupées
// 3. Canvas : dessin libre (camembert en points Braille)
// 4. Table : aperçus tabulaires
// ============================================================================

use std::f64::consts::PI;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Axis, Bar, BarChart as BarChartWidget, BarGroup as BarGroupWidget, Block, Borders,
        Chart as ChartWidget, Dataset, GraphType, Paragraph, Row, Table,
    },
    Frame,
};

use crate::charts::{
    bounds, date_to_x, AxisSpec, BarChart, Chart, ChartColor, LineChart, PieChart, RangeWindow,
    ScatterChart, SeriesKind,
};
use crate::page::{Section, SectionBody, TablePreview};

/// Couleur terminal d'une couleur de graphique
fn to_color(color: ChartColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine une section dans la zone donnée
///
/// `empty_pie` : texte affiché quand le camembert n'a aucune part
pub fn render_section(frame: &mut Frame, area: Rect, section: &Section, window: &RangeWindow, empty_pie: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", section.heading));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &section.body {
        SectionBody::Table(table) => render_table(frame, inner, table),
        SectionBody::Chart(chart) => render_chart(frame, inner, chart, window, empty_pie),
        SectionBody::Panels(charts) => render_panels(frame, inner, charts, window, empty_pie),
        SectionBody::Placeholder(message) => render_no_data(frame, inner, message),
    }
}

fn render_chart(frame: &mut Frame, area: Rect, chart: &Chart, window: &RangeWindow, empty_pie: &str) {
    match chart {
        Chart::Line(line) => render_line_chart(frame, area, line, window),
        Chart::Bar(bar) => render_bar_chart(frame, area, bar, window),
        Chart::Scatter(scatter) => render_scatter_chart(frame, area, scatter),
        Chart::Pie(pie) => render_pie_chart(frame, area, pie, empty_pie),
    }
}

/// Panneaux empilés verticalement, même hauteur
fn render_panels(frame: &mut Frame, area: Rect, charts: &[Chart], window: &RangeWindow, empty_pie: &str) {
    if charts.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = charts
        .iter()
        .map(|_| Constraint::Ratio(1, charts.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (chart, chunk) in charts.iter().zip(chunks.iter()) {
        render_chart(frame, *chunk, chart, window, empty_pie);
    }
}

// ============================================================================
// Tableau
// ============================================================================

fn render_table(frame: &mut Frame, area: Rect, table: &TablePreview) {
    let header = Row::new(table.columns.clone()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = table.rows.iter().map(|cells| Row::new(cells.clone())).collect();

    let count = table.columns.len().max(1) as u32;
    let widths: Vec<Constraint> = table.columns.iter().map(|_| Constraint::Ratio(1, count)).collect();

    let widget = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(widget, area);
}

// ============================================================================
// Graphique en lignes
// ============================================================================

/// Bornes avec une marge de 5 % (intervalle nul élargi)
fn padded([min, max]: [f64; 2]) -> [f64; 2] {
    let margin = ((max - min) * 0.05).max(if max == min { 1.0 } else { 0.0 });
    [min - margin, max + margin]
}

/// Trois graduations : début, milieu, fin
fn axis_labels(axis: &AxisSpec, [min, max]: [f64; 2]) -> Vec<Span<'static>> {
    [min, (min + max) / 2.0, max]
        .iter()
        .map(|&x| Span::raw(axis.scale.format_tick(x)))
        .collect()
}

fn render_line_chart(frame: &mut Frame, area: Rect, chart: &LineChart, window: &RangeWindow) {
    let Some(full_x) = chart.x_bounds() else {
        render_no_data(frame, area, "-");
        return;
    };

    // La fenêtre de plage ne s'applique qu'aux graphiques qui la suivent
    let x_bounds = if chart.range_control {
        window.apply(full_x)
    } else {
        full_x
    };
    let visible = chart.windowed(x_bounds[0], x_bounds[1]);
    let y_bounds = padded(
        visible
            .y_bounds_within(x_bounds[0], x_bounds[1])
            .unwrap_or([0.0, 1.0]),
    );

    let datasets: Vec<Dataset> = visible
        .series
        .iter()
        .map(|series| {
            let (marker, graph_type, style) = match series.style.kind {
                SeriesKind::Line => (
                    symbols::Marker::Braille,
                    GraphType::Line,
                    Style::default().fg(to_color(series.style.color)),
                ),
                SeriesKind::Markers => (
                    symbols::Marker::Dot,
                    GraphType::Scatter,
                    Style::default().fg(to_color(series.style.color)),
                ),
                SeriesKind::Band => (
                    symbols::Marker::Braille,
                    GraphType::Line,
                    Style::default()
                        .fg(to_color(series.style.color))
                        .add_modifier(Modifier::DIM),
                ),
            };
            Dataset::default()
                .name(series.name.clone())
                .marker(marker)
                .graph_type(graph_type)
                .style(style)
                .data(&series.points)
        })
        .collect();

    let mut title = format!(" {} ", chart.title);
    if chart.range_control {
        title.push_str(&format!("[{}] ", window.label()));
    }

    let widget = ChartWidget::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .x_axis(
            Axis::default()
                .title(chart.x_axis.title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(axis_labels(&chart.x_axis, x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_axis.title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(axis_labels(&chart.y_axis, y_bounds)),
        );

    frame.render_widget(widget, area);
}

// ============================================================================
// Nuage de points
// ============================================================================

fn render_scatter_chart(frame: &mut Frame, area: Rect, chart: &ScatterChart) {
    let points = || chart.series.iter().flat_map(|s| s.points.iter());
    let (Some(x_bounds), Some(y_bounds)) = (
        bounds(points().map(|p| p.0)),
        bounds(points().map(|p| p.1)),
    ) else {
        render_no_data(frame, area, "-");
        return;
    };
    let (x_bounds, y_bounds) = (padded(x_bounds), padded(y_bounds));

    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .map(|series| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(to_color(series.color)))
                .data(&series.points)
        })
        .collect();

    let widget = ChartWidget::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", chart.title)),
        )
        .x_axis(
            Axis::default()
                .title(chart.x_axis.title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(axis_labels(&chart.x_axis, x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_axis.title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(axis_labels(&chart.y_axis, y_bounds)),
        );

    frame.render_widget(widget, area);
}

// ============================================================================
// Barres groupées
// ============================================================================
// CONCEPT : BarChart travaille en u64
// - Les prix sont convertis en centimes pour la hauteur des barres
// - Le texte affiché (text_value) garde la valeur réelle
// ============================================================================

const BAR_WIDTH: u16 = 3;
const BAR_GAP: u16 = 0;
const GROUP_GAP: u16 = 1;

fn render_bar_chart(frame: &mut Frame, area: Rect, chart: &BarChart, window: &RangeWindow) {
    let visible: Vec<_> = match chart.groups.first().zip(chart.groups.last()) {
        Some((first, last)) if chart.range_control => {
            let [min, max] = window.apply([date_to_x(first.date), date_to_x(last.date)]);
            chart
                .groups
                .iter()
                .filter(|g| {
                    let x = date_to_x(g.date);
                    x >= min && x <= max
                })
                .collect()
        }
        _ => chart.groups.iter().collect(),
    };

    // Nombre de groupes qui tiennent dans la largeur (les plus récents)
    let series_count = chart.series.len().max(1) as u16;
    let group_width = series_count * (BAR_WIDTH + BAR_GAP) + GROUP_GAP;
    let capacity = usize::from((area.width.saturating_sub(2) / group_width).max(1));
    let shown = &visible[visible.len().saturating_sub(capacity)..];

    let legend: Vec<Span> = chart
        .series
        .iter()
        .flat_map(|s| {
            [
                Span::styled("■ ", Style::default().fg(to_color(s.color))),
                Span::raw(format!("{}  ", s.name)),
            ]
        })
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    frame.render_widget(Paragraph::new(Line::from(legend)), chunks[0]);

    let mut widget = BarChartWidget::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} [{}] ", chart.title, window.label())),
        )
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .group_gap(GROUP_GAP);

    for group in shown {
        let bars: Vec<Bar> = group
            .values
            .iter()
            .zip(&chart.series)
            .map(|(value, series)| {
                let value = value.unwrap_or(0.0).max(0.0);
                Bar::default()
                    .value((value * 100.0).round() as u64)
                    .text_value(format!("{:.0}", value))
                    .style(Style::default().fg(to_color(series.color)))
            })
            .collect();

        widget = widget.data(
            BarGroupWidget::default()
                .label(Line::from(group.date.format("%m-%d").to_string()))
                .bars(&bars),
        );
    }

    frame.render_widget(widget, chunks[1]);
}

// ============================================================================
// Camembert
// ============================================================================
// CONCEPT RATATUI : Canvas
// - Dessin libre en coordonnées réelles
// - Chaque part est un nuage de points dans un secteur angulaire
// ============================================================================

/// Points d'un disque de rayon 1, répartis par secteur
fn pie_points(values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let total: f64 = values.iter().sum();
    let mut sectors = vec![Vec::new(); values.len()];
    if total <= 0.0 {
        return sectors;
    }

    // Angles cumulés (sens horaire depuis midi)
    let mut limits = Vec::with_capacity(values.len());
    let mut acc = 0.0;
    for value in values {
        acc += value / total * 2.0 * PI;
        limits.push(acc);
    }

    const STEPS: usize = 60;
    for i in 0..=STEPS {
        for j in 0..=STEPS {
            let x = -1.0 + 2.0 * i as f64 / STEPS as f64;
            let y = -1.0 + 2.0 * j as f64 / STEPS as f64;
            if x * x + y * y > 1.0 {
                continue;
            }
            let mut angle = x.atan2(y);
            if angle < 0.0 {
                angle += 2.0 * PI;
            }
            let sector = limits.iter().position(|&l| angle <= l).unwrap_or(values.len() - 1);
            sectors[sector].push((x, y));
        }
    }

    sectors
}

fn render_pie_chart(frame: &mut Frame, area: Rect, chart: &PieChart, empty_pie: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", chart.title));

    // État neutre : aucune journée de hausse ni de baisse
    if chart.slices.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(empty_pie.to_string(), Style::default().fg(Color::Gray))),
        ])
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    let values: Vec<f64> = chart.slices.iter().map(|s| s.value).collect();
    let sectors = pie_points(&values);
    let colors: Vec<Color> = chart.slices.iter().map(|s| to_color(s.color)).collect();

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([-1.1, 1.1])
        .y_bounds([-1.1, 1.1])
        .paint(|ctx| {
            for (coords, color) in sectors.iter().zip(&colors) {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
            }
        });
    frame.render_widget(canvas, chunks[0]);

    let legend: Vec<Line> = chart
        .slices
        .iter()
        .map(|slice| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(to_color(slice.color))),
                Span::raw(format!("{}: {:.1}%", slice.label, slice.value * 100.0)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend), chunks[1]);
}

// ============================================================================
// Helper : Message quand pas de données
// ============================================================================

/// Affiche un message quand il n'y a pas de données à afficher
pub fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("⚠ {}", message),
            Style::default().fg(Color::Red),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::charts::{AxisScale, LineSeries, PieSlice};
    use crate::page::SectionKind;

    #[test]
    fn test_pie_points_split_by_proportion() {
        let sectors = pie_points(&[0.75, 0.25]);
        assert_eq!(sectors.len(), 2);
        let (a, b) = (sectors[0].len() as f64, sectors[1].len() as f64);
        let share = a / (a + b);
        assert!((share - 0.75).abs() < 0.03, "share {}", share);
    }

    #[test]
    fn test_pie_points_zero_total() {
        let sectors = pie_points(&[0.0, 0.0]);
        assert!(sectors.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_padded_bounds() {
        assert_eq!(padded([0.0, 100.0]), [-5.0, 105.0]);
        assert_eq!(padded([3.0, 3.0]), [2.0, 4.0]);
    }

    fn render(section: &Section) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                render_section(frame, frame.size(), section, &RangeWindow::default(), "neutral");
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_placeholder() {
        let screen = render(&Section {
            kind: SectionKind::RawData,
            heading: "Display raw data".to_string(),
            body: SectionBody::Placeholder("No data".to_string()),
        });
        assert!(screen.contains("Display raw data"));
        assert!(screen.contains("No data"));
    }

    #[test]
    fn test_render_neutral_pie() {
        let screen = render(&Section {
            kind: SectionKind::ChangeProportion,
            heading: "Proportion".to_string(),
            body: SectionBody::Chart(Chart::Pie(PieChart {
                title: "Pie".to_string(),
                slices: vec![],
            })),
        });
        assert!(screen.contains("neutral"));
    }

    #[test]
    fn test_render_pie_legend() {
        let screen = render(&Section {
            kind: SectionKind::ChangeProportion,
            heading: "Proportion".to_string(),
            body: SectionBody::Chart(Chart::Pie(PieChart {
                title: "Pie".to_string(),
                slices: vec![
                    PieSlice {
                        label: "Up".to_string(),
                        value: 0.6,
                        color: ChartColor::Green,
                    },
                    PieSlice {
                        label: "Down".to_string(),
                        value: 0.4,
                        color: ChartColor::Red,
                    },
                ],
            })),
        });
        assert!(screen.contains("Up: 60.0%"));
    }

    #[test]
    fn test_render_line_chart() {
        let screen = render(&Section {
            kind: SectionKind::RawChart,
            heading: "Raw".to_string(),
            body: SectionBody::Chart(Chart::Line(LineChart {
                title: "Series".to_string(),
                x_axis: AxisSpec::new("Date", AxisScale::Date),
                y_axis: AxisSpec::new("Price", AxisScale::Linear),
                series: vec![LineSeries::new(
                    "close",
                    vec![(738000.0, 1.0), (738010.0, 2.0)],
                    ChartColor::Firebrick,
                    SeriesKind::Line,
                )],
                range_control: true,
            })),
        });
        assert!(screen.contains("Series [All]"));
    }
}
