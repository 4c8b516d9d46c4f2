// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// ┌──────────────────── titre ─────────────────────┐
// ├─ barre latérale ─┬─ onglets des sections ──────┤
// │ ticker           │                             │
// │ années (jauge)   │  section sélectionnée       │
// │ statut           │                             │
// ├──────────────────┴─────────────────────────────┤
// │ raccourcis clavier / ligne de saisie           │
// └────────────────────────────────────────────────┘
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, Tabs, Gauge)
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, LoadState};
use crate::i18n::Strings;
use crate::models::MAX_YEARS;
use crate::page::{MessageLevel, Page};
use crate::ui::chart;

/// Largeur de la barre latérale
const SIDEBAR_WIDTH: u16 = 32;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let s = app.locale.strings();
    let chunks = create_layout(frame.size());

    render_header(frame, s, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);

    render_sidebar(frame, app, s, body[0]);
    render_main_content(frame, app, s, body[1]);

    if app.is_in_input_mode() {
        render_input_footer(frame, app, s, chunks[2]);
    } else {
        render_footer(frame, app, chunks[2]);
    }
}

// ============================================================================
// Layout : Découpage de l'écran
// ============================================================================

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

/// Dessine le header avec le titre
fn render_header(frame: &mut Frame, s: &Strings, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        s.title,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )))
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Barre latérale : entrées et statut
// ============================================================================

fn render_sidebar(frame: &mut Frame, app: &App, s: &Strings, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Ticker
            Constraint::Length(3), // Années
            Constraint::Min(0),    // Statut
        ])
        .split(area);

    // Ticker
    let ticker_style = if app.is_in_input_mode() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let ticker = if app.is_in_input_mode() {
        Line::from(vec![
            Span::styled(app.input_buffer.clone(), Style::default().fg(Color::White)),
            Span::styled(
                "█",
                Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
            ),
        ])
    } else {
        Line::from(Span::styled(
            app.ticker.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    };
    let ticker_box = Paragraph::new(vec![Line::from(s.ticker_prompt), ticker]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ticker_style)
            .title(format!(" {} ", s.sidebar_header)),
    );
    frame.render_widget(ticker_box, chunks[0]);

    // Années de prévision
    // CONCEPT RATATUI : Gauge
    // - ratio() dans [0, 1]
    // - label() remplace le pourcentage par défaut
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", s.years_label)),
        )
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(f64::from(app.years) / f64::from(MAX_YEARS))
        .label(format!("{} / {}", app.years, MAX_YEARS));
    frame.render_widget(gauge, chunks[1]);

    // Statut du dernier passage
    let mut lines = match app.load_state {
        LoadState::Idle => vec![],
        LoadState::Loading => vec![Line::from(Span::styled(s.loading, Style::default().fg(Color::Yellow)))],
        LoadState::Loaded | LoadState::Failed => app
            .page
            .as_ref()
            .map(status_lines)
            .unwrap_or_default(),
    };
    if let Some(page) = &app.page {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} +{}d", page.inputs.ticker, page.horizon_days),
            Style::default().fg(Color::Gray),
        )));
    }

    let status = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Status "),
        );
    frame.render_widget(status, chunks[2]);
}

/// Messages de la page, colorés par niveau
fn status_lines(page: &Page) -> Vec<Line<'static>> {
    page.messages
        .iter()
        .map(|message| {
            let color = match message.level {
                MessageLevel::Success => Color::Green,
                MessageLevel::Error => Color::Red,
            };
            Line::from(Span::styled(message.text.clone(), Style::default().fg(color)))
        })
        .collect()
}

// ============================================================================
// Contenu : onglets + section sélectionnée
// ============================================================================

fn render_main_content(frame: &mut Frame, app: &App, s: &Strings, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    // CONCEPT RATATUI : Tabs
    // - select() met en évidence l'onglet actif
    let tabs = Tabs::new(s.tabs.to_vec())
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
        .select(app.selected_section)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        );
    frame.render_widget(tabs, chunks[0]);

    let content = chunks[1];
    match (app.load_state, &app.page) {
        (LoadState::Loading, _) => render_message(frame, content, s.loading, Color::Yellow),
        (_, None) => render_message(frame, content, s.ticker_prompt, Color::Gray),
        (_, Some(page)) => match page.section(app.selected_section_kind()) {
            Some(section) => {
                chart::render_section(frame, content, section, &app.range, s.no_price_change)
            }
            // Entrée invalide : la page n'a aucune section
            None => {
                let text = page
                    .messages
                    .last()
                    .map(|m| m.text.as_str())
                    .unwrap_or(s.no_data);
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red));
                let inner = block.inner(content);
                frame.render_widget(block, content);
                chart::render_no_data(frame, inner, text);
            }
        },
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(color))),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Press ", key_style(Color::Yellow)),
            Span::styled(
                "[q]",
                key_style(Color::Red).add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(" again to quit, any other key to cancel ⚠", key_style(Color::Yellow)),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style(Color::Yellow)),
            Span::raw(" Quit  "),
            Span::styled("[t /]", key_style(Color::Green)),
            Span::raw(" Ticker  "),
            Span::styled("[+ - 1-4]", key_style(Color::Yellow)),
            Span::raw(" Years  "),
            Span::styled("[Tab ← →]", key_style(Color::Yellow)),
            Span::raw(" Section  "),
            Span::styled("[[ ]]", key_style(Color::Yellow)),
            Span::raw(" Zoom  "),
            Span::styled("[h l]", key_style(Color::Yellow)),
            Span::raw(" Pan  "),
            Span::styled("[0]", key_style(Color::Yellow)),
            Span::raw(" Reset"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le footer en mode input
fn render_input_footer(frame: &mut Frame, app: &App, s: &Strings, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green)); // Vert pour indiquer mode input

    let input_line = Line::from(vec![
        Span::styled(
            format!("{} ", s.ticker_prompt),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.input_buffer.clone(), Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled("[Enter]", key_style(Color::Green)),
        Span::raw(" Confirm  "),
        Span::styled("[ESC]", key_style(Color::Red)),
        Span::raw(" Cancel"),
    ]);

    let paragraph = Paragraph::new(vec![input_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::error::ErrorKind;
    use crate::i18n::Locale;
    use crate::page::{Message, PageInputs};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_idle_screen_shows_prompt() {
        let app = App::new("", 1, Locale::En);
        let text = screen(&app);
        assert!(text.contains("Input Stock Symbol"));
        assert!(text.contains("(GOOG, AAPL, MSFT, NVDA):"));
        assert!(text.contains("1 / 4"));
    }

    #[test]
    fn test_loading_screen() {
        let mut app = App::new("AAPL", 2, Locale::En);
        app.start_loading();
        assert!(screen(&app).contains("Loading Data..."));
    }

    #[test]
    fn test_input_error_screen() {
        let mut app = App::new("", 1, Locale::En);
        app.finish_loading(Page {
            title: "t".to_string(),
            inputs: PageInputs {
                ticker: String::new(),
                years: 1,
            },
            horizon_days: 0,
            error: Some(ErrorKind::Input),
            messages: vec![Message::error("Invalid input: empty")],
            sections: vec![],
        });
        assert!(screen(&app).contains("Invalid input: empty"));
    }
}
