// ============================================================================
// Stockcast - Tableau de bord de prévision de cours
// ============================================================================
// Saisie d'un ticker et d'un horizon, chargement de l'historique Yahoo
// Finance, ajustement du modèle additif et affichage des huit sections.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Async dans sync : tokio::runtime::Runtime pour le pipeline
// 4. Mode snapshot : un seul passage, arbre de rendu en JSON sur stdout
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

use stockcast::api::{DataLoader, PriceCache, YahooProvider};
use stockcast::app::App;
use stockcast::config::{self, Settings};
use stockcast::forecast::AdditiveModel;
use stockcast::page::{Page, PageInputs};
use stockcast::pipeline;
use stockcast::ui::{events::Event, render, EventHandler};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ./logs/stockcast.log.*
/// RUST_LOG=stockcast=trace stockcast --ticker AAPL
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "stockcast.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockcast=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let settings = config::load().context("Configuration invalide")?;

    init_logging(&settings.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(
        ticker = %settings.ticker,
        years = settings.years,
        snapshot = settings.snapshot,
        "Stockcast starting up"
    );

    let provider = YahooProvider::new(settings.yahoo_base_url.clone(), settings.timeout)
        .context("Impossible de créer le client Yahoo Finance")?;
    let loader = DataLoader::new(Arc::new(provider), PriceCache::new());
    let model = AdditiveModel::default();

    // CONCEPT RUST : Exécuter du code async dans du code sync
    // - Le runtime vit aussi longtemps que l'application
    // - block_on() exécute un passage du pipeline
    let runtime = Runtime::new().context("Échec de la création du runtime tokio")?;

    if settings.snapshot {
        let inputs = PageInputs {
            ticker: settings.ticker.clone(),
            years: settings.years,
        };
        let page = runtime.block_on(run_pipeline(&loader, &model, &settings, &inputs));
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new(settings.ticker.clone(), settings.years, settings.locale);
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &runtime, &loader, &model, &settings);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Un passage complet avec l'intervalle [start_date, aujourd'hui)
async fn run_pipeline(
    loader: &DataLoader,
    model: &AdditiveModel,
    settings: &Settings,
    inputs: &PageInputs,
) -> Page {
    let today = chrono::Local::now().date_naive();
    pipeline::run(loader, model, inputs, settings.range(today), settings.locale).await
}

// ============================================================================
// Event Loop
// ============================================================================
// 1. RELOAD : un passage du pipeline si les entrées ont changé
// 2. RENDER : dessine l'état courant
// 3. EVENTS : lit et traite un événement
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    runtime: &Runtime,
    loader: &DataLoader,
    model: &AdditiveModel,
    settings: &Settings,
) -> Result<()> {
    while app.is_running() {
        if app.take_reload_request() {
            let inputs = app.inputs();
            info!(ticker = %inputs.ticker, years = inputs.years, "Running pipeline");

            // L'indicateur de chargement reste affiché pendant le passage
            app.start_loading();
            terminal.draw(|frame| render(frame, app))?;

            let page = runtime.block_on(run_pipeline(loader, model, settings, &inputs));
            if let Some(kind) = page.error {
                info!(ticker = %inputs.ticker, ?kind, "Pipeline finished with error");
            }
            app.finish_loading(page);
        }

        terminal.draw(|frame| render(frame, app))?;

        match events.next() {
            Ok(event) => handle_event(app, event),
            Err(e) => error!(error = ?e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Le mode saisie capture toutes les touches en premier
/// - Puis les raccourcis du dashboard
fn handle_event(app: &mut App, event: Event) {
    use stockcast::ui::events::{
        get_char_from_event, is_backspace_event, is_edit_ticker_event, is_enter_event,
        is_escape_event, is_next_section_event, is_pan_back_event, is_pan_forward_event,
        is_previous_section_event, is_quit_event, is_reset_range_event, is_ticker_char_event,
        is_years_down_event, is_years_up_event, is_zoom_in_event, is_zoom_out_event,
        years_from_event,
    };

    match event {
        // ========================================
        // Mode saisie du ticker
        // ========================================
        Event::Key(_) if app.is_in_input_mode() && is_enter_event(&event) => {
            let ticker = app.submit_input();
            info!(ticker = %ticker, "User submitted ticker");
        }
        Event::Key(_) if app.is_in_input_mode() && is_escape_event(&event) => {
            debug!("User cancelled ticker input");
            app.cancel_input();
        }
        Event::Key(_) if app.is_in_input_mode() && is_backspace_event(&event) => {
            app.backspace();
        }
        Event::Key(_) if app.is_in_input_mode() && is_ticker_char_event(&event) => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }
        Event::Key(_) if app.is_in_input_mode() => {}

        // ========================================
        // Dashboard
        // ========================================
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step : première pression → confirmation, deuxième → quit
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }
        Event::Key(_) if is_edit_ticker_event(&event) => {
            app.cancel_quit();
            app.start_input();
        }
        Event::Key(_) if is_years_up_event(&event) => {
            app.cancel_quit();
            app.increase_years();
        }
        Event::Key(_) if is_years_down_event(&event) => {
            app.cancel_quit();
            app.decrease_years();
        }
        Event::Key(_) if years_from_event(&event).is_some() => {
            app.cancel_quit();
            if let Some(years) = years_from_event(&event) {
                app.set_years(years);
            }
        }
        Event::Key(_) if is_next_section_event(&event) => {
            app.cancel_quit();
            app.next_section();
        }
        Event::Key(_) if is_previous_section_event(&event) => {
            app.cancel_quit();
            app.previous_section();
        }
        Event::Key(_) if is_zoom_in_event(&event) => {
            app.cancel_quit();
            app.zoom_in();
        }
        Event::Key(_) if is_zoom_out_event(&event) => {
            app.cancel_quit();
            app.zoom_out();
        }
        Event::Key(_) if is_pan_back_event(&event) => {
            app.cancel_quit();
            app.pan_back();
        }
        Event::Key(_) if is_pan_forward_event(&event) => {
            app.cancel_quit();
            app.pan_forward();
        }
        Event::Key(_) if is_reset_range_event(&event) => {
            app.cancel_quit();
            app.reset_range();
        }
        Event::Key(_) => {
            // Toute autre touche annule la confirmation de quit
            app.cancel_quit();
        }
        Event::Tick | Event::Resize => {}
    }
}

// ============================================================================
// Terminal setup et cleanup
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    // Alternate screen : l'écran précédent est restauré en sortie
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    terminal.show_cursor()?;

    Ok(())
}
