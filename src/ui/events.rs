// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : un helper par action du tableau de bord
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

use crate::models::{MAX_YEARS, MIN_YEARS};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (aucune touche pendant le délai de poll)
    Tick,

    /// Terminal redimensionné (nouveau rendu nécessaire)
    Resize,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                CrosstermEvent::Resize(_, _) => Ok(Event::Resize),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        _ => None,
    }
}

/// 'q' : quitter (deux pressions)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// 't' ou '/' : saisir un ticker
pub fn is_edit_ticker_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Char('t') | KeyCode::Char('T') | KeyCode::Char('/'))
    )
}

/// '+' (ou '=' sans Shift) : une année de plus
pub fn is_years_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('+') | KeyCode::Char('=')))
}

/// '-' : une année de moins
pub fn is_years_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('-')))
}

/// '1' à '4' : horizon direct
pub fn years_from_event(event: &Event) -> Option<u8> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => c
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .filter(|d| (MIN_YEARS..=MAX_YEARS).contains(d)),
        _ => None,
    }
}

/// Tab ou → : section suivante
pub fn is_next_section_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Tab | KeyCode::Right))
}

/// Shift-Tab ou ← : section précédente
pub fn is_previous_section_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::BackTab | KeyCode::Left))
}

/// ']' : zoom avant
pub fn is_zoom_in_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char(']')))
}

/// '[' : zoom arrière
pub fn is_zoom_out_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('[')))
}

/// 'h' : recule dans le temps (vim)
pub fn is_pan_back_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('h')))
}

/// 'l' : avance dans le temps (vim)
pub fn is_pan_forward_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('l')))
}

/// '0' : plage complète
pub fn is_reset_range_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('0')))
}

/// Caractère acceptable dans un symbole (lettres, chiffres, `. - ^ =`)
pub fn is_ticker_char_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Char(c)) if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
    )
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
