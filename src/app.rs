// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Encapsulation : les modifications passent par les méthodes de App
//
// Cycle d'un passage du pipeline :
//   Idle → Loading → Loaded | Failed
// Chaque changement de ticker ou d'horizon relance un passage complet.
// ============================================================================

use crate::charts::RangeWindow;
use crate::i18n::Locale;
use crate::models::{MAX_YEARS, MIN_YEARS};
use crate::page::{Page, PageInputs, SectionKind};

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : barre latérale + section sélectionnée
    Dashboard,

    /// Mode saisie du ticker
    /// CONCEPT : Modal input mode (Vim-like)
    /// - Capture les touches pour construire un buffer
    /// - Enter valide, ESC annule
    InputMode,
}

/// État du dernier passage du pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Aucun ticker saisi
    Idle,
    Loading,
    Loaded,
    /// Passage terminé avec une erreur (affichée dans la page)
    Failed,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Two-step quit : première pression de 'q' → confirmation demandée
    pub confirm_quit: bool,

    /// Ticker courant (tel que saisi)
    pub ticker: String,

    /// Années de prévision (curseur 1 à 4)
    pub years: u8,

    pub locale: Locale,

    /// Index de la section affichée (ordre de SectionKind::ALL)
    pub selected_section: usize,

    /// Fenêtre de zoom / défilement des graphiques datés
    pub range: RangeWindow,

    pub load_state: LoadState,

    /// Dernière page rendue
    pub page: Option<Page>,

    /// Buffer de saisie pour le mode Input
    pub input_buffer: String,

    /// Un nouveau passage du pipeline est attendu
    reload_requested: bool,
}

impl App {
    /// Crée l'application avec les entrées initiales
    ///
    /// Un passage est demandé d'emblée si un ticker est fourni.
    pub fn new(ticker: impl Into<String>, years: u8, locale: Locale) -> Self {
        let ticker = ticker.into();
        let reload_requested = !ticker.trim().is_empty();
        Self {
            running: true,
            current_screen: Screen::Dashboard,
            confirm_quit: false,
            ticker,
            years: years.clamp(MIN_YEARS, MAX_YEARS),
            locale,
            selected_section: 0,
            range: RangeWindow::default(),
            load_state: LoadState::Idle,
            page: None,
            input_buffer: String::new(),
            reload_requested,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Quit confirmation
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Entrées du pipeline
    // ========================================================================

    /// Entrées du prochain passage
    pub fn inputs(&self) -> PageInputs {
        PageInputs {
            ticker: self.ticker.clone(),
            years: self.years,
        }
    }

    /// Modifie l'horizon ; relance le pipeline si la valeur change
    ///
    /// CONCEPT : clamp()
    /// - Borne la valeur entre MIN_YEARS et MAX_YEARS
    /// - Le curseur ne sort jamais de l'intervalle 1..=4
    pub fn set_years(&mut self, years: u8) {
        let years = years.clamp(MIN_YEARS, MAX_YEARS);
        if years != self.years {
            self.years = years;
            self.request_reload();
        }
    }

    pub fn increase_years(&mut self) {
        self.set_years(self.years.saturating_add(1));
    }

    pub fn decrease_years(&mut self) {
        self.set_years(self.years.saturating_sub(1));
    }

    /// Demande un nouveau passage (ignoré tant qu'aucun ticker n'a été saisi)
    pub fn request_reload(&mut self) {
        if self.load_state != LoadState::Idle || !self.ticker.trim().is_empty() {
            self.reload_requested = true;
        }
    }

    /// Consomme la demande de passage
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    // ========================================================================
    // Chargement
    // ========================================================================

    pub fn start_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Installe la page produite par le pipeline
    pub fn finish_loading(&mut self, page: Page) {
        self.load_state = if page.is_ok() {
            LoadState::Loaded
        } else {
            LoadState::Failed
        };
        self.page = Some(page);
    }

    pub fn is_loading_data(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    // ========================================================================
    // Navigation entre sections
    // ========================================================================

    pub fn selected_section_kind(&self) -> SectionKind {
        SectionKind::ALL[self.selected_section % SectionKind::ALL.len()]
    }

    /// Section suivante (cyclique)
    pub fn next_section(&mut self) {
        self.selected_section = (self.selected_section + 1) % SectionKind::ALL.len();
    }

    /// Section précédente (cyclique)
    pub fn previous_section(&mut self) {
        let len = SectionKind::ALL.len();
        self.selected_section = (self.selected_section + len - 1) % len;
    }

    // ========================================================================
    // Fenêtre de plage
    // ========================================================================

    pub fn zoom_in(&mut self) {
        self.range.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.range.zoom_out();
    }

    pub fn pan_back(&mut self) {
        self.range.pan_back();
    }

    pub fn pan_forward(&mut self) {
        self.range.pan_forward();
    }

    pub fn reset_range(&mut self) {
        self.range.reset();
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Entre en mode saisie, prérempli avec le ticker courant
    pub fn start_input(&mut self) {
        self.current_screen = Screen::InputMode;
        self.input_buffer = self.ticker.clone();
    }

    /// Annule la saisie et retourne au dashboard
    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
    }

    /// Valide la saisie : le ticker change et un passage est demandé
    ///
    /// Un ticker vide déclenche aussi un passage : l'erreur de saisie est
    /// affichée par la page.
    pub fn submit_input(&mut self) -> String {
        let value = std::mem::take(&mut self.input_buffer);
        self.current_screen = Screen::Dashboard;
        self.ticker = value.trim().to_string();
        self.reload_requested = true;
        self.ticker.clone()
    }

    /// Ajoute un caractère au buffer d'input
    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    /// Supprime le dernier caractère du buffer
    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
