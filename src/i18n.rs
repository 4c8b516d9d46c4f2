// ============================================================================
// Module : i18n
// ============================================================================
// Textes de l'interface, une table par langue
//
// CONCEPT RUST : &'static Strings
// - Les tables sont des constantes : aucune allocation
// - Locale::strings() renvoie une référence vers la bonne table
// ============================================================================

use serde::{Deserialize, Serialize};

/// Langue de l'interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::Fr => &FR,
        }
    }
}

/// Table des textes affichés
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub sidebar_header: &'static str,
    pub ticker_prompt: &'static str,
    pub years_label: &'static str,
    pub years_unit: &'static str,
    pub loading: &'static str,
    pub loading_success: &'static str,
    pub loading_failed: &'static str,

    // En-têtes de sections
    pub raw_data: &'static str,
    pub raw_chart: &'static str,
    pub forecast_data: &'static str,
    pub forecast_plot: &'static str,
    pub components: &'static str,
    pub change_proportion: &'static str,
    pub bar_comparison: &'static str,
    pub scatter_comparison: &'static str,

    /// Libellés courts des onglets, dans l'ordre des sections
    pub tabs: [&'static str; 8],

    // Titres et séries des graphiques
    pub time_series_title: &'static str,
    pub opening_price: &'static str,
    pub closing_price: &'static str,
    pub actual: &'static str,
    pub forecast: &'static str,
    pub lower_bound: &'static str,
    pub upper_bound: &'static str,
    pub trend: &'static str,
    pub weekly: &'static str,
    pub yearly: &'static str,
    pub day_of_week: &'static str,
    pub day_of_year: &'static str,
    pub price_increase: &'static str,
    pub price_decrease: &'static str,
    pub actual_closing_price: &'static str,
    pub forecasted_closing_price: &'static str,
    pub actual_vs_forecasted: &'static str,
    pub date: &'static str,
    pub price: &'static str,

    // États vides et erreurs
    pub no_data: &'static str,
    pub no_price_change: &'static str,
    pub forecast_unavailable: &'static str,
    pub invalid_input: &'static str,
    pub network_error: &'static str,
    pub provider_error: &'static str,
}

pub static EN: Strings = Strings {
    title: "💀AI Stock Prediction🏴‍☠️",
    sidebar_header: "Input Stock Symbol",
    ticker_prompt: "(GOOG, AAPL, MSFT, NVDA):",
    years_label: "Years of Prediction:",
    years_unit: "years",
    loading: "Loading Data...",
    loading_success: "Loading Data... Success!",
    loading_failed: "Loading Data... Failed",

    raw_data: "Display raw data",
    raw_chart: "Display raw data plot OPEN - CLOSE Market🛒📈📉",
    forecast_data: "Display forecast data",
    forecast_plot: "Display forecast plot",
    components: "Display forecast components",
    change_proportion: "Daily Price Change Proportion",
    bar_comparison: "Actual vs Forecasted Closing Prices (bars)",
    scatter_comparison: "Actual vs Forecasted Closing Prices (scatter)",

    tabs: ["Raw", "Open/Close", "Forecast data", "Forecast", "Components", "Up/Down", "Bars", "Scatter"],

    time_series_title: "Time Series Data",
    opening_price: "Opening Price",
    closing_price: "Closing Price",
    actual: "Actual",
    forecast: "Forecast",
    lower_bound: "Lower bound",
    upper_bound: "Upper bound",
    trend: "trend",
    weekly: "weekly",
    yearly: "yearly",
    day_of_week: "Day of week",
    day_of_year: "Day of year",
    price_increase: "Price Increase",
    price_decrease: "Price Decrease",
    actual_closing_price: "Actual Closing Price",
    forecasted_closing_price: "Forecasted Closing Price",
    actual_vs_forecasted: "Actual vs Forecasted Closing Prices",
    date: "Date",
    price: "Price",

    no_data: "No data",
    no_price_change: "No up or down days in the period",
    forecast_unavailable: "Forecast unavailable",
    invalid_input: "Invalid input",
    network_error: "Network error, try again later",
    provider_error: "Unexpected response from the data provider",
};

pub static FR: Strings = Strings {
    title: "💀Prédiction boursière IA🏴‍☠️",
    sidebar_header: "Symbole boursier",
    ticker_prompt: "(GOOG, AAPL, MSFT, NVDA) :",
    years_label: "Années de prédiction :",
    years_unit: "ans",
    loading: "Chargement des données...",
    loading_success: "Chargement des données... Terminé !",
    loading_failed: "Chargement des données... Échec",

    raw_data: "Données brutes",
    raw_chart: "Graphique OUVERTURE - CLÔTURE du marché🛒📈📉",
    forecast_data: "Données de prévision",
    forecast_plot: "Graphique de prévision",
    components: "Composantes de la prévision",
    change_proportion: "Proportion des variations journalières",
    bar_comparison: "Clôtures réelles vs prévues (barres)",
    scatter_comparison: "Clôtures réelles vs prévues (nuage)",

    tabs: ["Brut", "Ouv./Clôt.", "Données prév.", "Prévision", "Composantes", "Hausse/Baisse", "Barres", "Nuage"],

    time_series_title: "Série temporelle",
    opening_price: "Prix d'ouverture",
    closing_price: "Prix de clôture",
    actual: "Réel",
    forecast: "Prévision",
    lower_bound: "Borne basse",
    upper_bound: "Borne haute",
    trend: "tendance",
    weekly: "hebdomadaire",
    yearly: "annuelle",
    day_of_week: "Jour de la semaine",
    day_of_year: "Jour de l'année",
    price_increase: "Hausse",
    price_decrease: "Baisse",
    actual_closing_price: "Clôture réelle",
    forecasted_closing_price: "Clôture prévue",
    actual_vs_forecasted: "Clôtures réelles vs prévues",
    date: "Date",
    price: "Prix",

    no_data: "Aucune donnée",
    no_price_change: "Aucune journée de hausse ou de baisse sur la période",
    forecast_unavailable: "Prévision indisponible",
    invalid_input: "Saisie invalide",
    network_error: "Erreur réseau, réessayez plus tard",
    provider_error: "Réponse inattendue du fournisseur de données",
};
