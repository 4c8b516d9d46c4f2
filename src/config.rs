// ============================================================================
// Module : config
// ============================================================================
// Ligne de commande et configuration
//
// Chaque option peut aussi venir de l'environnement (ou d'un fichier .env
// chargé par dotenvy avant le parsing). Cli est ensuite résolu en Settings,
// la seule structure que le reste de l'application consomme.
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;

use crate::api::yahoo::DEFAULT_BASE_URL;
use crate::error::DashboardError;
use crate::i18n::Locale;
use crate::models::{DateRange, MAX_YEARS, MIN_YEARS};

#[derive(Debug, Parser)]
#[command(name = "stockcast")]
#[command(about = "Terminal stock price forecast dashboard")]
#[command(version)]
pub struct Cli {
    /// Ticker chargé au démarrage (vide = saisie dans l'interface)
    #[arg(short, long, env = "STOCKCAST_TICKER", default_value = "")]
    pub ticker: String,

    /// Années de prévision
    #[arg(
        short,
        long,
        env = "STOCKCAST_YEARS",
        default_value_t = MIN_YEARS,
        value_parser = clap::value_parser!(u8).range(i64::from(MIN_YEARS)..=i64::from(MAX_YEARS))
    )]
    pub years: u8,

    /// Langue de l'interface
    #[arg(long, env = "STOCKCAST_LANG", value_enum, default_value_t = Locale::En)]
    pub lang: Locale,

    /// Début de l'historique (AAAA-MM-JJ)
    #[arg(long, env = "STOCKCAST_START_DATE", default_value = "2015-01-01")]
    pub start_date: NaiveDate,

    /// Timeout de chaque requête HTTP, en secondes
    #[arg(long, env = "STOCKCAST_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Répertoire des fichiers de log
    #[arg(long, env = "STOCKCAST_LOG_DIR", default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Exécute un seul passage et affiche l'arbre de rendu en JSON
    #[arg(long, env = "STOCKCAST_SNAPSHOT")]
    pub snapshot: bool,

    /// Endpoint Yahoo Finance
    #[arg(long, env = "STOCKCAST_YAHOO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub yahoo_base_url: String,
}

/// Configuration résolue
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ticker: String,
    pub years: u8,
    pub locale: Locale,
    pub start_date: NaiveDate,
    pub timeout: Duration,
    pub log_dir: PathBuf,
    pub snapshot: bool,
    pub yahoo_base_url: String,
}

impl Settings {
    /// Valide la ligne de commande
    pub fn from_cli(cli: Cli) -> Result<Self, DashboardError> {
        if cli.timeout_secs == 0 {
            return Err(DashboardError::Input("timeout must be at least one second".to_string()));
        }

        Ok(Self {
            ticker: cli.ticker.trim().to_string(),
            years: cli.years,
            locale: cli.lang,
            start_date: cli.start_date,
            timeout: Duration::from_secs(cli.timeout_secs),
            log_dir: cli.log_dir,
            snapshot: cli.snapshot,
            yahoo_base_url: cli.yahoo_base_url,
        })
    }

    /// Intervalle [start_date, today) ; vide si today précède start_date
    pub fn range(&self, today: NaiveDate) -> DateRange {
        DateRange::new(self.start_date, today.max(self.start_date))
    }
}

/// Charge .env (s'il existe) puis parse la ligne de commande
pub fn load() -> Result<Settings, DashboardError> {
    dotenvy::dotenv().ok();
    Settings::from_cli(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["stockcast"]).unwrap();
        let settings = Settings::from_cli(cli).unwrap();

        assert_eq!(settings.ticker, "");
        assert_eq!(settings.years, 1);
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.start_date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.log_dir, PathBuf::from("./logs"));
        assert!(!settings.snapshot);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "stockcast", "--ticker", " aapl ", "--years", "4", "--lang", "fr", "--snapshot",
        ])
        .unwrap();
        let settings = Settings::from_cli(cli).unwrap();

        assert_eq!(settings.ticker, "aapl");
        assert_eq!(settings.years, 4);
        assert_eq!(settings.locale, Locale::Fr);
        assert!(settings.snapshot);
    }

    #[test]
    fn test_years_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["stockcast", "--years", "5"]).is_err());
        assert!(Cli::try_parse_from(["stockcast", "--years", "0"]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::try_parse_from(["stockcast", "--timeout-secs", "0"]).unwrap();
        assert!(matches!(Settings::from_cli(cli), Err(DashboardError::Input(_))));
    }

    #[test]
    fn test_range_ends_today() {
        let cli = Cli::try_parse_from(["stockcast"]).unwrap();
        let settings = Settings::from_cli(cli).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let range = settings.range(today);
        assert_eq!(range.end, today);
        assert!(!range.contains(today));
    }
}
