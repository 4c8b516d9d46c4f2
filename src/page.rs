// ============================================================================
// Module : page
// ============================================================================
// Arbre de rendu produit par un passage du pipeline
//
// Page
// ├── title, inputs, horizon
// ├── messages (statut de chargement, erreurs)
// └── sections (dans l'ordre d'affichage)
//     └── body : tableau | graphique | panneaux | message "pas de données"
//
// L'arbre ne dépend d'aucun widget : le terminal le dessine, --snapshot le
// sérialise, les tests l'inspectent.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::charts::Chart;
use crate::error::ErrorKind;

/// Les huit sections, dans l'ordre d'affichage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    RawData,
    RawChart,
    ForecastData,
    ForecastChart,
    Components,
    ChangeProportion,
    BarComparison,
    ScatterComparison,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::RawData,
        SectionKind::RawChart,
        SectionKind::ForecastData,
        SectionKind::ForecastChart,
        SectionKind::Components,
        SectionKind::ChangeProportion,
        SectionKind::BarComparison,
        SectionKind::ScatterComparison,
    ];

    /// Position dans l'ordre d'affichage
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }

    /// Sections qui ne dépendent que des données brutes
    pub fn needs_forecast(&self) -> bool {
        !matches!(
            self,
            SectionKind::RawData | SectionKind::RawChart | SectionKind::ChangeProportion
        )
    }
}

/// Aperçu tabulaire (valeurs déjà formatées)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SectionBody {
    Table(TablePreview),
    Chart(Chart),
    /// Graphiques empilés (composantes de la prévision)
    Panels(Vec<Chart>),
    /// Section vide, avec la raison affichée à la place
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub body: SectionBody,
}

impl Section {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, SectionBody::Placeholder(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Success,
    Error,
}

/// Message de statut affiché au-dessus des sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }
}

/// Entrées utilisateur d'un passage du pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInputs {
    pub ticker: String,
    pub years: u8,
}

/// Page complète
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub inputs: PageInputs,
    /// Horizon en jours (0 si les entrées sont invalides)
    pub horizon_days: u32,
    /// Catégorie de l'erreur la plus grave du passage
    pub error: Option<ErrorKind>,
    pub messages: Vec<Message>,
    pub sections: Vec<Section>,
}

impl Page {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order_and_dependencies() {
        assert_eq!(SectionKind::ALL.len(), 8);
        assert_eq!(SectionKind::ScatterComparison.index(), 7);
        assert!(!SectionKind::ChangeProportion.needs_forecast());
        assert!(SectionKind::Components.needs_forecast());
    }

    #[test]
    fn test_placeholder_serialization() {
        let section = Section {
            kind: SectionKind::RawData,
            heading: "Display raw data".to_string(),
            body: SectionBody::Placeholder("No data".to_string()),
        };
        assert!(section.is_placeholder());

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["kind"], "raw_data");
        assert_eq!(json["body"]["type"], "placeholder");
        assert_eq!(json["body"]["value"], "No data");
    }
}
