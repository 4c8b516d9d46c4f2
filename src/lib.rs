// Stockcast - Bibliothèque
//
// Ce fichier expose les modules publics de la crate.
// Le binaire (main.rs) n'ajoute que le terminal et la boucle d'événements.

pub mod api;      // Fournisseurs de prix, cache, chargement
pub mod app;      // État de l'application TUI
pub mod charts;   // Spécifications typées des graphiques
pub mod config;   // Ligne de commande et environnement
pub mod error;    // Erreurs du tableau de bord
pub mod forecast; // Modèle additif de prévision
pub mod i18n;     // Textes de l'interface
pub mod models;   // Structures de données (historique, prévisions, stats)
pub mod page;     // Arbre de rendu d'un passage
pub mod pipeline; // Entrées → chargement → prévision → page
pub mod ui;       // Interface utilisateur (ratatui)
