// Module UI : Interface utilisateur TUI
//
// Ce module contient tout ce qui concerne l'affichage :
// - events : gestion des événements clavier
// - dashboard : rendu principal (barre latérale, onglets, footer)
// - chart : rendu des sections (tableaux, graphiques, camembert)

pub mod chart;
pub mod dashboard;
pub mod events;

pub use dashboard::render;
pub use events::{Event, EventHandler};
