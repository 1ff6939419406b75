//! Noyau de la calculatrice pas à pas
//!
//! Organisation interne :
//! - jetons.rs       : jetons, opérateurs, signe en attente
//! - constructeur.rs : saisie incrémentale (un symbole à la fois)
//! - eval.rs         : calcul par portées (fonctions, postfixes, ^, × ÷, + -)
//! - texte.rs        : équation texte -> constructeur
//! - instantane.rs   : forme persistée + validation à la relecture
//! - format.rs       : texte affichable d’un résultat
//! - reglages.rs     : mode d’angle + bornes
//! - erreurs.rs      : erreurs classées

pub mod constructeur;
pub mod erreurs;
pub mod eval;
pub mod format;
pub mod instantane;
pub mod jetons;
pub mod reglages;
pub mod texte;

#[cfg(test)]
mod tests_scientifiques;


// API publique minimale
pub use constructeur::Constructeur;
pub use erreurs::{ErreurCalcul, ErreurInstantane};
pub use format::format_resultat;
pub use reglages::ModeAngle;
pub use texte::lire_equation;
