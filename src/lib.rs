//! Calculatrice pas à pas : moteur d’expressions (saisie incrémentale,
//! calcul par portées, lecture d’équations texte, persistance).
//!
//! ```
//! use calculatrice_pas_a_pas::{lire_equation, ModeAngle};
//!
//! let c = lire_equation("sin(30)+cos(60)").unwrap();
//! let v = c.calculer(ModeAngle::Degres).unwrap();
//! assert!((v - 1.0).abs() < 1e-9);
//! ```

pub mod noyau;

pub use noyau::{
    format_resultat, lire_equation, Constructeur, ErreurCalcul, ErreurInstantane, ModeAngle,
};
