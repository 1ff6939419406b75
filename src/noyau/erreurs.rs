//! Erreurs du noyau.
//!
//! - `ErreurCalcul` : les cinq familles d’échec d’une évaluation (jamais de panique).
//! - `ErreurInstantane` : un état persisté que le constructeur n’aurait pas pu produire.

use thiserror::Error;

/// Échec classifié d’un calcul.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErreurCalcul {
    /// Fonction sans opérande, ou jeton non numérique là où un nombre est attendu.
    #[error("erreur de format")]
    Format,

    /// Argument hors domaine (√, ln, lg, réciproques trig, tan, factorielle).
    #[error("hors du domaine de définition")]
    Domaine,

    #[error("division par zéro")]
    DivisionParZero,

    /// Valeur intermédiaire ou finale infinie.
    #[error("valeur trop grande")]
    Depassement,

    #[error("résultat indéfini (NaN)")]
    NonNombre,
}

/// Instantané rejeté à la relecture.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErreurInstantane {
    #[error("jeton inconnu: {0:?}")]
    JetonInconnu(String),

    #[error("opérateur inconnu: {0:?}")]
    OperateurInconnu(char),

    /// |jetons| doit valoir |opérateurs| + 1.
    #[error("{jetons} jetons pour {operateurs} opérateurs")]
    Desequilibre { jetons: usize, operateurs: usize },

    #[error("index courant {index}, attendu {attendu}")]
    Index { index: usize, attendu: usize },

    #[error("compteur de parenthèses {compteur}, attendu {attendu}")]
    Parentheses { compteur: usize, attendu: usize },

    #[error("\")\" sans \"(\" en position {0}")]
    FermanteOrpheline(usize),

    /// Seul le jeton courant (le dernier) peut être vide.
    #[error("jeton vide en position {0}")]
    JetonVide(usize),
}
