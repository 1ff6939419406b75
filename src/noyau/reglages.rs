// src/noyau/reglages.rs
//
// Réglages du noyau (sans fichier, sans variable d’environnement).
// - ModeAngle : radians / degrés pour toute la trigonométrie
// - Bornes numériques (saisie, asymptote de tan, lecture décimale)

use serde::{Deserialize, Serialize};

/// Nombre maximal de chiffres d’un jeton nombre (signe et point exclus).
pub const CHIFFRES_MAX: usize = 15;

/// Garde-fou tan : |cos(x)| sous ce seuil => domaine (asymptote).
pub const SEUIL_ASYMPTOTE: f64 = 1e-10;

/// Chiffres après la virgule pour l’affichage d’un résultat (par défaut).
pub const CHIFFRES_FRACTION_DEFAUT: usize = 10;

/// Garde-fou : au-delà, un f64 n’a plus rien à dire.
pub const CHIFFRES_FRACTION_MAX: usize = 17;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeAngle {
    Radians,
    #[default]
    Degres,
}

impl ModeAngle {
    /// Pont avec l’interface booléenne `isRadians` de l’appelant.
    pub fn depuis_radians(est_radians: bool) -> Self {
        if est_radians {
            ModeAngle::Radians
        } else {
            ModeAngle::Degres
        }
    }

    /// Angle saisi (dans ce mode) -> radians.
    pub fn vers_radians(self, angle: f64) -> f64 {
        match self {
            ModeAngle::Radians => angle,
            ModeAngle::Degres => angle.to_radians(),
        }
    }

    /// Radians (sortie des fonctions réciproques) -> angle dans ce mode.
    pub fn depuis_radians_vers_mode(self, radians: f64) -> f64 {
        match self {
            ModeAngle::Radians => radians,
            ModeAngle::Degres => radians.to_degrees(),
        }
    }
}
