// src/noyau/jetons.rs
//
// Modèle de données de l’expression en cours de saisie.
// - Jeton : nombre (en cours ou complet), constante, parenthèse, fonction, postfixe
// - Operateur : la case entre deux jetons (+ - × ÷ ^ ou VIDE = multiplication implicite)
//
// Disposition (toujours) :
//   jetons:      0      1      2      3   ...
//   operateurs:     0      1      2       ...
//
// Le texte de chaque jeton est aussi sa forme persistée (voir instantane.rs).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::erreurs::ErreurInstantane;
use super::reglages::CHIFFRES_MAX;

/// Case opérateur sans opérateur visible (multiplication implicite).
pub const VIDE: char = '\u{0}';

/* ------------------------ Opérateurs ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance,
    Vide,
}

impl Operateur {
    /// Opérateurs saisissables (tout sauf VIDE).
    pub fn depuis_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operateur::Plus),
            '-' => Some(Operateur::Moins),
            '×' => Some(Operateur::Fois),
            '÷' => Some(Operateur::Divise),
            '^' => Some(Operateur::Puissance),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Operateur::Plus => '+',
            Operateur::Moins => '-',
            Operateur::Fois => '×',
            Operateur::Divise => '÷',
            Operateur::Puissance => '^',
            Operateur::Vide => VIDE,
        }
    }

    /// + ou - : seuls opérateurs qui peuvent devenir le signe d’un nombre.
    pub fn signe(self) -> Option<Signe> {
        match self {
            Operateur::Plus => Some(Signe::Plus),
            Operateur::Moins => Some(Signe::Moins),
            _ => None,
        }
    }
}

impl From<Operateur> for char {
    fn from(op: Operateur) -> char {
        op.as_char()
    }
}

impl TryFrom<char> for Operateur {
    type Error = ErreurInstantane;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c == VIDE {
            return Ok(Operateur::Vide);
        }
        Operateur::depuis_char(c).ok_or(ErreurInstantane::OperateurInconnu(c))
    }
}

/* ------------------------ Signe en attente ------------------------ */

/// Signe tapé sans opérande (jeton "+" / "-").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signe {
    Plus,
    Moins,
}

impl Signe {
    pub fn as_char(self) -> char {
        match self {
            Signe::Plus => '+',
            Signe::Moins => '-',
        }
    }

    /// ±1 : valeur d’un signe seul devant × ÷ ^.
    pub fn unite(self) -> f64 {
        match self {
            Signe::Plus => 1.0,
            Signe::Moins => -1.0,
        }
    }

    pub fn appliquer(self, x: f64) -> f64 {
        self.unite() * x
    }
}

/* ------------------------ Jetons “isolés” ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constante {
    Pi,
    E,
}

impl Constante {
    pub fn valeur(self) -> f64 {
        match self {
            Constante::Pi => std::f64::consts::PI,
            Constante::E => std::f64::consts::E,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Constante::Pi => 'π',
            Constante::E => 'e',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parenthese {
    Ouvrante,
    Fermante,
}

impl Parenthese {
    pub fn as_char(self) -> char {
        match self {
            Parenthese::Ouvrante => '(',
            Parenthese::Fermante => ')',
        }
    }
}

/// `!` (factorielle) ou `%` (pourcentage), appliqué au nombre qui précède.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Postfixe {
    Factorielle,
    Pourcent,
}

impl Postfixe {
    pub fn depuis_char(c: char) -> Option<Self> {
        match c {
            '!' => Some(Postfixe::Factorielle),
            '%' => Some(Postfixe::Pourcent),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Postfixe::Factorielle => '!',
            Postfixe::Pourcent => '%',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    ArcSin,
    ArcCos,
    ArcTan,
    Ln,
    Lg,
    Exp,
    Racine,
}

impl Fonction {
    pub const TOUTES: [Fonction; 10] = [
        Fonction::Sin,
        Fonction::Cos,
        Fonction::Tan,
        Fonction::ArcSin,
        Fonction::ArcCos,
        Fonction::ArcTan,
        Fonction::Ln,
        Fonction::Lg,
        Fonction::Exp,
        Fonction::Racine,
    ];

    /// Nom affiché (et persisté) de la fonction.
    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::ArcSin => "sin⁻¹",
            Fonction::ArcCos => "cos⁻¹",
            Fonction::ArcTan => "tan⁻¹",
            Fonction::Ln => "ln",
            Fonction::Lg => "lg",
            Fonction::Exp => "exp",
            Fonction::Racine => "√",
        }
    }

    pub fn depuis_nom(nom: &str) -> Option<Self> {
        Fonction::TOUTES.into_iter().find(|f| f.nom() == nom)
    }

    /// Toutes sauf √ sont suivies d’une parenthèse ouvrante auto-insérée.
    pub fn ouvre_parenthese(self) -> bool {
        self != Fonction::Racine
    }

    pub fn premier_char(self) -> char {
        self.nom().chars().next().unwrap_or('√')
    }
}

/* ------------------------ Jeton ------------------------ */

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Jeton {
    /// Chiffres, au plus un point, signe éventuel en tête. Peut être vide (fin de saisie).
    Nombre(String),
    Constante(Constante),
    Parenthese(Parenthese),
    Fonction(Fonction),
    Postfixe(Postfixe),
}

impl Default for Jeton {
    fn default() -> Self {
        Jeton::vide()
    }
}

impl Jeton {
    pub fn vide() -> Self {
        Jeton::Nombre(String::new())
    }

    pub fn est_vide(&self) -> bool {
        matches!(self, Jeton::Nombre(s) if s.is_empty())
    }

    pub fn est_ouvrante(&self) -> bool {
        matches!(self, Jeton::Parenthese(Parenthese::Ouvrante))
    }

    pub fn est_fermante(&self) -> bool {
        matches!(self, Jeton::Parenthese(Parenthese::Fermante))
    }

    /// Valeur d’un nombre complet ou d’une constante.
    /// None pour un signe seul, un point seul, un jeton vide ou non numérique.
    pub fn valeur(&self) -> Option<f64> {
        match self {
            Jeton::Nombre(s) if !s.is_empty() => s.parse::<f64>().ok(),
            Jeton::Constante(c) => Some(c.valeur()),
            _ => None,
        }
    }

    /// Signe tapé sans opérande : "+", "-", "+.", "-.".
    pub fn signe_en_attente(&self) -> Option<Signe> {
        let Jeton::Nombre(s) = self else {
            return None;
        };
        if s.parse::<f64>().is_ok() {
            return None;
        }
        match s.chars().next() {
            Some('+') => Some(Signe::Plus),
            Some('-') => Some(Signe::Moins),
            _ => None,
        }
    }

    /// Jeton qui ne peut pas terminer une expression (retiré avant calcul).
    pub fn est_incomplet(&self) -> bool {
        match self {
            Jeton::Nombre(s) => s.is_empty() || s == "+" || s == "-",
            Jeton::Parenthese(Parenthese::Ouvrante) | Jeton::Fonction(_) => true,
            _ => false,
        }
    }
}

/// Forme texte d’un nombre en cours : [+-]? chiffres* (. chiffres*)?
fn est_texte_nombre(s: &str) -> bool {
    let corps = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    corps.chars().all(|c| c.is_ascii_digit() || c == '.')
        && corps.matches('.').count() <= 1
        && corps.chars().filter(|c| c.is_ascii_digit()).count() <= CHIFFRES_MAX
}

impl fmt::Display for Jeton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jeton::Nombre(s) => f.write_str(s),
            Jeton::Constante(c) => write!(f, "{}", c.as_char()),
            Jeton::Parenthese(p) => write!(f, "{}", p.as_char()),
            Jeton::Fonction(fonction) => f.write_str(fonction.nom()),
            Jeton::Postfixe(p) => write!(f, "{}", p.as_char()),
        }
    }
}

impl From<Jeton> for String {
    fn from(j: Jeton) -> String {
        match j {
            Jeton::Nombre(s) => s,
            autre => autre.to_string(),
        }
    }
}

impl TryFrom<String> for Jeton {
    type Error = ErreurInstantane;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let jeton = match s.as_str() {
            "π" => Jeton::Constante(Constante::Pi),
            "e" => Jeton::Constante(Constante::E),
            "(" => Jeton::Parenthese(Parenthese::Ouvrante),
            ")" => Jeton::Parenthese(Parenthese::Fermante),
            "!" => Jeton::Postfixe(Postfixe::Factorielle),
            "%" => Jeton::Postfixe(Postfixe::Pourcent),
            nom => {
                if let Some(f) = Fonction::depuis_nom(nom) {
                    Jeton::Fonction(f)
                } else if est_texte_nombre(nom) {
                    Jeton::Nombre(s)
                } else {
                    return Err(ErreurInstantane::JetonInconnu(s));
                }
            }
        };
        Ok(jeton)
    }
}
