//! Constructeur incrémental de l’expression (un symbole à la fois).
//!
//! Chaque édition laisse la suite jetons/opérateurs dans un état calculable,
//! ou refuse l’entrée (`false` / `None`) pour que l’affichage de l’appelant
//! reste synchronisé. Aucune édition ne panique.
//!
//! Invariants :
//! - |jetons| = |opérateurs| + 1, au moins un jeton (le dernier est le jeton courant)
//! - `parentheses_ouvertes` = nombre de "(" moins nombre de ")"

use std::fmt;

use serde::{Deserialize, Serialize};

use super::erreurs::ErreurCalcul;
use super::eval;
use super::format::texte_jeton;
use super::instantane::Instantane;
use super::jetons::{Constante, Fonction, Jeton, Operateur, Parenthese, Postfixe, VIDE};
use super::reglages::{ModeAngle, CHIFFRES_MAX};

static JETON_VIDE: Jeton = Jeton::Nombre(String::new());

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Instantane", into = "Instantane")]
pub struct Constructeur {
    pub(crate) jetons: Vec<Jeton>,
    pub(crate) operateurs: Vec<Operateur>,
    pub(crate) parentheses_ouvertes: usize,
}

impl Default for Constructeur {
    fn default() -> Self {
        Self {
            jetons: vec![Jeton::vide()],
            operateurs: Vec::new(),
            parentheses_ouvertes: 0,
        }
    }
}

impl Constructeur {
    pub fn new() -> Self {
        Self::default()
    }

    /// “= puis on continue” : le résultat précédent devient le premier jeton.
    /// Écrit en décimal simple (jamais d’exposant), arrondi pour tenir dans
    /// `CHIFFRES_MAX` chiffres. None si non fini ou trop grand pour un jeton.
    pub fn depuis_resultat(valeur: f64) -> Option<Self> {
        let texte = texte_jeton(valeur, CHIFFRES_MAX)?;
        Some(Self {
            jetons: vec![Jeton::Nombre(texte)],
            ..Self::default()
        })
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn jetons(&self) -> &[Jeton] {
        &self.jetons
    }

    pub fn operateurs(&self) -> &[Operateur] {
        &self.operateurs
    }

    pub fn parentheses_ouvertes(&self) -> usize {
        self.parentheses_ouvertes
    }

    pub fn est_vide(&self) -> bool {
        self.jetons.len() <= 1 && self.courant().est_vide()
    }

    /// Texte du jeton en cours (mise en forme “live” côté appelant).
    pub fn nombre_courant_texte(&self) -> String {
        self.courant().to_string()
    }

    /// Valeur du jeton en cours s’il s’agit d’un nombre ou d’une constante.
    pub fn nombre_courant_valeur(&self) -> Option<f64> {
        self.courant().valeur()
    }

    /// Concaténation verbatim jetons + opérateurs non vides (persistance, pas affichage).
    pub fn construire(&self) -> String {
        self.to_string()
    }

    /// Évalue une copie privée de la suite ; l’état n’est jamais modifié.
    pub fn calculer(&self, mode: ModeAngle) -> Result<f64, ErreurCalcul> {
        eval::calculer(&self.jetons, &self.operateurs, mode)
    }

    pub fn serialiser(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn deserialiser(texte: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(texte)
    }

    /* ------------------------ Édition ------------------------ */

    /// Un symbole tapé : opérateur, postfixe, constante, √, chiffre ou point.
    pub fn ajouter_char(&mut self, c: char) -> bool {
        if let Some(op) = Operateur::depuis_char(c) {
            return self.ajouter_operateur(op);
        }
        if let Some(p) = Postfixe::depuis_char(c) {
            return self.ajouter_postfixe(p);
        }
        match c {
            'e' => self.ajouter_constante(Constante::E),
            'π' => self.ajouter_constante(Constante::Pi),
            '√' => self.ajouter_fonction(Fonction::Racine.nom()),
            '0'..='9' | '.' => self.ajouter_chiffre(c),
            _ => false,
        }
    }

    /// Parenthèse “intelligente” : choisit "(" ou ")" selon le contexte.
    /// Renvoie le caractère inséré, None si le contexte est ambigu.
    pub fn ajouter_parenthese(&mut self) -> Option<char> {
        let parenthese = match self.courant() {
            j if j.est_vide() => Parenthese::Ouvrante,
            Jeton::Nombre(s) if s == "." || s == "+." || s == "-." => return None,
            Jeton::Nombre(s) if s == "+" || s == "-" => Parenthese::Ouvrante,
            Jeton::Parenthese(Parenthese::Ouvrante) => Parenthese::Ouvrante,
            // √ attend son opérande : jamais de ")" juste après
            Jeton::Fonction(_) => Parenthese::Ouvrante,
            _ if self.parentheses_ouvertes > 0 => Parenthese::Fermante,
            _ => Parenthese::Ouvrante,
        };

        if !self.courant().est_vide() {
            self.nouveau_jeton(Operateur::Vide);
        }
        self.poser_parenthese(parenthese);
        Some(parenthese.as_char())
    }

    /// Fonction en tête (sin, cos⁻¹, √, …). Toutes sauf √ ouvrent une parenthèse.
    pub fn ajouter_fonction(&mut self, nom: &str) -> bool {
        let Some(fonction) = Fonction::depuis_nom(nom) else {
            return false;
        };

        if !self.courant().est_vide() {
            self.nouveau_jeton(Operateur::Vide);
        }
        *self.courant_mut() = Jeton::Fonction(fonction);

        if fonction.ouvre_parenthese() {
            self.nouveau_jeton(Operateur::Vide);
            self.poser_parenthese(Parenthese::Ouvrante);
        }
        true
    }

    /// Efface le dernier *caractère* saisi (pas forcément le dernier jeton).
    ///
    /// `affiche` est le dernier caractère visible chez l’appelant : une frontière
    /// de jetons sans caractère visible (case VIDE) est traversée jusqu’à le retrouver.
    /// Renvoie le caractère effacé (le nom de fonction entier compte pour son
    /// premier caractère), None si rien à effacer.
    pub fn effacer(&mut self, affiche: char) -> Option<char> {
        // chaque tour retire au moins un jeton : la boucle est bornée par |jetons|
        loop {
            if self.est_vide() {
                *self = Self::default();
                return None;
            }

            if !self.courant().est_vide() {
                return Some(self.effacer_dans_courant());
            }

            // jeton courant vide : il part avec l’opérateur qui le précède
            self.jetons.pop();
            let Some(op) = self.operateurs.pop() else {
                *self = Self::default();
                return None;
            };
            if op.as_char() == affiche {
                return Some(affiche);
            }
        }
    }

    pub fn vider(&mut self) {
        *self = Self::default();
    }

    /* ------------------------ Édition (interne) ------------------------ */

    fn courant(&self) -> &Jeton {
        self.jetons.last().unwrap_or(&JETON_VIDE)
    }

    fn courant_mut(&mut self) -> &mut Jeton {
        if self.jetons.is_empty() {
            self.jetons.push(Jeton::vide());
            self.operateurs.clear();
        }
        let dernier = self.jetons.len() - 1;
        &mut self.jetons[dernier]
    }

    /// Ferme le jeton courant : nouvelle case opérateur + nouveau jeton vide.
    fn nouveau_jeton(&mut self, op: Operateur) -> &mut Jeton {
        self.operateurs.push(op);
        self.jetons.push(Jeton::vide());
        self.courant_mut()
    }

    fn poser_parenthese(&mut self, parenthese: Parenthese) {
        match parenthese {
            Parenthese::Ouvrante => self.parentheses_ouvertes += 1,
            Parenthese::Fermante => {
                self.parentheses_ouvertes = self.parentheses_ouvertes.saturating_sub(1)
            }
        }
        *self.courant_mut() = Jeton::Parenthese(parenthese);
    }

    fn ajouter_operateur(&mut self, op: Operateur) -> bool {
        match self.courant().clone() {
            // début de nombre : seul un signe est possible
            Jeton::Nombre(s) if s.is_empty() => match op.signe() {
                Some(signe) => {
                    *self.courant_mut() = Jeton::Nombre(signe.as_char().to_string());
                    true
                }
                None => false,
            },

            // après "(" ou "√" : + et - commencent un nombre signé
            Jeton::Parenthese(Parenthese::Ouvrante) | Jeton::Fonction(Fonction::Racine) => {
                match op.signe() {
                    Some(signe) => {
                        *self.nouveau_jeton(Operateur::Vide) =
                            Jeton::Nombre(signe.as_char().to_string());
                        true
                    }
                    None => false,
                }
            }

            Jeton::Fonction(_) => false,

            Jeton::Nombre(s) => {
                if !s.chars().any(|c| c.is_ascii_digit()) {
                    return false;
                }
                // -2^2 = -(2^2) : le signe sort du nombre
                if op == Operateur::Puissance && s.starts_with('-') {
                    self.separer_signe();
                }
                self.nouveau_jeton(op);
                true
            }

            Jeton::Parenthese(Parenthese::Fermante) | Jeton::Constante(_) | Jeton::Postfixe(_) => {
                self.nouveau_jeton(op);
                true
            }
        }
    }

    fn ajouter_postfixe(&mut self, postfixe: Postfixe) -> bool {
        let accepte = match self.courant() {
            Jeton::Nombre(s) => s.chars().any(|c| c.is_ascii_digit()),
            Jeton::Parenthese(Parenthese::Fermante) | Jeton::Constante(_) | Jeton::Postfixe(_) => {
                true
            }
            Jeton::Parenthese(Parenthese::Ouvrante) | Jeton::Fonction(_) => false,
        };
        if !accepte {
            return false;
        }

        let negatif = matches!(self.courant(), Jeton::Nombre(s) if s.starts_with('-'));
        if postfixe == Postfixe::Factorielle && negatif {
            self.separer_signe();
        }

        *self.nouveau_jeton(Operateur::Vide) = Jeton::Postfixe(postfixe);
        true
    }

    fn ajouter_constante(&mut self, constante: Constante) -> bool {
        if !self.courant().est_vide() {
            self.nouveau_jeton(Operateur::Vide);
        }
        *self.courant_mut() = Jeton::Constante(constante);
        true
    }

    fn ajouter_chiffre(&mut self, c: char) -> bool {
        // après ")", "!", "%", "π", "e", "√" : nouveau nombre
        if !matches!(self.courant(), Jeton::Nombre(_)) {
            self.nouveau_jeton(Operateur::Vide);
        }

        let Jeton::Nombre(s) = self.courant_mut() else {
            return false;
        };

        if c == '.' {
            return ajouter_point(s);
        }

        let corps = s
            .strip_prefix(|x: char| x == '+' || x == '-')
            .unwrap_or(s.as_str());
        // pas de zéro inutile en tête
        if corps == "0" {
            return false;
        }
        if corps.chars().filter(|c| c.is_ascii_digit()).count() >= CHIFFRES_MAX {
            return false;
        }
        s.push(c);
        true
    }

    /// "-5" -> "-" VIDE "5" (le signe devient un jeton en attente).
    fn separer_signe(&mut self) {
        if let Jeton::Nombre(s) = self.courant_mut() {
            let reste = s.split_off(1);
            *self.nouveau_jeton(Operateur::Vide) = Jeton::Nombre(reste);
        }
    }

    fn effacer_dans_courant(&mut self) -> char {
        let efface = match std::mem::take(self.courant_mut()) {
            Jeton::Nombre(mut s) => {
                let c = s.pop().unwrap_or(VIDE);
                *self.courant_mut() = Jeton::Nombre(s);
                c
            }
            Jeton::Constante(k) => k.as_char(),
            Jeton::Parenthese(p) => p.as_char(),
            Jeton::Fonction(f) => f.premier_char(),
            Jeton::Postfixe(p) => p.as_char(),
        };

        // jeton vidé derrière une case VIDE : il fusionne avec le précédent
        if self.courant().est_vide() && self.operateurs.last() == Some(&Operateur::Vide) {
            self.jetons.pop();
            self.operateurs.pop();
        }

        match efface {
            // une ")" retirée libère une "(" en attente
            ')' => self.parentheses_ouvertes += 1,
            '(' => {
                self.parentheses_ouvertes = self.parentheses_ouvertes.saturating_sub(1);

                // "(" auto-insérée : la fonction part avec elle
                let fonction = match self.courant() {
                    Jeton::Fonction(f) if f.ouvre_parenthese() => Some(*f),
                    _ => None,
                };
                if let Some(f) = fonction {
                    *self.courant_mut() = Jeton::vide();
                    return f.premier_char();
                }
            }
            _ => {}
        }
        efface
    }
}

/// Au plus un point ; ".9" et "-.9" sont permis (zéro implicite).
fn ajouter_point(s: &mut String) -> bool {
    if s.contains('.') {
        return false;
    }
    match s.chars().last() {
        None => {}
        Some(d) if d.is_ascii_digit() || d == '+' || d == '-' => {}
        Some(_) => return false,
    }
    s.push('.');
    true
}

impl fmt::Display for Constructeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, jeton) in self.jetons.iter().enumerate() {
            write!(f, "{jeton}")?;
            if let Some(op) = self.operateurs.get(i) {
                if *op != Operateur::Vide {
                    write!(f, "{}", op.as_char())?;
                }
            }
        }
        Ok(())
    }
}
