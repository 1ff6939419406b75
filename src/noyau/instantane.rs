// src/noyau/instantane.rs
//
// Forme persistée du constructeur (survivre à la destruction du processus hôte).
// Disposition : jetons (textes) + opérateurs (chars, VIDE = NUL) + index courant
// + compteur de parenthèses. Aller-retour exact.
//
// À la relecture, tout état que le constructeur n’aurait pas pu produire
// est refusé.

use serde::{Deserialize, Serialize};

use super::constructeur::Constructeur;
use super::erreurs::ErreurInstantane;
use super::jetons::{Jeton, Operateur};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instantane {
    pub jetons: Vec<Jeton>,
    pub operateurs: Vec<Operateur>,
    pub index: usize,
    pub parentheses_ouvertes: usize,
}

impl From<Constructeur> for Instantane {
    fn from(c: Constructeur) -> Self {
        Self {
            index: c.jetons.len().saturating_sub(1),
            jetons: c.jetons,
            operateurs: c.operateurs,
            parentheses_ouvertes: c.parentheses_ouvertes,
        }
    }
}

impl TryFrom<Instantane> for Constructeur {
    type Error = ErreurInstantane;

    fn try_from(i: Instantane) -> Result<Self, Self::Error> {
        // listes vides = constructeur neuf
        if i.jetons.is_empty() && i.operateurs.is_empty() {
            if i.index != 0 {
                return Err(ErreurInstantane::Index {
                    index: i.index,
                    attendu: 0,
                });
            }
            if i.parentheses_ouvertes != 0 {
                return Err(ErreurInstantane::Parentheses {
                    compteur: i.parentheses_ouvertes,
                    attendu: 0,
                });
            }
            return Ok(Constructeur::new());
        }

        if i.jetons.len() != i.operateurs.len() + 1 {
            return Err(ErreurInstantane::Desequilibre {
                jetons: i.jetons.len(),
                operateurs: i.operateurs.len(),
            });
        }

        let attendu = i.jetons.len() - 1;
        if i.index != attendu {
            return Err(ErreurInstantane::Index {
                index: i.index,
                attendu,
            });
        }

        if let Some(position) = i.jetons[..attendu].iter().position(|j| j.est_vide()) {
            return Err(ErreurInstantane::JetonVide(position));
        }

        // profondeur courante, de gauche à droite : jamais négative
        let mut profondeur = 0usize;
        for (position, jeton) in i.jetons.iter().enumerate() {
            if jeton.est_ouvrante() {
                profondeur += 1;
            } else if jeton.est_fermante() {
                profondeur = profondeur
                    .checked_sub(1)
                    .ok_or(ErreurInstantane::FermanteOrpheline(position))?;
            }
        }
        if profondeur != i.parentheses_ouvertes {
            return Err(ErreurInstantane::Parentheses {
                compteur: i.parentheses_ouvertes,
                attendu: profondeur,
            });
        }

        Ok(Constructeur {
            jetons: i.jetons,
            operateurs: i.operateurs,
            parentheses_ouvertes: i.parentheses_ouvertes,
        })
    }
}
