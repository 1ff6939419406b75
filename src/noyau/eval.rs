//! Noyau : évaluation par portées
//!
//! copie privée -> retrait des jetons incomplets en queue
//!   -> portée la plus interne (dernière "(" jusqu’à la ")" suivante ou la fin)
//!   -> fonctions -> postfixes (! %) -> ^ -> × ÷ -> + -
//!   -> la valeur remplace la portée et ses parenthèses, on recommence
//!
//! Toute valeur intermédiaire NaN ou infinie arrête le calcul (erreur classée).

use num_traits::ToPrimitive;
use tracing::{debug, trace};

use super::erreurs::ErreurCalcul;
use super::jetons::{Fonction, Jeton, Operateur, Parenthese, Postfixe, Signe};
use super::reglages::{ModeAngle, SEUIL_ASYMPTOTE};

/// Opérande d’un pli : un vrai nombre, ou un signe tapé sans nombre.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Valeur {
    Nombre(f64),
    EnAttente(Signe),
}

impl Valeur {
    /// Devant × ÷ ^, un signe seul vaut ±1.
    fn multiplicatif(self) -> f64 {
        match self {
            Valeur::Nombre(x) => x,
            Valeur::EnAttente(s) => s.unite(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Element {
    Valeur(Valeur),
    Ouvrante,
    Fermante,
    Fonction(Fonction),
    Postfixe(Postfixe),
    /// Nombre illisible (".", jeton vide au milieu).
    Invalide,
}

impl Element {
    fn depuis_jeton(j: &Jeton) -> Self {
        match j {
            Jeton::Nombre(_) | Jeton::Constante(_) => match (j.valeur(), j.signe_en_attente()) {
                (Some(x), _) => Element::Valeur(Valeur::Nombre(x)),
                (None, Some(s)) => Element::Valeur(Valeur::EnAttente(s)),
                (None, None) => Element::Invalide,
            },
            Jeton::Parenthese(Parenthese::Ouvrante) => Element::Ouvrante,
            Jeton::Parenthese(Parenthese::Fermante) => Element::Fermante,
            Jeton::Fonction(f) => Element::Fonction(*f),
            Jeton::Postfixe(p) => Element::Postfixe(*p),
        }
    }
}

/// Évalue la suite jetons/opérateurs (jamais modifiée : tout se fait sur une copie).
pub fn calculer(
    jetons: &[Jeton],
    operateurs: &[Operateur],
    mode: ModeAngle,
) -> Result<f64, ErreurCalcul> {
    let resultat = calculer_copie(jetons, operateurs, mode);
    debug!(?mode, ?resultat, "calcul");
    resultat
}

fn calculer_copie(
    jetons: &[Jeton],
    operateurs: &[Operateur],
    mode: ModeAngle,
) -> Result<f64, ErreurCalcul> {
    // 1) queue incomplète ("", "+", "-", "(", fonction) retirée avec son opérateur
    let mut fin = jetons.len();
    while fin > 0 && jetons[fin - 1].est_incomplet() {
        fin -= 1;
    }
    if fin == 0 {
        return Ok(0.0);
    }

    let mut elements: Vec<Element> = jetons[..fin].iter().map(Element::depuis_jeton).collect();
    let mut ops: Vec<Operateur> = operateurs
        .iter()
        .take(fin - 1)
        .copied()
        .collect();
    if ops.len() + 1 != elements.len() {
        return Err(ErreurCalcul::Format);
    }

    // 2) portées, de la plus interne vers l’extérieur
    loop {
        let ouvrante = elements.iter().rposition(|e| *e == Element::Ouvrante);
        let debut = ouvrante.map_or(0, |i| i + 1);
        let fermante = elements[debut..]
            .iter()
            .position(|e| *e == Element::Fermante)
            .map(|i| debut + i);
        let fin = fermante.unwrap_or(elements.len());

        let portee = elements[debut..fin].to_vec();
        let ops_portee = if fin > debut {
            ops[debut..fin - 1].to_vec()
        } else {
            Vec::new()
        };
        let v = reduire_portee(portee, ops_portee, mode)?;
        trace!(debut, fin, v, "portée réduite");

        if ouvrante.is_none() && fermante.is_none() {
            return verifier(v);
        }

        // la valeur prend la place de la portée et de ses parenthèses
        let a = ouvrante.unwrap_or(debut);
        let b = fermante.unwrap_or(elements.len() - 1).max(a);
        elements[a] = Element::Valeur(Valeur::Nombre(v));
        elements.drain(a + 1..=b);
        ops.drain(a..b);
    }
}

/// Réduit une portée sans parenthèse à une seule valeur.
fn reduire_portee(
    mut elements: Vec<Element>,
    mut ops: Vec<Operateur>,
    mode: ModeAngle,
) -> Result<f64, ErreurCalcul> {
    if elements.is_empty() {
        return Ok(0.0);
    }

    // a) fonctions, de droite à gauche (√√16 : la plus interne d’abord)
    while let Some((i, f)) = elements.iter().enumerate().rev().find_map(|(i, e)| match e {
        Element::Fonction(f) => Some((i, *f)),
        _ => None,
    }) {
        let (x, consommes) = match (elements.get(i + 1), elements.get(i + 2), ops.get(i + 1)) {
            (Some(Element::Valeur(Valeur::Nombre(x))), _, _) => (*x, 1),
            // √-π : le signe seul emporte le nombre qui le suit
            (
                Some(Element::Valeur(Valeur::EnAttente(s))),
                Some(Element::Valeur(Valeur::Nombre(x))),
                Some(Operateur::Vide),
            ) => (s.appliquer(*x), 2),
            _ => return Err(ErreurCalcul::Format),
        };
        let y = appliquer_fonction(f, x, mode)?;
        elements[i] = Element::Valeur(Valeur::Nombre(y));
        elements.drain(i + 1..=i + consommes);
        ops.drain(i..i + consommes);
    }

    // b) postfixes, de gauche à droite, sur le nombre qui précède
    while let Some((i, p)) = elements.iter().enumerate().find_map(|(i, e)| match e {
        Element::Postfixe(p) => Some((i, *p)),
        _ => None,
    }) {
        let x = match i.checked_sub(1).and_then(|k| elements.get(k)) {
            Some(Element::Valeur(Valeur::Nombre(x))) => *x,
            _ => return Err(ErreurCalcul::Format),
        };
        elements[i - 1] = Element::Valeur(Valeur::Nombre(appliquer_postfixe(p, x)?));
        elements.remove(i);
        ops.remove(i - 1);
    }

    let mut valeurs: Vec<Valeur> = elements
        .into_iter()
        .map(|e| match e {
            Element::Valeur(v) => Ok(v),
            _ => Err(ErreurCalcul::Format),
        })
        .collect::<Result<_, _>>()?;

    // c) ^ : associatif à droite, on replie depuis le dernier opérateur
    let mut i = ops.len();
    while i > 0 {
        i -= 1;
        if ops[i] != Operateur::Puissance {
            continue;
        }
        let base = valeurs[i].multiplicatif();
        let exposant = valeurs[i + 1].multiplicatif();
        if base == 0.0 && exposant == 0.0 {
            return Err(ErreurCalcul::NonNombre);
        }
        valeurs[i] = Valeur::Nombre(verifier(base.powf(exposant))?);
        valeurs.remove(i + 1);
        ops.remove(i);
    }

    // d) × ÷ (VIDE = ×), de gauche à droite
    let mut i = 0;
    while i < ops.len() {
        let a = valeurs[i].multiplicatif();
        let b = valeurs[i + 1].multiplicatif();
        let y = match ops[i] {
            Operateur::Fois | Operateur::Vide => a * b,
            Operateur::Divise => {
                if b == 0.0 {
                    return Err(ErreurCalcul::DivisionParZero);
                }
                a / b
            }
            _ => {
                i += 1;
                continue;
            }
        };
        valeurs[i] = Valeur::Nombre(verifier(y)?);
        valeurs.remove(i + 1);
        ops.remove(i);
    }

    // e) + -, de gauche à droite ; un signe seul compte pour rien
    let mut total = 0.0;
    for (k, v) in valeurs.iter().enumerate() {
        let Valeur::Nombre(x) = *v else {
            continue;
        };
        total = match k.checked_sub(1).map(|j| ops[j]) {
            None => x,
            Some(Operateur::Moins) => total - x,
            Some(_) => total + x,
        };
        total = verifier(total)?;
    }
    Ok(total)
}

fn appliquer_fonction(f: Fonction, x: f64, mode: ModeAngle) -> Result<f64, ErreurCalcul> {
    let y = match f {
        Fonction::Sin => mode.vers_radians(x).sin(),
        Fonction::Cos => mode.vers_radians(x).cos(),
        Fonction::Tan => {
            let r = mode.vers_radians(x);
            // asymptote : pas de valeur énorme “presque juste”
            if r.cos().abs() < SEUIL_ASYMPTOTE {
                return Err(ErreurCalcul::Domaine);
            }
            r.tan()
        }
        Fonction::ArcSin | Fonction::ArcCos | Fonction::ArcTan => {
            if !(-1.0..=1.0).contains(&x) {
                return Err(ErreurCalcul::Domaine);
            }
            let r = match f {
                Fonction::ArcSin => x.asin(),
                Fonction::ArcCos => x.acos(),
                _ => x.atan(),
            };
            mode.depuis_radians_vers_mode(r)
        }
        Fonction::Ln | Fonction::Lg => {
            if x <= 0.0 {
                return Err(ErreurCalcul::Domaine);
            }
            if f == Fonction::Ln {
                x.ln()
            } else {
                x.log10()
            }
        }
        Fonction::Exp => x.exp(),
        Fonction::Racine => {
            if x < 0.0 {
                return Err(ErreurCalcul::Domaine);
            }
            x.sqrt()
        }
    };
    verifier(y)
}

fn appliquer_postfixe(p: Postfixe, x: f64) -> Result<f64, ErreurCalcul> {
    match p {
        Postfixe::Pourcent => verifier(x / 100.0),
        Postfixe::Factorielle => factorielle(x),
    }
}

/// n! en f64, dépassement vérifié à chaque produit (171! est déjà infini).
fn factorielle(x: f64) -> Result<f64, ErreurCalcul> {
    if x < 0.0 || x.floor() != x {
        return Err(ErreurCalcul::Domaine);
    }
    let n = x.to_u64().ok_or(ErreurCalcul::Depassement)?;
    let mut acc = 1.0_f64;
    for k in 2..=n {
        acc *= k as f64;
        if acc.is_infinite() {
            return Err(ErreurCalcul::Depassement);
        }
    }
    Ok(acc)
}

fn verifier(x: f64) -> Result<f64, ErreurCalcul> {
    if x.is_nan() {
        Err(ErreurCalcul::NonNombre)
    } else if x.is_infinite() {
        Err(ErreurCalcul::Depassement)
    } else {
        Ok(x)
    }
}
