// src/noyau/format.rs
//
// Texte d’un résultat tel que l’affichage le montre (sans séparateurs de milliers,
// ils restent à l’appelant).
// - "-0" -> "0"
// - exposant décimal >= 16 ou <= -10 : mantisseEexposant
// - sinon : valeur binaire exacte arrondie (demi vers le haut) à au plus
//   CHIFFRES_MAX chiffres significatifs, zéros finaux retirés

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::reglages::{CHIFFRES_FRACTION_MAX, CHIFFRES_MAX};

const EXPOSANT_MAX: i32 = 16;
const EXPOSANT_MIN: i32 = -10;

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^chiffres, positif) en texte décimal.
fn scaled_to_decimal(scaled: &BigInt, chiffres: usize) -> String {
    let scale = pow10(chiffres);
    let int_part = scaled / &scale;
    let frac_part = scaled % &scale;

    if chiffres == 0 {
        return format!("{int_part}");
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < chiffres {
        frac.insert(0, '0');
    }
    format!("{int_part}.{frac}")
}

/// |r| -> entier “scalé” = floor(|r| * 10^chiffres + 1/2)
fn arrondi_scaled(r: &BigRational, chiffres: usize) -> BigInt {
    let r = r.abs();
    let deux = BigInt::from(2);
    let n = r.numer() * pow10(chiffres) * &deux + r.denom();
    n / (r.denom() * deux)
}

/// "1.2500" -> "1.25", "3.000" -> "3"
fn sans_zeros_finaux(texte: &str) -> &str {
    if !texte.contains('.') {
        return texte;
    }
    texte.trim_end_matches('0').trim_end_matches('.')
}

/* ------------------------ API ------------------------ */

/// Résultat -> texte affichable, `chiffres` après la virgule (plafonné).
/// None si la valeur n’est pas finie.
pub fn format_resultat(valeur: f64, chiffres: usize) -> Option<String> {
    if !valeur.is_finite() {
        return None;
    }
    if valeur == 0.0 {
        return Some("0".to_string());
    }
    let chiffres = chiffres.min(CHIFFRES_FRACTION_MAX);

    let exposant = exposant_decimal(valeur)?;
    if exposant >= EXPOSANT_MAX || exposant <= EXPOSANT_MIN {
        return format_scientifique(valeur, chiffres.min(CHIFFRES_MAX - 1));
    }

    // au-delà de CHIFFRES_MAX chiffres significatifs : bruit binaire
    let significatifs = (CHIFFRES_MAX as i32 - 1 - exposant).max(0) as usize;
    decimal_arrondi(valeur, chiffres.min(significatifs))
}

/// Valeur -> texte d’un jeton nombre (pas d’exposant, au plus `chiffres_max`
/// chiffres en comptant le zéro de tête). None si la partie entière déborde.
pub(crate) fn texte_jeton(valeur: f64, chiffres_max: usize) -> Option<String> {
    let exact = BigRational::from_float(valeur)?;
    let entiers = exact.abs().to_integer().to_str_radix(10).len();
    if entiers > chiffres_max {
        return None;
    }
    let texte = decimal_arrondi(valeur, chiffres_max - entiers)?;
    // 999…9.6 arrondi gagne un chiffre
    let total = texte.chars().filter(|c| c.is_ascii_digit()).count();
    (total <= chiffres_max).then_some(texte)
}

/// Arrondi demi vers le haut à `chiffres` décimales, "-0" -> "0".
fn decimal_arrondi(valeur: f64, chiffres: usize) -> Option<String> {
    let exact = BigRational::from_float(valeur)?;
    let scaled = arrondi_scaled(&exact, chiffres);
    if scaled.is_zero() {
        return Some("0".to_string());
    }
    let texte = scaled_to_decimal(&scaled, chiffres);
    let texte = sans_zeros_finaux(&texte);
    Some(if valeur < 0.0 {
        format!("-{texte}")
    } else {
        texte.to_string()
    })
}

/// Exposant de l’écriture scientifique la plus courte ("1.5e-12" -> -12).
fn exposant_decimal(valeur: f64) -> Option<i32> {
    let texte = format!("{:e}", valeur.abs());
    texte.split_once('e')?.1.parse().ok()
}

fn format_scientifique(valeur: f64, chiffres: usize) -> Option<String> {
    let texte = format!("{:.*e}", chiffres, valeur.abs());
    let (mantisse, exposant) = texte.split_once('e')?;
    let signe = if valeur < 0.0 { "-" } else { "" };
    Some(format!("{signe}{}E{exposant}", sans_zeros_finaux(mantisse)))
}
