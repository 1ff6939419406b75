// src/noyau/texte.rs
//
// Lecture d’une équation texte (collée, saisie clavier, reprise d’historique)
// rejouée touche par touche dans un constructeur neuf.
//
// Règle : la première position que le constructeur refuse fait échouer
// toute la lecture (None, jamais de résultat partiel).

use tracing::debug;

use super::constructeur::Constructeur;
use super::jetons::Fonction;

/// Alias de fonctions en tête. Réciproques d’abord : "sin-1(" avant "sin(".
const ALIAS: &[(&[&str], Fonction)] = &[
    (&["sin⁻¹(", "arcsin(", "sin-1(", "asin("], Fonction::ArcSin),
    (&["cos⁻¹(", "arccos(", "cos-1(", "acos("], Fonction::ArcCos),
    (&["tan⁻¹(", "arctan(", "tan-1(", "atan("], Fonction::ArcTan),
    (&["sin("], Fonction::Sin),
    (&["cos("], Fonction::Cos),
    (&["tan("], Fonction::Tan),
    (&["exp("], Fonction::Exp),
    (&["ln("], Fonction::Ln),
    (&["lg(", "log("], Fonction::Lg),
];

const RACINE: &str = "sqrt(";

/// Texte libre -> constructeur, ou None à la première position illisible.
pub fn lire_equation(texte: &str) -> Option<Constructeur> {
    let chars: Vec<char> = normaliser(texte).chars().collect();
    let mut c = Constructeur::new();
    let mut i = 0;

    while i < chars.len() {
        let reste = &chars[i..];
        match lire_position(&mut c, reste) {
            Some(avance) => i += avance,
            None => {
                let position: String = reste.iter().take(8).collect();
                debug!(i, %position, "équation illisible");
                return None;
            }
        }
    }
    Some(c)
}

/// Synonymes ramenés à la forme du clavier, blancs retirés.
fn normaliser(texte: &str) -> String {
    texte
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '/' => '÷',
            '−' | '－' | '–' => '-',
            '＋' => '+',
            autre => autre,
        })
        .collect()
}

/// Rejoue la position courante ; renvoie le nombre de caractères consommés.
fn lire_position(c: &mut Constructeur, reste: &[char]) -> Option<usize> {
    let premier = *reste.first()?;

    // a) synonymes de ×
    if matches!(premier, 'x' | '*' | '×') {
        return c.ajouter_char('×').then_some(1);
    }

    // b) parenthèses : le choix "(" / ")" revient au constructeur
    if premier == '(' || premier == ')' {
        return c.ajouter_parenthese().map(|_| 1);
    }

    // c) touches directes (e est différé : constante ou exposant)
    if premier != 'e' && c.ajouter_char(premier) {
        return Some(1);
    }

    // d) notation scientifique : E…, ou e suivi d’un chiffre -> × 10 ^
    let suivant_chiffre = reste.get(1).is_some_and(|d| d.is_ascii_digit());
    if premier == 'E' || (premier == 'e' && suivant_chiffre) {
        if c.ajouter_char('×') {
            for touche in ['1', '0', '^'] {
                if !c.ajouter_char(touche) {
                    return None;
                }
            }
            return Some(1);
        }
        // rien à multiplier : e reste la constante
        return c.ajouter_char('e').then_some(1);
    }

    // e) fonctions en tête
    if let Some((fonction, longueur)) = alias_en_tete(reste) {
        return c.ajouter_fonction(fonction.nom()).then_some(longueur);
    }
    // sqrt( : √ n’insère pas de "(", celle du préfixe est posée ici
    if commence_par(reste, RACINE) {
        let ok = c.ajouter_fonction(Fonction::Racine.nom()) && c.ajouter_parenthese() == Some('(');
        return ok.then_some(RACINE.chars().count());
    }

    // f) e seul : la constante
    if premier == 'e' {
        return c.ajouter_char('e').then_some(1);
    }

    None
}

fn alias_en_tete(reste: &[char]) -> Option<(Fonction, usize)> {
    ALIAS.iter().find_map(|(prefixes, fonction)| {
        prefixes
            .iter()
            .find(|p| commence_par(reste, p))
            .map(|p| (*fonction, p.chars().count()))
    })
}

fn commence_par(reste: &[char], prefixe: &str) -> bool {
    let n = prefixe.chars().count();
    reste.len() >= n && reste.iter().take(n).copied().eq(prefixe.chars())
}
