//! Tests scientifiques (campagne) : scénarios de la calculatrice + limites contrôlées.
//!
//! But : rejouer les équations qu’un utilisateur tape ou colle réellement.
//! - tolérance relative pour les flottants (tan(45°) n’est pas exactement 1)
//! - budget temps global pour les stress
//! - RUST_LOG=calculatrice_pas_a_pas=trace pour suivre les portées réduites

use std::f64::consts::{E, PI};
use std::time::{Duration, Instant};

use super::constructeur::Constructeur;
use super::erreurs::ErreurCalcul;
use super::format::format_resultat;
use super::reglages::{ModeAngle, CHIFFRES_FRACTION_DEFAUT};
use super::texte::lire_equation;

fn init_traces() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn calc(texte: &str, mode: ModeAngle) -> Result<f64, ErreurCalcul> {
    init_traces();
    lire_equation(texte)
        .unwrap_or_else(|| panic!("illisible: {texte:?}"))
        .calculer(mode)
}

fn deg_ok(texte: &str) -> f64 {
    calc(texte, ModeAngle::Degres).unwrap_or_else(|e| panic!("expr={texte:?} err={e}"))
}

fn assert_proche(texte: &str, attendu: f64) {
    let v = deg_ok(texte);
    let tolerance = 1e-9 * attendu.abs().max(1.0);
    assert!(
        (v - attendu).abs() <= tolerance,
        "expr={texte:?} : {v} != {attendu}"
    );
}

/// Saisie au clavier : "(" et ")" passent par la parenthèse intelligente.
fn clavier(touches: &str) -> Constructeur {
    let mut c = Constructeur::new();
    for ch in touches.chars() {
        let ok = if ch == '(' || ch == ')' {
            c.ajouter_parenthese() == Some(ch)
        } else {
            c.ajouter_char(ch)
        };
        assert!(ok, "touche refusée: {ch:?} dans {touches:?}");
    }
    c
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Scénarios de référence ------------------------ */

#[test]
fn sci_scenarios_de_base() {
    assert_eq!(deg_ok("3+5"), 8.0);
    assert_eq!(deg_ok("6×3"), 18.0);
    assert_eq!(deg_ok("(3+2"), 5.0);
    assert_proche("sin(30)+cos(60)×tan(45)", 1.0);
    assert_proche("9999999×0.0000001", 0.9999999);
    assert_eq!(
        calc("5÷0", ModeAngle::Degres),
        Err(ErreurCalcul::DivisionParZero)
    );
    assert_eq!(calc("√(-1)", ModeAngle::Degres), Err(ErreurCalcul::Domaine));
    assert_eq!(deg_ok("(3+2)!÷(10-5)!+exp(0)"), 2.0);
}

#[test]
fn sci_equations_composees() {
    assert_proche("ln(e^2)+lg(100)×π", 2.0 + 2.0 * PI);
    assert_proche("sin(cos-1(0.5))×√16", 2.0 * 3f64.sqrt());
    assert_proche("√(sin(90)^2+cos(0)^2)", 2f64.sqrt());
    assert_proche("((3+2)!÷(10-5)!+exp(0)", 2.0);
    assert_proche("2^(3!−4)×5÷2", 10.0);
}

#[test]
fn sci_fonctions_dans_une_parenthese_ouverte() {
    // clavier
    let cas = [
        ("(√(4))", 2.0),
        ("3×(√9+1)", 12.0),
        ("2×(1+√(9))", 8.0),
        ("((√(√(16))", 2.0),
    ];
    for (touches, attendu) in cas {
        let c = clavier(touches);
        assert_eq!(c.construire(), touches);
        assert_eq!(c.calculer(ModeAngle::Degres), Ok(attendu), "touches={touches:?}");
    }

    // texte
    assert_eq!(deg_ok("(√(4))"), 2.0);
    assert_eq!(deg_ok("(sqrt(4))"), 2.0);
    assert_eq!(deg_ok("2×(1+sqrt(9))"), 8.0);
    assert_eq!(deg_ok("3×(√9+1)"), 12.0);
    assert_proche("(sin(30)+1)×2", 3.0);
    assert_proche("(1+ln(e))×sqrt(4)", 4.0);
    assert_proche("2(cos(60)+sqrt(2.25))", 4.0);
}

#[test]
fn sci_synonymes_et_alias() {
    assert_proche("arcsin(0.5)", 30.0);
    assert_proche("acos(0)", 90.0);
    assert_proche("tan-1(1)", 45.0);
    assert_proche("log(100)", 2.0);
    assert_eq!(deg_ok("3x4"), 12.0);
    assert_eq!(deg_ok("5/2"), 2.5);
    assert_eq!(deg_ok("3 * 2"), 6.0);
    assert_eq!(deg_ok("sqrt(16)+1"), 5.0);
}

#[test]
fn sci_notation_scientifique_et_constante_e() {
    assert_proche("E+1", E + 1.0);
    assert_proche("2E3", 2000.0);
    assert_proche("1.23e4", 12300.0);
    // e- : constante, pas exposant
    assert_proche("5e-2", 5.0 * E - 2.0);
    assert_proche("5E-2", 0.05);
    assert_proche("1.23E-3", 0.00123);
    assert_proche("1.23e-3", 1.23 * E - 3.0);
    assert_proche("2.5e+2", 2.5 * E + 2.0);
    // rien à multiplier avant e5 : e redevient la constante
    assert_proche("1.5xe5", 1.5 * E * 5.0);
    assert_proche("1.5x+E5", 1.5 * E * 5.0);
    assert_proche("e + 2E3", E + 2000.0);
    assert_proche("(1.5e-2) ÷ (3E-3)", (1.5 * E - 2.0) / 0.003);
}

#[test]
fn sci_mode_radians() {
    let v = calc("sin(π÷2)", ModeAngle::Radians).unwrap();
    assert!((v - 1.0).abs() < 1e-12);
    let v = calc("cos-1(-1)", ModeAngle::Radians).unwrap();
    assert!((v - PI).abs() < 1e-12);
    // le même texte en degrés
    let v = calc("cos-1(-1)", ModeAngle::Degres).unwrap();
    assert!((v - 180.0).abs() < 1e-9);
}

#[test]
fn sci_erreurs_classees() {
    let cas = [
        ("tan(90)", ErreurCalcul::Domaine),
        ("tan(270)", ErreurCalcul::Domaine),
        ("sin-1(2)", ErreurCalcul::Domaine),
        ("ln(0)", ErreurCalcul::Domaine),
        ("lg(-1)", ErreurCalcul::Domaine),
        ("2.5!", ErreurCalcul::Domaine),
        ("0^0", ErreurCalcul::NonNombre),
        ("171!", ErreurCalcul::Depassement),
        ("exp(710)", ErreurCalcul::Depassement),
        ("1÷(2-2)", ErreurCalcul::DivisionParZero),
    ];
    for (texte, attendu) in cas {
        assert_eq!(calc(texte, ModeAngle::Degres), Err(attendu), "expr={texte:?}");
    }
}

/* ------------------------ Priorités ------------------------ */

#[test]
fn sci_priorites_operateurs() {
    // × ÷ avant + -
    assert_eq!(deg_ok("2+3×4"), 14.0);
    assert_eq!(deg_ok("20-12÷4"), 17.0);
    // ^ avant × ÷, associatif à droite
    assert_eq!(deg_ok("2×3^2"), 18.0);
    assert_eq!(deg_ok("2^2^3"), 256.0);
    assert_eq!(deg_ok("(2^2)^3"), 64.0);
    // multiplication implicite = ×
    assert_eq!(deg_ok("2(3+4)"), 14.0);
    assert_proche("2π", 2.0 * PI);
    // postfixes avant ^
    assert_eq!(deg_ok("2^3!"), 64.0);
    assert_proche("200×10%", 20.0);
    // -2^2 = -(2^2)
    assert_eq!(deg_ok("-2^2"), -4.0);
    assert_eq!(deg_ok("(-2)^2"), 4.0);
}

/* ------------------------ Affichage ------------------------ */

#[test]
fn sci_nettoyage_affichage() {
    let v = deg_ok("(0.1+0.2)×10");
    assert_eq!(
        format_resultat(v, CHIFFRES_FRACTION_DEFAUT).as_deref(),
        Some("3")
    );

    let v = deg_ok("sin(30)+cos(60)×tan(45)");
    assert_eq!(
        format_resultat(v, CHIFFRES_FRACTION_DEFAUT).as_deref(),
        Some("1")
    );
}

#[test]
fn sci_continuer_apres_egal() {
    let v = deg_ok("7÷2");
    let mut c = Constructeur::depuis_resultat(v).unwrap();
    assert!(c.ajouter_char('×'));
    assert!(c.ajouter_char('2'));
    assert_eq!(c.calculer(ModeAngle::Degres), Ok(7.0));
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_parentheses_imbriquees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);

    // 200 "(" non fermées : une portée réduite par tour
    let mut texte = "(".repeat(200);
    texte.push_str("1+1");
    budget(t0, max);

    assert_eq!(deg_ok(&texte), 2.0);
    budget(t0, max);
}

#[test]
fn sci_stress_longue_somme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);

    let mut c = Constructeur::new();
    for k in 0..500 {
        if k > 0 {
            assert!(c.ajouter_char('+'));
        }
        assert!(c.ajouter_char('1'));
        budget(t0, max);
    }
    assert_eq!(c.calculer(ModeAngle::Degres), Ok(500.0));
}

#[test]
fn sci_stress_racines_en_chaine() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);

    // √√…√65536 : les fonctions se résolvent de droite à gauche
    let mut texte = "√".repeat(4);
    texte.push_str("65536");
    assert_proche(&texte, 2.0);

    let mut texte = "√".repeat(60);
    texte.push_str("2");
    let v = deg_ok(&texte);
    assert!((v - 1.0).abs() < 1e-12);
    budget(t0, max);
}
