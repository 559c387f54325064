//! Tests fuzz safe : robustesse + déterminisme + bornes contrôlées.
//!
//! But : marteler la boucle de résolution sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - erreurs de domaine acceptées (division par zéro, variable sous une fonction, ...)
//! - invariant clé : démarche ≤ borne d’itérations, et même entrée => même sortie

use std::time::{Duration, Instant};

use super::erreur::ErreurNoyau;
use super::{resoudre, Issue, Reglages};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

/// Entrées bien formées : seules les erreurs de domaine sont normales.
fn est_erreur_attendue(e: &ErreurNoyau) -> bool {
    matches!(e, ErreurNoyau::Domaine(_))
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "x".to_string(),
        1 => format!("{}x", 1 + rng.pick(5)),
        2 => format!("\\frac{{{}}}{{{}}}", rng.pick(7), 1 + rng.pick(6)),
        _ => format!("{}", rng.pick(10)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(10) {
        0 => gen_atom(rng),
        1 => format!("{}+{}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("{}-{}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!(
            "({})\\cdot({})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        4 => format!("({})/{}", gen_expr(rng, depth - 1), 1 + rng.pick(4)),
        5 => format!("({})^{}", gen_expr(rng, depth - 1), rng.pick(3)),
        6 => format!("\\sin({})", 30 * rng.pick(12)),
        7 => format!("\\sqrt{{{}}}", rng.pick(17)),
        8 => format!("{}({})", 1 + rng.pick(4), gen_expr(rng, depth - 1)),
        _ => {
            if rng.coin() {
                format!("\\frac{{{}}}{{{}}}", gen_expr(rng, depth - 1), 1 + rng.pick(3))
            } else {
                format!("{}/({})", rng.pick(5), gen_expr(rng, depth - 1))
            }
        }
    }
}

fn gen_equation(rng: &mut Rng) -> String {
    format!("{}={}", gen_expr(rng, 2), gen_expr(rng, 1))
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_borne() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);
    let borne = Reglages::default().max_iterations();

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;

    for i in 0..150 {
        budget(t0, max);

        let expr = if i % 3 == 0 {
            gen_equation(&mut rng)
        } else {
            gen_expr(&mut rng, 3)
        };

        let a = resoudre(&expr);
        let b = resoudre(&expr);
        assert_eq!(a, b, "non déterministe: expr={expr:?}");

        match a {
            Ok(s) => {
                assert!(
                    s.demarche.len() <= borne,
                    "démarche trop longue: expr={expr:?}"
                );
                assert!(!s.texte.is_empty(), "texte vide: expr={expr:?}");
                seen_ok += 1;
            }
            Err(e) => {
                assert!(
                    est_erreur_attendue(&e),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
            }
        }
    }

    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
}

#[test]
fn fuzz_safe_equations_lineaires_resolues() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..80 {
        budget(t0, max);

        // k(x + a) = k·(s + a) admet s pour solution
        let k = 1 + rng.pick(6) as i64;
        let a = rng.pick(9) as i64;
        let s = rng.pick(21) as i64 - 10;
        let expr = format!("{k}(x+{a})={}", k * (s + a));

        let sol = resoudre(&expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
        assert_eq!(sol.texte, format!("x={s}"), "expr={expr:?} {:#?}", sol.demarche);
        assert_eq!(sol.issue, Issue::Resolu);
    }
}

#[test]
fn fuzz_safe_longue_somme_partielle() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 40 termes : la borne coupe la réduction, sans erreur
    let expr = vec!["1"; 40].join("+");
    let s = resoudre(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    assert_eq!(s.issue, Issue::Partiel);
    assert_eq!(s.demarche.len(), Reglages::default().max_iterations());
    assert!(s.texte.starts_with("11+"), "texte: {}", s.texte);
}
