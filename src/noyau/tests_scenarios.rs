//! Scénarios de bout en bout : texte LaTeX -> texte final + démarche.
//!
//! Chaque test passe par `resoudre` (tables et réglages standard).

use super::erreur::ErreurNoyau;
use super::{resoudre, Issue};

fn ok(entree: &str) -> super::Solution {
    resoudre(entree).unwrap_or_else(|e| panic!("entree={entree:?} err={e}"))
}

fn assert_texte(entree: &str, attendu: &str) {
    let s = ok(entree);
    assert_eq!(s.texte, attendu, "entree={entree:?} demarche={:#?}", s.demarche);
}

fn assert_resolu(entree: &str, attendu: &str) {
    let s = ok(entree);
    assert_eq!(s.texte, attendu, "entree={entree:?} demarche={:#?}", s.demarche);
    assert_eq!(s.issue, Issue::Resolu, "entree={entree:?}");
}

/* ------------------------ Arithmétique ------------------------ */

#[test]
fn sc_somme_simple() {
    let s = ok("2+2");
    assert_eq!(s.texte, "4");
    assert_eq!(s.issue, Issue::Resolu);
    assert_eq!(s.demarche.len(), 1);
    assert_eq!(s.lecture.as_deref(), Some("4"));
}

#[test]
fn sc_priorite_produit() {
    let s = ok("2+3*4");
    assert_eq!(s.texte, "14");
    assert!(
        s.demarche[0].starts_with("3\\cdot 4 → 12"),
        "démarche: {:?}",
        s.demarche
    );
}

#[test]
fn sc_parenthese_interne_d_abord() {
    let s = ok("2*(3+4)");
    assert_eq!(s.texte, "14");
    assert_eq!(s.demarche.len(), 2);
    assert!(s.demarche[0].starts_with("3+4 → 7"), "{:?}", s.demarche);
    assert!(s.demarche[0].ends_with("2\\cdot(7)"), "{:?}", s.demarche);
}

#[test]
fn sc_fractions_exactes() {
    assert_resolu("\\frac{1}{3}+\\frac{1}{3}", "\\frac{2}{3}");
    assert_resolu("\\dfrac{3}{4}-1", "-\\frac{1}{4}");
    assert_resolu("0.5+0.25", "\\frac{3}{4}");
}

#[test]
fn sc_racines_et_binome() {
    assert_resolu("\\sqrt{16}", "4");
    assert_resolu("\\sqrt[3]{27}", "3");
    assert_resolu("\\binom{5}{2}", "10");
    assert_texte("\\sqrt{2}", "1.4142135623");
}

#[test]
fn sc_puissances() {
    assert_resolu("2^{10}", "1024");
    assert_resolu("-2^2", "-4");
    assert_resolu("2^{-1}", "\\frac{1}{2}");
}

#[test]
fn sc_gauche_a_droite_meme_palier() {
    assert_resolu("8/2*4", "16");
    assert_resolu("10-3-2", "5");
}

/* ------------------------ Trigonométrie (degrés) ------------------------ */

#[test]
fn sc_trig_angles_speciaux() {
    assert_resolu("\\sin(90)", "1");
    assert_resolu("\\sin(30)", "\\frac{1}{2}");
    assert_resolu("\\cos(60)+\\sin(30)", "1");
    assert_resolu("\\arcsin(\\frac{1}{2})", "30");
    assert_resolu("2\\tan(45)", "2");
}

#[test]
fn sc_tan_90_domaine() {
    assert!(matches!(resoudre("\\tan(90)"), Err(ErreurNoyau::Domaine(_))));
    assert!(matches!(resoudre("tan(100)"), Err(ErreurNoyau::Domaine(_))));
}

/* ------------------------ Algèbre ------------------------ */

#[test]
fn sc_coefficient_isole() {
    let s = ok("2x=8");
    assert_eq!(s.texte, "x=4");
    assert_eq!(s.issue, Issue::Resolu);
    assert!(s.demarche[0].starts_with("isolement"), "{:?}", s.demarche);
}

#[test]
fn sc_developpement_puis_isolement() {
    assert_resolu("2(x+1)=8", "x=3");
    assert_resolu("-(x+1)=3", "x=-4");
}

#[test]
fn sc_variables_des_deux_cotes() {
    assert_resolu("3x+2=2x+5", "x=3");
    assert_resolu("8=2x", "x=4");
    assert_resolu("x+x=10", "x=5");
}

#[test]
fn sc_carre() {
    assert_resolu("x^2=9", "x=3");
    assert_resolu("x^{3}=-8", "x=-2");
}

#[test]
fn sc_coefficient_fractionnaire() {
    assert_resolu("\\frac{x}{2}=3", "x=6");
    assert_resolu("3x=2", "x=\\frac{2}{3}");
}

#[test]
fn sc_expression_sans_egalite_simplifiee() {
    assert_resolu("2x+3x", "5x");
    assert_resolu("x+1+x", "2x+1");
    assert_resolu("(x+1)^2", "x^2+2x+1");
    assert_eq!(ok("x+1").demarche.len(), 0);
}

#[test]
fn sc_quadratique_partielle() {
    let s = ok("x^2+x=6");
    assert_eq!(s.texte, "x^2+x=6");
    assert_eq!(s.issue, Issue::Partiel);
}

#[test]
fn sc_plusieurs_egalites_partiel() {
    let s = ok("x=2=3");
    assert_eq!(s.issue, Issue::Partiel);
    assert_eq!(s.texte, "x=2=3");
}

#[test]
fn sc_identite_et_contradiction() {
    assert_resolu("x+1=x+1", "0=0");
    assert_resolu("x=x+1", "0=1");
}

#[test]
fn sc_indices_de_variables() {
    assert_resolu("2x_{1}=6", "x_1=3");
    assert_resolu("x_{12}+x_{12}", "2x_{12}");
}

/* ------------------------ Produit implicite après un groupe ------------------------ */

#[test]
fn sc_valeur_apres_operateur_a_groupes() {
    assert_resolu("\\frac{1}{2}x=3", "x=6");
    assert_resolu("\\sqrt{4}x=8", "x=4");
    assert_resolu("2^{2}x=8", "x=2");
    assert_resolu("\\sin(30)x=1", "x=2");
    assert_resolu("\\cos(60)x+1=2", "x=2");
}

#[test]
fn sc_valeur_apres_parentheses() {
    assert_resolu("(2+3)4", "20");
    assert_resolu("(3)x=6", "x=2");
    assert_resolu("-2^{2}x", "-4x");
}

#[test]
fn sc_produit_implicite_dans_la_demarche() {
    // frac(1)(2) -> 1/2 s’écrit pareil : première ligne = le produit
    let s = ok("\\frac{1}{2}x=3");
    assert!(
        s.demarche[0].starts_with("\\frac{1}{2}\\cdot x → "),
        "{:?}",
        s.demarche
    );
}

/* ------------------------ Valeurs extrêmes ------------------------ */

#[test]
fn sc_exposant_minimal_sans_panique() {
    let s = ok("2^(-9223372036854775808)");
    assert_eq!(s.texte, "0");
}

#[test]
fn sc_grand_resultat_approche_ecrit_en_chiffres() {
    let s = ok("\\sqrt{2}\\cdot 10^{300}");
    assert!(s.texte.starts_with("14142135623730"), "{}", s.texte);
    assert!(!s.texte.contains("inf"));
    assert_eq!(s.lecture.as_deref(), Some(s.texte.as_str()));
}

/* ------------------------ Erreurs ------------------------ */

#[test]
fn sc_caractere_inconnu() {
    let e = resoudre("2#3").unwrap_err();
    assert_eq!(
        e,
        ErreurNoyau::Lexicale {
            caractere: '#',
            position: 1
        }
    );
    assert_eq!(e.classe(), "lexicale");
}

#[test]
fn sc_parentheses_desequilibrees() {
    assert!(matches!(resoudre("(2+3"), Err(ErreurNoyau::Structurelle(_))));
    assert!(matches!(resoudre("2+3)"), Err(ErreurNoyau::Structurelle(_))));
}

#[test]
fn sc_operande_manquant() {
    assert!(matches!(resoudre("2*"), Err(ErreurNoyau::Structurelle(_))));
    assert!(matches!(resoudre("^3"), Err(ErreurNoyau::Structurelle(_))));
}

#[test]
fn sc_membre_vide() {
    for entree in ["x+1=", "=3", "x==2"] {
        assert!(
            matches!(resoudre(entree), Err(ErreurNoyau::Structurelle(_))),
            "entree={entree:?} => {:?}",
            resoudre(entree)
        );
    }
}

#[test]
fn sc_erreurs_de_domaine() {
    for entree in ["5/0", "\\frac{x}{0}", "\\sqrt{-4}", "x\\cdot y", "\\sin(x)", "2/x"] {
        assert!(
            matches!(resoudre(entree), Err(ErreurNoyau::Domaine(_))),
            "entree={entree:?} => {:?}",
            resoudre(entree)
        );
    }
}

#[test]
fn sc_entree_vide() {
    assert_eq!(resoudre(""), Err(ErreurNoyau::Vide));
}

/* ------------------------ Démarche ------------------------ */

#[test]
fn sc_demarche_lignes_formatees() {
    let s = ok("2(x+1)=8");
    assert!(s.demarche.iter().all(|l| l.contains(" ⟹ ")));
    assert!(s.demarche[0].starts_with("développement"), "{:?}", s.demarche);
    assert!(s.demarche.last().is_some_and(|l| l.ends_with("x=3")));
}
