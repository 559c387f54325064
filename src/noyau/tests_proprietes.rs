//! Propriétés (proptest) : arithmétique exacte, équations linéaires,
//! reconstruction stable, robustesse sur entrées arbitraires.

use proptest::prelude::*;

use super::{resoudre, Issue, Reglages};

/// ax+b tel que le reconstructeur l’écrit.
fn lineaire(a: i64, b: i64) -> String {
    let terme_x = match a {
        1 => "x".to_string(),
        -1 => "-x".to_string(),
        a => format!("{a}x"),
    };
    match b {
        0 => terme_x,
        b if b > 0 => format!("{terme_x}+{b}"),
        b => format!("{terme_x}{b}"),
    }
}

proptest! {
    #[test]
    fn somme_et_produit_exacts(a in 0u32..1000, b in 0u32..1000, c in 0u32..1000) {
        let s = resoudre(&format!("{a}+{b}*{c}")).unwrap();
        let attendu = u64::from(a) + u64::from(b) * u64::from(c);
        prop_assert_eq!(s.texte, attendu.to_string());
        prop_assert_eq!(s.issue, Issue::Resolu);
    }

    #[test]
    fn equation_lineaire_resolue(k in 1i64..20, x in -50i64..50, b in 0i64..50) {
        let entree = format!("{k}x+{b}={}", k * x + b);
        let s = resoudre(&entree).unwrap();
        prop_assert_eq!(s.texte, format!("x={x}"));
        prop_assert_eq!(s.issue, Issue::Resolu);
    }

    #[test]
    fn forme_reduite_reconstruite_a_l_identique(
        a in prop_oneof![(-20i64..=-1i64), (1i64..=20i64)],
        b in -20i64..20,
    ) {
        let texte = lineaire(a, b);
        let s = resoudre(&texte).unwrap();
        prop_assert_eq!(&s.texte, &texte);
        prop_assert!(s.demarche.is_empty());

        let equation = format!("x={b}");
        prop_assert_eq!(resoudre(&equation).unwrap().texte, equation);
    }

    #[test]
    fn entree_arbitraire_termine(entree in "[0-9x+*/^()=-]{0,16}") {
        let borne = Reglages::default().max_iterations();
        let a = resoudre(&entree);
        let b = resoudre(&entree);
        prop_assert_eq!(&a, &b);
        if let Ok(s) = a {
            prop_assert!(s.demarche.len() <= borne);
        }
    }
}
