// src/noyau/format.rs
//
// Reconstruction : liste de jetons -> texte LaTeX
// - entiers en chiffres, rationnels en \frac{p}{q} (signe devant)
// - valeurs approchées : décimal tronqué à `decimales` chiffres, zéros finaux retirés
// - variables : coefficient ±1 élidé, x_1 / x_{12}, x^2 / x^{-1}
// - "+" explicite entre deux valeurs accolées si la droite est positive
// - opérateurs via la table d’affichage ; arguments en {..} si drapeau "accolades"

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::jetons::Jeton;
use super::table::{Forme, Op, Tables};
use super::valeur::Valeur;

pub fn reconstruire(jetons: &[Jeton], tables: &Tables, decimales: usize) -> String {
    let accolades = groupes_en_accolades(jetons, tables);
    let mut out = String::new();
    let mut i = 0;

    while i < jetons.len() {
        let j = &jetons[i];
        i += 1;

        match j {
            Jeton::Nombre(_) | Jeton::Variable { .. } => {
                let precedent_valeur = i > 1 && jetons[i - 2].est_valeur();
                if precedent_valeur && !j.est_negatif() {
                    out.push('+');
                }
                out.push_str(&format_terme(j, decimales));
            }

            Jeton::Operateur { op, indice } => {
                let affichage = tables.affichage(*op);
                out.push_str(affichage);
                if let Some(n) = indice {
                    out.push_str(&format!("[{n}]"));
                }

                let suivant = jetons.get(i).filter(|s| s.est_valeur());

                // 2^{10}, 2^{-1} : exposant de plus d’un caractère
                if *op == Op::Puissance {
                    if let Some(s) = suivant {
                        let t = format_terme(s, decimales);
                        if t.chars().count() > 1 {
                            out.push_str(&format!("{{{t}}}"));
                            i += 1;
                        }
                    }
                    continue;
                }

                // \cdot x, \sin x : séparer le mot de commande de la valeur qui suit
                let mot = affichage.ends_with(|c: char| c.is_ascii_alphabetic());
                if mot && indice.is_none() && suivant.is_some() {
                    out.push(' ');
                }
            }

            Jeton::Parenthese { ouvrante, .. } => {
                let c = match (accolades[i - 1], *ouvrante) {
                    (true, true) => '{',
                    (true, false) => '}',
                    (false, true) => '(',
                    (false, false) => ')',
                };
                out.push(c);
            }
        }
    }

    out
}

/// Parenthèses à afficher en accolades : groupes d’arguments d’un opérateur à drapeau.
fn groupes_en_accolades(jetons: &[Jeton], tables: &Tables) -> Vec<bool> {
    let partenaires = partenaires(jetons);
    let mut marque = vec![false; jetons.len()];

    for (i, j) in jetons.iter().enumerate() {
        let Some(op) = j.operateur() else {
            continue;
        };
        if !tables.accolades(op) {
            continue;
        }

        let nb_groupes = if tables.forme(op) == Forme::DoubleDroite { 2 } else { 1 };
        let mut k = i + 1;
        for _ in 0..nb_groupes {
            let Some(f) = jetons
                .get(k)
                .filter(|p| p.est_ouvrante())
                .and_then(|_| partenaires[k])
            else {
                break;
            };
            marque[k] = true;
            marque[f] = true;
            k = f + 1;
        }
    }

    marque
}

/// Correspondance des parenthèses par pile (tolère un déséquilibre : None).
fn partenaires(jetons: &[Jeton]) -> Vec<Option<usize>> {
    let mut out = vec![None; jetons.len()];
    let mut pile: Vec<usize> = Vec::new();

    for (i, j) in jetons.iter().enumerate() {
        if j.est_ouvrante() {
            pile.push(i);
        } else if j.est_fermante() {
            if let Some(o) = pile.pop() {
                out[o] = Some(i);
                out[i] = Some(o);
            }
        }
    }
    out
}

/* ------------------------ Termes ------------------------ */

pub fn format_terme(j: &Jeton, decimales: usize) -> String {
    match j {
        Jeton::Nombre(v) => format_valeur(v, decimales),
        Jeton::Variable {
            coeff,
            nom,
            puissance,
        } => {
            let c = if coeff.est_un() {
                String::new()
            } else if coeff.neg().est_un() {
                "-".to_string()
            } else {
                format_valeur(coeff, decimales)
            };
            let p = match puissance {
                1 => String::new(),
                p if (0..10).contains(p) => format!("^{p}"),
                p => format!("^{{{p}}}"),
            };
            format!("{c}{}{p}", format_nom(nom))
        }
        _ => String::new(),
    }
}

/// x_12 => x_{12}
fn format_nom(nom: &str) -> String {
    match nom.split_once('_') {
        Some((base, indice)) if indice.chars().count() > 1 => format!("{base}_{{{indice}}}"),
        _ => nom.to_string(),
    }
}

pub fn format_valeur(v: &Valeur, decimales: usize) -> String {
    match v {
        Valeur::Exacte(r) => format_rationnel(r),
        Valeur::Approchee(x) => format_approche(*x, decimales),
    }
}

fn format_rationnel(r: &BigRational) -> String {
    if r.denom().is_one() {
        return format!("{}", r.numer());
    }
    let signe = if r.is_negative() { "-" } else { "" };
    format!("{signe}\\frac{{{}}}{{{}}}", r.numer().abs(), r.denom())
}

/// Décimal tronqué, zéros finaux retirés, jamais "-0".
fn format_approche(x: f64, decimales: usize) -> String {
    let echelle = 10f64.powi(decimales as i32);
    // |x| très grand : plus de partie fractionnaire en f64, on n’échelonne pas
    let tronque = if (x * echelle).is_finite() {
        (x * echelle).trunc() / echelle
    } else {
        x.trunc()
    };
    let mut s = format!("{tronque:.decimales$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/* ------------------------ Décimal ------------------------ */

/// Écriture décimale tronquée d’une valeur (exacte comprise) : 2/3 => 0.6666666666.
pub fn decimal(v: &Valeur, decimales: usize) -> String {
    let Valeur::Exacte(r) = v else {
        return format_approche(v.vers_f64(), decimales);
    };

    let echelle = BigInt::from(10).pow(decimales as u32);
    // troncature vers zéro (division entière BigInt)
    let scale = (r.numer() * &echelle) / r.denom();
    let negatif = r.is_negative();
    let scale = scale.abs();

    let entiere = &scale / &echelle;
    let fraction = &scale % &echelle;

    let mut s = if negatif && !(entiere.is_zero() && fraction.is_zero()) {
        format!("-{entiere}")
    } else {
        format!("{entiere}")
    };
    if decimales > 0 {
        let mut f = fraction.to_str_radix(10);
        while f.len() < decimales {
            f.insert(0, '0');
        }
        let f = f.trim_end_matches('0');
        if !f.is_empty() {
            s.push('.');
            s.push_str(f);
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::tokenize;
    use crate::noyau::normalisation::normaliser;

    fn t() -> Tables {
        Tables::standard()
    }

    fn rendu(jetons: &[Jeton]) -> String {
        reconstruire(jetons, &t(), 10)
    }

    fn brut(s: &str) -> String {
        let j = tokenize(&normaliser(s), &t()).unwrap();
        rendu(&j)
    }

    #[test]
    fn entiers_et_fractions() {
        assert_eq!(rendu(&[Jeton::Nombre(Valeur::from(14))]), "14");
        assert_eq!(
            rendu(&[Jeton::Nombre(Valeur::rationnel(-2, 3))]),
            "-\\frac{2}{3}"
        );
    }

    #[test]
    fn variables() {
        let x = |c: i64, p: i32| Jeton::variable(Valeur::from(c), "x", p);
        assert_eq!(rendu(&[x(1, 1)]), "x");
        assert_eq!(rendu(&[x(-1, 2)]), "-x^2");
        assert_eq!(rendu(&[x(3, -1)]), "3x^{-1}");
        assert_eq!(
            rendu(&[Jeton::variable(Valeur::un(), "x_12", 1)]),
            "x_{12}"
        );
    }

    #[test]
    fn plus_entre_valeurs_accolees() {
        let j = [
            Jeton::variable(Valeur::from(2), "x", 1),
            Jeton::Nombre(Valeur::from(3)),
            Jeton::op(Op::Egal),
            Jeton::Nombre(Valeur::from(-1)),
        ];
        assert_eq!(rendu(&j), "2x+3=-1");
        let j = [
            Jeton::variable(Valeur::un(), "x", 1),
            Jeton::Nombre(Valeur::from(-3)),
        ];
        assert_eq!(rendu(&j), "x-3");
    }

    #[test]
    fn accolades_des_arguments() {
        assert_eq!(brut("\\frac{6}{2}"), "\\frac{6}{2}");
        assert_eq!(brut("\\sqrt[3]{8}"), "\\sqrt[3]{8}");
        assert_eq!(brut("\\binom{5}{2}"), "\\binom{5}{2}");
        assert_eq!(brut("2*(3+4)"), "2\\cdot(3+4)");
        assert_eq!(brut("\\sin(30)"), "\\sin(30)");
    }

    #[test]
    fn exposant_a_plusieurs_caracteres() {
        assert_eq!(brut("2^10"), "2^{10}");
        assert_eq!(brut("2^{10}+1"), "2^{10}+1");
        assert_eq!(brut("x^2"), "x^2");
    }

    #[test]
    fn approche_tronque() {
        assert_eq!(format_valeur(&Valeur::Approchee(0.5), 10), "0.5");
        assert_eq!(
            format_valeur(&Valeur::Approchee(std::f64::consts::SQRT_2), 4),
            "1.4142"
        );
        assert_eq!(format_valeur(&Valeur::Approchee(-0.00001), 2), "0");
    }

    #[test]
    fn approche_tres_grand_reste_fini() {
        // x·10^10 déborde le f64 : écriture entière directe
        let s = format_valeur(&Valeur::Approchee(1.5e300), 10);
        assert!(s.starts_with("15"), "{s}");
        assert_eq!(s.len(), 301);
        assert!(s.chars().all(|c| c.is_ascii_digit()), "{s}");
        assert_eq!(decimal(&Valeur::Approchee(-1.5e300), 10).len(), 302);
    }

    #[test]
    fn decimal_d_un_rationnel() {
        assert_eq!(decimal(&Valeur::rationnel(2, 3), 5), "0.66666");
        assert_eq!(decimal(&Valeur::rationnel(-1, 4), 10), "-0.25");
        assert_eq!(decimal(&Valeur::from(7), 3), "7");
    }
}
