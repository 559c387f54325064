//! Noyau — évaluation d’UNE règle
//!
//! Opérandes déjà dépliés (un jeton par côté) + nom d’opérateur => un jeton de remplacement.
//! Les groupes à plusieurs termes ne passent jamais ici : voir developpement.rs.

use super::erreur::{ErreurNoyau, Resultat};
use super::jetons::Jeton;
use super::table::Op;
use super::trig::{evaluer_trig, ModeAngle, TrigFn};
use super::valeur::Valeur;

/// Opérandes dépliés d’une position.
#[derive(Clone, Copy, Debug, Default)]
pub struct Operandes<'a> {
    pub gauche: Option<&'a Jeton>,
    pub droite: Option<&'a Jeton>,
    pub droite2: Option<&'a Jeton>,
    pub modificateur: Option<u32>,
}

pub fn evaluer(op: Op, o: &Operandes<'_>, mode: ModeAngle) -> Resultat<Jeton> {
    match op {
        Op::Plus => additionner(exige(o.gauche)?, exige(o.droite)?),
        Op::Moins => additionner(exige(o.gauche)?, &exige(o.droite)?.oppose()),
        Op::Fois => multiplier(exige(o.gauche)?, exige(o.droite)?),
        Op::Divise => diviser(exige(o.gauche)?, exige(o.droite)?),
        Op::Fraction => diviser(exige(o.droite)?, exige(o.droite2)?),
        Op::Puissance => puissance(exige(o.gauche)?, exige(o.droite)?),

        Op::Racine => {
            let x = numerique(o.droite)?;
            Ok(Jeton::Nombre(x.racine(o.modificateur.unwrap_or(2))?))
        }

        Op::Binome => {
            let n = numerique(o.droite)?;
            let k = numerique(o.droite2)?;
            Ok(Jeton::Nombre(Valeur::binome(n, k)?))
        }

        Op::Sin => trig(TrigFn::Sin, o, mode),
        Op::Cos => trig(TrigFn::Cos, o, mode),
        Op::Tan => trig(TrigFn::Tan, o, mode),
        Op::Asin => trig(TrigFn::Asin, o, mode),
        Op::Acos => trig(TrigFn::Acos, o, mode),
        Op::Atan => trig(TrigFn::Atan, o, mode),

        // défense : la localisation ne choisit jamais "="
        Op::Egal => Err(ErreurNoyau::domaine("opérateur '=' non réductible")),
    }
}

/* ------------------------ Règles ------------------------ */

/// Somme de deux termes semblables (nombres, ou même variable à la même puissance).
pub(crate) fn additionner(g: &Jeton, d: &Jeton) -> Resultat<Jeton> {
    if !g.meme_genre(d) {
        return Err(ErreurNoyau::domaine("somme de termes non semblables"));
    }
    let (Some(a), Some(b)) = (g.coefficient(), d.coefficient()) else {
        return Err(ErreurNoyau::domaine("opérande non numérique"));
    };
    Ok(g.avec_coefficient(a.add(b)))
}

pub(crate) fn multiplier(g: &Jeton, d: &Jeton) -> Resultat<Jeton> {
    match (g, d) {
        (Jeton::Nombre(a), Jeton::Nombre(b)) => Ok(Jeton::Nombre(a.mul(b))),

        (Jeton::Nombre(a), v @ Jeton::Variable { coeff, .. })
        | (v @ Jeton::Variable { coeff, .. }, Jeton::Nombre(a)) => {
            Ok(v.avec_coefficient(a.mul(coeff)))
        }

        (
            Jeton::Variable {
                coeff: c1,
                nom: n1,
                puissance: p1,
            },
            Jeton::Variable {
                coeff: c2,
                nom: n2,
                puissance: p2,
            },
        ) => {
            if n1 != n2 {
                return Err(ErreurNoyau::domaine(format!(
                    "produit de variables différentes ({n1}·{n2}) non supporté"
                )));
            }
            let p = p1
                .checked_add(*p2)
                .ok_or_else(|| ErreurNoyau::domaine("exposant trop grand"))?;
            Ok(terme(c1.mul(c2), n1, p))
        }

        _ => Err(ErreurNoyau::domaine("opérande non numérique")),
    }
}

pub(crate) fn diviser(g: &Jeton, d: &Jeton) -> Resultat<Jeton> {
    match (g, d) {
        (_, Jeton::Nombre(b)) => {
            let a = g
                .coefficient()
                .ok_or_else(|| ErreurNoyau::domaine("opérande non numérique"))?;
            Ok(g.avec_coefficient(a.div(b)?))
        }

        (
            Jeton::Variable {
                coeff: c1,
                nom: n1,
                puissance: p1,
            },
            Jeton::Variable {
                coeff: c2,
                nom: n2,
                puissance: p2,
            },
        ) if n1 == n2 => {
            let p = p1
                .checked_sub(*p2)
                .ok_or_else(|| ErreurNoyau::domaine("exposant trop grand"))?;
            Ok(terme(c1.div(c2)?, n1, p))
        }

        (_, Jeton::Variable { nom, .. }) => Err(ErreurNoyau::domaine(format!(
            "division par la variable {nom} non supportée"
        ))),

        _ => Err(ErreurNoyau::domaine("opérande non numérique")),
    }
}

fn puissance(base: &Jeton, exposant: &Jeton) -> Resultat<Jeton> {
    let Jeton::Nombre(e) = exposant else {
        return Err(ErreurNoyau::domaine("exposant non numérique"));
    };

    match base {
        Jeton::Nombre(b) => Ok(Jeton::Nombre(b.puissance(e)?)),
        Jeton::Variable {
            coeff,
            nom,
            puissance: p,
        } => {
            let n = e
                .entier_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| {
                    ErreurNoyau::domaine(format!("exposant non entier sur la variable {nom}"))
                })?;
            let p = p
                .checked_mul(n)
                .ok_or_else(|| ErreurNoyau::domaine("exposant trop grand"))?;
            Ok(terme(coeff.puissance(e)?, nom, p))
        }
        _ => Err(ErreurNoyau::domaine("opérande non numérique")),
    }
}

fn trig(f: TrigFn, o: &Operandes<'_>, mode: ModeAngle) -> Resultat<Jeton> {
    let x = numerique(o.droite)?;
    Ok(Jeton::Nombre(evaluer_trig(f, x, mode)?))
}

/* ------------------------ Outils ------------------------ */

/// coeff·nom^p ; p = 0 => nombre ; coeff = 0 => 0.
fn terme(coeff: Valeur, nom: &str, p: i32) -> Jeton {
    if p == 0 || coeff.est_zero() {
        Jeton::Nombre(coeff)
    } else {
        Jeton::variable(coeff, nom, p)
    }
}

fn exige(j: Option<&Jeton>) -> Resultat<&Jeton> {
    j.ok_or_else(|| ErreurNoyau::domaine("opérande manquant"))
}

fn numerique(j: Option<&Jeton>) -> Resultat<&Valeur> {
    match exige(j)? {
        Jeton::Nombre(v) => Ok(v),
        Jeton::Variable { nom, .. } => Err(ErreurNoyau::domaine(format!(
            "opérande non numérique ({nom})"
        ))),
        _ => Err(ErreurNoyau::domaine("opérande non numérique")),
    }
}
