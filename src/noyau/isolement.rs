// src/noyau/isolement.rs
//
// Isolement de la variable (flux sans opérateur réductible)
// ---------------------------------------------------------
// (b) k·x^p = n  => x^p = frac(n)(k)           (k ≠ 1)
//     x^p = n    => x = sqrt[p](n)              (p ≥ 2, racine principale)
//     x^p = n    => x = (n)^(1/p)               (p < 0)
// (c) une seule variable, une seule égalité : termes variables à gauche,
//     nombres à droite, signe changé à la traversée (côté vide => 0)
//
// Une expression sans "=" n’est jamais isolée : elle reste telle quelle.

use super::jetons::Jeton;
use super::table::Op;
use super::valeur::Valeur;

#[derive(Clone, Debug, PartialEq)]
pub enum Isolement {
    /// k·x^p = n => x^p = n/k
    Coefficient(Vec<Jeton>),
    /// x^p = n => x = racine p-ième
    Racine(Vec<Jeton>),
    /// variables à gauche, nombres à droite
    Rearrangement(Vec<Jeton>),
}

impl Isolement {
    pub fn libelle(&self) -> &'static str {
        match self {
            Isolement::Coefficient(_) => "isolement (division par le coefficient)",
            Isolement::Racine(_) => "isolement (racine)",
            Isolement::Rearrangement(_) => "réarrangement",
        }
    }

    pub fn jetons(self) -> Vec<Jeton> {
        match self {
            Isolement::Coefficient(j) | Isolement::Racine(j) | Isolement::Rearrangement(j) => j,
        }
    }
}

/// Prochaine règle d’isolement applicable, ou None (forme terminale).
pub fn isoler(jetons: &[Jeton]) -> Option<Isolement> {
    isoler_coefficient(jetons).or_else(|| rearranger(jetons))
}

/// Forme close : valeurs seules, "x = n" ou "n = m".
pub fn est_forme_close(jetons: &[Jeton]) -> bool {
    if !jetons.iter().all(|j| j.est_valeur() || j.est_op(Op::Egal)) {
        return false;
    }
    let egalites = jetons.iter().filter(|j| j.est_op(Op::Egal)).count();
    match (egalites, jetons) {
        (0, _) => true,
        (
            1,
            [Jeton::Variable {
                coeff, puissance: 1, ..
            }, egal, Jeton::Nombre(_)],
        ) => coeff.est_un() && egal.est_op(Op::Egal),
        (1, [Jeton::Nombre(_), egal, Jeton::Nombre(_)]) => egal.est_op(Op::Egal),
        _ => false,
    }
}

fn isoler_coefficient(jetons: &[Jeton]) -> Option<Isolement> {
    let [Jeton::Variable {
        coeff,
        nom,
        puissance,
    }, egal, Jeton::Nombre(n)] = jetons
    else {
        return None;
    };
    if !egal.est_op(Op::Egal) || coeff.est_zero() {
        return None;
    }

    let x = |p: i32| Jeton::variable(Valeur::un(), nom.as_str(), p);
    let nombre = |v: &Valeur| Jeton::Nombre(v.clone());

    if !coeff.est_un() {
        // x^p = frac(n)(k)
        let mut out = vec![x(*puissance), Jeton::op(Op::Egal), Jeton::op(Op::Fraction)];
        out.extend(groupe(nombre(n)));
        out.extend(groupe(nombre(coeff)));
        return Some(Isolement::Coefficient(out));
    }

    match *puissance {
        1 => None,
        p if p >= 2 => {
            let mut out = vec![
                x(1),
                Jeton::op(Op::Egal),
                Jeton::Operateur {
                    op: Op::Racine,
                    indice: Some(p.unsigned_abs()),
                },
            ];
            out.extend(groupe(nombre(n)));
            Some(Isolement::Racine(out))
        }
        p => {
            // p < 0 : n^(1/p)
            let mut out = vec![x(1), Jeton::op(Op::Egal)];
            out.extend(groupe(nombre(n)));
            out.push(Jeton::op(Op::Puissance));
            out.extend(groupe(Jeton::Nombre(Valeur::rationnel(1, i64::from(p)))));
            Some(Isolement::Racine(out))
        }
    }
}

fn rearranger(jetons: &[Jeton]) -> Option<Isolement> {
    let egal = jetons.iter().position(|j| j.est_op(Op::Egal))?;
    let (gauche, droite) = (&jetons[..egal], &jetons[egal + 1..]);

    let plat = |cote: &[Jeton]| cote.iter().all(Jeton::est_valeur);
    if !plat(gauche) || !plat(droite) {
        return None;
    }

    let mut noms = jetons.iter().filter_map(Jeton::nom_variable);
    let premier = noms.next()?;
    if noms.any(|n| n != premier) {
        return None;
    }

    let est_var = |j: &&Jeton| matches!(j, Jeton::Variable { .. });
    let var_a_droite = droite.iter().any(|j| est_var(&j));
    let nombre_a_gauche = gauche.iter().any(|j| !est_var(&j));
    let var_a_gauche = gauche.iter().any(|j| est_var(&j));
    if !var_a_droite && !(var_a_gauche && nombre_a_gauche) {
        return None;
    }

    let mut nouvelle_gauche: Vec<Jeton> = gauche.iter().filter(est_var).cloned().collect();
    nouvelle_gauche.extend(droite.iter().filter(est_var).map(Jeton::oppose));

    let mut nouvelle_droite: Vec<Jeton> = droite.iter().filter(|j| !est_var(j)).cloned().collect();
    nouvelle_droite.extend(gauche.iter().filter(|j| !est_var(j)).map(Jeton::oppose));

    let mut out = cote_ou_zero(nouvelle_gauche);
    out.push(Jeton::op(Op::Egal));
    out.extend(cote_ou_zero(nouvelle_droite));
    Some(Isolement::Rearrangement(out))
}

fn cote_ou_zero(termes: Vec<Jeton>) -> Vec<Jeton> {
    if termes.is_empty() {
        vec![Jeton::Nombre(Valeur::zero())]
    } else {
        termes
    }
}

fn groupe(j: Jeton) -> [Jeton; 3] {
    [Jeton::ouvrante(), j, Jeton::fermante()]
}
