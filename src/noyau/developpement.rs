// src/noyau/developpement.rs
//
// Développement (chemin "plusieurs termes")
// -----------------------------------------
// Utilisé quand un opérande est un groupe de plusieurs valeurs, ou quand +/-
// relient deux termes non semblables :
// - + / - : concaténation (termes de droite opposés pour -)
// - ·     : distribution de chaque terme gauche sur chaque terme droit
// - / frac: chaque terme divisé par un diviseur UNIQUE
// - ^     : exposant entier 0..=8 => distributions répétées
// - autre : erreur de domaine
// Le résultat (termes semblables regroupés) remplace opérateur + opérandes ;
// plusieurs termes => entre parenthèses, la normalisation les dissout si le contexte le permet.

use super::erreur::{ErreurNoyau, Resultat};
use super::eval::{diviser, multiplier};
use super::flux::{regrouper, Flux};
use super::jetons::Jeton;
use super::position::{Operande, Position};
use super::table::Op;
use super::valeur::Valeur;

/// Exposant max d’un groupe développé.
const EXPOSANT_DEVELOPPEMENT_MAX: i64 = 8;

/// Faut-il développer plutôt qu’évaluer ?
pub fn a_developper(flux: &Flux, pos: &Position) -> bool {
    if pos.multi() {
        return true;
    }
    if !matches!(pos.op, Op::Plus | Op::Moins) {
        return false;
    }
    match (premier(flux, &pos.gauche), premier(flux, &pos.droite)) {
        (Some(g), Some(d)) => !g.meme_genre(d),
        _ => false,
    }
}

/// Jetons de remplacement pour `pos.plage()`.
pub fn developper(flux: &Flux, pos: &Position) -> Resultat<Vec<Jeton>> {
    let gauche = termes(flux, &pos.gauche);
    let droite = termes(flux, &pos.droite);

    let resultat = match pos.op {
        Op::Plus => [gauche, droite].concat(),
        Op::Moins => gauche
            .into_iter()
            .chain(droite.iter().map(Jeton::oppose))
            .collect(),
        Op::Fois => produit(&gauche, &droite)?,
        Op::Divise => quotient(&gauche, &droite)?,
        Op::Fraction => quotient(&droite, &termes(flux, &pos.droite2))?,
        Op::Puissance => puissance(&gauche, &droite)?,
        op => {
            return Err(ErreurNoyau::domaine(format!(
                "argument à plusieurs termes non numérique pour {op:?}"
            )))
        }
    };

    Ok(envelopper(regrouper(&resultat)))
}

fn produit(gauche: &[Jeton], droite: &[Jeton]) -> Resultat<Vec<Jeton>> {
    let mut out = Vec::with_capacity(gauche.len() * droite.len());
    for g in gauche {
        for d in droite {
            out.push(multiplier(g, d)?);
        }
    }
    Ok(regrouper(&out))
}

fn quotient(dividende: &[Jeton], diviseur: &[Jeton]) -> Resultat<Vec<Jeton>> {
    let [d] = diviseur else {
        return Err(ErreurNoyau::domaine(
            "division par une somme de plusieurs termes non supportée",
        ));
    };
    dividende.iter().map(|t| diviser(t, d)).collect()
}

fn puissance(base: &[Jeton], exposant: &[Jeton]) -> Resultat<Vec<Jeton>> {
    let n = match exposant {
        [Jeton::Nombre(e)] => e.entier_i64(),
        _ => None,
    }
    .filter(|n| (0..=EXPOSANT_DEVELOPPEMENT_MAX).contains(n))
    .ok_or_else(|| {
        ErreurNoyau::domaine(format!(
            "puissance d’une somme : exposant entier entre 0 et {EXPOSANT_DEVELOPPEMENT_MAX} exigé"
        ))
    })?;

    let mut acc = vec![Jeton::Nombre(Valeur::un())];
    for _ in 0..n {
        acc = produit(&acc, base)?;
    }
    Ok(acc)
}

/* ------------------------ Outils ------------------------ */

fn termes(flux: &Flux, o: &Option<Operande>) -> Vec<Jeton> {
    o.as_ref()
        .map(|o| flux.jetons()[o.valeurs.clone()].to_vec())
        .unwrap_or_default()
}

fn premier<'a>(flux: &'a Flux, o: &Option<Operande>) -> Option<&'a Jeton> {
    o.as_ref().and_then(|o| flux.get(o.valeurs.start))
}

fn envelopper(termes: Vec<Jeton>) -> Vec<Jeton> {
    if termes.len() <= 1 {
        return termes;
    }
    let mut out = Vec::with_capacity(termes.len() + 2);
    out.push(Jeton::ouvrante());
    out.extend(termes);
    out.push(Jeton::fermante());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::tokenize;
    use crate::noyau::localisation::localiser;
    use crate::noyau::position::resoudre_position;
    use crate::noyau::table::Tables;

    /// Premier développement du flux normalisé (valeurs seules, parenthèses retirées).
    fn developpe(s: &str) -> Resultat<Vec<Jeton>> {
        let t = Tables::standard();
        let mut f = Flux::new(tokenize(s, &t).unwrap()).unwrap();
        f.normaliser(&t).unwrap();
        let k = localiser(&f, &t, 200).unwrap().expect("opérateur attendu");
        let pos = resoudre_position(&f, &t, k).unwrap();
        assert!(a_developper(&f, &pos));
        let out = developper(&f, &pos)?;
        Ok(out.into_iter().filter(Jeton::est_valeur).collect())
    }

    fn x(c: i64, p: i32) -> Jeton {
        Jeton::variable(Valeur::from(c), "x", p)
    }

    fn n(v: i64) -> Jeton {
        Jeton::Nombre(Valeur::from(v))
    }

    #[test]
    fn distribution_produit() {
        assert_eq!(developpe("2(x+1)").unwrap(), vec![x(2, 1), n(2)]);
    }

    #[test]
    fn soustraction_d_un_groupe() {
        assert_eq!(developpe("5-(x+1)").unwrap(), vec![n(4), x(-1, 1)]);
    }

    #[test]
    fn produit_de_deux_groupes() {
        // (x+1)(x-1) = x^2 - 1
        assert_eq!(developpe("(x+1)(x-1)").unwrap(), vec![x(1, 2), n(-1)]);
    }

    #[test]
    fn carre_d_une_somme() {
        assert_eq!(
            developpe("(x+1)^2").unwrap(),
            vec![x(1, 2), x(2, 1), n(1)]
        );
    }

    #[test]
    fn quotient_par_un_terme() {
        assert_eq!(developpe("(4x+2)/2").unwrap(), vec![x(2, 1), n(1)]);
    }

    #[test]
    fn diviseur_a_plusieurs_termes_refuse() {
        assert!(matches!(
            developpe("2/(x+1)"),
            Err(ErreurNoyau::Domaine(_))
        ));
    }

    #[test]
    fn fonction_sur_groupe_refusee() {
        assert!(matches!(
            developpe("sin(x+1)"),
            Err(ErreurNoyau::Domaine(_))
        ));
    }
}
