// src/noyau/position.rs
//
// Résolution des opérandes d’un opérateur localisé
// -----------------------------------------------
// Forme (table) : Deux (gauche + droite), Droite (droite), DoubleDroite (deux groupes à droite).
// Pour chaque opérande :
// - jeton voisin = parenthèse => tout le groupe (via l’index des parenthèses),
//   `multi` si le groupe contient plus d’une valeur ; "(X)" se réduit à X
// - sinon => le jeton valeur voisin
// Opérande absent ou non-valeur => erreur structurelle.

use std::ops::Range;

use super::erreur::{ErreurNoyau, Resultat};
use super::flux::Flux;
use super::jetons::Jeton;
use super::table::{Forme, Op, Tables};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operande {
    /// Jetons valeurs qui forment l’opérande.
    pub valeurs: Range<usize>,
    /// Étendue à remplacer (parenthèses comprises).
    pub bornes: Range<usize>,
    /// Plusieurs valeurs : développement nécessaire, pas d’évaluation directe.
    pub multi: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub index_op: usize,
    pub op: Op,
    pub gauche: Option<Operande>,
    pub droite: Option<Operande>,
    pub droite2: Option<Operande>,
    /// Indice explicite d’une racine (\sqrt[n]).
    pub modificateur: Option<u32>,
}

impl Position {
    /// Plage totale remplacée par le résultat (opérateur + opérandes).
    pub fn plage(&self) -> Range<usize> {
        let debut = self
            .gauche
            .as_ref()
            .map_or(self.index_op, |g| g.bornes.start);
        let fin = [&self.droite, &self.droite2]
            .into_iter()
            .flatten()
            .map(|d| d.bornes.end)
            .max()
            .unwrap_or(self.index_op + 1);
        debut..fin
    }

    pub fn multi(&self) -> bool {
        [&self.gauche, &self.droite, &self.droite2]
            .into_iter()
            .flatten()
            .any(|o| o.multi)
    }
}

pub fn resoudre_position(flux: &Flux, tables: &Tables, index_op: usize) -> Resultat<Position> {
    let (op, modificateur) = match flux.get(index_op) {
        Some(Jeton::Operateur { op, indice }) => (*op, *indice),
        _ => {
            return Err(ErreurNoyau::structurelle(format!(
                "le jeton {index_op} n’est pas un opérateur"
            )))
        }
    };

    let mut pos = Position {
        index_op,
        op,
        gauche: None,
        droite: None,
        droite2: None,
        modificateur,
    };

    match tables.forme(op) {
        Forme::Deux => {
            pos.gauche = Some(operande_gauche(flux, index_op)?);
            pos.droite = Some(operande_droit(flux, index_op + 1)?);
        }
        Forme::Droite => {
            pos.droite = Some(operande_droit(flux, index_op + 1)?);
        }
        Forme::DoubleDroite => {
            let premier = operande_droit(flux, index_op + 1)?;
            let second = operande_droit(flux, premier.bornes.end)?;
            pos.droite = Some(premier);
            pos.droite2 = Some(second);
        }
    }

    Ok(pos)
}

fn operande_gauche(flux: &Flux, index_op: usize) -> Resultat<Operande> {
    let Some(k) = index_op.checked_sub(1) else {
        return Err(ErreurNoyau::structurelle("opérande gauche manquant"));
    };

    match flux.get(k) {
        Some(j) if j.est_fermante() => {
            let o = flux
                .partenaire(k)
                .ok_or_else(|| ErreurNoyau::structurelle("parenthèse sans partenaire"))?;
            groupe(flux, o, k)
        }
        Some(j) if j.est_valeur() => Ok(Operande {
            valeurs: k..k + 1,
            bornes: k..k + 1,
            multi: false,
        }),
        _ => Err(ErreurNoyau::structurelle("opérande gauche manquant")),
    }
}

fn operande_droit(flux: &Flux, k: usize) -> Resultat<Operande> {
    match flux.get(k) {
        Some(j) if j.est_ouvrante() => {
            let f = flux
                .partenaire(k)
                .ok_or_else(|| ErreurNoyau::structurelle("parenthèse sans partenaire"))?;
            groupe(flux, k, f)
        }
        Some(j) if j.est_valeur() => Ok(Operande {
            valeurs: k..k + 1,
            bornes: k..k + 1,
            multi: false,
        }),
        _ => Err(ErreurNoyau::structurelle("opérande droit manquant")),
    }
}

/// Groupe (o .. f) : contenu plat de valeurs ; "(X)" => X.
fn groupe(flux: &Flux, o: usize, f: usize) -> Resultat<Operande> {
    let interieur = o + 1..f;

    if interieur.is_empty() {
        return Err(ErreurNoyau::structurelle("groupe vide"));
    }
    let plat = flux.jetons()[interieur.clone()].iter().all(Jeton::est_valeur);
    if !plat {
        return Err(ErreurNoyau::structurelle(
            "groupe non réductible (opérateur ou parenthèse résiduels)",
        ));
    }

    Ok(Operande {
        multi: interieur.len() > 1,
        valeurs: interieur,
        bornes: o..f + 1,
    })
}
