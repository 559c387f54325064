// src/noyau/localisation.rs
//
// Choix de LA prochaine réduction
// -------------------------------
// 1) portée : la paire de parenthèses non vérifiée la plus interne qui contient
//    un vrai opérateur ; une paire sans opérateur est marquée vérifiée et on recommence
// 2) aucune paire retenue => tout le flux
// 3) dans la portée : paliers de priorité 1..6, premier opérateur trouvé gagne
// 4) garde-fou : au-delà de `max_recherche` tours de recherche => erreur structurelle

use std::collections::HashSet;
use std::ops::Range;

use log::trace;

use super::erreur::{ErreurNoyau, Resultat};
use super::flux::Flux;
use super::jetons::{IdParenthese, Jeton};
use super::table::{Tables, PRIORITE_MAX};

/// Index du prochain opérateur à réduire, ou None (=> isolement / fin).
pub fn localiser(flux: &Flux, tables: &Tables, max_recherche: usize) -> Resultat<Option<usize>> {
    let mut verifiees: HashSet<IdParenthese> = HashSet::new();
    let mut tours: usize = 0;

    let portee: Range<usize> = loop {
        tours += 1;
        if tours > max_recherche {
            return Err(ErreurNoyau::structurelle(format!(
                "recherche d’opérateur interrompue après {max_recherche} tours"
            )));
        }

        match paire_la_plus_interne(flux, &verifiees) {
            None => break 0..flux.len(),
            Some((o, f, id)) => {
                if (o + 1..f).any(|k| flux.est_operateur_vrai(k, tables)) {
                    break o + 1..f;
                }
                verifiees.insert(id);
            }
        }
    };

    trace!("portée retenue {portee:?} après {tours} tour(s)");

    for palier in 1..=PRIORITE_MAX {
        for k in portee.clone() {
            if !flux.est_operateur_vrai(k, tables) {
                continue;
            }
            let Some(op) = flux.get(k).and_then(Jeton::operateur) else {
                continue;
            };
            if tables.priorite(op) == palier {
                return Ok(Some(k));
            }
        }
    }

    Ok(None)
}

/// Ouvrante non vérifiée dont la fermante arrive avant toute autre ouvrante non vérifiée.
fn paire_la_plus_interne(
    flux: &Flux,
    verifiees: &HashSet<IdParenthese>,
) -> Option<(usize, usize, IdParenthese)> {
    let mut derniere_ouverte: Option<usize> = None;

    for (i, j) in flux.jetons().iter().enumerate() {
        let Jeton::Parenthese { ouvrante, id } = j else {
            continue;
        };
        if verifiees.contains(id) {
            continue;
        }

        if *ouvrante {
            derniere_ouverte = Some(i);
        } else if let Some(o) = derniere_ouverte {
            if flux.partenaire(i) == Some(o) {
                return Some((o, i, *id));
            }
        }
    }

    None
}
