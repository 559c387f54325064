// src/noyau/flux.rs
//
// Flux de jetons d’une session de résolution
// ------------------------------------------
// - Vec<Jeton> possédé, modifié seulement par remplacement de plage (remplacer)
//   et par les passes de normalisation ci-dessous
// - Index des parenthèses : identités (profondeur, rang) posées en un seul balayage,
//   puis correspondance par identité (pas de re-balayage)
//
// Normalisation (après tokenisation, puis à chaque itération du contrôleur) :
// 1. indexation + contrôle d’équilibre (déséquilibre => erreur structurelle)
// 2. signes : "x-3" => x, -3 ; "-(..)" en tête => -1·(..) ; un +/- entre deux
//    valeurs de même genre (ou touchant un groupe) reste un vrai opérateur
// 3. multiplication implicite : 2(..), 2sin(..), (..)(..), (..)x (sauf frac(a)(b))
// 4. dissolution des groupes purement additifs qui ne sont l’argument de rien
// 5. regroupement des termes semblables dans chaque suite de termes libres

use std::collections::HashMap;
use std::ops::Range;

use super::erreur::{ErreurNoyau, Resultat};
use super::jetons::{IdParenthese, Jeton};
use super::table::{Forme, Op, Tables};
use super::valeur::Valeur;

#[derive(Clone, Debug, Default)]
pub struct Flux {
    jetons: Vec<Jeton>,
    // identité -> (position ouvrante, position fermante)
    paires: HashMap<IdParenthese, (usize, usize)>,
}

impl Flux {
    pub fn new(jetons: Vec<Jeton>) -> Resultat<Self> {
        let mut flux = Self {
            jetons,
            paires: HashMap::new(),
        };
        flux.indexer()?;
        Ok(flux)
    }

    pub fn jetons(&self) -> &[Jeton] {
        &self.jetons
    }

    pub fn len(&self) -> usize {
        self.jetons.len()
    }

    pub fn get(&self, i: usize) -> Option<&Jeton> {
        self.jetons.get(i)
    }

    /// Remplace la plage par de nouveaux jetons, puis ré-indexe.
    pub fn remplacer(&mut self, plage: Range<usize>, nouveaux: Vec<Jeton>) -> Resultat<()> {
        self.jetons.splice(plage, nouveaux);
        self.indexer()
    }

    /// Remplace tout le flux (réarrangement d’équation).
    pub fn remplacer_tout(&mut self, nouveaux: Vec<Jeton>) -> Resultat<()> {
        let n = self.jetons.len();
        self.remplacer(0..n, nouveaux)
    }

    /* ------------------------ Parenthèses ------------------------ */

    /// Balayage unique : profondeur + compteur de rang par profondeur.
    /// Ouvrante : id = (profondeur, rang) puis profondeur += 1.
    /// Fermante : profondeur -= 1 puis id de l’ouvrante correspondante.
    pub fn indexer(&mut self) -> Resultat<()> {
        let Flux { jetons, paires } = self;
        paires.clear();

        let mut profondeur: usize = 0;
        let mut rangs: Vec<usize> = Vec::new();
        let mut ouvertes: HashMap<IdParenthese, usize> = HashMap::new();

        for (i, j) in jetons.iter_mut().enumerate() {
            let Jeton::Parenthese { ouvrante, id } = j else {
                continue;
            };

            if *ouvrante {
                if rangs.len() <= profondeur {
                    rangs.push(0);
                }
                *id = IdParenthese {
                    profondeur,
                    sequence: rangs[profondeur],
                };
                rangs[profondeur] += 1;
                ouvertes.insert(*id, i);
                profondeur += 1;
            } else {
                if profondeur == 0 {
                    return Err(ErreurNoyau::structurelle(format!(
                        "parenthèse fermante sans ouvrante (jeton {i})"
                    )));
                }
                profondeur -= 1;
                *id = IdParenthese {
                    profondeur,
                    sequence: rangs[profondeur] - 1,
                };
                let o = ouvertes.remove(id).ok_or_else(|| {
                    ErreurNoyau::structurelle("parenthèses mal imbriquées")
                })?;
                paires.insert(*id, (o, i));
            }
        }

        if profondeur != 0 {
            return Err(ErreurNoyau::structurelle(format!(
                "{profondeur} parenthèse(s) non fermée(s)"
            )));
        }
        Ok(())
    }

    /// Position de la parenthèse correspondante (O(1) après indexation).
    pub fn partenaire(&self, i: usize) -> Option<usize> {
        let Some(Jeton::Parenthese { id, .. }) = self.jetons.get(i) else {
            return None;
        };
        let (o, f) = self.paires.get(id)?;
        Some(if *o == i { *f } else { *o })
    }

    /// Chaque "=" a un membre non vide de part et d’autre ("x+1=", "=3", "x==2" refusés).
    pub fn verifier_egalites(&self) -> Resultat<()> {
        let v = &self.jetons;
        for (i, j) in v.iter().enumerate() {
            if !j.est_op(Op::Egal) {
                continue;
            }
            let gauche_vide = i == 0 || v[i - 1].est_op(Op::Egal);
            let droite_vide = v.get(i + 1).map_or(true, |d| d.est_op(Op::Egal));
            if gauche_vide || droite_vide {
                return Err(ErreurNoyau::structurelle(format!(
                    "membre vide autour de \"=\" (jeton {i})"
                )));
            }
        }
        Ok(())
    }

    /* ------------------------ Signes ------------------------ */

    /// Un +/- est un vrai opérateur binaire si ses deux voisins sont de même genre,
    /// ou si l’un d’eux est un groupe (ou une fonction) face à une valeur/groupe.
    pub fn est_signe_binaire(&self, i: usize, tables: &Tables) -> bool {
        signe_binaire(&self.jetons, i, tables)
    }

    /// Opérateur réductible : tout opérateur sauf "=", et +/- seulement s’il est binaire.
    pub fn est_operateur_vrai(&self, i: usize, tables: &Tables) -> bool {
        match self.jetons.get(i).and_then(Jeton::operateur) {
            None | Some(Op::Egal) => false,
            Some(Op::Plus | Op::Moins) => self.est_signe_binaire(i, tables),
            Some(_) => true,
        }
    }

    /* ------------------------ Normalisation ------------------------ */

    pub fn normaliser(&mut self, tables: &Tables) -> Resultat<()> {
        self.indexer()?;

        self.replier_signes(tables);
        self.multiplication_implicite(tables)?;
        self.dissoudre_groupes()?;
        self.regrouper_termes();

        self.indexer()
    }

    fn replier_signes(&mut self, tables: &Tables) {
        let v = &mut self.jetons;
        let mut i = 0;

        while i < v.len() {
            let op = match v[i].operateur() {
                Some(op @ (Op::Plus | Op::Moins)) => op,
                _ => {
                    i += 1;
                    continue;
                }
            };

            if signe_binaire(v, i, tables) {
                i += 1;
                continue;
            }

            let sans_gauche = i == 0 || v[i - 1].est_ouvrante() || v[i - 1].operateur().is_some();

            match v.get(i + 1) {
                // signe collé à une valeur : replié dans la valeur
                // (sauf base d’une puissance : x-2^2 attend la réduction de 2^2)
                Some(d) if d.est_valeur() && !est_base_puissance(v, i + 1) => {
                    if op == Op::Moins {
                        v[i + 1] = d.oppose();
                    }
                    v.remove(i);
                }
                // "-(..)" ou "-sin(..)" sans opérande gauche : -1·(..)
                Some(d) if sans_gauche && (d.est_ouvrante() || est_fonction(d, tables)) => {
                    if op == Op::Moins {
                        v[i] = Jeton::Nombre(Valeur::from(-1));
                        v.insert(i + 1, Jeton::op(Op::Fois));
                        i += 2;
                    } else {
                        v.remove(i);
                    }
                }
                _ => i += 1,
            }
        }
    }

    fn multiplication_implicite(&mut self, tables: &Tables) -> Resultat<()> {
        self.indexer()?;

        let mut insertions: Vec<usize> = Vec::new();
        for i in 1..self.jetons.len() {
            let g = &self.jetons[i - 1];
            let d = &self.jetons[i];

            let gauche_ok = g.est_valeur() || g.est_fermante();
            // (..)x, \frac{1}{2}x, \sqrt{4}x : valeur après un groupe
            let droite_ok = d.est_ouvrante()
                || (g.est_fermante() && d.est_valeur())
                || d.operateur()
                    .is_some_and(|op| tables.multiplication_implicite(op));
            if !gauche_ok || !droite_ok {
                continue;
            }

            // frac(a)(b), frac(a)b : pas de produit entre les deux arguments
            if g.est_fermante() && self.ferme_premier_argument(i - 1, tables) {
                continue;
            }

            insertions.push(i);
        }

        for &i in insertions.iter().rev() {
            self.jetons.insert(i, Jeton::op(Op::Fois));
        }
        Ok(())
    }

    /// La fermante `f` clôt-elle le premier argument d’un opérateur à deux groupes ?
    fn ferme_premier_argument(&self, f: usize, tables: &Tables) -> bool {
        let Some(o) = self.partenaire(f) else {
            return false;
        };
        o > 0
            && self.jetons[o - 1]
                .operateur()
                .is_some_and(|op| tables.forme(op) == Forme::DoubleDroite)
    }

    /// "(x+1)" seul, "=(5)", "((x))" : groupe de valeurs qui n’est argument d’aucun opérateur.
    fn dissoudre_groupes(&mut self) -> Resultat<()> {
        loop {
            self.indexer()?;

            let v = &self.jetons;
            let bord_gauche = |o: usize| o == 0 || v[o - 1].est_ouvrante() || v[o - 1].est_op(Op::Egal);
            let bord_droit =
                |f: usize| f + 1 == v.len() || v[f + 1].est_fermante() || v[f + 1].est_op(Op::Egal);

            let cible = self.paires.values().copied().find(|&(o, f)| {
                f > o + 1
                    && v[o + 1..f].iter().all(Jeton::est_valeur)
                    && bord_gauche(o)
                    && bord_droit(f)
            });

            let Some((o, f)) = cible else {
                return Ok(());
            };
            self.jetons.remove(f);
            self.jetons.remove(o);
        }
    }

    fn regrouper_termes(&mut self) {
        let v = &self.jetons;
        let n = v.len();
        let mut out: Vec<Jeton> = Vec::with_capacity(n);
        let mut i = 0;

        while i < n {
            if !est_libre(v, i) {
                out.push(v[i].clone());
                i += 1;
                continue;
            }

            let mut j = i;
            while j < n && est_libre(v, j) {
                j += 1;
            }
            out.extend(regrouper(&v[i..j]));
            i = j;
        }

        self.jetons = out;
    }
}

/* ------------------------ Outils ------------------------ */

pub(crate) fn est_fonction(j: &Jeton, tables: &Tables) -> bool {
    j.operateur().is_some_and(|op| tables.forme(op) != Forme::Deux)
}

fn signe_binaire(v: &[Jeton], i: usize, tables: &Tables) -> bool {
    let (Some(g), Some(d)) = (i.checked_sub(1).and_then(|k| v.get(k)), v.get(i + 1)) else {
        return false;
    };

    if g.est_valeur() && d.est_valeur() {
        return g.meme_genre(d);
    }

    let gauche_ok = g.est_valeur() || g.est_fermante();
    let droite_ok = d.est_valeur() || d.est_ouvrante() || est_fonction(d, tables);
    gauche_ok && droite_ok
}

fn est_base_puissance(v: &[Jeton], i: usize) -> bool {
    v.get(i + 1).is_some_and(|j| j.est_op(Op::Puissance))
}

/// Terme libre : valeur qu’aucun opérateur voisin (hors "=") ne lie.
fn est_libre(v: &[Jeton], i: usize) -> bool {
    if !v[i].est_valeur() {
        return false;
    }
    let gauche = i == 0 || v[i - 1].est_valeur() || v[i - 1].est_ouvrante() || v[i - 1].est_op(Op::Egal);
    let droite =
        i + 1 == v.len() || v[i + 1].est_valeur() || v[i + 1].est_fermante() || v[i + 1].est_op(Op::Egal);
    gauche && droite
}

/// Somme des termes semblables, ordre de première apparition conservé.
/// Les zéros disparaissent tant qu’il reste un autre terme.
pub(crate) fn regrouper(termes: &[Jeton]) -> Vec<Jeton> {
    let mut acc: Vec<Jeton> = Vec::with_capacity(termes.len());

    for t in termes {
        ajouter_terme(&mut acc, t.clone());
    }

    if acc.len() > 1 {
        acc.retain(|t| !matches!(t, Jeton::Nombre(v) if v.est_zero()));
    }
    if acc.is_empty() {
        acc.push(Jeton::Nombre(Valeur::zero()));
    }
    acc
}

fn ajouter_terme(acc: &mut Vec<Jeton>, t: Jeton) {
    let Some(k) = acc.iter().position(|a| a.meme_genre(&t)) else {
        acc.push(t);
        return;
    };

    let (Some(a), Some(b)) = (acc[k].coefficient(), t.coefficient()) else {
        acc.push(t);
        return;
    };
    let somme = acc[k].avec_coefficient(a.add(b));

    // x - x : la variable devient le nombre 0, à fusionner avec les nombres
    if matches!(acc[k], Jeton::Variable { .. }) && matches!(somme, Jeton::Nombre(_)) {
        acc.remove(k);
        ajouter_terme(acc, somme);
    } else {
        acc[k] = somme;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::tokenize;

    fn flux(s: &str) -> (Flux, Tables) {
        let t = Tables::standard();
        let mut f = Flux::new(tokenize(s, &t).unwrap()).unwrap();
        f.normaliser(&t).unwrap();
        (f, t)
    }

    #[test]
    fn identites_parentheses() {
        let t = Tables::standard();
        let f = Flux::new(tokenize("((1)(2))", &t).unwrap()).unwrap();
        assert_eq!(f.partenaire(0), Some(7));
        assert_eq!(f.partenaire(1), Some(3));
        assert_eq!(f.partenaire(4), Some(6));
        assert_eq!(f.partenaire(6), Some(4));
        match (f.get(1), f.get(4)) {
            (Some(Jeton::Parenthese { id: a, .. }), Some(Jeton::Parenthese { id: b, .. })) => {
                assert_eq!(a.profondeur, 1);
                assert_eq!(b.profondeur, 1);
                assert_eq!((a.sequence, b.sequence), (0, 1));
            }
            autre => panic!("inattendu: {autre:?}"),
        }
    }

    #[test]
    fn desequilibre_structurel() {
        let t = Tables::standard();
        assert!(matches!(
            Flux::new(tokenize("(2+3", &t).unwrap()),
            Err(ErreurNoyau::Structurelle(_))
        ));
        assert!(matches!(
            Flux::new(tokenize("2+3)", &t).unwrap()),
            Err(ErreurNoyau::Structurelle(_))
        ));
    }

    #[test]
    fn signe_replie_dans_valeur() {
        let (f, _) = flux("x-3");
        assert_eq!(
            f.jetons(),
            &[
                Jeton::variable(Valeur::un(), "x", 1),
                Jeton::Nombre(Valeur::from(-3))
            ]
        );
    }

    #[test]
    fn signe_binaire_entre_nombres_conserve() {
        let (f, t) = flux("5-3");
        assert_eq!(f.len(), 3);
        assert!(f.est_operateur_vrai(1, &t));
    }

    #[test]
    fn moins_devant_groupe() {
        let (f, _) = flux("-(x+1)");
        assert_eq!(f.get(0), Some(&Jeton::Nombre(Valeur::from(-1))));
        assert!(f.get(1).is_some_and(|j| j.est_op(Op::Fois)));
    }

    #[test]
    fn produit_implicite_insere() {
        let (f, _) = flux("2(3)");
        assert!(f.get(1).is_some_and(|j| j.est_op(Op::Fois)));
        let (f, _) = flux("2sin(30)");
        assert!(f.get(1).is_some_and(|j| j.est_op(Op::Fois)));
    }

    #[test]
    fn produit_implicite_apres_un_groupe() {
        // (3)x => (3)·x ; frac(1)(2)x => frac(1)(2)·x
        let (f, _) = flux("(3)x");
        assert!(f.get(3).is_some_and(|j| j.est_op(Op::Fois)));
        let (f, _) = flux("frac(1)(2)x");
        assert_eq!(f.jetons().iter().filter(|j| j.est_op(Op::Fois)).count(), 1);
        assert!(f.get(7).is_some_and(|j| j.est_op(Op::Fois)));
        // valeur après le premier argument de frac : pas de produit
        let (f, _) = flux("frac(1)2");
        assert!(!f.jetons().iter().any(|j| j.est_op(Op::Fois)));
    }

    #[test]
    fn pas_de_produit_entre_arguments_de_frac() {
        let (f, _) = flux("frac(1)(2)");
        assert!(!f.jetons().iter().any(|j| j.est_op(Op::Fois)));
    }

    #[test]
    fn termes_semblables_regroupes() {
        let (f, _) = flux("2x+3-x+4");
        // 2x, 3, -x, 4 => x, 7
        assert_eq!(
            f.jetons(),
            &[
                Jeton::variable(Valeur::un(), "x", 1),
                Jeton::Nombre(Valeur::from(7))
            ]
        );
    }

    #[test]
    fn terme_lie_non_regroupe() {
        // 3 est lié au produit : pas de fusion avec 2
        let (f, _) = flux("x-2-3*4");
        assert!(f.jetons().iter().any(|j| j.est_op(Op::Fois)));
    }

    #[test]
    fn signe_devant_puissance_attend() {
        // -2^2 = -(2^2) : le signe n’est pas replié dans la base
        let (f, _) = flux("x-2^2");
        assert!(f.get(1).is_some_and(|j| j.est_op(Op::Moins)));
        assert_eq!(f.get(2), Some(&Jeton::Nombre(Valeur::from(2))));
    }

    #[test]
    fn membre_vide_refuse() {
        let t = Tables::standard();
        let f = |s: &str| Flux::new(tokenize(s, &t).unwrap()).unwrap().verifier_egalites();
        assert!(matches!(f("x+1="), Err(ErreurNoyau::Structurelle(_))));
        assert!(matches!(f("=3"), Err(ErreurNoyau::Structurelle(_))));
        assert!(matches!(f("x==3"), Err(ErreurNoyau::Structurelle(_))));
        assert_eq!(f("x=2=3"), Ok(()));
    }

    #[test]
    fn groupe_seul_dissous() {
        let (f, _) = flux("(x+1)");
        assert_eq!(f.len(), 2);
        assert!(f.jetons().iter().all(Jeton::est_valeur));
    }
}
