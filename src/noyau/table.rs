// src/noyau/table.rs
//
// Table des opérateurs (service immuable, construit une fois, passé par &)
// -----------------------------------------------------------------------
// Pour chaque opérateur canonique :
// - orthographes reconnues par le tokenizer (plus longue correspondance)
// - palier de priorité 1..6 (1 = réduit en premier)
// - forme d’arité : Deux (infixe), Droite (préfixe unaire), DoubleDroite (préfixe, deux groupes)
// - accolades : arguments réécrits en {..} par le reconstructeur
// - multiplication implicite : "2sin(30)" => 2·sin(30)
// - forme d’affichage (reconstructeur seulement)

use std::collections::HashMap;

use super::valeur::Valeur;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance,
    Racine,
    Fraction,
    Binome,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Egal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Forme {
    Deux,
    Droite,
    DoubleDroite,
}

#[derive(Clone, Debug)]
pub struct EntreeOp {
    pub op: Op,
    pub nom: &'static str,
    pub orthographes: &'static [&'static str],
    pub priorite: u8,
    pub forme: Forme,
    pub accolades: bool,
    pub multiplication_implicite: bool,
    pub affichage: &'static str,
}

pub const PRIORITE_MAX: u8 = 6;

const ENTREES: &[EntreeOp] = &[
    EntreeOp {
        op: Op::Sin,
        nom: "sin",
        orthographes: &["sin"],
        priorite: 1,
        forme: Forme::Droite,
        accolades: false,
        multiplication_implicite: true,
        affichage: "\\sin",
    },
    EntreeOp {
        op: Op::Cos,
        nom: "cos",
        orthographes: &["cos"],
        priorite: 1,
        forme: Forme::Droite,
        accolades: false,
        multiplication_implicite: true,
        affichage: "\\cos",
    },
    EntreeOp {
        op: Op::Tan,
        nom: "tan",
        orthographes: &["tan"],
        priorite: 1,
        forme: Forme::Droite,
        accolades: false,
        multiplication_implicite: true,
        affichage: "\\tan",
    },
    EntreeOp {
        op: Op::Asin,
        nom: "asin",
        orthographes: &["asin", "arcsin"],
        priorite: 1,
        forme: Forme::Droite,
        accolades: false,
        multiplication_implicite: true,
        affichage: "\\arcsin",
    },
    EntreeOp {
        op: Op::Acos,
        nom: "acos",
        orthographes: &["acos", "arccos"],
        priorite: 1,
        forme: Forme::Droite,
        accolades: false,
        multiplication_implicite: true,
        affichage: "\\arccos",
    },
    EntreeOp {
        op: Op::Atan,
        nom: "atan",
        orthographes: &["atan", "arctan"],
        priorite: 1,
        forme: Forme::Droite,
        accolades: false,
        multiplication_implicite: true,
        affichage: "\\arctan",
    },
    EntreeOp {
        op: Op::Racine,
        nom: "sqrt",
        orthographes: &["sqrt"],
        priorite: 2,
        forme: Forme::Droite,
        accolades: true,
        multiplication_implicite: true,
        affichage: "\\sqrt",
    },
    EntreeOp {
        op: Op::Fraction,
        nom: "frac",
        orthographes: &["frac", "dfrac", "tfrac"],
        priorite: 2,
        forme: Forme::DoubleDroite,
        accolades: true,
        multiplication_implicite: true,
        affichage: "\\frac",
    },
    EntreeOp {
        op: Op::Binome,
        nom: "binom",
        orthographes: &["binom"],
        priorite: 2,
        forme: Forme::DoubleDroite,
        accolades: true,
        multiplication_implicite: true,
        affichage: "\\binom",
    },
    EntreeOp {
        op: Op::Puissance,
        nom: "pow",
        orthographes: &["^"],
        priorite: 3,
        forme: Forme::Deux,
        accolades: true,
        multiplication_implicite: false,
        affichage: "^",
    },
    EntreeOp {
        op: Op::Fois,
        nom: "mul",
        orthographes: &["*", "cdot", "times"],
        priorite: 4,
        forme: Forme::Deux,
        accolades: false,
        multiplication_implicite: false,
        affichage: "\\cdot",
    },
    EntreeOp {
        op: Op::Divise,
        nom: "div",
        orthographes: &["/", "div"],
        priorite: 4,
        forme: Forme::Deux,
        accolades: false,
        multiplication_implicite: false,
        affichage: "/",
    },
    EntreeOp {
        op: Op::Plus,
        nom: "plus",
        orthographes: &["+"],
        priorite: 5,
        forme: Forme::Deux,
        accolades: false,
        multiplication_implicite: false,
        affichage: "+",
    },
    EntreeOp {
        op: Op::Moins,
        nom: "minus",
        orthographes: &["-"],
        priorite: 5,
        forme: Forme::Deux,
        accolades: false,
        multiplication_implicite: false,
        affichage: "-",
    },
    EntreeOp {
        op: Op::Egal,
        nom: "equals",
        orthographes: &["="],
        priorite: 6,
        forme: Forme::Deux,
        accolades: false,
        multiplication_implicite: false,
        affichage: "=",
    },
];

/// Constantes nommées (valeur approchée).
const CONSTANTES: &[(&str, f64)] = &[("pi", std::f64::consts::PI)];

#[derive(Clone, Debug)]
pub struct Tables {
    entrees: Vec<EntreeOp>,
    index: HashMap<Op, usize>,
    // (orthographe, op), triées par longueur décroissante => plus longue correspondance d’abord
    orthographes: Vec<(Vec<char>, Op)>,
    constantes: Vec<(Vec<char>, f64)>,
}

impl Default for Tables {
    fn default() -> Self {
        Self::standard()
    }
}

impl Tables {
    pub fn standard() -> Self {
        Self::depuis_entrees(ENTREES.to_vec())
    }

    fn depuis_entrees(entrees: Vec<EntreeOp>) -> Self {
        let index = entrees
            .iter()
            .enumerate()
            .map(|(i, e)| (e.op, i))
            .collect();

        let mut orthographes: Vec<(Vec<char>, Op)> = entrees
            .iter()
            .flat_map(|e| {
                e.orthographes
                    .iter()
                    .map(move |o| (o.chars().collect::<Vec<char>>(), e.op))
            })
            .collect();
        orthographes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut constantes: Vec<(Vec<char>, f64)> = CONSTANTES
            .iter()
            .map(|(nom, v)| (nom.chars().collect(), *v))
            .collect();
        constantes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            entrees,
            index,
            orthographes,
            constantes,
        }
    }

    pub fn entree(&self, op: Op) -> &EntreeOp {
        // Toute Op construite par le tokenizer provient de la table.
        &self.entrees[self.index[&op]]
    }

    pub fn priorite(&self, op: Op) -> u8 {
        self.entree(op).priorite
    }

    pub fn forme(&self, op: Op) -> Forme {
        self.entree(op).forme
    }

    pub fn accolades(&self, op: Op) -> bool {
        self.entree(op).accolades
    }

    pub fn multiplication_implicite(&self, op: Op) -> bool {
        self.entree(op).multiplication_implicite
    }

    pub fn affichage(&self, op: Op) -> &'static str {
        self.entree(op).affichage
    }

    pub fn nom(&self, op: Op) -> &'static str {
        self.entree(op).nom
    }

    /// Opérateurs d’un palier de priorité donné.
    pub fn par_priorite(&self, palier: u8) -> impl Iterator<Item = Op> + '_ {
        self.entrees
            .iter()
            .filter(move |e| e.priorite == palier)
            .map(|e| e.op)
    }

    /// Plus longue orthographe d’opérateur qui commence à `i`.
    pub fn reconnaitre(&self, texte: &[char], i: usize) -> Option<(Op, usize)> {
        self.orthographes
            .iter()
            .find(|(o, _)| texte[i..].starts_with(o))
            .map(|(o, op)| (*op, o.len()))
    }

    pub fn constante(&self, texte: &[char], i: usize) -> Option<(Valeur, usize)> {
        self.constantes
            .iter()
            .find(|(nom, _)| texte[i..].starts_with(nom))
            .map(|(nom, v)| (Valeur::Approchee(*v), nom.len()))
    }
}
