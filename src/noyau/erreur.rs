// src/noyau/erreur.rs
//
// Erreurs typées du noyau.
// - Lexicale     : aucun motif de jeton ne reconnaît le caractère
// - Structurelle : opérande manquant, parenthèses déséquilibrées, recherche bornée dépassée
// - Domaine      : précondition d’évaluation violée (tan ≥ 90°, opérande non numérique, ...)
//
// L’épuisement des itérations du contrôleur n’est PAS une erreur :
// il donne un résultat partiel (voir controleur.rs).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErreurNoyau {
    #[error("Entrée vide")]
    Vide,

    #[error("caractère inattendu: '{caractere}' (position {position})")]
    Lexicale { caractere: char, position: usize },

    #[error("structure invalide: {0}")]
    Structurelle(String),

    #[error("domaine: {0}")]
    Domaine(String),
}

impl ErreurNoyau {
    pub fn structurelle(msg: impl Into<String>) -> Self {
        Self::Structurelle(msg.into())
    }

    pub fn domaine(msg: impl Into<String>) -> Self {
        Self::Domaine(msg.into())
    }

    /// Nom court de la classe d’erreur (affiché par l’UI).
    pub fn classe(&self) -> &'static str {
        match self {
            Self::Vide => "entrée",
            Self::Lexicale { .. } => "lexicale",
            Self::Structurelle(_) => "structurelle",
            Self::Domaine(_) => "domaine",
        }
    }
}

pub type Resultat<T> = Result<T, ErreurNoyau>;
