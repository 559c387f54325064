//! Noyau — résolution pas à pas d’expressions LaTeX
//!
//! Organisation interne :
//! - normalisation.rs : texte LaTeX -> texte compact (\frac{1}{2} => frac(1)(2))
//! - table.rs         : opérateurs (orthographes, paliers, formes, affichage)
//! - valeur.rs        : rationnel exact / repli f64
//! - jetons.rs        : tokenisation
//! - flux.rs          : flux de jetons, index des parenthèses, normalisation
//! - localisation.rs  : prochain opérateur à réduire
//! - position.rs      : opérandes de l’opérateur choisi
//! - eval.rs          : une règle => un jeton
//! - trig.rs          : trigonométrie en degrés, angles spéciaux
//! - developpement.rs : distribution sur les groupes
//! - isolement.rs     : isolement / réarrangement d’équation
//! - format.rs        : reconstruction LaTeX
//! - controleur.rs    : boucle bornée + démarche

pub mod controleur;
pub mod developpement;
pub mod erreur;
pub mod eval;
pub mod flux;
pub mod format;
pub mod isolement;
pub mod jetons;
pub mod localisation;
pub mod normalisation;
pub mod position;
pub mod table;
pub mod trig;
pub mod valeur;

#[cfg(test)]
mod tests_scenarios;

#[cfg(test)]
mod tests_fuzz_safe;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use controleur::{Issue, Reglages, Solution, Solveur};
pub use erreur::ErreurNoyau;
pub use trig::ModeAngle;

/// Résout avec les tables et réglages standard.
pub fn resoudre(entree: &str) -> Result<Solution, ErreurNoyau> {
    Solveur::default().resoudre(entree)
}
