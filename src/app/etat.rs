//! src/app/etat.rs
//!
//! État UI (sans vue, sans noyau).
//!
//! Rôle : contenir l’état du résolveur (entrée, texte final, issue, démarche, réglages)
//! et offrir des opérations simples (C/CLR/AC) sans logique d’affichage.
//!
//! Contrats :
//! - Aucune résolution ici (pas de parsing, pas de boucle).
//! - Les bornes des réglages sont celles de `Reglages` (décimales, itérations).

use crate::noyau::{Issue, Reglages, Solution};

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub texte: String,           // texte LaTeX final
    pub issue: Option<Issue>,    // None tant que rien n’a été résolu
    pub lecture: Option<String>, // lecture décimale (résultat numérique seul)
    pub erreur: String,

    // --- démarche (panneau d’explication) ---
    pub demarche: Vec<String>,
    pub jetons: String,

    // --- paramètres ---
    pub reglages: Reglages,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            texte: String::new(),
            issue: None,
            lecture: None,
            erreur: String::new(),
            demarche: Vec::new(),
            jetons: String::new(),
            reglages: Reglages::default(),
            focus_entree: true,
        }
    }
}

impl AppCalc {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + réglages par défaut).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.reglages = Reglages::default();
    }

    /// C : effacer seulement l’entrée.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer résultats + erreur + démarche (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.texte.clear();
        self.issue = None;
        self.lecture = None;
        self.erreur.clear();
        self.demarche.clear();
        self.jetons.clear();
        self.focus_entree = true;
    }

    /// On conserve le dernier texte affiché ; démarche et lecture sont coupées.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.issue = None;
        self.lecture = None;
        self.demarche.clear();
        self.jetons.clear();
        self.focus_entree = true;
    }

    pub fn set_solution(&mut self, s: Solution) {
        self.erreur.clear();
        self.texte = s.texte;
        self.issue = Some(s.issue);
        self.lecture = s.lecture;
        self.demarche = s.demarche;
        self.jetons = s.jetons;
        self.focus_entree = true;
    }

    pub fn set_decimales(&mut self, d: usize) {
        self.reglages.set_decimales(d);
        self.focus_entree = true;
    }

    pub fn set_max_iterations(&mut self, n: usize) {
        self.reglages.set_max_iterations(n);
        self.focus_entree = true;
    }
}
