//! Noyau — boucle de résolution
//!
//! normalisation texte -> jetons -> flux
//!   puis, à chaque itération (bornée) :
//!   normaliser -> choisir une action -> l’appliquer -> une ligne de démarche
//!
//! Actions, dans cet ordre :
//! - (a) un opérateur réductible reste : évaluation (ou développement si groupe)
//! - (b)/(c) isolement de la variable (voir isolement.rs)
//! - (d) rien ne s’applique : fin
//!
//! Borne atteinte => résultat partiel (pas une erreur).

use log::{debug, trace, warn};

use super::developpement::{a_developper, developper};
use super::erreur::{ErreurNoyau, Resultat};
use super::eval::{evaluer, Operandes};
use super::flux::Flux;
use super::format::{decimal, reconstruire};
use super::isolement::{est_forme_close, isoler, Isolement};
use super::jetons::{format_jetons, tokenize, Jeton};
use super::localisation::localiser;
use super::normalisation::normaliser;
use super::position::{resoudre_position, Operande, Position};
use super::table::Tables;
use super::trig::ModeAngle;

pub const DECIMALES_MAX: usize = 15;
pub const ITERATIONS_MAX: usize = 100;

/// Garde-fou : étapes muettes tolérées par résolution.
const MUETTES_MAX: usize = 1000;

/* ------------------------ Réglages ------------------------ */

#[derive(Clone, Debug, PartialEq)]
pub struct Reglages {
    decimales: usize,
    pub mode_angle: ModeAngle,
    max_iterations: usize,
    max_recherche: usize,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            decimales: 10,
            mode_angle: ModeAngle::Degres,
            max_iterations: 10,
            max_recherche: 200,
        }
    }
}

impl Reglages {
    pub fn decimales(&self) -> usize {
        self.decimales
    }

    pub fn set_decimales(&mut self, d: usize) {
        self.decimales = d.min(DECIMALES_MAX);
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn set_max_iterations(&mut self, n: usize) {
        self.max_iterations = n.clamp(1, ITERATIONS_MAX);
    }

    pub fn max_recherche(&self) -> usize {
        self.max_recherche
    }
}

/* ------------------------ Résultat ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Issue {
    /// Forme close atteinte (x = n, valeur, expression simplifiée).
    Resolu,
    /// Borne d’itérations atteinte, ou plus aucune règle sur une forme non close.
    Partiel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Texte LaTeX final.
    pub texte: String,
    /// Une ligne par étape : "<étape> ⟹ <flux>".
    pub demarche: Vec<String>,
    pub issue: Issue,
    /// Lecture décimale tronquée (None si le résultat n’est pas un nombre seul).
    pub lecture: Option<String>,
    /// Jetons initiaux (debug / affichage).
    pub jetons: String,
}

/* ------------------------ Solveur ------------------------ */

#[derive(Clone, Debug, Default)]
pub struct Solveur {
    tables: Tables,
    reglages: Reglages,
}

enum Action {
    Reduire(Position),
    Developper(Position),
    Isoler(Isolement),
}

impl Solveur {
    pub fn new(tables: Tables, reglages: Reglages) -> Self {
        Self { tables, reglages }
    }

    pub fn resoudre(&self, entree: &str) -> Resultat<Solution> {
        let texte = normaliser(entree);
        if texte.is_empty() {
            return Err(ErreurNoyau::Vide);
        }

        let jetons = tokenize(&texte, &self.tables)?;
        let jetons_txt = format_jetons(&jetons, &self.tables);
        let mut flux = Flux::new(jetons)?;
        flux.verifier_egalites()?;
        let mut demarche: Vec<String> = Vec::new();
        let mut muettes: usize = 0;

        // Une étape muette (x^2 -> x^2) ne compte pas dans la borne :
        // elle raccourcit le flux.
        let termine = loop {
            flux.normaliser(&self.tables)?;

            let Some(action) = self.choisir(&flux)? else {
                break true;
            };
            if muettes > MUETTES_MAX {
                break false;
            }

            if demarche.len() == self.reglages.max_iterations {
                // borne consommée : seule une étape muette peut encore passer
                let mut essai = flux.clone();
                match self.appliquer(&mut essai, action) {
                    Ok(None) => flux = essai,
                    _ => break false,
                }
                muettes += 1;
                continue;
            }

            let Some(etape) = self.appliquer(&mut flux, action)? else {
                muettes += 1;
                continue;
            };
            let ligne = format!("{etape} ⟹ {}", self.texte(&flux));
            debug!("itération {} : {ligne}", demarche.len() + 1);
            demarche.push(ligne);
        };

        if !termine {
            warn!(
                "borne de {} itérations atteinte, résultat partiel",
                self.reglages.max_iterations
            );
        }

        let issue = if termine && est_forme_close(flux.jetons()) {
            Issue::Resolu
        } else {
            Issue::Partiel
        };

        let lecture = match flux.jetons() {
            [Jeton::Nombre(v)] => Some(decimal(v, self.reglages.decimales)),
            _ => None,
        };

        Ok(Solution {
            texte: self.texte(&flux),
            demarche,
            issue,
            lecture,
            jetons: jetons_txt,
        })
    }

    fn choisir(&self, flux: &Flux) -> Resultat<Option<Action>> {
        if let Some(k) = localiser(flux, &self.tables, self.reglages.max_recherche)? {
            let pos = resoudre_position(flux, &self.tables, k)?;
            return Ok(Some(if a_developper(flux, &pos) {
                Action::Developper(pos)
            } else {
                Action::Reduire(pos)
            }));
        }
        Ok(isoler(flux.jetons()).map(Action::Isoler))
    }

    /// Applique l’action au flux ; renvoie le libellé de l’étape
    /// (None : réduction sans effet visible, x^2 -> x^2).
    fn appliquer(&self, flux: &mut Flux, action: Action) -> Resultat<Option<String>> {
        match action {
            Action::Reduire(pos) => {
                let avant = self.texte_plage(flux, &pos);
                let resultat = evaluer(
                    pos.op,
                    &operandes(flux, &pos),
                    self.reglages.mode_angle,
                )?;
                let apres = reconstruire(
                    std::slice::from_ref(&resultat),
                    &self.tables,
                    self.reglages.decimales,
                );
                flux.remplacer(pos.plage(), vec![resultat])?;
                if avant == apres {
                    trace!("réduction muette : {avant}");
                    return Ok(None);
                }
                Ok(Some(format!("{avant} → {apres}")))
            }

            Action::Developper(pos) => {
                let avant = self.texte_plage(flux, &pos);
                let termes = developper(flux, &pos)?;
                let apres = reconstruire(&termes, &self.tables, self.reglages.decimales);
                flux.remplacer(pos.plage(), termes)?;
                Ok(Some(format!("développement : {avant} → {apres}")))
            }

            Action::Isoler(iso) => {
                let libelle = iso.libelle();
                flux.remplacer_tout(iso.jetons())?;
                Ok(Some(libelle.to_string()))
            }
        }
    }

    fn texte(&self, flux: &Flux) -> String {
        reconstruire(flux.jetons(), &self.tables, self.reglages.decimales)
    }

    fn texte_plage(&self, flux: &Flux, pos: &Position) -> String {
        reconstruire(
            &flux.jetons()[pos.plage()],
            &self.tables,
            self.reglages.decimales,
        )
    }
}

/// Opérandes simples (un jeton par côté) d’une position sans groupe multiple.
fn operandes<'a>(flux: &'a Flux, pos: &Position) -> Operandes<'a> {
    let jeton = |o: &Option<Operande>| o.as_ref().and_then(|o| flux.get(o.valeurs.start));
    Operandes {
        gauche: jeton(&pos.gauche),
        droite: jeton(&pos.droite),
        droite2: jeton(&pos.droite2),
        modificateur: pos.modificateur,
    }
}
