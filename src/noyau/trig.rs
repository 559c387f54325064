// src/noyau/trig.rs
//
// Trigonométrie (mode degrés par défaut)
// --------------------------------------
// - Angles spéciaux à valeur rationnelle : résultat EXACT (sin 30 = 1/2, cos 60 = 1/2, tan 45 = 1)
// - Réciproques sur les valeurs rationnelles remarquables (asin 1/2 = 30, acos 0 = 90, ...)
// - Sinon : repli f64
// - tan : |angle| < 90° exigé en degrés (hors de là => erreur de domaine)

use super::erreur::{ErreurNoyau, Resultat};
use super::valeur::Valeur;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeAngle {
    #[default]
    Degres,
    Radians,
}

pub fn evaluer_trig(f: TrigFn, x: &Valeur, mode: ModeAngle) -> Resultat<Valeur> {
    match f {
        TrigFn::Sin | TrigFn::Cos | TrigFn::Tan => directe(f, x, mode),
        TrigFn::Asin | TrigFn::Acos | TrigFn::Atan => reciproque(f, x, mode),
    }
}

fn directe(f: TrigFn, x: &Valeur, mode: ModeAngle) -> Resultat<Valeur> {
    if f == TrigFn::Tan && mode == ModeAngle::Degres && x.abs().vers_f64() >= 90.0 {
        return Err(ErreurNoyau::domaine(format!(
            "tan exige un angle strictement entre -90° et 90° (reçu {}°)",
            x.vers_f64()
        )));
    }

    if let Some(v) = angle_special(f, x, mode) {
        return Ok(v);
    }

    let rad = match mode {
        ModeAngle::Degres => x.vers_f64().to_radians(),
        ModeAngle::Radians => x.vers_f64(),
    };

    let y = match f {
        TrigFn::Sin => rad.sin(),
        TrigFn::Cos => rad.cos(),
        _ => {
            if rad.cos().abs() < 1e-12 {
                return Err(ErreurNoyau::domaine("tan indéfinie pour cet angle"));
            }
            rad.tan()
        }
    };
    Valeur::approchee(y, "trigonométrie")
}

/// Table des angles (en degrés entiers) à valeur rationnelle.
fn angle_special(f: TrigFn, x: &Valeur, mode: ModeAngle) -> Option<Valeur> {
    if mode == ModeAngle::Radians {
        // seul 0 est “spécial” en radians rationnels
        if !x.est_zero() {
            return None;
        }
        return Some(match f {
            TrigFn::Cos => Valeur::un(),
            _ => Valeur::zero(),
        });
    }

    let brut = x.entier_i64()?;
    let a = brut.rem_euclid(360);
    let r = Valeur::rationnel;

    let v = match f {
        TrigFn::Sin => match a {
            0 | 180 => r(0, 1),
            30 | 150 => r(1, 2),
            90 => r(1, 1),
            210 | 330 => r(-1, 2),
            270 => r(-1, 1),
            _ => return None,
        },
        TrigFn::Cos => match a {
            0 => r(1, 1),
            60 | 300 => r(1, 2),
            90 | 270 => r(0, 1),
            120 | 240 => r(-1, 2),
            180 => r(-1, 1),
            _ => return None,
        },
        TrigFn::Tan => match brut {
            0 => r(0, 1),
            45 => r(1, 1),
            -45 => r(-1, 1),
            _ => return None,
        },
        _ => return None,
    };
    Some(v)
}

fn reciproque(f: TrigFn, x: &Valeur, mode: ModeAngle) -> Resultat<Valeur> {
    let xf = x.vers_f64();
    if matches!(f, TrigFn::Asin | TrigFn::Acos) && !(-1.0..=1.0).contains(&xf) {
        return Err(ErreurNoyau::domaine(format!(
            "argument hors de [-1, 1] pour la réciproque ({xf})"
        )));
    }

    if mode == ModeAngle::Degres {
        if let Some(v) = reciproque_speciale(f, x) {
            return Ok(v);
        }
    } else if (f != TrigFn::Acos && x.est_zero()) || (f == TrigFn::Acos && x.est_un()) {
        return Ok(Valeur::zero());
    }

    let rad = match f {
        TrigFn::Asin => xf.asin(),
        TrigFn::Acos => xf.acos(),
        _ => xf.atan(),
    };
    let y = match mode {
        ModeAngle::Degres => rad.to_degrees(),
        ModeAngle::Radians => rad,
    };
    Valeur::approchee(y, "trigonométrie réciproque")
}

fn reciproque_speciale(f: TrigFn, x: &Valeur) -> Option<Valeur> {
    let cle = [(0, 1), (1, 2), (-1, 2), (1, 1), (-1, 1)]
        .into_iter()
        .find(|&(n, d)| *x == Valeur::rationnel(n, d))?;

    let degres = match (f, cle) {
        (TrigFn::Asin, (0, 1)) => 0,
        (TrigFn::Asin, (1, 2)) => 30,
        (TrigFn::Asin, (-1, 2)) => -30,
        (TrigFn::Asin, (1, 1)) => 90,
        (TrigFn::Asin, (-1, 1)) => -90,

        (TrigFn::Acos, (1, 1)) => 0,
        (TrigFn::Acos, (1, 2)) => 60,
        (TrigFn::Acos, (0, 1)) => 90,
        (TrigFn::Acos, (-1, 2)) => 120,
        (TrigFn::Acos, (-1, 1)) => 180,

        (TrigFn::Atan, (0, 1)) => 0,
        (TrigFn::Atan, (1, 1)) => 45,
        (TrigFn::Atan, (-1, 1)) => -45,

        _ => return None,
    };
    Some(Valeur::from(degres))
}
