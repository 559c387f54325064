// src/noyau/valeur.rs
//
// Valeur numérique d’un jeton (coefficient ou grandeur).
// - Exacte   : rationnel exact (BigRational), tant que l’opération reste rationnelle
// - Approchee: repli f64 dès qu’un résultat sort de Q (√2, sin 45°, 2^0.5, ...)
//
// IMPORTANT (SAFE):
// - Une valeur approchée ne redevient jamais exacte.
// - Un f64 NaN / infini n’est jamais déposé dans le flux : erreur de domaine.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::erreur::{ErreurNoyau, Resultat};

/// Au-delà, une puissance entière exacte repasse en f64 (anti-explosion des big int).
const EXPOSANT_EXACT_MAX: u64 = 4096;
const BITS_EXACTS_MAX: u64 = 1 << 16;

/// Garde-fou du binôme (boucle en k).
const BINOME_K_MAX: u64 = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Valeur {
    Exacte(BigRational),
    Approchee(f64),
}

impl Default for Valeur {
    fn default() -> Self {
        Valeur::zero()
    }
}

impl From<i64> for Valeur {
    fn from(n: i64) -> Self {
        Valeur::Exacte(BigRational::from_integer(BigInt::from(n)))
    }
}

impl Valeur {
    pub fn zero() -> Self {
        Valeur::Exacte(BigRational::zero())
    }

    pub fn un() -> Self {
        Valeur::Exacte(BigRational::one())
    }

    pub fn rationnel(n: i64, d: i64) -> Self {
        Valeur::Exacte(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    /// Repli f64 contrôlé : NaN / infini => erreur de domaine.
    pub fn approchee(x: f64, contexte: &str) -> Resultat<Self> {
        if x.is_finite() {
            Ok(Valeur::Approchee(x))
        } else {
            Err(ErreurNoyau::domaine(format!("{contexte} : résultat non fini")))
        }
    }

    pub fn est_zero(&self) -> bool {
        match self {
            Valeur::Exacte(r) => r.is_zero(),
            Valeur::Approchee(x) => *x == 0.0,
        }
    }

    pub fn est_un(&self) -> bool {
        match self {
            Valeur::Exacte(r) => r.is_one(),
            Valeur::Approchee(x) => *x == 1.0,
        }
    }

    pub fn est_negatif(&self) -> bool {
        match self {
            Valeur::Exacte(r) => r.is_negative(),
            Valeur::Approchee(x) => *x < 0.0,
        }
    }

    pub fn vers_f64(&self) -> f64 {
        match self {
            Valeur::Exacte(r) => r.to_f64().unwrap_or(f64::NAN),
            Valeur::Approchee(x) => *x,
        }
    }

    /// Entier exact (dénominateur 1), sinon None.
    pub fn entier(&self) -> Option<&BigInt> {
        match self {
            Valeur::Exacte(r) if r.denom().is_one() => Some(r.numer()),
            _ => None,
        }
    }

    pub fn entier_i64(&self) -> Option<i64> {
        self.entier().and_then(|n| n.to_i64())
    }

    pub fn abs(&self) -> Valeur {
        match self {
            Valeur::Exacte(r) => Valeur::Exacte(r.abs()),
            Valeur::Approchee(x) => Valeur::Approchee(x.abs()),
        }
    }

    pub fn neg(&self) -> Valeur {
        match self {
            Valeur::Exacte(r) => Valeur::Exacte(-r.clone()),
            Valeur::Approchee(x) => Valeur::Approchee(-x),
        }
    }

    /* ------------------------ Arithmétique de base ------------------------ */

    pub fn add(&self, autre: &Valeur) -> Valeur {
        match (self, autre) {
            (Valeur::Exacte(a), Valeur::Exacte(b)) => Valeur::Exacte(a + b),
            _ => Valeur::Approchee(self.vers_f64() + autre.vers_f64()),
        }
    }

    pub fn mul(&self, autre: &Valeur) -> Valeur {
        match (self, autre) {
            (Valeur::Exacte(a), Valeur::Exacte(b)) => Valeur::Exacte(a * b),
            _ => Valeur::Approchee(self.vers_f64() * autre.vers_f64()),
        }
    }

    pub fn div(&self, autre: &Valeur) -> Resultat<Valeur> {
        if autre.est_zero() {
            return Err(ErreurNoyau::domaine("division par zéro"));
        }
        match (self, autre) {
            (Valeur::Exacte(a), Valeur::Exacte(b)) => Ok(Valeur::Exacte(a / b)),
            _ => Valeur::approchee(self.vers_f64() / autre.vers_f64(), "division"),
        }
    }

    /* ------------------------ Puissances / racines ------------------------ */

    /// self^exposant : exact si base exacte et exposant entier raisonnable.
    pub fn puissance(&self, exposant: &Valeur) -> Resultat<Valeur> {
        if let (Valeur::Exacte(base), Some(n)) = (self, exposant.entier_i64()) {
            // taille approximative du résultat (en bits) : |n| · log2(max(|p|, q))
            let bits = base.numer().bits().max(base.denom().bits()).saturating_sub(1);
            let raisonnable = n.unsigned_abs() <= EXPOSANT_EXACT_MAX
                && bits.saturating_mul(n.unsigned_abs()) <= BITS_EXACTS_MAX;
            if raisonnable {
                if n < 0 && base.is_zero() {
                    return Err(ErreurNoyau::domaine("0 élevé à une puissance négative"));
                }
                return Ok(Valeur::Exacte(rationnel_puissance_entiere(base.clone(), n)));
            }
        }

        let b = self.vers_f64();
        let e = exposant.vers_f64();
        if b < 0.0 && e.fract() != 0.0 {
            return Err(ErreurNoyau::domaine(
                "base négative avec exposant non entier",
            ));
        }
        Valeur::approchee(b.powf(e), "puissance")
    }

    /// Racine n-ième (n ≥ 1) : exacte si numérateur et dénominateur sont des puissances n-ièmes.
    pub fn racine(&self, indice: u32) -> Resultat<Valeur> {
        if indice == 0 {
            return Err(ErreurNoyau::domaine("racine d’indice 0"));
        }
        if self.est_negatif() && indice % 2 == 0 {
            return Err(ErreurNoyau::domaine("racine paire d’un nombre négatif"));
        }

        let negatif = self.est_negatif();

        if let Valeur::Exacte(r) = self.abs() {
            if let (Some(p), Some(q)) = (
                racine_entiere_exacte(r.numer(), indice),
                racine_entiere_exacte(r.denom(), indice),
            ) {
                let v = BigRational::new(p, q);
                return Ok(Valeur::Exacte(if negatif { -v } else { v }));
            }
        }

        let x = self.abs().vers_f64().powf(1.0 / f64::from(indice));
        Valeur::approchee(if negatif { -x } else { x }, "racine")
    }

    /// Coefficient binomial C(n, k) (entiers exacts, 0 ≤ k ≤ n).
    pub fn binome(n: &Valeur, k: &Valeur) -> Resultat<Valeur> {
        let (Some(n), Some(k)) = (n.entier(), k.entier()) else {
            return Err(ErreurNoyau::domaine("binôme : arguments entiers exigés"));
        };
        if n.is_negative() || k.is_negative() || k > n {
            return Err(ErreurNoyau::domaine("binôme : il faut 0 ≤ k ≤ n"));
        }

        // symétrie C(n,k) = C(n,n-k) : boucle la plus courte
        let k = std::cmp::min(k.clone(), n - k);
        if k > BigInt::from(BINOME_K_MAX) {
            return Err(ErreurNoyau::domaine("binôme : arguments trop grands"));
        }
        let mut acc = BigInt::one();
        let mut i = BigInt::zero();
        while i < k {
            acc = acc * (n - &i) / (&i + 1u32);
            i += 1u32;
        }
        Ok(Valeur::Exacte(BigRational::from_integer(acc)))
    }
}

/* ------------------------ Outils internes ------------------------ */

/// Exponentiation rapide sur Q (exposant négatif => inverse).
fn rationnel_puissance_entiere(base: BigRational, exp: i64) -> BigRational {
    let mut e = exp.unsigned_abs();
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    if exp < 0 {
        acc.recip()
    } else {
        acc
    }
}

/// a tel que a^n == x (x ≥ 0), sinon None.
fn racine_entiere_exacte(x: &BigInt, n: u32) -> Option<BigInt> {
    let a = x.nth_root(n);
    if a.pow(n) == *x {
        Some(a)
    } else {
        None
    }
}
