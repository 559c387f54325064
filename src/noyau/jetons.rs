// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::erreur::{ErreurNoyau, Resultat};
use super::table::{Op, Tables};
use super::valeur::Valeur;

/// Identité d’une parenthèse : (profondeur, rang dans cette profondeur).
/// Une ouvrante et une fermante se correspondent ssi leurs identités sont égales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IdParenthese {
    pub profondeur: usize,
    pub sequence: usize,
}

/// Jeton : le genre est fixé à la construction, jamais redéduit de la forme de la valeur.
#[derive(Clone, Debug, PartialEq)]
pub enum Jeton {
    Nombre(Valeur),
    Variable {
        coeff: Valeur,
        nom: String,
        puissance: i32,
    },
    Operateur {
        op: Op,
        // indice explicite de \sqrt[n]{..}
        indice: Option<u32>,
    },
    Parenthese {
        ouvrante: bool,
        id: IdParenthese,
    },
}

impl Jeton {
    pub fn op(op: Op) -> Self {
        Jeton::Operateur { op, indice: None }
    }

    pub fn ouvrante() -> Self {
        Jeton::Parenthese {
            ouvrante: true,
            id: IdParenthese::default(),
        }
    }

    pub fn fermante() -> Self {
        Jeton::Parenthese {
            ouvrante: false,
            id: IdParenthese::default(),
        }
    }

    pub fn variable(coeff: Valeur, nom: impl Into<String>, puissance: i32) -> Self {
        Jeton::Variable {
            coeff,
            nom: nom.into(),
            puissance,
        }
    }

    pub fn est_valeur(&self) -> bool {
        matches!(self, Jeton::Nombre(_) | Jeton::Variable { .. })
    }

    pub fn est_ouvrante(&self) -> bool {
        matches!(self, Jeton::Parenthese { ouvrante: true, .. })
    }

    pub fn est_fermante(&self) -> bool {
        matches!(self, Jeton::Parenthese { ouvrante: false, .. })
    }

    pub fn operateur(&self) -> Option<Op> {
        match self {
            Jeton::Operateur { op, .. } => Some(*op),
            _ => None,
        }
    }

    pub fn est_op(&self, cible: Op) -> bool {
        self.operateur() == Some(cible)
    }

    pub fn nom_variable(&self) -> Option<&str> {
        match self {
            Jeton::Variable { nom, .. } => Some(nom),
            _ => None,
        }
    }

    /// Coefficient (nombre ou variable).
    pub fn coefficient(&self) -> Option<&Valeur> {
        match self {
            Jeton::Nombre(v) | Jeton::Variable { coeff: v, .. } => Some(v),
            _ => None,
        }
    }

    pub fn est_negatif(&self) -> bool {
        self.coefficient().is_some_and(Valeur::est_negatif)
    }

    /// Même genre de valeur : deux nombres, ou deux variables de même nom et même puissance.
    pub fn meme_genre(&self, autre: &Jeton) -> bool {
        match (self, autre) {
            (Jeton::Nombre(_), Jeton::Nombre(_)) => true,
            (
                Jeton::Variable {
                    nom: a,
                    puissance: pa,
                    ..
                },
                Jeton::Variable {
                    nom: b,
                    puissance: pb,
                    ..
                },
            ) => a == b && pa == pb,
            _ => false,
        }
    }

    /// Même jeton avec un coefficient remplacé (0·x devient le nombre 0).
    pub fn avec_coefficient(&self, v: Valeur) -> Jeton {
        match self {
            Jeton::Variable { nom, puissance, .. } if !v.est_zero() => Jeton::Variable {
                coeff: v,
                nom: nom.clone(),
                puissance: *puissance,
            },
            _ => Jeton::Nombre(v),
        }
    }

    pub fn oppose(&self) -> Jeton {
        match self.coefficient() {
            Some(v) => self.avec_coefficient(v.neg()),
            None => self.clone(),
        }
    }
}

/// Tokenize une chaîne déjà normalisée (voir normalisation.rs).
/// Ordre d’essai à chaque position :
/// - parenthèses
/// - opérateur (plus longue orthographe de la table) ; "sqrt[n]" garde l’indice
/// - constante nommée (pi)
/// - nombre (entier ou décimal) ; "2x" => variable de coefficient 2
/// - identifiant : une lettre + indice optionnel (x_1, x_(12)) => variable de coefficient 1
pub fn tokenize(s: &str, tables: &Tables) -> Resultat<Vec<Jeton>> {
    let chars: Vec<char> = s.chars().collect();
    let mut out: Vec<Jeton> = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '(' {
            out.push(Jeton::ouvrante());
            i += 1;
            continue;
        }
        if c == ')' {
            out.push(Jeton::fermante());
            i += 1;
            continue;
        }

        // Opérateurs / fonctions
        if let Some((op, longueur)) = tables.reconnaitre(&chars, i) {
            i += longueur;
            let indice = if op == Op::Racine && chars.get(i) == Some(&'[') {
                let (n, lu) = lire_indice_racine(&chars, i)?;
                i += lu;
                Some(n)
            } else {
                None
            };
            out.push(Jeton::Operateur { op, indice });
            continue;
        }

        if let Some((v, longueur)) = tables.constante(&chars, i) {
            // "2pi" : deux nombres accolés seraient additionnés, on force le produit
            if out.last().is_some_and(|j| j.est_valeur() || j.est_fermante()) {
                out.push(Jeton::op(Op::Fois));
            }
            out.push(Jeton::Nombre(v));
            i += longueur;
            continue;
        }

        // Nombre : 12, 3.25, .5
        if c.is_ascii_digit()
            || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit()))
        {
            let (v, lu) = lire_nombre(&chars, i);
            i += lu;

            // coefficient collé : 2x, 0.5y (mais pas 2sin, 2pi)
            let suit_identifiant = chars.get(i).is_some_and(|d| d.is_ascii_alphabetic())
                && tables.reconnaitre(&chars, i).is_none()
                && tables.constante(&chars, i).is_none();
            if suit_identifiant {
                let (nom, lu) = lire_identifiant(&chars, i)?;
                i += lu;
                if chars.get(i) == Some(&'^') {
                    // 2x^2 = 2·(x^2) : l’exposant ne porte pas sur le coefficient
                    out.push(Jeton::Nombre(v));
                    out.push(Jeton::op(Op::Fois));
                    out.push(Jeton::variable(Valeur::un(), nom, 1));
                } else {
                    // 0x => 0
                    out.push(Jeton::variable(Valeur::un(), nom, 1).avec_coefficient(v));
                }
            } else {
                out.push(Jeton::Nombre(v));
            }
            continue;
        }

        // Identifiant
        if c.is_ascii_alphabetic() {
            let (nom, lu) = lire_identifiant(&chars, i)?;
            i += lu;
            // "xy" : deux identifiants accolés dans la source => produit explicite
            if matches!(out.last(), Some(Jeton::Variable { .. })) {
                out.push(Jeton::op(Op::Fois));
            }
            out.push(Jeton::variable(Valeur::un(), nom, 1));
            continue;
        }

        return Err(ErreurNoyau::Lexicale {
            caractere: c,
            position: i,
        });
    }

    Ok(out)
}

/// Littéral décimal exact : "3.25" => 325/100.
fn lire_nombre(chars: &[char], debut: usize) -> (Valeur, usize) {
    let mut i = debut;
    let mut chiffres = String::new();
    let mut decimales: usize = 0;
    let mut apres_point = false;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            chiffres.push(c);
            if apres_point {
                decimales += 1;
            }
        } else if c == '.' && !apres_point {
            apres_point = true;
        } else {
            break;
        }
        i += 1;
    }

    // chiffres ASCII seulement : parse_bytes ne peut échouer que sur chaîne vide
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10).unwrap_or_default();
    let d = BigInt::from(10u32).pow(decimales as u32);
    let r = if d.is_one() {
        BigRational::from_integer(n)
    } else {
        BigRational::new(n, d)
    };

    (Valeur::Exacte(r), i - debut)
}

/// Une lettre + indice optionnel : x, x_1, x_(12) (accolades déjà converties).
fn lire_identifiant(chars: &[char], debut: usize) -> Resultat<(String, usize)> {
    let mut nom = String::new();
    nom.push(chars[debut]);
    let mut i = debut + 1;

    if chars.get(i) == Some(&'_') {
        let souligne = i;
        i += 1;
        let entre_parentheses = chars.get(i) == Some(&'(');
        if entre_parentheses {
            i += 1;
        }

        let debut_indice = i;
        while i < chars.len() && chars[i].is_ascii_alphanumeric() {
            // sans parenthèses : un seul caractère d’indice (x_1y = x_1 · y)
            if !entre_parentheses && i > debut_indice {
                break;
            }
            i += 1;
        }

        if i == debut_indice || (entre_parentheses && chars.get(i) != Some(&')')) {
            return Err(ErreurNoyau::Lexicale {
                caractere: '_',
                position: souligne,
            });
        }

        nom.push('_');
        nom.extend(&chars[debut_indice..i]);
        if entre_parentheses {
            i += 1;
        }
    }

    Ok((nom, i - debut))
}

/// "[n]" après sqrt : n entier ≥ 1.
fn lire_indice_racine(chars: &[char], debut: usize) -> Resultat<(u32, usize)> {
    let mut i = debut + 1;
    let mut chiffres = String::new();
    while i < chars.len() && chars[i].is_ascii_digit() {
        chiffres.push(chars[i]);
        i += 1;
    }

    let erreur = || ErreurNoyau::Lexicale {
        caractere: '[',
        position: debut,
    };

    if chars.get(i) != Some(&']') {
        return Err(erreur());
    }
    let n: u32 = chiffres.parse().map_err(|_| erreur())?;
    if n == 0 {
        return Err(erreur());
    }

    Ok((n, i + 1 - debut))
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton], tables: &Tables) -> String {
    fn format_valeur(v: &Valeur) -> String {
        match v {
            Valeur::Exacte(r) if r.denom().is_one() => format!("{}", r.numer()),
            Valeur::Exacte(r) => format!("{}/{}", r.numer(), r.denom()),
            Valeur::Approchee(x) => format!("{x}"),
        }
    }

    let mut out = Vec::new();
    for j in jetons {
        let s = match j {
            Jeton::Nombre(v) => format_valeur(v),
            Jeton::Variable {
                coeff,
                nom,
                puissance,
            } => {
                if *puissance == 1 {
                    format!("{}·{nom}", format_valeur(coeff))
                } else {
                    format!("{}·{nom}^{puissance}", format_valeur(coeff))
                }
            }
            Jeton::Operateur { op, indice: None } => tables.nom(*op).to_string(),
            Jeton::Operateur {
                op,
                indice: Some(n),
            } => format!("{}[{n}]", tables.nom(*op)),
            Jeton::Parenthese { ouvrante: true, .. } => "(".to_string(),
            Jeton::Parenthese { ouvrante: false, .. } => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
