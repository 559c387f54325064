// src/noyau/normalisation.rs
//
// Pré-traitement texte (pur) avant tokenisation :
// - retire les espacements LaTeX (\, \; \: \! "\ ")
// - retire \left / \right (on garde le délimiteur)
// - retire les marqueurs de commande restants (\frac -> frac)
// - accolades -> parenthèses ({1}{2} -> (1)(2))
// - retire tous les blancs

/// Normalise une entrée LaTeX “linéarisée”.
pub fn normaliser(entree: &str) -> String {
    let chars: Vec<char> = entree.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            // espacements : \, \; \: \! et "\ "
            if let Some(&suivant) = chars.get(i + 1) {
                if matches!(suivant, ',' | ';' | ':' | '!') || suivant.is_whitespace() {
                    i += 2;
                    continue;
                }
            }

            // \left( ... \right) : seul le délimiteur compte
            let reste: String = chars[i + 1..].iter().take(5).collect();
            if reste.starts_with("left") {
                i += 5;
                continue;
            }
            if reste.starts_with("right") {
                i += 6;
                continue;
            }

            // marqueur de commande seul
            i += 1;
            continue;
        }

        match c {
            '{' => out.push('('),
            '}' => out.push(')'),
            _ if c.is_whitespace() => {}
            _ => out.push(c),
        }
        i += 1;
    }

    out
}
