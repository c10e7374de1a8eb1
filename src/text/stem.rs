// Simplified Porter stemmer for English.
//
// Steps: plural stripping, -ed/-ing removal with the usual clean-up rules,
// terminal y -> i, then two ordered suffix-replacement tables gated on the
// stem's measure. Stable on already-stemmed output for common inflections
// ("running", "jumped", "cats"); not guaranteed idempotent for every
// pathological input.

/// Suffix replacements applied when the remaining stem has measure > 0.
/// The first matching suffix wins, so longer suffixes come first.
const STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("ization", "ize"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("biliti", "ble"),
    ("ation", "ate"),
    ("entli", "ent"),
    ("ousli", "ous"),
    ("alism", "al"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("alli", "al"),
    ("ator", "ate"),
    ("bli", "ble"),
    ("eli", "e"),
];

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ness", ""),
    ("ful", ""),
];

/// Stem an English word. Input is lowercased; words shorter than three
/// characters or containing non-ASCII letters are returned lowercased.
pub fn stem(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.len() < 3 || !lower.bytes().all(|b| b.is_ascii_lowercase()) {
        return lower;
    }

    let mut w = lower.into_bytes();
    strip_plural(&mut w);
    strip_ed_ing(&mut w);
    terminal_y(&mut w);
    replace_suffix(&mut w, STEP2);
    replace_suffix(&mut w, STEP3);

    // Only ASCII letters were ever written into the buffer.
    String::from_utf8(w).unwrap_or_default()
}

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `w` (Porter's m).
fn measure(w: &[u8]) -> usize {
    let n = w.len();
    let mut i = 0;
    let mut m = 0;
    while i < n && is_consonant(w, i) {
        i += 1;
    }
    loop {
        while i < n && !is_consonant(w, i) {
            i += 1;
        }
        if i >= n {
            break;
        }
        while i < n && is_consonant(w, i) {
            i += 1;
        }
        m += 1;
    }
    m
}

fn contains_vowel(w: &[u8]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_with_double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// consonant-vowel-consonant ending where the last consonant is not w, x or y.
fn ends_with_cvc(w: &[u8]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

fn strip_plural(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") {
        w.truncate(w.len() - 2);
    } else if w.ends_with(b"ies") {
        w.truncate(w.len() - 2);
    } else if w.ends_with(b"ss") || w.ends_with(b"us") || w.ends_with(b"is") {
        // "glass", "status", "analysis" are not plurals
    } else if w.ends_with(b"s") && contains_vowel(&w[..w.len() - 1]) {
        w.truncate(w.len() - 1);
    }
}

fn strip_ed_ing(w: &mut Vec<u8>) {
    if w.ends_with(b"eed") {
        if measure(&w[..w.len() - 3]) > 0 {
            w.truncate(w.len() - 1);
        }
        return;
    }

    let suffix_len = if w.ends_with(b"ed") {
        2
    } else if w.ends_with(b"ing") {
        3
    } else {
        return;
    };
    let stem_len = w.len() - suffix_len;
    if stem_len < 2 || !contains_vowel(&w[..stem_len]) {
        return;
    }
    w.truncate(stem_len);

    if w.ends_with(b"at") || w.ends_with(b"bl") || w.ends_with(b"iz") {
        w.push(b'e');
    } else if ends_with_double_consonant(w) && !matches!(w[w.len() - 1], b'l' | b's' | b'z') {
        w.pop();
    } else if measure(w) == 1 && ends_with_cvc(w) {
        w.push(b'e');
    }
}

fn terminal_y(w: &mut [u8]) {
    let n = w.len();
    if n > 2 && w[n - 1] == b'y' && contains_vowel(&w[..n - 1]) {
        w[n - 1] = b'i';
    }
}

fn replace_suffix(w: &mut Vec<u8>, table: &[(&str, &str)]) {
    for (suffix, replacement) in table {
        if w.ends_with(suffix.as_bytes()) {
            let stem_len = w.len() - suffix.len();
            if measure(&w[..stem_len]) > 0 {
                w.truncate(stem_len);
                w.extend_from_slice(replacement.as_bytes());
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_common_inflections() {
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("jumped"), "jump");
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("hoping"), "hope");
        assert_eq!(stem("agreed"), "agree");
    }

    #[test]
    fn suffix_tables_apply() {
        assert_eq!(stem("relational"), "relate");
        assert_eq!(stem("hopefulness"), "hope");
        assert_eq!(stem("electrical"), "electric");
    }

    #[test]
    fn short_and_non_ascii_words_pass_through() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("Año"), "año");
        assert_eq!(stem(""), "");
    }

    #[test]
    fn stable_on_stemmed_output() {
        for w in ["running", "jumped", "cats", "hoping", "relational", "happily"] {
            let once = stem(w);
            assert_eq!(stem(&once), once, "stem not stable for {w}");
        }
    }

    #[test]
    fn measure_counts_vc_sequences() {
        assert_eq!(measure(b"tr"), 0);
        assert_eq!(measure(b"trouble"), 1);
        assert_eq!(measure(b"troubles"), 2);
    }
}
