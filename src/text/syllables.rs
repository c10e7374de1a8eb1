// Syllable estimation by vowel-group counting.
//
// Corrections: a silent trailing "e" is dropped unless the word ends in a
// consonant + "le" ("table"), and "-ed"/"-es" endings are treated as silent
// after consonants that don't voice them ("jumped" vs "wanted").

fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'á' | 'é' | 'í' | 'ó' | 'ú' | 'à' | 'â' | 'ê' | 'ô'
            | 'ã' | 'õ' | 'ü'
    )
}

/// Approximate syllable count. Returns at least 1 for any word that has a
/// non-whitespace character, 0 for blank input.
pub fn count_syllables(word: &str) -> usize {
    if word.trim().is_empty() {
        return 0;
    }
    let chars: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    let n = chars.len();
    if n <= 3 {
        return 1;
    }

    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &chars {
        let v = is_vowel(c);
        if v && !prev_vowel {
            count += 1;
        }
        prev_vowel = v;
    }

    let last = chars[n - 1];
    let before = chars[n - 2];
    if last == 'e' {
        let consonant_le = before == 'l' && !is_vowel(chars[n - 3]);
        if !consonant_le && !is_vowel(before) && count > 1 {
            count -= 1;
        }
    } else if before == 'e' && (last == 'd' || last == 's') && count > 1 {
        let voiced = match last {
            'd' => matches!(chars[n - 3], 't' | 'd'),
            _ => matches!(chars[n - 3], 's' | 'x' | 'z' | 'c' | 'g' | 'h'),
        };
        if !voiced && !is_vowel(chars[n - 3]) {
            count -= 1;
        }
    }

    count.max(1)
}
