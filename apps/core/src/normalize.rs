use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form: lowercased, diacritics stripped, whitespace runs
/// collapsed to a single space and trimmed.
///
/// Dotted and dotless `i` fold to the same letter, so Turkish and English case
/// rules converge (`"AĞIRLIK"`, `"ağırlık"` and `"agirlik"` all normalize to
/// `"agirlik"`).
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        push_folded(&mut out, c);
    }

    out
}

/// Normalized character count, the unit the minimum query length is measured in.
pub fn normalized_len(normalized: &str) -> usize {
    normalized.chars().count()
}

fn push_folded(out: &mut String, c: char) {
    match c {
        'ı' | 'İ' | 'I' => out.push('i'),
        'ł' | 'Ł' => out.push('l'),
        'ø' | 'Ø' => out.push('o'),
        'đ' | 'Đ' => out.push('d'),
        'ß' => out.push_str("ss"),
        'æ' | 'Æ' => out.push_str("ae"),
        'œ' | 'Œ' => out.push_str("oe"),
        _ => {
            for lower in c.to_lowercase().filter(|c| !is_combining_mark(*c)) {
                out.push(lower);
            }
        }
    }
}
