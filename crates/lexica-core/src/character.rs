// Character classification and accent folding.

/// `true` for characters that may appear inside a word-like run:
/// letters, digits, and the apostrophe forms.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_apostrophe(c)
}

/// `true` for the straight and typographic apostrophes.
pub fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

/// Lowercase a character without expansion.
///
/// `char::to_lowercase` may map one character to several (e.g. `İ`); such
/// characters are left unchanged so that folding never changes a word's
/// length.
pub fn simple_lower(c: char) -> char {
    let mut it = c.to_lowercase();
    let first = it.next().unwrap_or(c);
    if it.next().is_some() { c } else { first }
}

/// Uppercase a character without expansion.
pub fn simple_upper(c: char) -> char {
    let mut it = c.to_uppercase();
    let first = it.next().unwrap_or(c);
    if it.next().is_some() { c } else { first }
}

/// Strip the accent from a precomposed Latin letter, if it has one.
///
/// Covers the Latin-1 Supplement and Latin Extended-A letters that fold to an
/// unaccented ASCII base. Characters outside the table are returned
/// unchanged. Input is expected to be lowercase (see [`fold_char`]).
pub fn strip_accent(c: char) -> char {
    match c {
        '\u{00E0}'..='\u{00E5}' | '\u{0101}' | '\u{0103}' | '\u{0105}' => 'a',
        '\u{00E7}' | '\u{0107}' | '\u{0109}' | '\u{010B}' | '\u{010D}' => 'c',
        '\u{010F}' | '\u{0111}' => 'd',
        '\u{00E8}'..='\u{00EB}'
        | '\u{0113}'
        | '\u{0115}'
        | '\u{0117}'
        | '\u{0119}'
        | '\u{011B}' => 'e',
        '\u{011D}' | '\u{011F}' | '\u{0121}' | '\u{0123}' => 'g',
        '\u{0125}' | '\u{0127}' => 'h',
        '\u{00EC}'..='\u{00EF}' | '\u{0129}' | '\u{012B}' | '\u{012D}' | '\u{012F}' | '\u{0131}' => {
            'i'
        }
        '\u{0135}' => 'j',
        '\u{0137}' => 'k',
        '\u{013A}' | '\u{013C}' | '\u{013E}' | '\u{0140}' | '\u{0142}' => 'l',
        '\u{00F1}' | '\u{0144}' | '\u{0146}' | '\u{0148}' => 'n',
        '\u{00F2}'..='\u{00F6}' | '\u{00F8}' | '\u{014D}' | '\u{014F}' | '\u{0151}' => 'o',
        '\u{0155}' | '\u{0157}' | '\u{0159}' => 'r',
        '\u{015B}' | '\u{015D}' | '\u{015F}' | '\u{0161}' => 's',
        '\u{0163}' | '\u{0165}' | '\u{0167}' => 't',
        '\u{00F9}'..='\u{00FC}'
        | '\u{0169}'
        | '\u{016B}'
        | '\u{016D}'
        | '\u{016F}'
        | '\u{0171}'
        | '\u{0173}' => 'u',
        '\u{0175}' => 'w',
        '\u{00FD}' | '\u{00FF}' | '\u{0177}' => 'y',
        '\u{017A}' | '\u{017C}' | '\u{017E}' => 'z',
        _ => c,
    }
}

/// Lowercase and strip the accent from a character.
pub fn fold_char(c: char) -> char {
    strip_accent(simple_lower(c))
}
