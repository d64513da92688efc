// Break-variant generators for the word splitter.
//
// Each generator scans the segment independently and proposes zero or more
// ways to break at an offset; a variant either drops a byte range at the
// boundary or declines to break. All offsets are byte offsets into the line,
// aligned to character boundaries. The search in `split` decides which
// variants win.

use lexica_core::character::is_apostrophe;

/// One way to handle a potential break point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BreakVariant {
    /// Split here, dropping the bytes in `[start, end)`. `start == end` is a
    /// pure split that keeps every character.
    Split { start: usize, end: usize },
    /// Do not break at this point.
    Ignore,
}

/// A candidate break location with its competing variants.
#[derive(Debug, Clone)]
pub(crate) struct PossibleBreak {
    /// Byte offset the break is anchored at; entries are processed in
    /// ascending anchor order.
    pub(crate) offset: usize,
    pub(crate) variants: Vec<BreakVariant>,
}

/// Symbol characters that may separate words inside one run.
fn is_break_symbol(c: char) -> bool {
    matches!(c, '-' | '_' | '\\')
}

/// Word-suffix endings that may dangle after an all-caps stem
/// (`ERRORs`, `CODE'ing`). Longest first.
const TRAILING_ENDINGS: &[&str] = &["ings", "ing", "ies", "nth", "es", "ed", "th", "s", "d"];

/// Generate every break candidate for `text[start..end]`, merged into one
/// list sorted by anchor offset.
pub(crate) fn generate_breaks(
    text: &str,
    start: usize,
    end: usize,
    optional_break_characters: &str,
) -> Vec<PossibleBreak> {
    let chars: Vec<(usize, char)> = text[start..end]
        .char_indices()
        .map(|(i, c)| (i + start, c))
        .collect();

    let mut breaks = Vec::new();
    camel_breaks(&chars, &mut breaks);
    symbol_breaks(&chars, end, &mut breaks);
    digit_breaks(&chars, end, &mut breaks);
    escape_breaks(&chars, end, &mut breaks);
    optional_breaks(&chars, end, optional_break_characters, &mut breaks);
    dangling_quote_breaks(&chars, &mut breaks);
    trailing_ending_breaks(&chars, end, &mut breaks);

    breaks.sort_by_key(|b| b.offset);
    breaks
}

/// camelCase boundaries: `lower|Upper`, and for an uppercase run followed by
/// lowercase (`ERRORCodes`) both `ERROR|Codes` and `ERRORC|odes` compete.
fn camel_breaks(chars: &[(usize, char)], out: &mut Vec<PossibleBreak>) {
    for w in chars.windows(2) {
        let [(i0, c0), (i1, _)] = [w[0], w[1]];
        if c0.is_lowercase() && w[1].1.is_uppercase() {
            out.push(PossibleBreak {
                offset: i0,
                variants: vec![
                    BreakVariant::Split { start: i1, end: i1 },
                    BreakVariant::Ignore,
                ],
            });
        }
    }
    for w in chars.windows(3) {
        let [(i0, c0), (i1, c1), (i2, c2)] = [w[0], w[1], w[2]];
        if c0.is_uppercase() && c1.is_uppercase() && c2.is_lowercase() {
            out.push(PossibleBreak {
                offset: i0,
                variants: vec![
                    BreakVariant::Split { start: i1, end: i1 },
                    BreakVariant::Split { start: i2, end: i2 },
                    BreakVariant::Ignore,
                ],
            });
        }
    }
}

/// The full variant set for a dropped-or-kept range: remove the characters,
/// keep them with the right-hand word, keep them with the left-hand word,
/// or leave the run intact.
fn range_variants(start: usize, end: usize) -> Vec<BreakVariant> {
    vec![
        BreakVariant::Split { start, end },
        BreakVariant::Split { start, end: start },
        BreakVariant::Split { start: end, end },
        BreakVariant::Ignore,
    ]
}

fn symbol_breaks(chars: &[(usize, char)], seg_end: usize, out: &mut Vec<PossibleBreak>) {
    for (k, &(i, c)) in chars.iter().enumerate() {
        if is_break_symbol(c) {
            let next = chars.get(k + 1).map_or(seg_end, |&(j, _)| j);
            out.push(PossibleBreak {
                offset: i,
                variants: range_variants(i, next),
            });
        }
    }
}

fn digit_breaks(chars: &[(usize, char)], seg_end: usize, out: &mut Vec<PossibleBreak>) {
    let mut k = 0;
    while k < chars.len() {
        if !chars[k].1.is_ascii_digit() {
            k += 1;
            continue;
        }
        let run_start = chars[k].0;
        let mut k_end = k;
        while k_end < chars.len() && chars[k_end].1.is_ascii_digit() {
            k_end += 1;
        }
        let run_end = chars.get(k_end).map_or(seg_end, |&(j, _)| j);
        out.push(PossibleBreak {
            offset: run_start,
            variants: range_variants(run_start, run_end),
        });
        k = k_end;
    }
}

/// Escape sequences inside string-literal content: `\n`, `\t`, `\x41`,
/// `é` and friends.
fn escape_breaks(chars: &[(usize, char)], seg_end: usize, out: &mut Vec<PossibleBreak>) {
    let mut k = 0;
    while k + 1 < chars.len() {
        if chars[k].1 != '\\' {
            k += 1;
            continue;
        }
        let (start, _) = chars[k];
        let follow = chars[k + 1].1.to_ascii_lowercase();
        let mut k_end = k;
        if matches!(follow, 'a' | 'n' | 'r' | 'v' | 't' | 'b' | 'f') {
            k_end = k + 2;
        } else if matches!(follow, 'x' | 'u') {
            let mut h = k + 2;
            while h < chars.len() && chars[h].1.is_ascii_hexdigit() {
                h += 1;
            }
            if h > k + 2 {
                k_end = h;
            }
        }
        if k_end > k {
            let end = chars.get(k_end).map_or(seg_end, |&(j, _)| j);
            out.push(PossibleBreak {
                offset: start,
                variants: range_variants(start, end),
            });
            k = k_end;
        } else {
            k += 1;
        }
    }
}

/// Caller-configured optional break characters: drop-or-ignore only.
fn optional_breaks(
    chars: &[(usize, char)],
    seg_end: usize,
    optional: &str,
    out: &mut Vec<PossibleBreak>,
) {
    if optional.is_empty() {
        return;
    }
    for (k, &(i, c)) in chars.iter().enumerate() {
        if optional.contains(c) {
            let next = chars.get(k + 1).map_or(seg_end, |&(j, _)| j);
            out.push(PossibleBreak {
                offset: i,
                variants: vec![BreakVariant::Split { start: i, end: next }, BreakVariant::Ignore],
            });
        }
    }
}

/// A quote is dangling when at least two letters follow it; `don't` keeps
/// its quote, `'thing` and `n'cpp` lose theirs.
fn dangling_quote_breaks(chars: &[(usize, char)], out: &mut Vec<PossibleBreak>) {
    for (k, &(i, c)) in chars.iter().enumerate() {
        if !is_apostrophe(c) {
            continue;
        }
        let following_letters = chars[k + 1..]
            .iter()
            .take_while(|&&(_, c)| c.is_alphabetic())
            .count();
        if following_letters >= 2 {
            let next = chars.get(k + 1).map_or(i, |&(j, _)| j);
            out.push(PossibleBreak {
                offset: i,
                variants: vec![BreakVariant::Split { start: i, end: next }, BreakVariant::Ignore],
            });
        }
    }
}

/// Lowercase endings dangling after an uppercase stem at the end of the
/// segment: `ERRORs`, `CODE'ing`, `CAFÉed`.
fn trailing_ending_breaks(chars: &[(usize, char)], seg_end: usize, out: &mut Vec<PossibleBreak>) {
    // trailing run of lowercase letters
    let mut k = chars.len();
    while k > 0 && chars[k - 1].1.is_lowercase() {
        k -= 1;
    }
    if k == chars.len() {
        return;
    }
    let run: String = chars[k..].iter().map(|&(_, c)| c).collect();
    if !TRAILING_ENDINGS.contains(&run.as_str()) {
        return;
    }
    // optional apostrophe directly before the ending
    let mut cut = k;
    if cut > 0 && is_apostrophe(chars[cut - 1].1) {
        cut -= 1;
    }
    // require an uppercase stem of at least two letters
    if cut < 2 || !chars[cut - 1].1.is_uppercase() || !chars[cut - 2].1.is_uppercase() {
        return;
    }
    let start = chars[cut].0;
    out.push(PossibleBreak {
        offset: start,
        variants: vec![
            BreakVariant::Split {
                start,
                end: seg_end,
            },
            BreakVariant::Ignore,
        ],
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaks_for(text: &str) -> Vec<PossibleBreak> {
        generate_breaks(text, 0, text.len(), "")
    }

    fn split_points(breaks: &[PossibleBreak]) -> Vec<(usize, usize)> {
        breaks
            .iter()
            .flat_map(|b| &b.variants)
            .filter_map(|v| match *v {
                BreakVariant::Split { start, end } => Some((start, end)),
                BreakVariant::Ignore => None,
            })
            .collect()
    }

    #[test]
    fn camel_case_boundary() {
        let b = breaks_for("errorCodes");
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].offset, 4);
        assert!(b[0].variants.contains(&BreakVariant::Split { start: 5, end: 5 }));
        assert!(b[0].variants.contains(&BreakVariant::Ignore));
    }

    #[test]
    fn upper_run_offers_competing_variants() {
        let b = breaks_for("ERRORCodes");
        // ERROR|Codes and ERRORC|odes compete
        let points = split_points(&b);
        assert!(points.contains(&(5, 5)));
        assert!(points.contains(&(6, 6)));
    }

    #[test]
    fn symbols_offer_drop_and_keep_variants() {
        let b = breaks_for("data-base");
        assert_eq!(b[0].offset, 4);
        let points = split_points(&b);
        assert!(points.contains(&(4, 5))); // drop the dash
        assert!(points.contains(&(4, 4))); // keep it right
        assert!(points.contains(&(5, 5))); // keep it left
    }

    #[test]
    fn digit_runs_break_as_units() {
        let b = breaks_for("abc123def");
        assert_eq!(b[0].offset, 3);
        assert!(split_points(&b).contains(&(3, 6)));
    }

    #[test]
    fn escape_sequences_are_spans() {
        let b = breaks_for("err\\nmsg");
        assert!(split_points(&b).contains(&(3, 5)));

        // hex escapes are greedy
        let b = breaks_for("a\\x41z");
        assert!(split_points(&b).contains(&(1, 5)));
    }

    #[test]
    fn dangling_quotes_can_drop() {
        let b = breaks_for("n'cpp");
        assert!(split_points(&b).contains(&(1, 2)));
        // a possessive has only one trailing letter
        assert!(breaks_for("error's").is_empty());
    }

    #[test]
    fn trailing_endings_after_upper_stems() {
        let b = breaks_for("ERRORs");
        assert!(split_points(&b).contains(&(5, 6)));
        let b = breaks_for("CODE'ing");
        assert!(split_points(&b).contains(&(4, 8)));
        // lowercase stems keep their endings
        assert!(breaks_for("codes").is_empty());
    }

    #[test]
    fn optional_characters_from_options() {
        let b = generate_breaks("foo.bar", 0, 7, ".");
        assert!(split_points(&b).contains(&(3, 4)));
    }

    #[test]
    fn merged_list_is_sorted_by_offset() {
        let b = breaks_for("dataBase-store42X");
        let offsets: Vec<usize> = b.iter().map(|x| x.offset).collect();
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        assert_eq!(offsets, sorted);
    }
}
