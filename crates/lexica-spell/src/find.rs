// Word lookup: exact, compound, and legacy-compound state machines.
//
// All three walks are iterative with explicit frame stacks -- a dictionary
// with many compound reentry points must not be able to exhaust the call
// stack. Case-insensitive matching folds the query per character while
// traversing the folded subtrie, so callers pass words as written.

use lexica_core::case;
use lexica_core::character::fold_char;
use lexica_trie::{CASE_INSENSITIVE_PREFIX, COMPOUND_FIX, FORBID_PREFIX, TrieAccess};

/// Compounding policy for [`find_word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompoundMode {
    /// Single linear walk; no compounding.
    None,
    /// Natural compounding through the dictionary's `+` continuation edges.
    #[default]
    Compound,
    /// Any word may follow any word, subject to a minimum segment length.
    Legacy,
}

/// Fully-populated lookup options. Construct with struct-update syntax over
/// [`FindOptions::default`] for partial overrides.
#[derive(Debug, Clone, Copy)]
pub struct FindOptions {
    pub match_case: bool,
    pub compound_mode: CompoundMode,
    pub check_forbidden: bool,
    pub legacy_min_compound_length: usize,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            match_case: false,
            compound_mode: CompoundMode::Compound,
            check_forbidden: true,
            legacy_min_compound_length: 3,
        }
    }
}

/// Outcome of a [`find_word`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindFullResult {
    /// The matched word. Legacy-compound matches carry a `+` at each
    /// segment boundary for diagnostics (`"err+msg"`).
    pub found: Option<String>,
    /// `true` when the match crossed at least one compound boundary.
    pub compound_used: bool,
    /// `false` when the match needed the case/accent-folded list.
    pub case_matched: bool,
    /// Forbidden-list verdict; `None` when the check was not requested.
    pub forbidden: Option<bool>,
}

impl FindFullResult {
    fn not_found(compound_used: bool) -> Self {
        Self {
            found: None,
            compound_used,
            case_matched: true,
            forbidden: None,
        }
    }
}

/// Look `word` up in the dictionary under the given options.
///
/// Empty input is never found and never compounds.
pub fn find_word<T: TrieAccess>(trie: &T, word: &str, options: FindOptions) -> FindFullResult {
    let mut result = match options.compound_mode {
        CompoundMode::None if options.match_case => find_exact(trie, word),
        CompoundMode::None => find_compound_walk(trie, word, false, false),
        CompoundMode::Compound => find_compound_walk(trie, word, true, options.match_case),
        CompoundMode::Legacy => {
            // Words shorter than the minimum segment length cannot compound;
            // fall through to plain lookup.
            if word.chars().count() < options.legacy_min_compound_length {
                if options.match_case {
                    find_exact(trie, word)
                } else {
                    find_compound_walk(trie, word, false, false)
                }
            } else {
                find_legacy(
                    trie,
                    word,
                    options.match_case,
                    options.legacy_min_compound_length,
                )
            }
        }
    };
    if options.check_forbidden {
        result.forbidden = Some(check_forbidden(trie, word, result.case_matched));
    }
    result
}

/// Forbidden-list membership, honoring the case root the match used: a word
/// resolved through the folded list is checked against the folded forbidden
/// list, so relaxing case never un-forbids a word.
fn check_forbidden<T: TrieAccess>(trie: &T, word: &str, case_matched: bool) -> bool {
    if word.is_empty() {
        return false;
    }
    if case_matched {
        return trie.is_forbidden(word);
    }
    let folded = case::fold_word(word);
    trie.child(trie.root(), CASE_INSENSITIVE_PREFIX)
        .and_then(|r| trie.child(r, FORBID_PREFIX))
        .and_then(|r| trie.walk(r, &folded))
        .is_some_and(|n| trie.is_eow(n))
}

fn find_exact<T: TrieAccess>(trie: &T, word: &str) -> FindFullResult {
    let found = !word.is_empty()
        && trie
            .walk(trie.root(), word)
            .is_some_and(|n| trie.is_eow(n));
    FindFullResult {
        found: found.then(|| word.to_string()),
        compound_used: false,
        case_matched: true,
        forbidden: None,
    }
}

/// Unused reentry choices remaining at a frame, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reentry {
    None,
    /// Restart the whole walk from the folded subtrie (root frame only).
    CaseFold,
    /// Jump into the compound-continuation subtrie.
    Compound,
    /// Jump into the folded compound-continuation subtrie.
    FoldedCompound,
}

#[derive(Debug, Clone, Copy)]
struct CompoundFrame<N> {
    /// Node reached by consuming the prefix up to this position.
    node: N,
    /// Replacement root installed by a reentry at this frame.
    reentry: Option<N>,
    pending: Reentry,
    /// Consume folded characters from this frame on.
    folded: bool,
    case_matched: bool,
}

/// Depth-first walk with backtracking at compound reentry points.
///
/// A frame per input position records which jumps are still untried; on a
/// dead end the walk pops to the deepest frame whose node carries a `+`
/// continuation edge and has an unused jump. The first full-length match in
/// this pre-order traversal wins -- compound resolution is exact-match, not
/// cost-guided, and downstream consumers depend on that tie-break.
fn find_compound_walk<T: TrieAccess>(
    trie: &T,
    word: &str,
    use_compound: bool,
    match_case: bool,
) -> FindFullResult {
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    if len == 0 {
        return FindFullResult::not_found(false);
    }

    let root = trie.root();
    let mut stack: Vec<CompoundFrame<T::Node>> = Vec::with_capacity(len + 1);
    stack.push(CompoundFrame {
        node: root,
        reentry: None,
        pending: if match_case {
            Reentry::None
        } else {
            Reentry::CaseFold
        },
        folded: false,
        case_matched: true,
    });

    let mut pos = 0usize;
    let mut compound_used = false;

    loop {
        let frame = stack[pos];
        let effective = frame.reentry.unwrap_or(frame.node);
        let ch = if frame.folded {
            fold_char(chars[pos])
        } else {
            chars[pos]
        };
        let next = pos + 1;
        let child = trie.child(effective, ch);

        match child {
            Some(c) if next < len => {
                stack.truncate(next);
                stack.push(CompoundFrame {
                    node: c,
                    reentry: None,
                    pending: if use_compound {
                        Reentry::Compound
                    } else {
                        Reentry::None
                    },
                    folded: frame.folded,
                    case_matched: frame.case_matched,
                });
                pos = next;
            }
            Some(c) if trie.is_eow(c) => {
                return FindFullResult {
                    found: Some(word.to_string()),
                    compound_used,
                    case_matched: frame.case_matched,
                    forbidden: None,
                };
            }
            _ => {
                // Dead end: deepest frame with an untried jump wins.
                let mut j = next - 1;
                while j > 0 {
                    let fr = &stack[j];
                    if fr.pending != Reentry::None
                        && trie.child(fr.node, COMPOUND_FIX).is_some()
                    {
                        break;
                    }
                    j -= 1;
                }
                let fr = stack[j];
                let (jump, new_pending, clears_case) = match fr.pending {
                    Reentry::None => return FindFullResult::not_found(compound_used),
                    Reentry::CaseFold => {
                        (trie.child(root, CASE_INSENSITIVE_PREFIX), Reentry::None, true)
                    }
                    Reentry::Compound => (
                        trie.child(root, COMPOUND_FIX),
                        if match_case {
                            Reentry::None
                        } else {
                            Reentry::FoldedCompound
                        },
                        false,
                    ),
                    Reentry::FoldedCompound => (
                        trie.child(root, CASE_INSENSITIVE_PREFIX)
                            .and_then(|r| trie.child(r, COMPOUND_FIX)),
                        Reentry::None,
                        true,
                    ),
                };
                compound_used = j > 0;
                let Some(jump_node) = jump else {
                    return FindFullResult::not_found(compound_used);
                };
                stack[j] = CompoundFrame {
                    node: fr.node,
                    reentry: Some(jump_node),
                    pending: new_pending,
                    folded: fr.folded || clears_case,
                    case_matched: fr.case_matched && !clears_case,
                };
                stack.truncate(j + 1);
                pos = j;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LegacyFrame<N> {
    node: N,
    reentry: Option<N>,
    /// How many candidate roots this frame has consumed.
    used_roots: usize,
    /// Characters consumed in the current segment before this position.
    sub_length: usize,
    folded: bool,
    case_matched: bool,
}

/// Legacy compounding: any dictionary word may follow any other, provided
/// every segment reaches the minimum length. Reentry retries candidate roots
/// in order (exact, then folded) before giving up at a frame.
fn find_legacy<T: TrieAccess>(
    trie: &T,
    word: &str,
    match_case: bool,
    min_len: usize,
) -> FindFullResult {
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    if len == 0 {
        return FindFullResult::not_found(false);
    }

    let mut roots: Vec<(T::Node, bool)> = vec![(trie.root(), false)];
    if !match_case {
        if let Some(folded) = trie.child(trie.root(), CASE_INSENSITIVE_PREFIX) {
            roots.push((folded, true));
        }
    }
    let num_roots = roots.len();

    let mut stack: Vec<LegacyFrame<T::Node>> = Vec::with_capacity(len + 1);
    stack.push(LegacyFrame {
        node: roots[0].0,
        reentry: None,
        used_roots: 1,
        sub_length: 0,
        folded: false,
        case_matched: true,
    });

    let mut pos = 0usize;
    let mut compound_used = false;

    loop {
        let frame = stack[pos];
        let effective = frame.reentry.unwrap_or(frame.node);
        let ch = if frame.folded {
            fold_char(chars[pos])
        } else {
            chars[pos]
        };
        let next = pos + 1;
        let child = trie.child(effective, ch);

        match child {
            Some(c) if next < len => {
                stack.truncate(next);
                stack.push(LegacyFrame {
                    node: c,
                    reentry: None,
                    used_roots: 0,
                    sub_length: frame.sub_length + 1,
                    folded: frame.folded,
                    case_matched: frame.case_matched,
                });
                pos = next;
            }
            Some(c) if trie.is_eow(c) && frame.sub_length + 1 >= min_len => {
                let found = reconstruct_legacy(&chars, &stack);
                return FindFullResult {
                    found: Some(found),
                    compound_used,
                    case_matched: frame.case_matched,
                    forbidden: None,
                };
            }
            _ => {
                // Back up to the deepest frame that closed a full segment
                // and still has an untried root, with enough input left for
                // another minimum-length segment.
                let mut j = next - 1;
                while j > 0 {
                    let fr = &stack[j];
                    if fr.used_roots < num_roots
                        && trie.is_eow(fr.node)
                        && (fr.sub_length >= min_len || fr.sub_length == 0)
                        && len - j >= min_len
                    {
                        break;
                    }
                    j -= 1;
                }
                if j == 0 && stack[0].used_roots >= num_roots {
                    return FindFullResult::not_found(compound_used);
                }
                compound_used = j > 0;
                let fr = &mut stack[j];
                let (root_node, folded) = roots[fr.used_roots];
                fr.used_roots += 1;
                fr.reentry = Some(root_node);
                fr.sub_length = 0;
                fr.folded = folded;
                fr.case_matched = fr.case_matched && fr.used_roots <= 1;
                stack.truncate(j + 1);
                pos = j;
            }
        }
    }
}

/// Rebuild the matched word with `+` inserted at each compound boundary.
fn reconstruct_legacy<N: Copy>(chars: &[char], stack: &[LegacyFrame<N>]) -> String {
    let mut out = String::with_capacity(chars.len() + 2);
    let mut prev_sub = 0usize;
    for (j, fr) in stack.iter().take(chars.len()).enumerate() {
        if fr.sub_length < prev_sub {
            out.push(COMPOUND_FIX);
        }
        out.push(chars[j]);
        prev_sub = fr.sub_length;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexica_trie::builder::TrieBuilder;
    use lexica_trie::node::Trie;

    fn dictionary() -> Trie {
        TrieBuilder::from_words([
            "walk",
            "walking",
            "caf\u{00E9}",
            "blue*",
            "*code*",
            "err+",
            "+msg",
            "!crud",
            "!bluecrud",
        ])
    }

    fn opts() -> FindOptions {
        FindOptions::default()
    }

    #[test]
    fn exact_match() {
        let t = dictionary();
        let r = find_word(
            &t,
            "walk",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::None,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("walk"));
        assert!(r.case_matched);
        assert!(!r.compound_used);
        assert_eq!(r.forbidden, Some(false));
    }

    #[test]
    fn empty_word_is_never_found() {
        let t = dictionary();
        for mode in [CompoundMode::None, CompoundMode::Compound, CompoundMode::Legacy] {
            let r = find_word(
                &t,
                "",
                FindOptions {
                    compound_mode: mode,
                    ..opts()
                },
            );
            assert_eq!(r.found, None);
            assert!(!r.compound_used);
        }
    }

    #[test]
    fn case_variant_found_via_folded_list() {
        let t = dictionary();
        let r = find_word(
            &t,
            "Walk",
            FindOptions {
                compound_mode: CompoundMode::None,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("Walk"));
        assert!(!r.case_matched);

        // the exact-case walk wins when it succeeds
        let r = find_word(
            &t,
            "walk",
            FindOptions {
                compound_mode: CompoundMode::None,
                ..opts()
            },
        );
        assert!(r.case_matched);
    }

    #[test]
    fn accents_fold_too() {
        let t = dictionary();
        let r = find_word(
            &t,
            "cafe",
            FindOptions {
                compound_mode: CompoundMode::None,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("cafe"));
        assert!(!r.case_matched);
    }

    #[test]
    fn match_case_blocks_folded_fallback() {
        let t = dictionary();
        let r = find_word(
            &t,
            "Walk",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::None,
                ..opts()
            },
        );
        assert_eq!(r.found, None);
    }

    #[test]
    fn compound_words_join_at_continuation_edges() {
        let t = dictionary();
        // "blue*" + "*code*" -> "bluecode"
        let r = find_word(&t, "bluecode", FindOptions { match_case: true, ..opts() });
        assert_eq!(r.found.as_deref(), Some("bluecode"));
        assert!(r.compound_used);
        assert!(r.case_matched);

        // "err+" + "+msg"
        let r = find_word(&t, "errmsg", FindOptions { match_case: true, ..opts() });
        assert_eq!(r.found.as_deref(), Some("errmsg"));
        assert!(r.compound_used);
    }

    #[test]
    fn compound_not_used_for_whole_words() {
        let t = dictionary();
        let r = find_word(&t, "code", FindOptions { match_case: true, ..opts() });
        assert_eq!(r.found.as_deref(), Some("code"));
        assert!(!r.compound_used);
    }

    #[test]
    fn err_alone_is_only_a_compound_stem() {
        let t = dictionary();
        let r = find_word(&t, "err", FindOptions { match_case: true, ..opts() });
        assert_eq!(r.found, None);
    }

    #[test]
    fn compound_mode_none_rejects_compounds() {
        let t = dictionary();
        let r = find_word(
            &t,
            "bluecode",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::None,
                ..opts()
            },
        );
        assert_eq!(r.found, None);
    }

    #[test]
    fn forbidden_words_are_flagged() {
        let t = dictionary();
        let r = find_word(
            &t,
            "crud",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::None,
                ..opts()
            },
        );
        assert_eq!(r.found, None);
        assert_eq!(r.forbidden, Some(true));
    }

    #[test]
    fn forbidden_check_can_be_skipped() {
        let t = dictionary();
        let r = find_word(
            &t,
            "crud",
            FindOptions {
                check_forbidden: false,
                ..opts()
            },
        );
        assert_eq!(r.forbidden, None);
    }

    #[test]
    fn forbidden_compound_result_is_flagged() {
        let t = dictionary();
        // "bluecrud" is forbidden even though "blue"+"crud" is not formable;
        // the forbidden verdict rides alongside the lookup verdict.
        let r = find_word(&t, "bluecrud", FindOptions { match_case: true, ..opts() });
        assert_eq!(r.forbidden, Some(true));
    }

    fn legacy_dictionary() -> Trie {
        TrieBuilder::from_words(["err", "msg", "walk", "walked", "joy", "to", "lift", "talking"])
    }

    #[test]
    fn legacy_compounds_any_words() {
        let t = legacy_dictionary();
        let r = find_word(
            &t,
            "errmsg",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::Legacy,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("err+msg"));
        assert!(r.compound_used);
    }

    #[test]
    fn legacy_three_segments() {
        let t = legacy_dictionary();
        let r = find_word(
            &t,
            "errmsgerr",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::Legacy,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("err+msg+err"));
    }

    #[test]
    fn legacy_respects_min_segment_length() {
        let t = legacy_dictionary();
        // "to"+"to" segments are below the default minimum of 3
        let r = find_word(
            &t,
            "toto",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::Legacy,
                ..opts()
            },
        );
        assert_eq!(r.found, None);

        let r = find_word(
            &t,
            "toto",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::Legacy,
                legacy_min_compound_length: 2,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("to+to"));
    }

    #[test]
    fn legacy_short_word_falls_back_to_exact() {
        let t = legacy_dictionary();
        let r = find_word(
            &t,
            "to",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::Legacy,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("to"));
        assert!(!r.compound_used);
    }

    #[test]
    fn legacy_single_word_has_no_boundary_markers() {
        let t = legacy_dictionary();
        let r = find_word(
            &t,
            "walked",
            FindOptions {
                match_case: true,
                compound_mode: CompoundMode::Legacy,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("walked"));
        assert!(!r.compound_used);
    }

    #[test]
    fn legacy_case_insensitive_segment() {
        let t = legacy_dictionary();
        let r = find_word(
            &t,
            "errMsg",
            FindOptions {
                compound_mode: CompoundMode::Legacy,
                ..opts()
            },
        );
        assert_eq!(r.found.as_deref(), Some("err+Msg"));
        assert!(!r.case_matched);
    }

    #[test]
    fn works_on_blob_representation() {
        let t = dictionary();
        let blob = t.export();
        for (word, mode) in [
            ("walk", CompoundMode::None),
            ("bluecode", CompoundMode::Compound),
            ("errmsg", CompoundMode::Compound),
        ] {
            let o = FindOptions {
                match_case: true,
                compound_mode: mode,
                ..opts()
            };
            assert_eq!(find_word(&t, word, o), find_word(&blob, word, o), "{word}");
        }
    }
}
