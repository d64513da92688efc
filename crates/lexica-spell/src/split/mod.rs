//! Cost-guided segmentation of raw text spans into dictionary-checkable
//! words.
//!
//! Candidate break points come from independent generators (camelCase,
//! symbols, digits, escapes, configured characters, dangling quotes,
//! trailing endings); a priority search over their variants finds the
//! segmentation whose unknown-word cost is lowest. The dictionary oracle is
//! an arbitrary predicate -- in production the find engine, in tests
//! anything.

mod breaks;

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use lexica_core::character::is_word_char;
use lexica_core::text::{TextOffset, TextOffsetWithValid};

use crate::SearchLimits;
use breaks::{BreakVariant, PossibleBreak, generate_breaks};

/// Options for [`split`].
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Extra characters at which the splitter may (but need not) break.
    pub optional_break_characters: String,
    /// Work bounds for the segmentation search.
    pub limits: SearchLimits,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            optional_break_characters: String::new(),
            limits: SearchLimits {
                max_attempts: 1000,
                deadline: None,
            },
        }
    }
}

/// Outcome of a [`split`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    /// The original line passed in.
    pub line: TextOffset,
    /// The offset processing started from.
    pub offset: usize,
    /// The word-like span that was analyzed.
    pub text: TextOffset,
    /// The segments `text` was split into. Together with the characters
    /// dropped at applied break variants they exactly cover `text`.
    pub words: Vec<TextOffsetWithValid>,
    /// Offset at which processing stopped.
    pub end_offset: usize,
}

/// Split the next word-like span of `line`, starting at the absolute
/// `offset`, into dictionary-checkable words.
pub fn split<F>(
    line: &TextOffset,
    offset: usize,
    is_valid_word: F,
    options: &SplitOptions,
) -> SplitResult
where
    F: Fn(&TextOffset) -> bool,
{
    let rel_offset = offset.saturating_sub(line.offset);
    let (rel_start, rel_end) =
        find_next_word_span(&line.text, rel_offset, &options.optional_break_characters);

    if rel_start == rel_end {
        return SplitResult {
            line: line.clone(),
            offset,
            text: TextOffset::new("", rel_start + line.offset),
            words: Vec::new(),
            end_offset: rel_start + line.offset,
        };
    }

    let mut oracle = Oracle {
        line,
        is_valid_word,
        cache: HashMap::new(),
    };

    let span_text = TextOffset::new(&line.text[rel_start..rel_end], rel_start + line.offset);
    let end_offset = rel_end + line.offset;

    let mut possible_breaks = generate_breaks(
        &line.text,
        rel_start,
        rel_end,
        &options.optional_break_characters,
    );
    if possible_breaks.is_empty() {
        let whole = oracle.check(rel_start, rel_end);
        return SplitResult {
            line: line.clone(),
            offset,
            text: span_text,
            words: vec![whole],
            end_offset,
        };
    }

    // Terminal entry so pass-through chains always run off the end of the
    // list and close their final segment.
    possible_breaks.push(PossibleBreak {
        offset: rel_end,
        variants: vec![BreakVariant::Ignore],
    });

    let words = search(
        rel_start,
        rel_end,
        &possible_breaks,
        &mut oracle,
        &options.limits,
    );

    SplitResult {
        line: line.clone(),
        offset,
        text: span_text,
        words,
        end_offset,
    }
}

/// Locate the next run of word-like characters (letters, digits,
/// apostrophes, plus the joiners the break generators know how to handle
/// and any caller-configured optional break characters).
fn find_next_word_span(text: &str, from: usize, extra: &str) -> (usize, usize) {
    let in_run = |c: char| is_word_char(c) || matches!(c, '-' | '_' | '\\') || extra.contains(c);
    let mut start = None;
    for (i, c) in text[from.min(text.len())..].char_indices() {
        let at = from + i;
        match start {
            None if in_run(c) => start = Some(at),
            None => {}
            Some(s) => {
                if !in_run(c) {
                    return (s, at);
                }
            }
        }
    }
    match start {
        Some(s) => (s, text.len()),
        None => (text.len(), text.len()),
    }
}

/// Caches oracle verdicts per `(start, end)`; competing paths re-query the
/// same spans constantly.
struct Oracle<'a, F> {
    line: &'a TextOffset,
    is_valid_word: F,
    cache: HashMap<(usize, usize), bool>,
}

impl<F: Fn(&TextOffset) -> bool> Oracle<'_, F> {
    fn check(&mut self, start: usize, end: usize) -> TextOffsetWithValid {
        let is_found = match self.cache.get(&(start, end)) {
            Some(&v) => v,
            None => {
                let probe = TextOffset::new(
                    &self.line.text[start..end],
                    start + self.line.offset,
                );
                let v = (self.is_valid_word)(&probe);
                self.cache.insert((start, end), v);
                v
            }
        };
        TextOffsetWithValid {
            text: self.line.text[start..end].to_string(),
            offset: start + self.line.offset,
            is_found,
        }
    }
}

/// A segment accepted by some candidate chain.
struct ChainNode {
    parent: Option<u32>,
    /// Byte position the segment started at.
    at: usize,
    text: Option<TextOffsetWithValid>,
}

/// Lowest-cost completion known from a byte position to the end.
struct PathNode {
    next: Option<u32>,
    cost: u32,
    text: Option<TextOffsetWithValid>,
}

struct Candidate {
    parent: Option<u32>,
    at: usize,
    break_index: usize,
    variant: BreakVariant,
    cost: u32,
}

struct QueueEntry {
    /// Expected total cost, scaled by two so the half-weight of pending
    /// dropped ranges stays integral.
    expected: u32,
    at: usize,
    seq: u64,
    candidate: Candidate,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expected
            .cmp(&other.expected)
            .then_with(|| other.at.cmp(&self.at))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

fn char_count(s: &str) -> u32 {
    s.chars().count() as u32
}

/// Priority search over break variants. The cost of leaving a span unsplit
/// is its character count when the oracle rejects it, zero when it accepts;
/// a per-offset memo keeps only the cheapest completion reaching each
/// position, short-circuiting dominated alternatives.
fn search<F: Fn(&TextOffset) -> bool>(
    rel_start: usize,
    rel_end: usize,
    possible_breaks: &[PossibleBreak],
    oracle: &mut Oracle<'_, F>,
    limits: &SearchLimits,
) -> Vec<TextOffsetWithValid> {
    let mut chain: Vec<ChainNode> = Vec::new();
    let mut paths: Vec<PathNode> = Vec::new();
    let mut known_by_index: HashMap<usize, u32> = HashMap::new();
    let mut heap: BinaryHeap<Reverse<QueueEntry>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    let mut max_cost = char_count(&oracle.line.text[rel_start..rel_end]);
    let mut best_path: Option<u32> = None;

    let push_candidates =
        |heap: &mut BinaryHeap<Reverse<QueueEntry>>,
         seq: &mut u64,
         parent: Option<u32>,
         at: usize,
         break_index: usize,
         cost: u32|
         -> bool {
            let mut bi = break_index;
            while bi < possible_breaks.len() && possible_breaks[bi].offset < at {
                bi += 1;
            }
            let Some(entry) = possible_breaks.get(bi) else {
                return false;
            };
            for &variant in &entry.variants {
                let pending = match variant {
                    BreakVariant::Split { start, end } => {
                        (start - at) as u32 + 2 * (rel_end - end) as u32
                    }
                    BreakVariant::Ignore => 2 * (rel_end - at) as u32,
                };
                *seq += 1;
                heap.push(Reverse(QueueEntry {
                    expected: 2 * cost + pending,
                    at,
                    seq: *seq,
                    candidate: Candidate {
                        parent,
                        at,
                        break_index: bi,
                        variant,
                        cost,
                    },
                }));
            }
            true
        };

    push_candidates(&mut heap, &mut seq, None, rel_start, 0, 0);

    let mut attempts = 0usize;
    while max_cost > 0 && attempts < limits.max_attempts && !limits.expired() {
        let Some(Reverse(entry)) = heap.pop() else {
            break;
        };
        attempts += 1;
        let mut best = entry.candidate;
        if best.cost >= max_cost {
            continue;
        }

        match best.variant {
            BreakVariant::Split { start, end } => {
                let text = (start > best.at).then(|| oracle.check(best.at, start));
                let seg_cost = text
                    .as_ref()
                    .map_or(0, |t| if t.is_found { 0 } else { char_count(&t.text) });
                best.cost += seg_cost;

                let node = push_chain(&mut chain, best.parent, best.at, text.clone());
                if let Some(&suffix) = known_by_index.get(&end) {
                    let joined = add_to_known_paths(
                        &chain,
                        Some(node),
                        Some(suffix),
                        &mut paths,
                        &mut known_by_index,
                    );
                    best_path = better_path(&paths, best_path, joined);
                } else if best.cost < max_cost {
                    let parent = if text.is_some() { Some(node) } else { best.parent };
                    push_candidates(
                        &mut heap,
                        &mut seq,
                        parent,
                        end,
                        best.break_index + 1,
                        best.cost,
                    );
                }
            }
            BreakVariant::Ignore => {
                let had_more = push_candidates(
                    &mut heap,
                    &mut seq,
                    best.parent,
                    best.at,
                    best.break_index + 1,
                    best.cost,
                );
                if !had_more {
                    // Off the end of the break list: close the final segment.
                    let text = (rel_end > best.at).then(|| oracle.check(best.at, rel_end));
                    let node = push_chain(&mut chain, best.parent, best.at, text);
                    let finished = add_to_known_paths(
                        &chain,
                        Some(node),
                        None,
                        &mut paths,
                        &mut known_by_index,
                    );
                    best_path = better_path(&paths, best_path, finished);
                }
            }
        }

        if let Some(bp) = best_path {
            max_cost = max_cost.min(paths[bp as usize].cost);
        }
    }

    path_to_words(&paths, best_path)
}

fn push_chain(
    chain: &mut Vec<ChainNode>,
    parent: Option<u32>,
    at: usize,
    text: Option<TextOffsetWithValid>,
) -> u32 {
    chain.push(ChainNode { parent, at, text });
    (chain.len() - 1) as u32
}

/// Fold a candidate chain into the known-paths memo, building suffix path
/// nodes from the latest segment back toward the start. Gives up as soon as
/// an existing completion at some position is at least as cheap.
fn add_to_known_paths(
    chain: &[ChainNode],
    head: Option<u32>,
    mut path: Option<u32>,
    paths: &mut Vec<PathNode>,
    known_by_index: &mut HashMap<usize, u32>,
) -> Option<u32> {
    let mut current = head;
    while let Some(ci) = current {
        let node = &chain[ci as usize];
        let seg_cost = node
            .text
            .as_ref()
            .map_or(0, |t| if t.is_found { 0 } else { char_count(&t.text) });
        let cost = seg_cost + path.map_or(0, |p| paths[p as usize].cost);
        if let Some(&existing) = known_by_index.get(&node.at) {
            if paths[existing as usize].cost <= cost {
                return None;
            }
        }
        let idx = paths.len() as u32;
        paths.push(PathNode {
            next: path,
            cost,
            text: node.text.clone(),
        });
        known_by_index.insert(node.at, idx);
        path = Some(idx);
        current = node.parent;
    }
    path
}

fn better_path(paths: &[PathNode], current: Option<u32>, candidate: Option<u32>) -> Option<u32> {
    match (current, candidate) {
        (None, c) => c,
        (Some(b), Some(c)) if paths[c as usize].cost < paths[b as usize].cost => Some(c),
        (b, _) => b,
    }
}

fn path_to_words(paths: &[PathNode], head: Option<u32>) -> Vec<TextOffsetWithValid> {
    let mut out = Vec::new();
    let mut current = head;
    while let Some(pi) = current {
        let node = &paths[pi as usize];
        if let Some(text) = &node.text {
            out.push(text.clone());
        }
        current = node.next;
    }
    out
}
