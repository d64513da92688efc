// A* shortest-path search over the dictionary trie.
//
// States are (trie node, input position, accumulated cost, built word).
// The queue is ordered by cost plus remaining input length -- a lower bound
// on the true remaining cost, so the first full match popped at a given
// cost is optimal for that cost. A per-(word, position) memo keeps only the
// cheapest path to each state, pruning dominated alternatives.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use hashbrown::HashMap;
use hashbrown::hash_map::Entry as MapEntry;
use lexica_core::character::fold_char;
use lexica_trie::{
    CASE_INSENSITIVE_PREFIX, COMPOUND_FIX, FORBID_PREFIX, TrieAccess, is_sentinel,
};

use super::SuggestionOptions;
use super::collector::SuggestionResult;
use super::op_costs::{
    BASE_COST, COMPOUND_COST, DUPLICATE_LETTER_COST, FIRST_LETTER_BIAS, SWAP_COST,
    VISUALLY_SIMILAR_COST, WORD_BREAK_COST, WORD_LENGTH_COST_FACTOR,
};
use super::orthography::visual_mask;
use super::weights::{CostTrie, WeightMap};
use crate::SearchLimits;

#[derive(Clone)]
struct Path<N> {
    node: N,
    /// Characters of the query consumed so far.
    index: usize,
    cost: u32,
    /// Suggestion text built so far.
    word: String,
    /// This path matches against the folded form of the query.
    folded: bool,
}

struct QueueEntry<N> {
    priority: u32,
    index: usize,
    seq: u64,
    path: Path<N>,
}

impl<N> PartialEq for QueueEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<N> Eq for QueueEntry<N> {}

impl<N> PartialOrd for QueueEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for QueueEntry<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // cheapest first; equal costs prefer the deeper path; the sequence
        // number makes the order total and deterministic
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.index.cmp(&self.index))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Lazy suggestion generator.
///
/// Yields raw candidates in search order: costs are monotone per word but
/// not globally sorted. Forbidden words are consumed by the search (their
/// paths prune other work) but never yielded. Callers wanting ranked,
/// shaped output use [`super::suggest`].
pub struct SuggestionStream<'a, T: TrieAccess> {
    trie: &'a T,
    src: Vec<char>,
    heap: BinaryHeap<Reverse<QueueEntry<T::Node>>>,
    best_costs: HashMap<(String, usize, bool), u32>,
    emitted: HashMap<String, u32>,
    pending: VecDeque<SuggestionResult>,
    limit: u32,
    limits: SearchLimits,
    attempts: usize,
    seq: u64,
    multi_word: bool,
    weight_map: Option<&'a WeightMap>,
    root: T::Node,
    folded_root: Option<T::Node>,
    comp_root: Option<T::Node>,
    comp_root_folded: Option<T::Node>,
}

impl<'a, T: TrieAccess> SuggestionStream<'a, T> {
    pub fn new(trie: &'a T, word: &str, options: SuggestionOptions<'a>) -> Self {
        let src: Vec<char> = word.chars().collect();
        let limit = (BASE_COST as f64
            * (src.len() as f64 * WORD_LENGTH_COST_FACTOR).min(options.change_limit as f64))
            as u32;
        let root = trie.root();
        let folded_root = trie.child(root, CASE_INSENSITIVE_PREFIX);
        let comp_root = trie.child(root, COMPOUND_FIX);
        let comp_root_folded = folded_root.and_then(|r| trie.child(r, COMPOUND_FIX));

        let mut stream = Self {
            trie,
            src,
            heap: BinaryHeap::new(),
            best_costs: HashMap::new(),
            emitted: HashMap::new(),
            pending: VecDeque::new(),
            limit,
            limits: options.limits,
            attempts: 0,
            seq: 0,
            multi_word: options.multi_word,
            weight_map: options.weight_map,
            root,
            folded_root,
            comp_root,
            comp_root_folded,
        };
        stream.push(root, 0, 0, String::new(), false);
        if options.ignore_case {
            if let Some(folded) = folded_root {
                stream.push(folded, 0, 0, String::new(), true);
            }
        }
        stream
    }

    /// Tighten the cost ceiling; paths above it are pruned from here on.
    pub fn lower_limit(&mut self, limit: u32) {
        self.limit = self.limit.min(limit);
    }

    /// Queue pops performed so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    fn src_char(&self, index: usize, folded: bool) -> Option<char> {
        self.src
            .get(index)
            .map(|&c| if folded { fold_char(c) } else { c })
    }

    fn push(&mut self, node: T::Node, index: usize, cost: u32, word: String, folded: bool) {
        if cost > self.limit {
            return;
        }
        match self.best_costs.entry((word.clone(), index, folded)) {
            MapEntry::Occupied(mut e) => {
                if *e.get() <= cost {
                    return;
                }
                e.insert(cost);
            }
            MapEntry::Vacant(e) => {
                e.insert(cost);
            }
        }
        let remaining = (self.src.len().saturating_sub(index)) as u32;
        self.seq += 1;
        self.heap.push(Reverse(QueueEntry {
            priority: cost + remaining,
            index,
            seq: self.seq,
            path: Path {
                node,
                index,
                cost,
                word,
                folded,
            },
        }));
    }

    fn process(&mut self, path: Path<T::Node>) {
        if path.index == self.src.len() && !path.word.is_empty() && self.trie.is_eow(path.node) {
            self.pending.push_back(SuggestionResult {
                word: path.word.clone(),
                cost: path.cost,
            });
        }
        self.expand(path);
    }

    fn expand(&mut self, path: Path<T::Node>) {
        let trie = self.trie;
        let i = path.index;
        let cost0 = path.cost;
        // Edits get slightly cheaper with progress; first-letter edits pay
        // a small surcharge.
        let edge_cost = cost0
            + BASE_COST.saturating_sub(i as u32).max(1)
            + if i == 0 { FIRST_LETTER_BIAS } else { 0 };

        if let Some(sc) = self.src_char(i, path.folded) {
            let next_src = self.src_char(i + 1, path.folded);
            let sc_mask = visual_mask(sc);

            // match; a doubled source letter may also collapse onto one
            // dictionary letter
            if let Some(next) = trie.child(path.node, sc) {
                let mut w = path.word.clone();
                w.push(sc);
                if next_src == Some(sc) {
                    self.push(next, i + 2, cost0 + DUPLICATE_LETTER_COST, w.clone(), path.folded);
                }
                self.push(next, i + 1, cost0, w, path.folded);
            }

            if let Some(weights) = self.weight_map {
                self.weight_map_edges(&path, weights);
            }

            // delete the source character
            self.push(path.node, i + 1, edge_cost, path.word.clone(), path.folded);

            // replace with any sibling character; visually-similar
            // replacements are nearly free
            for (ch, child) in trie.children(path.node) {
                if ch == sc || is_sentinel(ch) {
                    continue;
                }
                let cost = if sc_mask != 0 && sc_mask & visual_mask(ch) != 0 {
                    cost0 + VISUALLY_SIMILAR_COST
                } else {
                    edge_cost
                };
                let mut w = path.word.clone();
                w.push(ch);
                self.push(child, i + 1, cost, w, path.folded);
            }

            // break into a new word at a completed entry
            if self.multi_word && i > 0 && trie.is_eow(path.node) {
                let target = if path.folded {
                    self.folded_root.unwrap_or(self.root)
                } else {
                    self.root
                };
                let mut w = path.word.clone();
                w.push(' ');
                self.push(target, i, cost0 + WORD_BREAK_COST, w, path.folded);
            }

            // transpose the adjacent pair
            if let Some(ns) = next_src {
                if ns != sc {
                    if let Some(n2) = trie
                        .child(path.node, ns)
                        .and_then(|n1| trie.child(n1, sc))
                    {
                        let mut w = path.word.clone();
                        w.push(ns);
                        w.push(sc);
                        self.push(n2, i + 2, cost0 + SWAP_COST, w, path.folded);
                    }
                }
            }
        }

        // jump into the compound subtrie at a continuation edge
        if cost0 + COMPOUND_COST <= self.limit && trie.child(path.node, COMPOUND_FIX).is_some() {
            if let Some(comp) = self.comp_root {
                self.push(comp, i, cost0 + COMPOUND_COST, path.word.clone(), path.folded);
            }
            if let Some(comp) = self.comp_root_folded {
                self.push(comp, i, cost0 + COMPOUND_COST, path.word.clone(), true);
            }
        }

        // insert a dictionary character without consuming input; at the end
        // of the query this is the only way forward (completions)
        if edge_cost <= self.limit {
            for (ch, child) in trie.children(path.node) {
                if is_sentinel(ch) {
                    continue;
                }
                let mut w = path.word.clone();
                w.push(ch);
                self.push(child, i, edge_cost, w, path.folded);
            }
        }
    }

    /// Multi-character edit edges driven by the locale weight map.
    fn weight_map_edges(&mut self, path: &Path<T::Node>, weights: &WeightMap) {
        let trie = self.trie;
        let i = path.index;
        let progress_base = path.cost as i64 - i as i64;

        // delete a listed source substring
        for (end, cost, _penalty) in weights.ins_del.match_prefixes(&self.src, i) {
            let total = clamp_cost(progress_base + cost as i64);
            self.push(path.node, end, total, path.word.clone(), path.folded);
        }

        // insert a listed substring present in the dictionary
        let insert_base = path.cost as i64 + i as i64;
        let mut insertions = Vec::new();
        collect_matching(trie, path.node, &weights.ins_del, String::new(), &mut insertions);
        for (text, cost, _penalty, node) in insertions {
            let total = clamp_cost(insert_base + cost as i64);
            let mut w = path.word.clone();
            w.push_str(&text);
            self.push(node, i, total, w, path.folded);
        }

        // replace a listed source substring with a listed dictionary
        // substring
        for (end, replacements) in weights.replace.match_prefixes(&self.src, i) {
            let mut matches = Vec::new();
            collect_matching(trie, path.node, replacements, String::new(), &mut matches);
            for (text, cost, penalty, node) in matches {
                let total = clamp_cost(progress_base + cost as i64 + penalty as i64);
                let mut w = path.word.clone();
                w.push_str(&text);
                self.push(node, end, total, w, path.folded);
            }
        }

        // swap two adjacent listed source sequences
        for (mid, rights) in weights.swap.match_prefixes(&self.src, i) {
            for (end, cost, penalty) in rights.match_prefixes(&self.src, mid) {
                let swapped: String = self.src[mid..end]
                    .iter()
                    .chain(self.src[i..mid].iter())
                    .collect();
                if let Some(node) = trie.walk(path.node, &swapped) {
                    let total = clamp_cost(path.cost as i64 + cost as i64 + penalty as i64);
                    let mut w = path.word.clone();
                    w.push_str(&swapped);
                    self.push(node, end, total, w, path.folded);
                }
            }
        }
    }

    /// Forbidden status for a finished candidate, consulting both the exact
    /// and the folded forbidden lists.
    fn is_suggestion_forbidden(&self, word: &str) -> bool {
        let trie = self.trie;
        if trie.is_forbidden(word) {
            return true;
        }
        self.folded_root
            .and_then(|r| trie.child(r, FORBID_PREFIX))
            .and_then(|r| trie.walk(r, word))
            .is_some_and(|n| trie.is_eow(n))
    }
}

impl<T: TrieAccess> Iterator for SuggestionStream<'_, T> {
    type Item = SuggestionResult;

    fn next(&mut self) -> Option<SuggestionResult> {
        loop {
            while let Some(result) = self.pending.pop_front() {
                if result.cost > self.limit {
                    continue;
                }
                if let Some(&prior) = self.emitted.get(&result.word) {
                    if prior <= result.cost {
                        continue;
                    }
                }
                if self.is_suggestion_forbidden(&result.word) {
                    continue;
                }
                self.emitted.insert(result.word.clone(), result.cost);
                return Some(result);
            }
            if self.attempts >= self.limits.max_attempts || self.limits.expired() {
                return None;
            }
            let Reverse(entry) = self.heap.pop()?;
            self.attempts += 1;
            if entry.path.cost > self.limit {
                continue;
            }
            self.process(entry.path);
        }
    }
}

fn clamp_cost(cost: i64) -> u32 {
    cost.clamp(0, u32::MAX as i64) as u32
}

/// Walk the dictionary and a cost trie in lockstep, collecting every
/// dictionary continuation that spells a costed sequence.
fn collect_matching<T: TrieAccess>(
    trie: &T,
    node: T::Node,
    costs: &CostTrie,
    prefix: String,
    out: &mut Vec<(String, u32, u32, T::Node)>,
) {
    for (ch, child) in trie.children(node) {
        if let Some(sub) = costs.children.get(&ch) {
            let mut text = prefix.clone();
            text.push(ch);
            if let Some(cost) = sub.cost {
                out.push((text.clone(), cost, sub.penalty, child));
            }
            collect_matching(trie, child, sub, text, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::suggest;
    use crate::suggest::weights::SuggestionCostDef;
    use lexica_trie::builder::TrieBuilder;
    use lexica_trie::node::Trie;
    use std::time::{Duration, Instant};

    fn dictionary() -> Trie {
        TrieBuilder::from_words([
            "walk", "walks", "walking", "walked", "walker", "talk", "talking", "talked", "talker",
            "joy",
        ])
    }

    fn options() -> SuggestionOptions<'static> {
        SuggestionOptions::default()
    }

    #[test]
    fn exact_word_costs_nothing() {
        let t = dictionary();
        let out = suggest(&t, "talk", options());
        assert_eq!(out[0].word, "talk");
        assert_eq!(out[0].cost, 0);
    }

    #[test]
    fn near_misses_rank_by_edit_cost() {
        let t = dictionary();
        let out = suggest(
            &t,
            "talks",
            SuggestionOptions {
                change_limit: 3,
                ..options()
            },
        );
        let words: Vec<&str> = out.iter().map(|s| s.word.as_str()).collect();
        let pos = |w: &str| words.iter().position(|&x| x == w);
        // deleting the trailing "s" and a first-letter replacement beat the
        // two-edit candidates; the bare "walk" needs both edits
        assert_eq!(words[0], "talk");
        assert_eq!(words[1], "walks");
        assert!(pos("talked").expect("present") < pos("walk").expect("present"));
        assert!(pos("talker").expect("present") < pos("walk").expect("present"));
    }

    #[test]
    fn costs_never_exceed_the_change_limit() {
        let t = dictionary();
        for limit in [1u32, 2, 3] {
            let out = suggest(
                &t,
                "tallking",
                SuggestionOptions {
                    change_limit: limit,
                    ..options()
                },
            );
            for s in &out {
                assert!(s.cost <= limit * 100, "{s:?} over {limit}");
            }
        }
    }

    #[test]
    fn output_is_deterministic() {
        let t = dictionary();
        let opts = SuggestionOptions {
            change_limit: 3,
            ..options()
        };
        let a = suggest(&t, "takl", opts);
        let b = suggest(&t, "takl", opts);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn transposition_is_cheaper_than_two_edits() {
        let t = dictionary();
        let out = suggest(&t, "tlak", options());
        assert_eq!(out[0].word, "talk");
        assert_eq!(out[0].cost, SWAP_COST);
    }

    #[test]
    fn case_variants_resolve_through_the_folded_list() {
        let t = dictionary();
        let out = suggest(&t, "Talk", options());
        assert_eq!(out[0].word, "talk");
        assert_eq!(out[0].cost, 0);
    }

    #[test]
    fn forbidden_words_never_surface() {
        let t = TrieBuilder::from_words(["err+", "+or", "!error", "errors"]);
        let out = suggest(&t, "error", options());
        assert!(
            out.iter().all(|s| s.word != "error"),
            "forbidden word leaked: {out:?}"
        );
        // the near variant is still offered
        assert!(out.iter().any(|s| s.word == "errors"));
    }

    #[test]
    fn compound_edges_join_segments() {
        let t = TrieBuilder::from_words(["err+", "+or"]);
        let out = suggest(&t, "error", options());
        assert_eq!(out.first().map(|s| s.word.as_str()), Some("error"));
        assert_eq!(out[0].cost, COMPOUND_COST);
    }

    #[test]
    fn multi_word_suggestions_split_on_spaces() {
        let t = TrieBuilder::from_words(["walking", "talking"]);
        let out = suggest(
            &t,
            "walkingtalking",
            SuggestionOptions {
                multi_word: true,
                ..options()
            },
        );
        assert!(
            out.iter().any(|s| s.word == "walking talking"),
            "missing split suggestion: {out:?}"
        );
    }

    #[test]
    fn weight_map_biases_substitutions() {
        let t = TrieBuilder::from_words(["walk"]);
        let defs = [SuggestionCostDef {
            map: "aeiou".to_string(),
            replace: Some(40),
            ..Default::default()
        }];
        let map = WeightMap::compile(&defs).expect("compiles");
        let with = suggest(
            &t,
            "welk",
            SuggestionOptions {
                weight_map: Some(&map),
                ..options()
            },
        );
        let without = suggest(&t, "welk", options());
        let cost_with = with
            .iter()
            .find(|s| s.word == "walk")
            .expect("suggested")
            .cost;
        let cost_without = without
            .iter()
            .find(|s| s.word == "walk")
            .expect("suggested")
            .cost;
        assert!(cost_with < cost_without);
    }

    #[test]
    fn weight_map_swaps_whole_sequences() {
        // "oo" and "uu" swap with "ao"/"ua"-style digraph confusions:
        // swapping the listed sequences "o" and "ok" is cheaper than two
        // plain edits
        let t = TrieBuilder::from_words(["book"]);
        let defs = [SuggestionCostDef {
            map: "o(ok)".to_string(),
            swap: Some(60),
            ..Default::default()
        }];
        let map = WeightMap::compile(&defs).expect("compiles");
        // "boko" -> swap the adjacent "ok" / "o" sequences -> "book"
        let out = suggest(
            &t,
            "boko",
            SuggestionOptions {
                weight_map: Some(&map),
                ..options()
            },
        );
        let book = out.iter().find(|s| s.word == "book").expect("suggested");
        assert!(book.cost <= 61, "swap rule not applied: {book:?}");
    }

    #[test]
    fn empty_query_yields_nothing() {
        let t = dictionary();
        assert!(suggest(&t, "", options()).is_empty());
    }

    #[test]
    fn attempt_bound_limits_work() {
        let t = dictionary();
        let out = suggest(
            &t,
            "walkign",
            SuggestionOptions {
                limits: SearchLimits::attempts(2),
                ..options()
            },
        );
        // partial results, not an error
        assert!(out.len() <= 2);
    }

    #[test]
    fn expired_deadline_stops_immediately() {
        let t = dictionary();
        let limits = SearchLimits {
            max_attempts: usize::MAX,
            deadline: Some(Instant::now() - Duration::from_millis(1)),
        };
        let out = suggest(
            &t,
            "walkign",
            SuggestionOptions {
                limits,
                ..options()
            },
        );
        assert!(out.is_empty());
    }

    #[test]
    fn stream_is_lazily_consumable() {
        let t = dictionary();
        let mut stream = SuggestionStream::new(&t, "talks", options());
        let first = stream.next().expect("at least one candidate");
        assert!(!first.word.is_empty());
        assert!(stream.attempts() > 0);
    }

    #[test]
    fn blob_and_node_graph_suggest_identically() {
        let t = dictionary();
        let blob = t.export();
        let opts = SuggestionOptions {
            change_limit: 3,
            ..options()
        };
        assert_eq!(suggest(&t, "talks", opts), suggest(&blob, "talks", opts));
    }
}
