// Suggestion collection: dedup, cost adjustment, ties, deterministic order.

use hashbrown::HashMap;

use super::SuggestionOptions;
use super::op_costs::{BASE_COST, WORD_LENGTH_COST_FACTOR};

/// One ranked correction candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionResult {
    pub word: String,
    pub cost: u32,
}

/// Penalty per word for very short segments of a multi-word suggestion,
/// indexed by character count. Four letters and up cost nothing.
const WORD_LENGTH_COST: [u32; 5] = [0, 50, 25, 5, 0];

/// Flat surcharge per extra word in a multi-word suggestion.
const EXTRA_WORD_COST: u32 = 5;

/// Accumulates raw candidates from the search and shapes the final list.
///
/// The collector's cost ceiling starts at the change-limit budget and drops
/// as good candidates fill the requested count; [`SuggestionCollector::add`]
/// returns the current ceiling so the caller can prune the search with it.
pub(crate) struct SuggestionCollector {
    num_suggestions: usize,
    include_ties: bool,
    max_cost: u32,
    sugs: HashMap<String, (u32, u64)>,
    next_seq: u64,
}

impl SuggestionCollector {
    pub(crate) fn new(word: &str, options: &SuggestionOptions<'_>) -> Self {
        let len = word.chars().count() as f64;
        let max_cost = (BASE_COST as f64
            * (len * WORD_LENGTH_COST_FACTOR).min(options.change_limit as f64))
            as u32;
        Self {
            num_suggestions: options.num_suggestions,
            include_ties: options.include_ties,
            max_cost,
            sugs: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Current cost ceiling; candidates above it are discarded.
    pub(crate) fn max_cost(&self) -> u32 {
        self.max_cost
    }

    /// Record a candidate. Returns the (possibly lowered) cost ceiling.
    pub(crate) fn add(&mut self, sug: SuggestionResult) -> u32 {
        let cost = sug.cost + length_adjustment(&sug.word);
        if cost > self.max_cost {
            return self.max_cost;
        }
        match self.sugs.get_mut(&sug.word) {
            Some(entry) => entry.0 = entry.0.min(cost),
            None => {
                self.next_seq += 1;
                self.sugs.insert(sug.word, (cost, self.next_seq));
                if cost < self.max_cost && self.sugs.len() > self.num_suggestions {
                    self.drop_max();
                }
            }
        }
        self.max_cost
    }

    /// Lower the ceiling to the boundary cost and drop everything beyond
    /// the requested count that does not tie it.
    fn drop_max(&mut self) {
        if self.num_suggestions == 0 || self.sugs.len() < 2 {
            self.sugs.clear();
            return;
        }
        let mut sorted: Vec<(String, u32)> = self
            .sugs
            .iter()
            .map(|(w, &(c, _))| (w.clone(), c))
            .collect();
        sorted.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        let boundary = sorted[self.num_suggestions - 1].1;
        self.max_cost = boundary;
        for (word, cost) in &sorted[self.num_suggestions..] {
            if *cost > boundary {
                self.sugs.remove(word);
            }
        }
    }

    /// Final ordering: cost ascending, then word order, then discovery
    /// order. Truncated to the requested count, keeping boundary-cost ties
    /// when configured.
    pub(crate) fn into_sorted(self) -> Vec<SuggestionResult> {
        let mut entries: Vec<(String, u32, u64)> = self
            .sugs
            .into_iter()
            .map(|(w, (c, seq))| (w, c, seq))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)).then(a.2.cmp(&b.2)));

        if entries.len() > self.num_suggestions {
            if self.include_ties && self.num_suggestions > 0 {
                let boundary = entries[self.num_suggestions - 1].1;
                let keep = entries
                    .iter()
                    .take_while(|e| e.1 <= boundary)
                    .count()
                    .max(self.num_suggestions);
                entries.truncate(keep);
            } else {
                entries.truncate(self.num_suggestions);
            }
        }

        entries
            .into_iter()
            .map(|(word, cost, _)| SuggestionResult { word, cost })
            .collect()
    }
}

/// Surcharge for short segments in a multi-word suggestion.
fn length_adjustment(word: &str) -> u32 {
    if !word.contains(' ') {
        return 0;
    }
    let mut adjustment = 0;
    let mut words = 0;
    for part in word.split(' ') {
        words += 1;
        let len = part.chars().count();
        adjustment += WORD_LENGTH_COST.get(len).copied().unwrap_or(0);
    }
    adjustment + (words - 1) * EXTRA_WORD_COST
}
