//! Correction suggestions: an A* search over the dictionary trie.
//!
//! [`suggest`] runs the search to completion and shapes the result list;
//! [`SuggestionStream`] is the lazy form for callers that want to stop
//! early or feed a tighter cost limit back in while consuming.

pub mod astar;
pub mod collector;
pub mod orthography;
pub mod weights;

pub use astar::SuggestionStream;
pub use collector::SuggestionResult;
pub use weights::{DictionaryInformation, SuggestionCostDef, WeightMap, WeightMapError};

use lexica_trie::TrieAccess;

use crate::SearchLimits;
use collector::SuggestionCollector;

/// Edit-operation costs on the hundred-unit scale. A plain character match
/// is free; everything else pays.
pub(crate) mod op_costs {
    pub const BASE_COST: u32 = 100;
    pub const SWAP_COST: u32 = 75;
    pub const DUPLICATE_LETTER_COST: u32 = 80;
    pub const VISUALLY_SIMILAR_COST: u32 = 1;
    pub const FIRST_LETTER_BIAS: u32 = 5;
    pub const WORD_BREAK_COST: u32 = 99;
    pub const COMPOUND_COST: u32 = 1;
    /// Scales the initial cost budget with the query length so short words
    /// do not drown in distant candidates.
    pub const WORD_LENGTH_COST_FACTOR: f64 = 0.515;
}

/// Fully-populated suggestion options. Construct with struct-update syntax
/// over [`SuggestionOptions::default`].
#[derive(Debug, Clone, Copy)]
pub struct SuggestionOptions<'a> {
    /// Number of best-ranked suggestions to return.
    pub num_suggestions: usize,
    /// Maximum number of edits, in base-cost units: no candidate costs more
    /// than `change_limit * 100`.
    pub change_limit: u32,
    /// Keep candidates beyond `num_suggestions` whose cost ties the
    /// boundary.
    pub include_ties: bool,
    /// Also search the case/accent-folded word list.
    pub ignore_case: bool,
    /// Allow multi-word suggestions joined by a space.
    pub multi_word: bool,
    /// Locale edit-cost overrides.
    pub weight_map: Option<&'a WeightMap>,
    /// Work bounds for the search loop.
    pub limits: SearchLimits,
}

impl Default for SuggestionOptions<'_> {
    fn default() -> Self {
        Self {
            num_suggestions: 10,
            change_limit: 5,
            include_ties: false,
            ignore_case: true,
            multi_word: false,
            weight_map: None,
            limits: SearchLimits::default(),
        }
    }
}

/// Produce ranked correction candidates for `word`.
///
/// Runs the A* stream to exhaustion, feeding the collector's tightening
/// cost ceiling back into the search. Output is deduplicated (minimum cost
/// wins), stripped of forbidden words, and ordered by cost, then word,
/// then discovery -- deterministic for fixed inputs.
pub fn suggest<T: TrieAccess>(
    trie: &T,
    word: &str,
    options: SuggestionOptions<'_>,
) -> Vec<SuggestionResult> {
    let mut collector = SuggestionCollector::new(word, &options);
    let mut stream = SuggestionStream::new(trie, word, options);
    stream.lower_limit(collector.max_cost());
    while let Some(sug) = stream.next() {
        let ceiling = collector.add(sug);
        stream.lower_limit(ceiling);
    }
    collector.into_sorted()
}
