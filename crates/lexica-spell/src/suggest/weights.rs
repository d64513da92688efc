// Locale edit-cost rules compiled into prefix-matchable cost tries.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Error raised while compiling a weight map. Malformed rules fail here,
/// at construction, never mid-search.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WeightMapError {
    #[error("unbalanced parenthesis group in pattern {pattern:?}")]
    UnbalancedGroup { pattern: String },
    #[error("nested parenthesis group in pattern {pattern:?}")]
    NestedGroup { pattern: String },
}

/// One edit-cost rule from a locale dictionary descriptor.
///
/// `map` is a character-class pattern: plain characters stand alone,
/// parentheses group multi-character sequences, and `|` separates
/// independent sets. Every member of a set is interchangeable with every
/// other at the given costs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionCostDef {
    pub map: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ins_del: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Locale descriptor consumed to build a [`WeightMap`]. Produced externally
/// (dictionary configuration is JSON-shaped); only the edit costs matter
/// here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionaryInformation {
    pub locale: String,
    pub alphabet: String,
    pub suggestion_edit_costs: Vec<SuggestionCostDef>,
}

/// A trie over character sequences carrying insert/delete costs.
///
/// Costs are minimized and penalties maximized when rules overlap.
#[derive(Debug, Clone, Default)]
pub(crate) struct CostTrie {
    pub(crate) children: HashMap<char, CostTrie>,
    pub(crate) cost: Option<u32>,
    pub(crate) penalty: u32,
}

impl CostTrie {
    fn add(&mut self, seq: &str, cost: u32, penalty: u32) {
        let mut node = self;
        for ch in seq.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.cost = Some(node.cost.map_or(cost, |c| c.min(cost)));
        node.penalty = node.penalty.max(penalty);
    }

    /// Prefixes of `chars[from..]` that carry a cost:
    /// `(end_index, cost, penalty)` per match.
    pub(crate) fn match_prefixes(&self, chars: &[char], from: usize) -> Vec<(usize, u32, u32)> {
        let mut out = Vec::new();
        let mut node = self;
        let mut i = from;
        while i < chars.len() {
            match node.children.get(&chars[i]) {
                Some(next) => {
                    i += 1;
                    if let Some(cost) = next.cost {
                        out.push((i, cost, next.penalty));
                    }
                    node = next;
                }
                None => break,
            }
        }
        out
    }
}

/// A trie over left-hand sequences whose accepting nodes hold a [`CostTrie`]
/// of right-hand sequences. Drives replacements and swaps.
#[derive(Debug, Clone, Default)]
pub(crate) struct PairTrie {
    children: HashMap<char, PairTrie>,
    pub(crate) costs: Option<Box<CostTrie>>,
}

impl PairTrie {
    fn add(&mut self, left: &str, right: &str, cost: u32, penalty: u32) {
        let mut node = self;
        for ch in left.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.costs
            .get_or_insert_with(Box::default)
            .add(right, cost, penalty);
    }

    /// Left-hand prefixes of `chars[from..]` with their right-hand cost
    /// tries: `(end_index, costs)` per match.
    pub(crate) fn match_prefixes<'a>(
        &'a self,
        chars: &[char],
        from: usize,
    ) -> Vec<(usize, &'a CostTrie)> {
        let mut out = Vec::new();
        let mut node = self;
        let mut i = from;
        while i < chars.len() {
            match node.children.get(&chars[i]) {
                Some(next) => {
                    i += 1;
                    if let Some(costs) = &next.costs {
                        out.push((i, costs.as_ref()));
                    }
                    node = next;
                }
                None => break,
            }
        }
        out
    }
}

/// Compiled, immutable edit-cost table for one locale. Shared read-only
/// across any number of concurrent suggestion calls.
#[derive(Debug, Clone, Default)]
pub struct WeightMap {
    pub(crate) ins_del: CostTrie,
    pub(crate) replace: PairTrie,
    pub(crate) swap: PairTrie,
}

impl WeightMap {
    /// Compile a rule list. Fails fast on malformed patterns.
    pub fn compile(defs: &[SuggestionCostDef]) -> Result<WeightMap, WeightMapError> {
        let mut map = WeightMap::default();
        for def in defs {
            let penalty = def.penalty.unwrap_or(0);
            for set in def.map.split('|') {
                let groups = split_pattern_groups(set)?;
                if groups.is_empty() {
                    continue;
                }
                if let Some(cost) = def.ins_del {
                    for g in &groups {
                        map.ins_del.add(g, cost, penalty);
                    }
                }
                if let Some(cost) = def.replace {
                    for left in &groups {
                        for right in &groups {
                            if left != right {
                                map.replace.add(left, right, cost, penalty);
                            }
                        }
                    }
                }
                if let Some(cost) = def.swap {
                    for left in &groups {
                        for right in &groups {
                            if left != right {
                                map.swap.add(left, right, cost, penalty);
                            }
                        }
                    }
                }
            }
        }
        Ok(map)
    }

    /// Compile from a full locale descriptor.
    pub fn from_dictionary_information(
        info: &DictionaryInformation,
    ) -> Result<WeightMap, WeightMapError> {
        Self::compile(&info.suggestion_edit_costs)
    }

    /// Cost of replacing `left` with `right`, if a rule covers it.
    pub fn replace_cost(&self, left: &str, right: &str) -> Option<u32> {
        let left_chars: Vec<char> = left.chars().collect();
        self.replace
            .match_prefixes(&left_chars, 0)
            .into_iter()
            .find(|&(end, _)| end == left_chars.len())
            .and_then(|(_, costs)| {
                let right_chars: Vec<char> = right.chars().collect();
                costs
                    .match_prefixes(&right_chars, 0)
                    .into_iter()
                    .find(|&(end, _, _)| end == right_chars.len())
                    .map(|(_, cost, _)| cost)
            })
    }
}

/// Split a character-class pattern into its member sequences: single
/// characters stand alone, parentheses group multi-character members.
fn split_pattern_groups(pattern: &str) -> Result<Vec<String>, WeightMapError> {
    let mut out = Vec::new();
    let mut group = String::new();
    let mut in_group = false;
    for ch in pattern.chars() {
        match ch {
            '(' if in_group => {
                return Err(WeightMapError::NestedGroup {
                    pattern: pattern.to_string(),
                });
            }
            '(' => {
                in_group = true;
                group.clear();
            }
            ')' if in_group => {
                if !group.is_empty() {
                    out.push(group.clone());
                }
                in_group = false;
            }
            ')' => {
                return Err(WeightMapError::UnbalancedGroup {
                    pattern: pattern.to_string(),
                });
            }
            c if in_group => group.push(c),
            c => out.push(c.to_string()),
        }
    }
    if in_group {
        return Err(WeightMapError::UnbalancedGroup {
            pattern: pattern.to_string(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn split_groups() {
        assert_eq!(
            split_pattern_groups("ae(ae)(ei)").expect("valid"),
            ["a", "e", "ae", "ei"]
        );
        assert_eq!(split_pattern_groups("aeiou").expect("valid").len(), 5);
    }

    #[test]
    fn unbalanced_groups_fail_fast() {
        assert!(matches!(
            split_pattern_groups("a(bc"),
            Err(WeightMapError::UnbalancedGroup { .. })
        ));
        assert!(matches!(
            split_pattern_groups("ab)c"),
            Err(WeightMapError::UnbalancedGroup { .. })
        ));
        assert!(matches!(
            split_pattern_groups("a((b)"),
            Err(WeightMapError::NestedGroup { .. })
        ));
    }

    #[test]
    fn compile_error_surfaces_from_defs() {
        let defs = [SuggestionCostDef {
            map: "a(b".to_string(),
            replace: Some(50),
            ..Default::default()
        }];
        assert!(WeightMap::compile(&defs).is_err());
    }

    #[test]
    fn vowel_replacements() {
        let defs = [SuggestionCostDef {
            map: "aeiou".to_string(),
            replace: Some(50),
            ..Default::default()
        }];
        let map = WeightMap::compile(&defs).expect("compiles");
        assert_eq!(map.replace_cost("a", "e"), Some(50));
        assert_eq!(map.replace_cost("e", "u"), Some(50));
        assert_eq!(map.replace_cost("a", "a"), None);
        assert_eq!(map.replace_cost("a", "x"), None);
    }

    #[test]
    fn overlapping_rules_keep_min_cost_max_penalty() {
        let defs = [
            SuggestionCostDef {
                map: "ae".to_string(),
                ins_del: Some(80),
                ..Default::default()
            },
            SuggestionCostDef {
                map: "a".to_string(),
                ins_del: Some(30),
                penalty: Some(10),
                ..Default::default()
            },
        ];
        let map = WeightMap::compile(&defs).expect("compiles");
        let matches = map.ins_del.match_prefixes(&chars("a"), 0);
        assert_eq!(matches, vec![(1, 30, 10)]);
    }

    #[test]
    fn multi_char_groups_match_as_units() {
        let defs = [SuggestionCostDef {
            map: "f(ph)".to_string(),
            replace: Some(20),
            ..Default::default()
        }];
        let map = WeightMap::compile(&defs).expect("compiles");
        assert_eq!(map.replace_cost("ph", "f"), Some(20));
        assert_eq!(map.replace_cost("f", "ph"), Some(20));
        assert_eq!(map.replace_cost("p", "f"), None);
    }

    #[test]
    fn sets_are_independent() {
        let defs = [SuggestionCostDef {
            map: "ae|ou".to_string(),
            replace: Some(40),
            ..Default::default()
        }];
        let map = WeightMap::compile(&defs).expect("compiles");
        assert_eq!(map.replace_cost("a", "e"), Some(40));
        assert_eq!(map.replace_cost("o", "u"), Some(40));
        assert_eq!(map.replace_cost("a", "o"), None);
    }

    #[test]
    fn defs_deserialize_from_locale_json() {
        let json = r#"{
            "locale": "en",
            "alphabet": "abcdefghijklmnopqrstuvwxyz",
            "suggestionEditCosts": [
                { "map": "aeiou", "replace": 50, "description": "vowels" },
                { "map": "u(oo)", "replace": 65, "insDel": 70 }
            ]
        }"#;
        let info: DictionaryInformation = serde_json::from_str(json).expect("parses");
        assert_eq!(info.suggestion_edit_costs.len(), 2);
        assert_eq!(info.suggestion_edit_costs[1].ins_del, Some(70));
        let map = WeightMap::from_dictionary_information(&info).expect("compiles");
        assert_eq!(map.replace_cost("u", "oo"), Some(65));
    }
}
