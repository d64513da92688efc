// Dictionary-line normalization.

use crate::LINE_COMMENT;
use crate::builder::TrieBuilder;
use crate::node::Trie;

/// Normalize raw dictionary lines into insertable entries.
///
/// Strips `#` comments, trims whitespace, and drops blank lines. Marker
/// characters are passed through untouched -- interpretation happens in the
/// builder.
pub fn parse_dictionary_lines<'a, I>(lines: I) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines.into_iter().filter_map(|line| {
        let line = match line.find(LINE_COMMENT) {
            Some(idx) => &line[..idx],
            None => line,
        };
        let line = line.trim();
        (!line.is_empty()).then_some(line)
    })
}

/// Parse dictionary text straight into a frozen trie.
pub fn build_trie_from_text(text: &str) -> Trie {
    TrieBuilder::from_words(parse_dictionary_lines(text.lines()))
}
