// Frozen node-graph trie: arena storage, index references.

use crate::{CASE_INSENSITIVE_PREFIX, COMPOUND_FIX, FORBID_PREFIX, TrieAccess};

/// Index of a node within a [`Trie`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

#[derive(Debug, Clone)]
pub(crate) struct TrieNode {
    pub(crate) eow: bool,
    /// Outgoing edges sorted by character.
    pub(crate) children: Box<[(char, NodeId)]>,
}

/// A frozen dictionary trie.
///
/// Built once by [`crate::builder::TrieBuilder::freeze`] and read-only
/// afterwards. Behaviorally identical sub-structures are interned during the
/// freeze, so several parents may share one child -- the arena holds a DAG.
/// Sharing never changes lookup results: two nodes are merged only when their
/// end-of-word flag and entire child structure agree.
#[derive(Debug, Clone)]
pub struct Trie {
    pub(crate) nodes: Vec<TrieNode>,
    pub(crate) root: NodeId,
}

impl Trie {
    /// Number of nodes in the arena (after sharing).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the dictionary carries a forbidden-word list.
    pub fn has_forbidden_words(&self) -> bool {
        self.child(self.root, FORBID_PREFIX).is_some()
    }

    /// `true` when the dictionary carries compound continuations.
    pub fn has_compound_words(&self) -> bool {
        self.child(self.root, COMPOUND_FIX).is_some()
    }

    /// `true` when the dictionary carries case/accent-folded forms.
    pub fn has_case_insensitive_words(&self) -> bool {
        self.child(self.root, CASE_INSENSITIVE_PREFIX).is_some()
    }

    /// Iterate the words of the main list in lexicographic order.
    ///
    /// Sentinel branches at the root (`~`, `!`, `+`) are skipped; compound
    /// markers inside entries (a trailing `+`) are reported as stored.
    pub fn words(&self) -> Words<'_> {
        let root_children = self.node(self.root).children.iter();
        Words {
            trie: self,
            stack: vec![Frame {
                children: root_children,
                ch_len: 0,
            }],
            prefix: String::new(),
        }
    }

    /// Export the trie into its flattened read-only representation.
    pub fn export(&self) -> crate::blob::TrieBlob {
        crate::blob::TrieBlob::export(self)
    }

    pub(crate) fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.0 as usize]
    }
}

impl TrieAccess for Trie {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        let children = &self.node(node).children;
        children
            .binary_search_by_key(&ch, |&(c, _)| c)
            .ok()
            .map(|i| children[i].1)
    }

    fn is_eow(&self, node: NodeId) -> bool {
        self.node(node).eow
    }

    fn has_children(&self, node: NodeId) -> bool {
        !self.node(node).children.is_empty()
    }

    fn children(&self, node: NodeId) -> impl Iterator<Item = (char, NodeId)> {
        self.node(node).children.iter().copied()
    }
}

struct Frame<'a> {
    children: std::slice::Iter<'a, (char, NodeId)>,
    /// UTF-8 length of the character that led into this frame.
    ch_len: usize,
}

/// Pre-order word iterator over a [`Trie`]'s main list.
pub struct Words<'a> {
    trie: &'a Trie,
    stack: Vec<Frame<'a>>,
    prefix: String,
}

impl Iterator for Words<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let at_root = self.stack.len() == 1;
            let frame = self.stack.last_mut()?;
            match frame.children.next() {
                Some(&(ch, id)) => {
                    if at_root && crate::is_sentinel(ch) {
                        continue;
                    }
                    self.prefix.push(ch);
                    let node = self.trie.node(id);
                    self.stack.push(Frame {
                        children: node.children.iter(),
                        ch_len: ch.len_utf8(),
                    });
                    if node.eow {
                        return Some(self.prefix.clone());
                    }
                }
                None => {
                    if let Some(done) = self.stack.pop() {
                        self.prefix.truncate(self.prefix.len() - done.ch_len);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TrieBuilder;

    fn build(words: &[&str]) -> Trie {
        let mut b = TrieBuilder::new();
        for w in words {
            b.insert(w);
        }
        b.freeze()
    }

    #[test]
    fn find_inserted_words() {
        let t = build(&["walk", "walking", "talk"]);
        assert!(t.find("walk", true));
        assert!(t.find("walking", true));
        assert!(t.find("talk", true));
        assert!(!t.find("wal", true));
        assert!(!t.find("walks", true));
        assert!(!t.find("", true));
    }

    #[test]
    fn words_are_sorted_and_complete() {
        let t = build(&["walk", "talk", "walking", "tall"]);
        let words: Vec<String> = t.words().collect();
        assert_eq!(words, ["talk", "tall", "walk", "walking"]);
    }

    #[test]
    fn words_skip_sentinel_branches() {
        let t = build(&["!bad", "Caf\u{00E9}", "walk"]);
        let words: Vec<String> = t.words().collect();
        assert_eq!(words, ["Caf\u{00E9}", "walk"]);
    }

    #[test]
    fn shared_suffixes_are_interned() {
        // "walking" and "talking" share the whole "alking" tail; the frozen
        // arena must hold that structure only once.
        let shared = build(&["walking", "talking"]);
        let naive_node_count = 1 + 7 + 7; // root + two full paths
        assert!(shared.node_count() < naive_node_count);
        assert!(shared.find("walking", true));
        assert!(shared.find("talking", true));
    }

    #[test]
    fn walk_partial_paths() {
        let t = build(&["walk"]);
        let n = t.walk(t.root(), "wal");
        assert!(n.is_some());
        assert!(!t.is_eow(n.expect("prefix node")));
        assert!(t.has_children(n.expect("prefix node")));
    }
}
