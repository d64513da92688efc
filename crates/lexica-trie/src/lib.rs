//! Dictionary trie for the lexica spell-checking engine.
//!
//! A dictionary is a prefix tree over its word list. Auxiliary word lists --
//! compound continuations, case/accent-folded forms, forbidden words -- are
//! reachable from the main root through reserved sentinel characters, so a
//! lookup switches lists by following an edge instead of consulting a side
//! table.
//!
//! Two representations satisfy the same [`TrieAccess`] contract:
//!
//! - [`node::Trie`] -- arena-allocated node graph produced by
//!   [`builder::TrieBuilder`]; identical sub-structures are shared, so the
//!   graph is a DAG rather than a strict tree.
//! - [`blob::TrieBlob`] -- nodes and edges flattened into contiguous integer
//!   arrays, exported from a finished node graph for dense read-only lookup.
//!
//! # Architecture
//!
//! - [`node`] -- frozen node-graph trie and its word iterator
//! - [`builder`] -- incremental construction, marker handling, dedup
//! - [`parse`] -- dictionary-line normalization (comments, whitespace)
//! - [`blob`] -- the flattened representation and its byte views

pub mod blob;
pub mod builder;
pub mod node;
pub mod parse;

/// Sentinel child of the root leading to the compound-continuation subtrie.
/// Also appears as a trailing edge on words permitted to start a compound.
pub const COMPOUND_FIX: char = '+';

/// Marker used in word lists for entries that may, but need not, compound.
/// Expanded at insert time; never stored in the trie itself.
pub const OPTIONAL_COMPOUND_FIX: char = '*';

/// Sentinel child of the root leading to the case/accent-folded subtrie.
pub const CASE_INSENSITIVE_PREFIX: char = '~';

/// Sentinel child of the root leading to the forbidden-word subtrie.
pub const FORBID_PREFIX: char = '!';

/// Start of a single-line comment in dictionary sources.
pub const LINE_COMMENT: char = '#';

/// `true` for characters reserved as subtrie sentinels. Suggestion output
/// must never contain these.
pub fn is_sentinel(c: char) -> bool {
    matches!(
        c,
        COMPOUND_FIX | OPTIONAL_COMPOUND_FIX | CASE_INSENSITIVE_PREFIX | FORBID_PREFIX
    )
}

/// Error type for blob image validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlobError {
    #[error("invalid magic number in blob header")]
    InvalidMagic,
    #[error("unsupported blob version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("image too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("node {node} references edges outside the edge table")]
    EdgeRangeOutOfBounds { node: u32 },
    #[error("edge {edge} targets a node outside the node table")]
    EdgeTargetOutOfBounds { edge: u32 },
    #[error("edge {edge} carries an invalid character value")]
    InvalidCharacter { edge: u32 },
    #[error("blob image is empty")]
    Empty,
}

/// Read-only traversal capability shared by both trie representations.
///
/// Engines are generic over this trait and monomorphize; the blob overrides
/// the word-level fast paths with specialized loops, so nothing virtual sits
/// in a hot lookup.
pub trait TrieAccess {
    /// A cheap handle to a node. Stable for the lifetime of the trie.
    type Node: Copy + Eq + std::hash::Hash;

    /// The root node.
    fn root(&self) -> Self::Node;

    /// The child reached from `node` along `ch`, if any.
    fn child(&self, node: Self::Node, ch: char) -> Option<Self::Node>;

    /// `true` when the path from the root to `node` spells a complete entry.
    fn is_eow(&self, node: Self::Node) -> bool;

    /// `true` when `node` has at least one child.
    fn has_children(&self, node: Self::Node) -> bool;

    /// The node's outgoing edges in ascending character order.
    fn children(&self, node: Self::Node) -> impl Iterator<Item = (char, Self::Node)>;

    /// Follow `word` character by character starting at `from`.
    fn walk(&self, from: Self::Node, word: &str) -> Option<Self::Node> {
        let mut n = from;
        for ch in word.chars() {
            n = self.child(n, ch)?;
        }
        Some(n)
    }

    /// Fast path: exact membership in the main word list, optionally falling
    /// back to the case/accent-folded list with a folded query.
    fn find(&self, word: &str, match_case: bool) -> bool {
        if word.is_empty() {
            return false;
        }
        let root = self.root();
        if self
            .walk(root, word)
            .is_some_and(|n| self.is_eow(n))
        {
            return true;
        }
        if match_case {
            return false;
        }
        let folded = lexica_core::case::fold_word(word);
        self.child(root, CASE_INSENSITIVE_PREFIX)
            .and_then(|r| self.walk(r, &folded))
            .is_some_and(|n| self.is_eow(n))
    }

    /// Fast path: membership in the forbidden-word list.
    fn is_forbidden(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        self.child(self.root(), FORBID_PREFIX)
            .and_then(|r| self.walk(r, word))
            .is_some_and(|n| self.is_eow(n))
    }
}
