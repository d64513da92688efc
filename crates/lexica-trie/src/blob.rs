// Flattened read-only trie: nodes and edges in contiguous integer arrays.

use bytemuck::Zeroable;
use hashbrown::HashMap;

use crate::node::Trie;
use crate::{BlobError, CASE_INSENSITIVE_PREFIX, FORBID_PREFIX, TrieAccess};

const MAGIC: u32 = 0x4C58_5442; // "LXTB"
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 16;

/// Packed node record: a half-open range into the edge table plus flags.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlobNode {
    edge_start: u32,
    edge_count: u32,
    flags: u32,
}

const FLAG_EOW: u32 = 1;

/// Packed edge record: the character value and the target node index.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlobEdge {
    ch: u32,
    target: u32,
}

/// The flattened trie representation.
///
/// Exported once from a frozen [`Trie`] and read-only afterwards. Lookup
/// agrees exactly with the node graph it was exported from; the blob merely
/// trades pointer-free arrays for construction flexibility.
#[derive(Debug, Clone, PartialEq)]
pub struct TrieBlob {
    nodes: Vec<BlobNode>,
    edges: Vec<BlobEdge>,
}

impl TrieBlob {
    /// Flatten a frozen node-graph trie. Shared sub-structures stay shared:
    /// the export maps each distinct node to one record.
    pub fn export(trie: &Trie) -> TrieBlob {
        let mut index: HashMap<crate::node::NodeId, u32> = HashMap::new();
        let mut order = vec![trie.root()];
        index.insert(trie.root(), 0);

        // Breadth-first layout keeps sibling runs adjacent.
        let mut head = 0;
        while head < order.len() {
            let id = order[head];
            head += 1;
            for (_, child) in trie.children(id) {
                index.entry(child).or_insert_with(|| {
                    order.push(child);
                    (order.len() - 1) as u32
                });
            }
        }

        let mut nodes = Vec::with_capacity(order.len());
        let mut edges = Vec::new();
        for id in order {
            let edge_start = edges.len() as u32;
            let mut edge_count = 0u32;
            for (ch, child) in trie.children(id) {
                edges.push(BlobEdge {
                    ch: ch as u32,
                    target: index[&child],
                });
                edge_count += 1;
            }
            nodes.push(BlobNode {
                edge_start,
                edge_count,
                flags: if trie.is_eow(id) { FLAG_EOW } else { 0 },
            });
        }

        TrieBlob { nodes, edges }
    }

    /// Number of node records.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edge records.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Serialize the blob into one contiguous byte image:
    /// a 16-byte header followed by the node and edge tables.
    ///
    /// The image is suitable for callers that cache or ship dictionaries;
    /// [`TrieBlob::from_bytes`] restores it.
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            HEADER_SIZE + self.nodes.len() * size_of::<BlobNode>()
                + self.edges.len() * size_of::<BlobEdge>(),
        );
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&(self.nodes.len() as u32).to_le_bytes());
        out.extend_from_slice(&(self.edges.len() as u32).to_le_bytes());
        out.extend_from_slice(bytemuck::cast_slice(&self.nodes));
        out.extend_from_slice(bytemuck::cast_slice(&self.edges));
        out
    }

    /// Restore a blob from a byte image produced by [`TrieBlob::as_bytes`].
    ///
    /// The whole image is validated here -- header, table sizes, edge
    /// ranges, edge targets, character values -- so that traversal never has
    /// to bounds-check a corrupt reference.
    pub fn from_bytes(data: &[u8]) -> Result<TrieBlob, BlobError> {
        if data.len() < HEADER_SIZE {
            return Err(BlobError::TooShort {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }
        let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        if magic != MAGIC {
            return Err(BlobError::InvalidMagic);
        }
        let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        if version != VERSION {
            return Err(BlobError::UnsupportedVersion { found: version });
        }
        let node_count = u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;
        let edge_count = u32::from_le_bytes([data[12], data[13], data[14], data[15]]) as usize;
        if node_count == 0 {
            return Err(BlobError::Empty);
        }

        let nodes_len = node_count * size_of::<BlobNode>();
        let edges_len = edge_count * size_of::<BlobEdge>();
        let expected = HEADER_SIZE + nodes_len + edges_len;
        if data.len() < expected {
            return Err(BlobError::TooShort {
                expected,
                actual: data.len(),
            });
        }

        // Copy into owned, properly aligned tables; the source slice may
        // start at any alignment.
        let mut nodes = vec![BlobNode::zeroed(); node_count];
        bytemuck::cast_slice_mut::<BlobNode, u8>(&mut nodes)
            .copy_from_slice(&data[HEADER_SIZE..HEADER_SIZE + nodes_len]);
        let mut edges = vec![BlobEdge::zeroed(); edge_count];
        bytemuck::cast_slice_mut::<BlobEdge, u8>(&mut edges)
            .copy_from_slice(&data[HEADER_SIZE + nodes_len..expected]);

        for (i, node) in nodes.iter().enumerate() {
            let end = node.edge_start as usize + node.edge_count as usize;
            if end > edge_count {
                return Err(BlobError::EdgeRangeOutOfBounds { node: i as u32 });
            }
        }
        for (i, edge) in edges.iter().enumerate() {
            if edge.target as usize >= node_count {
                return Err(BlobError::EdgeTargetOutOfBounds { edge: i as u32 });
            }
            if char::from_u32(edge.ch).is_none() {
                return Err(BlobError::InvalidCharacter { edge: i as u32 });
            }
        }

        Ok(TrieBlob { nodes, edges })
    }

    fn edge_slice(&self, node: u32) -> &[BlobEdge] {
        let n = &self.nodes[node as usize];
        let start = n.edge_start as usize;
        &self.edges[start..start + n.edge_count as usize]
    }

    /// Specialized walk used by the fast paths: one tight loop, binary
    /// search per character, no trait plumbing.
    fn walk_bytes(&self, mut at: u32, word: impl Iterator<Item = char>) -> Option<u32> {
        for ch in word {
            let edges = self.edge_slice(at);
            let key = ch as u32;
            match edges.binary_search_by_key(&key, |e| e.ch) {
                Ok(i) => at = edges[i].target,
                Err(_) => return None,
            }
        }
        Some(at)
    }

    fn eow(&self, node: u32) -> bool {
        self.nodes[node as usize].flags & FLAG_EOW != 0
    }
}

impl TrieAccess for TrieBlob {
    type Node = u32;

    fn root(&self) -> u32 {
        0
    }

    fn child(&self, node: u32, ch: char) -> Option<u32> {
        let edges = self.edge_slice(node);
        let key = ch as u32;
        edges
            .binary_search_by_key(&key, |e| e.ch)
            .ok()
            .map(|i| edges[i].target)
    }

    fn is_eow(&self, node: u32) -> bool {
        self.eow(node)
    }

    fn has_children(&self, node: u32) -> bool {
        self.nodes[node as usize].edge_count != 0
    }

    fn children(&self, node: u32) -> impl Iterator<Item = (char, u32)> {
        self.edge_slice(node)
            .iter()
            .filter_map(|e| char::from_u32(e.ch).map(|ch| (ch, e.target)))
    }

    fn find(&self, word: &str, match_case: bool) -> bool {
        if word.is_empty() {
            return false;
        }
        if self
            .walk_bytes(0, word.chars())
            .is_some_and(|n| self.eow(n))
        {
            return true;
        }
        if match_case {
            return false;
        }
        let folded = lexica_core::case::fold_word(word);
        let Some(root) = self.child(0, CASE_INSENSITIVE_PREFIX) else {
            return false;
        };
        self.walk_bytes(root, folded.chars())
            .is_some_and(|n| self.eow(n))
    }

    fn is_forbidden(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let Some(root) = self.child(0, FORBID_PREFIX) else {
            return false;
        };
        self.walk_bytes(root, word.chars())
            .is_some_and(|n| self.eow(n))
    }
}
