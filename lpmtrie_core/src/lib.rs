pub mod batch;
pub mod codec;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod helpers;
pub mod loader;
pub mod telemetry;
pub mod types;

pub use batch::BatchReport;
pub use errors::{Error, ErrorCode, Result};
pub use types::{LookupEngine, Node, Offset, Prefix, PrefixTrie};

use constants::*;
use helpers::*;
use log::{debug, trace, warn};
use metrics::{counter, gauge};
use once_cell::sync::OnceCell;

// ---- logging bootstraper -------------------------------------------------
pub(crate) fn ensure_logging() {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        // Fallback: simple env_logger with timestamps off; a host logger wins.
        let _ = env_logger::builder()
            .format_timestamp(None)
            .is_test(std::env::var("RUST_TEST_THREADS").is_ok())
            .try_init();
    });
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    /// An empty trie holding only the root node.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(INITIAL_NODES);
        nodes.push(Node::default());
        Self { nodes, len: 0 }
    }

    /// Number of stored prefixes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn node(&self, offset: Offset) -> &Node {
        &self.nodes[offset as usize]
    }

    #[inline]
    fn child(&self, offset: Offset, bit: u8) -> Offset {
        let node = self.node(offset);
        if bit == 0 {
            node.left
        } else {
            node.right
        }
    }

    /// Allocate a fresh node and link it below `parent` on the `bit` side.
    fn alloc_child(&mut self, parent: Offset, bit: u8) -> Result<Offset> {
        let offset = Offset::try_from(self.nodes.len()).map_err(|_| Error::CapacityExceeded)?;
        self.nodes.push(Node::default());
        let parent = &mut self.nodes[parent as usize];
        if bit == 0 {
            parent.left = offset;
        } else {
            parent.right = offset;
        }
        trace!("[INSERT] Allocated node at offset={offset}");
        Ok(offset)
    }

    /// Attach the prefix `addr/prefix_len` to the node reached by following
    /// `prefix_len` bits of `addr` from the root, creating missing nodes.
    ///
    /// Host bits beyond `prefix_len` are ignored. Fails with
    /// [`Error::InvalidMask`] before touching the trie when `prefix_len > 32`,
    /// and with [`Error::DuplicatePrefix`] when the target already carries a
    /// prefix; in both cases the stored prefixes are unchanged.
    pub fn insert(&mut self, addr: u32, prefix_len: u8) -> Result<()> {
        let prefix = Prefix::new(addr, prefix_len)
            .inspect_err(|_| warn!("[INSERT] Rejected mask length /{prefix_len}"))?;
        debug!("[INSERT] {prefix}");

        let mut current = ROOT;
        for depth in 0..prefix_len {
            let bit = get_bit(prefix.addr(), depth);
            let next = self.child(current, bit);
            current = if next != ROOT {
                next
            } else {
                self.alloc_child(current, bit)?
            };
        }

        let target = &mut self.nodes[current as usize];
        if let Some(existing) = target.prefix {
            counter!("lpmtrie_duplicates_total").increment(1);
            warn!("[INSERT] Duplicate prefix {existing}");
            return Err(Error::DuplicatePrefix(existing));
        }
        target.prefix = Some(prefix);
        self.len += 1;
        counter!("lpmtrie_inserts_total").increment(1);
        gauge!("lpmtrie_nodes").set(self.nodes.len() as f64);
        Ok(())
    }

    /// Longest stored prefix covering `addr`, or `None` when nothing covers it.
    pub fn lookup(&self, addr: u32) -> Option<Prefix> {
        let mut node = self.node(ROOT);
        let mut best = node.prefix; // default route, if any
        for depth in 0..ADDR_BITS {
            let next = if get_bit(addr, depth) == 0 {
                node.left
            } else {
                node.right
            };
            if next == ROOT {
                // nothing more specific can exist below this point
                break;
            }
            node = self.node(next);
            if node.prefix.is_some() {
                best = node.prefix;
            }
        }
        best
    }

    /// Exact-match lookup of a stored prefix; host bits of `addr` are ignored.
    pub fn get_exact(&self, addr: u32, prefix_len: u8) -> Option<Prefix> {
        if prefix_len > MAX_MASK_LEN {
            return None;
        }
        let mut current = ROOT;
        for depth in 0..prefix_len {
            current = self.child(current, get_bit(addr, depth));
            if current == ROOT {
                return None;
            }
        }
        self.node(current).prefix
    }

    /// All stored prefixes in ascending `(address, mask_len)` order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            trie: self,
            stack: vec![ROOT],
        }
    }
}

/// Pre-order walk over a [`PrefixTrie`], left (0) before right (1).
pub struct Iter<'a> {
    trie: &'a PrefixTrie,
    stack: Vec<Offset>,
}

impl Iterator for Iter<'_> {
    type Item = Prefix;

    fn next(&mut self) -> Option<Prefix> {
        while let Some(offset) = self.stack.pop() {
            let node = self.trie.node(offset);
            if node.right != ROOT {
                self.stack.push(node.right);
            }
            if node.left != ROOT {
                self.stack.push(node.left);
            }
            if node.prefix.is_some() {
                return node.prefix;
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a PrefixTrie {
    type Item = Prefix;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
