//! Open/closed bookkeeping for best-first search.

use crate::heuristic::Heuristic;
use indexmap::IndexMap;
use reconfig_lattice::Configuration;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Per-state record. The state itself is the key in [`Frontier::nodes`].
#[derive(Clone, Debug)]
struct NodeRecord {
    g: u32,
    h: f64,
    parent: Option<usize>,
    closed: bool,
}

/// Heap entry referring to a node by index.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f64,
    g: u32,
    seq: u64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: lowest f, then highest g, then earliest insertion.
        other
            .f
            .total_cmp(&self.f)
            .then(self.g.cmp(&other.g))
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One best-first search frontier rooted at a single state.
///
/// Node indices are stable for the frontier's lifetime. A closed node is
/// reopened if a strictly shorter path to it turns up; superseded heap
/// entries are skipped on pop.
pub(crate) struct Frontier {
    nodes: IndexMap<Configuration, NodeRecord>,
    open: BinaryHeap<OpenEntry>,
    heuristic: Box<dyn Heuristic>,
    seq: u64,
}

impl Frontier {
    pub(crate) fn new(root: Configuration, mut heuristic: Box<dyn Heuristic>) -> Self {
        let h = heuristic.estimate(&root);
        let mut frontier = Self {
            nodes: IndexMap::new(),
            open: BinaryHeap::new(),
            heuristic,
            seq: 0,
        };
        frontier.nodes.insert(
            root,
            NodeRecord {
                g: 0,
                h,
                parent: None,
                closed: false,
            },
        );
        frontier.push(0, 0, h);
        frontier
    }

    fn push(&mut self, node: usize, g: u32, h: f64) {
        self.open.push(OpenEntry {
            f: f64::from(g) + h,
            g,
            seq: self.seq,
            node,
        });
        self.seq += 1;
    }

    /// Pop the best live node, skipping stale and closed entries.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        while let Some(entry) = self.open.pop() {
            let rec = &self.nodes[entry.node];
            if rec.closed || entry.g > rec.g {
                continue;
            }
            return Some(entry.node);
        }
        None
    }

    pub(crate) fn close(&mut self, node: usize) {
        self.nodes[node].closed = true;
    }

    pub(crate) fn state(&self, node: usize) -> &Configuration {
        self.nodes
            .get_index(node)
            .map(|(k, _)| k)
            .expect("node indices come from this frontier")
    }

    pub(crate) fn g(&self, node: usize) -> u32 {
        self.nodes[node].g
    }

    pub(crate) fn h(&self, node: usize) -> f64 {
        self.nodes[node].h
    }

    /// Index of `state` if this frontier has reached it.
    pub(crate) fn index_of(&self, state: &Configuration) -> Option<usize> {
        self.nodes.get_index_of(state)
    }

    /// Offer `state` as a successor of `parent`. Returns its index if it
    /// was new or its path improved.
    pub(crate) fn relax(&mut self, parent: usize, state: Configuration) -> Option<usize> {
        let g = self.nodes[parent].g + 1;
        match self.nodes.get_full_mut(&state) {
            Some((idx, _, rec)) => {
                if g >= rec.g {
                    return None;
                }
                rec.g = g;
                rec.parent = Some(parent);
                rec.closed = false;
                let h = rec.h;
                self.push(idx, g, h);
                Some(idx)
            }
            None => {
                let h = self.heuristic.estimate(&state);
                let (idx, _) = self.nodes.insert_full(
                    state,
                    NodeRecord {
                        g,
                        h,
                        parent: Some(parent),
                        closed: false,
                    },
                );
                self.push(idx, g, h);
                Some(idx)
            }
        }
    }

    /// States from the root to `node`, inclusive.
    pub(crate) fn chain(&self, node: usize) -> Vec<Configuration> {
        let mut out = Vec::new();
        let mut cur = Some(node);
        while let Some(i) = cur {
            out.push(self.state(i).clone());
            cur = self.nodes[i].parent;
        }
        out.reverse();
        out
    }

    pub(crate) fn open_len(&self) -> usize {
        self.open.len()
    }
}
