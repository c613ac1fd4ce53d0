// Copyright 2026 the linerope authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The persistent tree: `Leaf`/`Branch` nodes behind an `Arc`, plus the
//! concat/merge/build machinery that keeps it balanced.
//!
//! The algorithms here are a direct descendant of the teacher's generic
//! `Node<N: NodeInfo>` in `tree.rs` (`concat`/`merge_nodes`/`merge_leaves`/
//! `TreeBuilder`), specialized to a concrete two-variant node instead of a
//! generic `NodeInfo`. Branch boundaries never add a separator (I3), which
//! simplifies the teacher's metric-accumulation dance into plain char-count
//! addition; line counting still needs the "-1 per boundary" correction
//! because lines, unlike lengths, really are shared across a boundary.

use std::sync::Arc;

use crate::leaf::{LeafData, MAX_LEAF};

pub(crate) const MIN_CHILDREN: usize = 2;
pub(crate) const MAX_CHILDREN: usize = 8;

#[derive(Debug)]
struct NodeBody {
    height: usize,
    length: usize,
    lines: usize,
    val: NodeVal,
}

#[derive(Debug)]
enum NodeVal {
    Leaf(LeafData),
    Branch(Vec<Node>),
}

/// A node in the persistent tree. Cheap to clone (an `Arc` bump); two nodes
/// built from the same subtree share storage.
#[derive(Clone, Debug)]
pub(crate) struct Node(Arc<NodeBody>);

impl Node {
    pub(crate) fn from_leaf(leaf: LeafData) -> Node {
        let length = leaf.char_len();
        let lines = leaf.num_lines();
        Node(Arc::new(NodeBody { height: 0, length, lines, val: NodeVal::Leaf(leaf) }))
    }

    /// Builds a branch directly from already-balanced children. Panics (in
    /// debug) if the child-count or height invariants are violated; callers
    /// (`concat`, `merge_nodes`, the bulk builder) are responsible for only
    /// ever calling this with a valid grouping.
    pub(crate) fn from_children(children: Vec<Node>) -> Node {
        debug_assert!(children.len() >= MIN_CHILDREN && children.len() <= MAX_CHILDREN);
        let height = children[0].height() + 1;
        debug_assert!(children.iter().all(|c| c.height() + 1 == height));
        let length = children.iter().map(Node::length).sum();
        let lines = children.iter().map(Node::lines).sum::<usize>() - (children.len() - 1);
        Node(Arc::new(NodeBody { height, length, lines, val: NodeVal::Branch(children) }))
    }

    pub(crate) fn empty() -> Node {
        Node::from_leaf(LeafData::single_empty())
    }

    pub(crate) fn height(&self) -> usize {
        self.0.height
    }

    pub(crate) fn length(&self) -> usize {
        self.0.length
    }

    pub(crate) fn lines(&self) -> usize {
        self.0.lines
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.0.val, NodeVal::Leaf(_))
    }

    pub(crate) fn leaf(&self) -> &LeafData {
        match &self.0.val {
            NodeVal::Leaf(l) => l,
            NodeVal::Branch(_) => panic!("leaf() called on a branch node"),
        }
    }

    pub(crate) fn children(&self) -> &[Node] {
        match &self.0.val {
            NodeVal::Branch(c) => c,
            NodeVal::Leaf(_) => panic!("children() called on a leaf node"),
        }
    }

    fn is_ok_child(&self) -> bool {
        match &self.0.val {
            NodeVal::Leaf(l) => l.is_ok_child(),
            NodeVal::Branch(c) => c.len() >= MIN_CHILDREN,
        }
    }

    /// 0-based index of the logical line containing character offset `pos`
    /// (`pos` in `[0, length()]`).
    pub(crate) fn line_of_offset(&self, pos: usize) -> usize {
        debug_assert!(pos <= self.length());
        match &self.0.val {
            NodeVal::Leaf(leaf) => leaf_line_of_offset(leaf, pos),
            NodeVal::Branch(children) => {
                let mut offset = pos;
                let mut line_base = 0usize;
                for child in children {
                    let clen = child.length();
                    if offset <= clen {
                        return line_base + child.line_of_offset(offset);
                    }
                    offset -= clen;
                    line_base += child.lines() - 1;
                }
                unreachable!("pos <= length() guarantees some child matches")
            }
        }
    }

    /// Character offset at which 0-based logical line `line_idx` begins.
    pub(crate) fn offset_of_line(&self, line_idx: usize) -> usize {
        debug_assert!(line_idx < self.lines());
        match &self.0.val {
            NodeVal::Leaf(leaf) => leaf_offset_of_line(leaf, line_idx),
            NodeVal::Branch(children) => {
                let mut line = line_idx;
                let mut offset_base = 0usize;
                for child in children {
                    let clines = child.lines();
                    if line < clines {
                        return offset_base + child.offset_of_line(line);
                    }
                    line -= clines - 1;
                    offset_base += child.length();
                }
                unreachable!("line_idx < lines() guarantees some child matches")
            }
        }
    }

    /// Appends the slice `[from, to)` of `self`'s content into `b`.
    pub(crate) fn push_subseq(&self, b: &mut TreeBuilder, from: usize, to: usize) {
        if from >= to {
            return;
        }
        if from == 0 && to == self.length() {
            b.push(self.clone());
            return;
        }
        match &self.0.val {
            NodeVal::Leaf(leaf) => b.push_leaf(leaf.subseq(from, to)),
            NodeVal::Branch(children) => {
                let mut offset = 0usize;
                for child in children {
                    if offset >= to {
                        break;
                    }
                    let clen = child.length();
                    let child_from = from.saturating_sub(offset).min(clen);
                    let child_to = to.saturating_sub(offset).min(clen);
                    if child_from < child_to {
                        child.push_subseq(b, child_from, child_to);
                    }
                    offset += clen;
                }
            }
        }
    }

    pub(crate) fn subseq(&self, from: usize, to: usize) -> Node {
        let mut b = TreeBuilder::new();
        self.push_subseq(&mut b, from, to);
        b.build()
    }

    /// Appends the materialized text of `[from, to)` to `out`. Consecutive
    /// children are written back to back with no inserted separator, which
    /// is exactly what the shared-line rule (I3) requires at a branch
    /// boundary.
    pub(crate) fn write_range(&self, out: &mut String, from: usize, to: usize) {
        if from >= to {
            return;
        }
        match &self.0.val {
            NodeVal::Leaf(leaf) => {
                let frag = leaf.subseq(from, to);
                let mut first = true;
                for line in frag.lines() {
                    if !first {
                        out.push('\n');
                    }
                    out.push_str(line);
                    first = false;
                }
            }
            NodeVal::Branch(children) => {
                let mut offset = 0usize;
                for child in children {
                    if offset >= to {
                        break;
                    }
                    let clen = child.length();
                    let child_from = from.saturating_sub(offset).min(clen);
                    let child_to = to.saturating_sub(offset).min(clen);
                    if child_from < child_to {
                        child.write_range(out, child_from, child_to);
                    }
                    offset += clen;
                }
            }
        }
    }

    pub(crate) fn to_string_range(&self, from: usize, to: usize) -> String {
        let mut out = String::with_capacity(to.saturating_sub(from));
        self.write_range(&mut out, from, to);
        out
    }

    /// Persistent concatenation: the classic height-balanced merge from the
    /// teacher's `Node::concat`.
    pub(crate) fn concat(left: Node, right: Node) -> Node {
        let h1 = left.height();
        let h2 = right.height();
        match h1.cmp(&h2) {
            std::cmp::Ordering::Equal => {
                if left.is_ok_child() && right.is_ok_child() {
                    Node::from_children(vec![left, right])
                } else if h1 == 0 {
                    merge_leaves(left, right)
                } else {
                    merge_nodes(left.children(), right.children())
                }
            }
            std::cmp::Ordering::Less => {
                let children = right.children();
                if h1 == h2 - 1 && left.is_ok_child() {
                    return merge_nodes(std::slice::from_ref(&left), children);
                }
                let last = Node::concat(left, children[0].clone());
                if last.height() == h2 - 1 {
                    merge_nodes(std::slice::from_ref(&last), &children[1..])
                } else {
                    merge_nodes(last.children(), &children[1..])
                }
            }
            std::cmp::Ordering::Greater => {
                let children = left.children();
                if h2 == h1 - 1 && right.is_ok_child() {
                    return merge_nodes(children, std::slice::from_ref(&right));
                }
                let n = children.len();
                let last = Node::concat(children[n - 1].clone(), right);
                if last.height() == h1 - 1 {
                    merge_nodes(&children[..n - 1], std::slice::from_ref(&last))
                } else {
                    merge_nodes(&children[..n - 1], last.children())
                }
            }
        }
    }
}

fn leaf_line_of_offset(leaf: &LeafData, pos: usize) -> usize {
    let mut start = 0usize;
    for (i, line) in leaf.lines().iter().enumerate() {
        let end = start + line.chars().count();
        if pos <= end {
            return i;
        }
        start = end + 1;
    }
    leaf.num_lines() - 1
}

fn leaf_offset_of_line(leaf: &LeafData, line_idx: usize) -> usize {
    let mut start = 0usize;
    for (i, line) in leaf.lines().iter().enumerate() {
        if i == line_idx {
            return start;
        }
        start += line.chars().count() + 1;
    }
    start
}

/// Merges two runs of same-height children, splitting into two balanced
/// branches if the combined count would exceed `MAX_CHILDREN`.
fn merge_nodes(children1: &[Node], children2: &[Node]) -> Node {
    let n = children1.len() + children2.len();
    if n <= MAX_CHILDREN {
        let mut v = Vec::with_capacity(n);
        v.extend_from_slice(children1);
        v.extend_from_slice(children2);
        Node::from_children(v)
    } else {
        let splitpoint = (n - MIN_CHILDREN).min(MAX_CHILDREN);
        let mut iter = children1.iter().chain(children2.iter()).cloned();
        let left: Vec<Node> = iter.by_ref().take(splitpoint).collect();
        let right: Vec<Node> = iter.collect();
        Node::from_children(vec![Node::from_children(left), Node::from_children(right)])
    }
}

fn merge_leaves(a: Node, b: Node) -> Node {
    debug_assert!(a.is_leaf() && b.is_leaf());
    if a.is_ok_child() && b.is_ok_child() {
        return Node::from_children(vec![a, b]);
    }
    let mut merged = a.leaf().clone();
    match merged.push_maybe_split(b.leaf()) {
        Some(right) => Node::from_children(vec![Node::from_leaf(merged), Node::from_leaf(right)]),
        None => Node::from_leaf(merged),
    }
}

/// Accumulates nodes (or raw leaves) into a balanced tree. Grounded on the
/// teacher's `TreeBuilder`/`RopeBuilder` in `tree.rs`/`rope.rs`.
pub(crate) struct TreeBuilder(Option<Node>);

impl TreeBuilder {
    pub(crate) fn new() -> TreeBuilder {
        TreeBuilder(None)
    }

    pub(crate) fn push(&mut self, n: Node) {
        self.0 = Some(match self.0.take() {
            None => n,
            Some(buf) => Node::concat(buf, n),
        });
    }

    pub(crate) fn push_leaf(&mut self, l: LeafData) {
        self.push(Node::from_leaf(l));
    }

    pub(crate) fn build(self) -> Node {
        self.0.unwrap_or_else(Node::empty)
    }
}

/// Chunks a flat sequence of separator-free line strings into leaf-sized
/// groups, then groups those bottom-up into a balanced tree in one O(n)
/// pass. This is the teacher's bulk "push_str" stack-grouping strategy
/// (`rope.rs`'s `RopeBuilder::push_str`), adapted to a pre-split line list
/// instead of scanning for `\n` in a flat string.
pub(crate) fn build_from_lines(lines: Vec<Arc<str>>) -> Node {
    if lines.is_empty() {
        return Node::empty();
    }
    let total_len: usize = lines.iter().map(|l| l.chars().count()).sum::<usize>() + lines.len() - 1;
    if total_len <= MAX_LEAF {
        return Node::from_leaf(LeafData::new(lines));
    }
    let leaves: Vec<Node> = chunk_lines(&lines).into_iter().map(Node::from_leaf).collect();
    build_balanced(leaves)
}

fn chunk_lines(lines: &[Arc<str>]) -> Vec<LeafData> {
    let mut chunks = Vec::new();
    let mut current: Vec<Arc<str>> = Vec::new();
    let mut current_len = 0usize;
    for line in lines {
        let line_len = line.chars().count();
        let additional = if current.is_empty() { line_len } else { line_len + 1 };
        if !current.is_empty() && current_len + additional > MAX_LEAF {
            chunks.push(LeafData::new(std::mem::take(&mut current)));
            current_len = 0;
        }
        current_len += if current.is_empty() { line_len } else { line_len + 1 };
        current.push(line.clone());
    }
    if !current.is_empty() {
        chunks.push(LeafData::new(current));
    }
    chunks
}

/// Groups an ordered run of leaves into a balanced tree bottom-up, without
/// the repeated-`concat` overhead of pushing one at a time.
fn build_balanced(leaves: Vec<Node>) -> Node {
    if leaves.len() == 1 {
        return leaves.into_iter().next().unwrap();
    }
    let mut stack: Vec<Vec<Node>> = Vec::new();
    for leaf in leaves {
        let mut new = leaf;
        loop {
            let same_height = stack.last().map_or(false, |v| v[0].height() == new.height());
            if !same_height {
                stack.push(vec![new]);
                break;
            }
            let top = stack.last_mut().unwrap();
            top.push(new);
            if top.len() < MAX_CHILDREN {
                break;
            }
            new = Node::from_children(stack.pop().unwrap());
        }
    }
    let mut result: Option<Node> = None;
    for group in stack {
        for node in group {
            result = Some(match result {
                None => node,
                Some(acc) => Node::concat(acc, node),
            });
        }
    }
    result.unwrap()
}
