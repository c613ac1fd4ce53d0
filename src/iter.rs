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

//! Zero-copy, skip-seekable chunk iteration over a range of a document.
//!
//! This is an explicit state machine (a descent-path stack plus a position
//! within the active leaf), not a recursive generator — the same shape as
//! the teacher's `Cursor` in `tree.rs`, but walking a breadcrumb `Vec`
//! instead of a fixed-size ancestor cache, since depth here is small and a
//! growable stack makes the forward/backward symmetry easy to keep
//! correct. A branch boundary never carries a separator (I3), so crossing
//! from one leaf to the next never emits a line-break token by itself —
//! only crossing between two lines *within* the same leaf's own `lines`
//! array does.

use crate::leaf::LeafData;
use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// One atom of output: either a separator-free run of text, or a line
/// break. Chunks never cross a line boundary, so consumers that want whole
/// lines join on `LineBreak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    Text(&'a str),
    LineBreak,
}

struct Frame<'a> {
    node: &'a Node,
    child: usize,
}

/// A forward- or backward-moving cursor over `[lo, hi)` of a document.
pub struct Iter<'a> {
    root: &'a Node,
    stack: Vec<Frame<'a>>,
    leaf: &'a LeafData,
    leaf_start: usize,
    dir: Direction,
    lo: usize,
    hi: usize,
    pos: usize,
}

impl<'a> Iter<'a> {
    /// Iterates the whole document in `dir`.
    pub(crate) fn whole(root: &'a Node, dir: Direction) -> Iter<'a> {
        Iter::ranged(root, 0, root.length(), dir)
    }

    /// Iterates `[lo, hi)` in `dir`. `lo <= hi <= root.length()`.
    pub(crate) fn ranged(root: &'a Node, lo: usize, hi: usize, dir: Direction) -> Iter<'a> {
        debug_assert!(lo <= hi && hi <= root.length());
        let start = match dir {
            Direction::Forward => lo,
            Direction::Backward => hi,
        };
        let (stack, leaf_node, leaf_start) = descend_at(root, start);
        Iter { root, stack, leaf: leaf_node.leaf(), leaf_start, dir, lo, hi, pos: start }
    }

    fn relocate(&mut self) {
        let (stack, leaf_node, leaf_start) = descend_at(self.root, self.pos);
        self.stack = stack;
        self.leaf = leaf_node.leaf();
        self.leaf_start = leaf_start;
    }

    /// Produces the next token, first applying `skip` (positive moves with
    /// the iteration direction, negative against it; a line break counts as
    /// one character; the result is clamped to `[lo, hi]`). Returns `None`
    /// once the range is exhausted.
    pub fn next(&mut self, skip: i64) -> Option<Chunk<'a>> {
        if skip != 0 {
            let sign: i64 = if self.dir == Direction::Forward { 1 } else { -1 };
            let delta = skip as i128 * sign as i128;
            let newpos = (self.pos as i128 + delta).clamp(self.lo as i128, self.hi as i128) as usize;
            if newpos != self.pos {
                self.pos = newpos;
                self.relocate();
            }
        }
        match self.dir {
            Direction::Forward => self.emit_forward(),
            Direction::Backward => self.emit_backward(),
        }
    }

    fn emit_forward(&mut self) -> Option<Chunk<'a>> {
        loop {
            if self.pos >= self.hi {
                return None;
            }
            let local = self.pos - self.leaf_start;
            let (line_idx, in_line) = locate_in_leaf(self.leaf, local);
            let line: &'a str = &self.leaf.lines()[line_idx];
            let line_len = line.chars().count();
            if in_line < line_len {
                let take = (line_len - in_line).min(self.hi - self.pos);
                let chunk = char_slice(line, in_line, in_line + take);
                self.pos += take;
                return Some(Chunk::Text(chunk));
            }
            if line_idx + 1 < self.leaf.num_lines() {
                self.pos += 1;
                return Some(Chunk::LineBreak);
            }
            match advance_leaf(&mut self.stack) {
                Some(next_leaf) => {
                    self.leaf = next_leaf.leaf();
                    self.leaf_start = self.pos;
                }
                None => return None,
            }
        }
    }

    fn emit_backward(&mut self) -> Option<Chunk<'a>> {
        loop {
            if self.pos <= self.lo {
                return None;
            }
            let local = self.pos - self.leaf_start;
            let (line_idx, in_line) = locate_in_leaf(self.leaf, local);
            if in_line > 0 {
                let take = in_line.min(self.pos - self.lo);
                let line: &'a str = &self.leaf.lines()[line_idx];
                let chunk = char_slice(line, in_line - take, in_line);
                self.pos -= take;
                return Some(Chunk::Text(chunk));
            }
            if line_idx > 0 {
                self.pos -= 1;
                return Some(Chunk::LineBreak);
            }
            match retreat_leaf(&mut self.stack) {
                Some(prev_leaf) => {
                    let prev = prev_leaf.leaf();
                    self.leaf_start = self.pos - prev.char_len();
                    self.leaf = prev;
                }
                None => return None,
            }
        }
    }
}

fn locate_in_leaf(leaf: &LeafData, mut pos: usize) -> (usize, usize) {
    for (i, line) in leaf.lines().iter().enumerate() {
        let len = line.chars().count();
        if pos <= len || i == leaf.num_lines() - 1 {
            return (i, pos);
        }
        pos -= len + 1;
    }
    unreachable!("a leaf always has at least one line")
}

fn char_slice(s: &str, from: usize, to: usize) -> &str {
    let b_from = s.char_indices().nth(from).map(|(b, _)| b).unwrap_or(s.len());
    let b_to = s.char_indices().nth(to).map(|(b, _)| b).unwrap_or(s.len());
    &s[b_from..b_to]
}

fn descend_at<'a>(root: &'a Node, pos: usize) -> (Vec<Frame<'a>>, &'a Node, usize) {
    let mut stack = Vec::new();
    let mut node = root;
    let mut base = 0usize;
    let mut local = pos;
    loop {
        if node.is_leaf() {
            return (stack, node, base);
        }
        let children = node.children();
        let mut idx = 0;
        while idx + 1 < children.len() && local > children[idx].length() {
            base += children[idx].length();
            local -= children[idx].length();
            idx += 1;
        }
        stack.push(Frame { node, child: idx });
        node = &children[idx];
    }
}

fn advance_leaf<'a>(stack: &mut Vec<Frame<'a>>) -> Option<&'a Node> {
    loop {
        let top = stack.last_mut()?;
        let children = top.node.children();
        if top.child + 1 >= children.len() {
            stack.pop();
            continue;
        }
        top.child += 1;
        let mut node: &'a Node = &children[top.child];
        loop {
            if node.is_leaf() {
                return Some(node);
            }
            stack.push(Frame { node, child: 0 });
            node = &node.children()[0];
        }
    }
}

fn retreat_leaf<'a>(stack: &mut Vec<Frame<'a>>) -> Option<&'a Node> {
    loop {
        let top = stack.last_mut()?;
        if top.child == 0 {
            stack.pop();
            continue;
        }
        top.child -= 1;
        let mut node: &'a Node = &top.node.children()[top.child];
        loop {
            if node.is_leaf() {
                return Some(node);
            }
            let children = node.children();
            let last = children.len() - 1;
            stack.push(Frame { node, child: last });
            node = &children[last];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::build_from_lines;
    use std::sync::Arc;

    fn doc(lines: &[&str]) -> Node {
        build_from_lines(lines.iter().map(|s| Arc::from(*s)).collect())
    }

    fn collect_text(it: &mut Iter<'_>) -> (String, usize) {
        let mut s = String::new();
        let mut breaks = 0;
        while let Some(c) = it.next(0) {
            match c {
                Chunk::Text(t) => s.push_str(t),
                Chunk::LineBreak => {
                    s.push('\n');
                    breaks += 1;
                }
            }
        }
        (s, breaks)
    }

    #[test]
    fn forward_iteration_reconstructs_content() {
        let n = doc(&["one", "two", "three", "four"]);
        let mut it = Iter::whole(&n, Direction::Forward);
        let (s, breaks) = collect_text(&mut it);
        assert_eq!(s, "one\ntwo\nthree\nfour");
        assert_eq!(breaks, 3);
    }

    #[test]
    fn reverse_iteration_yields_same_chunks_in_reverse_order() {
        let n = doc(&["one", "two", "three"]);
        let mut it = Iter::whole(&n, Direction::Backward);
        let mut pieces = Vec::new();
        while let Some(c) = it.next(0) {
            pieces.push(c);
        }
        assert_eq!(pieces, vec![Chunk::Text("three"), Chunk::LineBreak, Chunk::Text("two"), Chunk::LineBreak, Chunk::Text("one")]);
    }

    #[test]
    fn skip_seeks_within_range() {
        let n = doc(&["one", "two", "three", "four"]);
        let mut it = Iter::whole(&n, Direction::Forward);
        assert_eq!(it.next(12), Some(Chunk::Text("e")));
        assert_eq!(it.next(-12), Some(Chunk::Text("ne")));
        assert_eq!(it.next(12), Some(Chunk::Text("our")));
        assert_eq!(it.next(-1000), Some(Chunk::Text("one")));
    }

    #[test]
    fn range_iteration_clips_to_bounds() {
        let n = doc(&["one", "two", "three"]);
        // content: "one\ntwo\nthree", len 13; range [1, 7) == "ne\ntwo"
        let mut it = Iter::ranged(&n, 1, 7, Direction::Forward);
        let (s, _) = collect_text(&mut it);
        assert_eq!(s, "ne\ntwo");
    }
}
