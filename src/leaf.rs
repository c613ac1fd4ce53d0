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

//! Leaf storage: a small run of separator-free line strings.
//!
//! A leaf's logical content is its line strings joined by `\n` (I2). None
//! of the bookkeeping here ever inserts or removes a separator at a leaf
//! *boundary* — that is the branch's job (I3) — only within a leaf's own
//! `lines` array.

use std::sync::Arc;

pub(crate) const MAX_LEAF: usize = 512;
pub(crate) const BASE_LEAF: usize = 256;
pub(crate) const MIN_LEAF: usize = BASE_LEAF / 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LeafData {
    lines: Vec<Arc<str>>,
}

impl LeafData {
    pub(crate) fn new(lines: Vec<Arc<str>>) -> LeafData {
        debug_assert!(!lines.is_empty(), "a leaf always holds at least one line");
        debug_assert!(lines.iter().all(|l| !l.contains('\n')), "leaf lines must be separator-free (I2)");
        LeafData { lines }
    }

    pub(crate) fn single_empty() -> LeafData {
        LeafData { lines: vec![Arc::from("")] }
    }

    pub(crate) fn lines(&self) -> &[Arc<str>] {
        &self.lines
    }

    pub(crate) fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Character length of the joined content, including the `N-1`
    /// separators between `N` lines.
    pub(crate) fn char_len(&self) -> usize {
        let text_len: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        text_len + self.lines.len() - 1
    }

    pub(crate) fn is_ok_child(&self) -> bool {
        self.char_len() >= MIN_LEAF
    }

    fn byte_offset(line: &str, char_offset: usize) -> usize {
        match line.char_indices().nth(char_offset) {
            Some((b, _)) => b,
            None => line.len(),
        }
    }

    fn line_slice(line: &str, from: usize, to: usize) -> Arc<str> {
        let b_from = Self::byte_offset(line, from);
        let b_to = Self::byte_offset(line, to);
        Arc::from(&line[b_from..b_to])
    }

    /// Returns the content restricted to the char range `[from, to)` of
    /// this leaf's logical content, as a fresh `LeafData`. A leaf produced
    /// this way may have fewer lines than `self`; the shared-line rule is
    /// preserved automatically because the result is still just a list of
    /// separator-free fragments, joined by the same `N-1` rule.
    pub(crate) fn subseq(&self, from: usize, to: usize) -> LeafData {
        debug_assert!(from <= to && to <= self.char_len());
        if from == 0 && to == self.char_len() {
            return self.clone();
        }
        let mut out: Vec<Arc<str>> = Vec::new();
        let mut start = 0usize;
        for line in &self.lines {
            let line_len = line.chars().count();
            let end = start + line_len;
            let lo = from.max(start);
            let hi = to.min(end);
            if lo < hi {
                out.push(Self::line_slice(line, lo - start, hi - start));
            }
            start = end + 1;
        }
        if out.is_empty() {
            out.push(Arc::from(""));
        }
        LeafData::new(out)
    }

    /// Glues `other` onto the end of `self` per the shared-line rule: the
    /// last line of `self` and the first line of `other` are concatenated
    /// into a single line, and `other`'s remaining lines are appended
    /// as-is. If the result exceeds `MAX_LEAF`, it is split and the right
    /// half returned — mirrors the teacher's `Leaf::push_maybe_split`.
    pub(crate) fn push_maybe_split(&mut self, other: &LeafData) -> Option<LeafData> {
        let mut lines = std::mem::take(&mut self.lines);
        let glued: Arc<str> = {
            let last = lines.last().unwrap();
            let first = &other.lines[0];
            let mut s = String::with_capacity(last.len() + first.len());
            s.push_str(last);
            s.push_str(first);
            Arc::from(s)
        };
        *lines.last_mut().unwrap() = glued;
        lines.extend(other.lines[1..].iter().cloned());
        self.lines = lines;

        if self.char_len() <= MAX_LEAF {
            None
        } else {
            let split_at = find_split_point(&self.lines);
            let right = self.lines.split_off(split_at);
            Some(LeafData::new(right))
        }
    }
}

/// Picks a line index to split at, aiming for the char-length midpoint
/// (lines are individually bounded in length so this keeps both halves
/// close to even).
fn find_split_point(lines: &[Arc<str>]) -> usize {
    debug_assert!(lines.len() >= 2);
    let total: usize = lines.iter().map(|l| l.chars().count()).sum::<usize>() + lines.len() - 1;
    let half = total / 2;
    let mut acc = 0usize;
    for (i, line) in lines.iter().enumerate() {
        acc += line.chars().count();
        if i + 1 < lines.len() {
            acc += 1;
        }
        if acc >= half {
            return (i + 1).clamp(1, lines.len() - 1);
        }
    }
    lines.len() - 1
}
