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

//! `Text`: the public, persistent document type.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TextError};
use crate::iter::{Chunk, Direction, Iter};
use crate::node::{self, Node};

/// A persistent, immutable text document.
///
/// Cloning a `Text` is O(1) — it's an `Arc` bump, and any edit shares
/// structure with the original via [`Text::replace`]/[`Text::append`].
#[derive(Clone, Debug)]
pub struct Text(Node);

/// A single logical line, with its content and the character offsets it
/// spans in the owning document (`to` excludes the line separator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub from: usize,
    pub to: usize,
    pub text: String,
}

impl Text {
    /// The singleton empty document: one empty line.
    pub fn empty() -> Text {
        Text(Node::empty())
    }

    /// Builds a document from a nonempty ordered sequence of separator-free
    /// lines. An empty slice yields [`Text::empty`]. Fails with
    /// [`TextError::ContractViolation`] if any line contains `\n`.
    pub fn of<S: AsRef<str>>(lines: &[S]) -> Result<Text> {
        for (i, l) in lines.iter().enumerate() {
            if l.as_ref().contains('\n') {
                return Err(TextError::ContractViolation { line_index: i });
            }
        }
        if lines.is_empty() {
            return Ok(Text::empty());
        }
        let owned: Vec<Arc<str>> = lines.iter().map(|l| Arc::from(l.as_ref())).collect();
        Ok(Text(node::build_from_lines(owned)))
    }

    /// Total character length (Unicode scalar values), counting separators.
    pub fn length(&self) -> usize {
        self.0.length()
    }

    /// Number of logical lines (always >= 1).
    pub fn lines(&self) -> usize {
        self.0.lines()
    }

    /// Returns a new document containing just `[from, to)`.
    pub fn slice(&self, from: usize, to: usize) -> Result<Text> {
        self.check_range(from, to)?;
        Ok(Text(self.0.subseq(from, to)))
    }

    /// Materializes `[from, to)` directly, without constructing an
    /// intermediate `Text`.
    pub fn slice_string(&self, from: usize, to: usize) -> Result<String> {
        self.check_range(from, to)?;
        Ok(self.0.to_string_range(from, to))
    }

    /// Returns a new document with `[from, to)` replaced by `insert`'s
    /// content. Structure outside the touched region is shared with
    /// `self`.
    pub fn replace(&self, from: usize, to: usize, insert: &Text) -> Result<Text> {
        self.check_range(from, to)?;
        let before = self.0.subseq(0, from);
        let after = self.0.subseq(to, self.0.length());
        let with_insert = Node::concat(before, insert.0.clone());
        Ok(Text(Node::concat(with_insert, after)))
    }

    /// Returns a new document with `other`'s content appended. Always
    /// succeeds; there is no range to violate.
    pub fn append(&self, other: &Text) -> Text {
        Text(Node::concat(self.0.clone(), other.0.clone()))
    }

    /// The `number`-th line (1-based).
    pub fn line(&self, number: usize) -> Result<Line> {
        if number == 0 || number > self.0.lines() {
            return Err(TextError::InvalidLine { line: number, lines: self.0.lines() });
        }
        Ok(self.line_at_index(number - 1))
    }

    /// The logical line enclosing character offset `pos`.
    pub fn line_at(&self, pos: usize) -> Result<Line> {
        if pos > self.0.length() {
            return Err(TextError::OutOfRange { offset: pos, len: self.0.length() });
        }
        let idx = self.0.line_of_offset(pos);
        Ok(self.line_at_index(idx))
    }

    fn line_at_index(&self, idx: usize) -> Line {
        let from = self.0.offset_of_line(idx);
        let to = if idx + 1 < self.0.lines() { self.0.offset_of_line(idx + 1) - 1 } else { self.0.length() };
        Line { number: idx + 1, from, to, text: self.0.to_string_range(from, to) }
    }

    /// A zero-copy forward (`Direction::Forward`) or reverse
    /// (`Direction::Backward`) iterator over the whole document.
    pub fn iter(&self, dir: Direction) -> Iter<'_> {
        Iter::whole(&self.0, dir)
    }

    /// A zero-copy iterator clipped to `[min(from, to), max(from, to))`.
    /// When `from > to`, iteration runs in reverse, starting at `from`.
    pub fn iter_range(&self, from: usize, to: usize) -> Iter<'_> {
        let (lo, hi, dir) = if from <= to { (from, to, Direction::Forward) } else { (to, from, Direction::Backward) };
        Iter::ranged(&self.0, lo, hi, dir)
    }

    /// The lines `[start, end)` (1-based, half-open), materialized one at a
    /// time. Defaults to the whole document. Yields nothing if `end <= start`
    /// or the range falls entirely outside `[1, lines()]`.
    pub fn iter_lines(&self, start: Option<usize>, end: Option<usize>) -> impl Iterator<Item = Line> + '_ {
        let total = self.0.lines();
        let start = start.unwrap_or(1).max(1);
        let end = end.unwrap_or(total + 1).min(total + 1);
        let range: std::ops::Range<usize> = if start < end { start..end } else { 0..0 };
        range.map(move |n| self.line_at_index(n - 1))
    }

    /// Each logical line as a `String`, in order — the document's JSON
    /// form (`spec.md`'s `toJSON`).
    pub fn to_json(&self) -> Vec<String> {
        self.iter_lines(None, None).map(|l| l.text).collect()
    }

    /// Inverse of [`Text::to_json`].
    pub fn from_json(lines: &[String]) -> Result<Text> {
        Text::of(lines)
    }

    fn check_range(&self, from: usize, to: usize) -> Result<()> {
        if from > to || to > self.0.length() {
            let bad = if to > self.0.length() { to } else { from };
            return Err(TextError::OutOfRange { offset: bad, len: self.0.length() });
        }
        Ok(())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_string_range(0, self.0.length()))
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Text) -> bool {
        texts_equal(&self.0, &other.0)
    }
}

impl Eq for Text {}

/// Structural equality via synchronized chunk-stream comparison: pulls
/// chunks from both documents' iterators and compares only the overlapping
/// prefix of each pair, buffering the remainder for the next round. Never
/// materializes either document in full. Grounded on the teacher's
/// `eq_chunks` (`lib.rs`), adapted to a chunk stream that also carries
/// line-break tokens.
fn texts_equal(a: &Node, b: &Node) -> bool {
    if a.length() != b.length() {
        return false;
    }
    let mut ia = Iter::whole(a, Direction::Forward);
    let mut ib = Iter::whole(b, Direction::Forward);
    let mut pa: Option<Chunk<'_>> = None;
    let mut pb: Option<Chunk<'_>> = None;
    loop {
        if pa.is_none() {
            pa = ia.next(0);
        }
        if pb.is_none() {
            pb = ib.next(0);
        }
        match (pa, pb) {
            (None, None) => return true,
            (None, Some(_)) | (Some(_), None) => return false,
            (Some(Chunk::LineBreak), Some(Chunk::LineBreak)) => {
                pa = None;
                pb = None;
            }
            (Some(Chunk::LineBreak), Some(Chunk::Text(_))) | (Some(Chunk::Text(_)), Some(Chunk::LineBreak)) => {
                return false;
            }
            (Some(Chunk::Text(sa)), Some(Chunk::Text(sb))) => {
                let n = sa.chars().count().min(sb.chars().count());
                let (sa_head, sa_rest) = split_chars(sa, n);
                let (sb_head, sb_rest) = split_chars(sb, n);
                if sa_head != sb_head {
                    return false;
                }
                pa = if sa_rest.is_empty() { None } else { Some(Chunk::Text(sa_rest)) };
                pb = if sb_rest.is_empty() { None } else { Some(Chunk::Text(sb_rest)) };
            }
        }
    }
}

fn split_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((b, _)) => s.split_at(b),
        None => (s, ""),
    }
}
