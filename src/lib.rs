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

//! A persistent, balanced text tree for editor-style incremental edits.
//!
//! [`Text`] is an immutable document built from a tree of `Leaf`/`Branch`
//! nodes behind `Arc`s: edits share structure with the document they were
//! derived from instead of copying it, random access by character offset
//! or line number is logarithmic, and cloning a document is O(1).
//!
//! This crate covers the document data structure itself — building,
//! slicing, replacing, appending, looking up by offset or line, iterating
//! forward or backward, and JSON round-tripping. It does not model
//! transactions, selections, rendering, undo, grapheme clustering, or
//! search; those belong to the editor built on top of it.

mod error;
mod iter;
mod leaf;
mod node;
mod serde_impls;
mod text;

pub use error::{Result, TextError};
pub use iter::{Chunk, Direction, Iter};
pub use text::{Line, Text};
