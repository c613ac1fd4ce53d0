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

//! Error taxonomy for programmer errors detected at the public API boundary.
//!
//! Every error here is a contract violation by the caller (a bad offset, a
//! bad line number, a line string containing a separator). Internal
//! recursion assumes bounds were already validated at the entry point and
//! never re-checks them.

use std::error::Error;
use std::fmt;

/// Result alias used throughout the public API.
pub type Result<T> = std::result::Result<T, TextError>;

/// A contract violation raised by a public `Text` operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextError {
    /// A character offset was negative (unreachable in `usize`, kept for
    /// symmetry with the spec's taxonomy) or exceeded the document length
    /// where a strict bound applies (`lineAt`, `replace`, `slice`).
    OutOfRange { offset: usize, len: usize },
    /// A line number fell outside `[1, lines]`.
    InvalidLine { line: usize, lines: usize },
    /// A line string passed to `Text::of` contained a `\n`.
    ContractViolation { line_index: usize },
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TextError::OutOfRange { offset, len } => {
                write!(f, "offset {} is out of range for a document of length {}", offset, len)
            }
            TextError::InvalidLine { line, lines } => {
                write!(f, "line {} is out of range for a document with {} line(s)", line, lines)
            }
            TextError::ContractViolation { line_index } => {
                write!(f, "line string at index {} contains a line separator", line_index)
            }
        }
    }
}

impl Error for TextError {}
