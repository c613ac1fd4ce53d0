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

//! `Text`'s JSON form is the list of its logical lines (`spec.md` §6),
//! not a single joined string — so, unlike the teacher's `Rope`, we
//! serialize as a sequence rather than `serialize_str`/`deserialize_str`.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::text::Text;

impl Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let lines = self.to_json();
        let mut seq = serializer.serialize_seq(Some(lines.len()))?;
        for line in &lines {
            seq.serialize_element(line)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(TextVisitor)
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Text;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a list of separator-free line strings")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut lines: Vec<String> = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(line) = seq.next_element::<String>()? {
            lines.push(line);
        }
        Text::from_json(&lines).map_err(|e| de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_serde_json() {
        let t = Text::of(&["one", "", "two"]).unwrap();
        let encoded = serde_json::to_string(&t).unwrap();
        assert_eq!(encoded, r#"["one","","two"]"#);
        let decoded: Text = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, t);
    }

    #[test]
    fn rejects_lines_containing_a_separator() {
        let err = serde_json::from_str::<Text>(r#"["ok","ba\nd"]"#).unwrap_err();
        assert!(err.to_string().contains("separator"));
    }
}
