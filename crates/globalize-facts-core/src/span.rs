//! Byte ranges to excise from a file's original text.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` byte range into a file's unmodified text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Sorted, disjoint set of spans.
///
/// Every offset refers to the original text, so deleting the whole set never
/// depends on the order individual deletions would have happened in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpans(Vec<TextSpan>);

impl TextSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from spans in any order. Overlapping or touching spans are merged.
    pub fn from_unsorted(mut spans: Vec<TextSpan>) -> Self {
        spans.retain(|s| !s.is_empty());
        spans.sort();

        let mut merged: Vec<TextSpan> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => {
                    last.end = last.end.max(span.end);
                }
                _ => merged.push(span),
            }
        }
        Self(merged)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextSpan> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every span from `text`, returning what is left.
    ///
    /// Builds the result in one pass from the gaps between spans. Spans must
    /// lie on `char` boundaries; ends past the text are clamped.
    pub fn delete_from(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in &self.0 {
            let start = span.start.min(text.len());
            let end = span.end.min(text.len());
            if start > cursor {
                out.push_str(&text[cursor..start]);
            }
            cursor = cursor.max(end);
        }
        if cursor < text.len() {
            out.push_str(&text[cursor..]);
        }
        out
    }
}

impl<'a> IntoIterator for &'a TextSpans {
    type Item = &'a TextSpan;
    type IntoIter = std::slice::Iter<'a, TextSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
