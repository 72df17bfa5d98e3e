use super::{IterStep, IteratorObject};
use crate::value::{is_high_surrogate, is_low_surrogate, JsString, Value};
use crate::IterationError;

/// End (exclusive) of the code point starting at `start`.
///
/// A high surrogate directly followed by a low surrogate spans two units;
/// every other unit, unpaired surrogates included, stands alone. A `start`
/// at or past the end spans one unit. Never fails.
pub fn code_point_end(units: &[u16], start: usize) -> usize {
    let paired = units.get(start).map_or(false, |&unit| is_high_surrogate(unit))
        && units.get(start + 1).map_or(false, |&next| is_low_surrogate(next));
    if paired {
        start + 2
    } else {
        start + 1
    }
}

/// Restartable code-point segmentation of a [`JsString`].
#[derive(Debug, Clone)]
pub struct CodePoints {
    string: JsString,
    position: usize,
}

impl CodePoints {
    /// Segment `string` from the start.
    pub fn new(string: JsString) -> Self {
        Self {
            string,
            position: 0,
        }
    }
}

impl Iterator for CodePoints {
    type Item = JsString;

    fn next(&mut self) -> Option<JsString> {
        if self.position >= self.string.len() {
            return None;
        }
        let start = self.position;
        let end = code_point_end(self.string.units(), start);
        self.position = end;
        Some(self.string.slice(start, end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.string.len() - self.position;
        ((remaining + 1) / 2, Some(remaining))
    }
}

impl JsString {
    /// Code points of this string.
    pub fn code_points(&self) -> CodePoints {
        CodePoints::new(self.clone())
    }
}

/// Iterator over the code points of a string primitive or boxed string.
#[derive(Debug)]
pub struct StringIterator {
    code_points: CodePoints,
}

impl StringIterator {
    /// Iterate `string`.
    pub fn new(string: JsString) -> Self {
        Self {
            code_points: CodePoints::new(string),
        }
    }
}

impl IteratorObject for StringIterator {
    fn next(&mut self) -> Result<IterStep, IterationError> {
        Ok(match self.code_points.next() {
            Some(code_point) => IterStep::yielded(Value::String(code_point)),
            None => IterStep::done(),
        })
    }

    fn kind(&self) -> &'static str {
        "String Iterator"
    }
}
