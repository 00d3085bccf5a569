use std::cmp::{max, min};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign};
use std::rc::Rc;

/// The input text, shared by every range into it.
#[derive(Clone)]
pub struct Source(Rc<str>);

impl Source {
    pub fn new<T: Into<String>>(code: T) -> Source {
        Source(Rc::from(code.into()))
    }

    pub fn code(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the 1-based line and 0-based byte column of `pos`. `\r\n`, `\r`, `\n`, U+2028 and
    /// U+2029 each end a line.
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let code = &self.code()[..min(pos, self.code().len())];
        let mut line = 1;
        let mut line_start = 0;
        let mut i = 0;
        while i < code.len() {
            let terminator_len = match &code[i..] {
                [b'\r', b'\n', ..] => 2,
                [b'\r' | b'\n', ..] => 1,
                [0xE2, 0x80, 0xA8 | 0xA9, ..] => 3,
                _ => 0,
            };
            if terminator_len == 0 {
                i += 1;
                continue;
            };
            i += terminator_len;
            line += 1;
            line_start = i;
        }
        (line, code.len() - line_start)
    }
}

/// A slice of a [`Source`]. Compared and hashed by its text, so the same name at two positions is
/// the same key.
///
/// Names produced by the compressor or the renamer have no position in the input; they are backed by
/// their own anonymous source.
#[derive(Clone)]
pub struct SourceRange {
    pub source: Source,
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn anonymous<T: Into<String>>(code: T) -> SourceRange {
        let source = Source::new(code);
        let end = source.code().len();
        SourceRange {
            source,
            start: 0,
            end,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.source.code()[self.start..self.end]
    }

    pub fn as_str(&self) -> &str {
        // Ranges never split a UTF-8 sequence.
        &self.source.0[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Grows this range to also cover `other`.
    pub fn extend(&mut self, other: &SourceRange) {
        self.start = min(self.start, other.start);
        self.end = max(self.end, other.end);
    }

    /// The empty range at the start of this one.
    pub fn at_start(&self) -> SourceRange {
        SourceRange {
            source: self.source.clone(),
            start: self.start,
            end: self.start,
        }
    }
}

impl Add for &SourceRange {
    type Output = SourceRange;

    fn add(self, rhs: Self) -> SourceRange {
        let mut sum = self.clone();
        sum.extend(rhs);
        sum
    }
}

impl AddAssign for SourceRange {
    fn add_assign(&mut self, rhs: Self) {
        self.extend(&rhs);
    }
}

impl Debug for SourceRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}..{}", self.as_str(), self.start, self.end)
    }
}

impl PartialEq for SourceRange {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for SourceRange {}

impl PartialEq<str> for SourceRange {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl Hash for SourceRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

#[cfg(test)]
impl serde::Serialize for SourceRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
