/// Byte class lookup table, built at compile time.
#[derive(Clone, Copy)]
pub struct CharFilter {
    table: [bool; 256],
}

impl CharFilter {
    pub const fn empty() -> CharFilter {
        CharFilter {
            table: [false; 256],
        }
    }

    pub const fn with_range(mut self, from: u8, to: u8) -> CharFilter {
        let mut c = from as usize;
        while c <= to as usize {
            self.table[c] = true;
            c += 1;
        }
        self
    }

    pub const fn with_bytes(mut self, bytes: &[u8]) -> CharFilter {
        let mut i = 0;
        while i < bytes.len() {
            self.table[bytes[i] as usize] = true;
            i += 1;
        }
        self
    }

    #[inline]
    pub fn has(&self, c: u8) -> bool {
        self.table[c as usize]
    }
}

// ASCII only. Non-ASCII identifier bytes are accepted by the lexer without classification.
pub const ID_START_CHARSTR: &'static [u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";

pub const DIGIT: CharFilter = CharFilter::empty().with_range(b'0', b'9');

// Numeric separators are validated when the literal is normalised.
pub const DIGIT_OR_SEPARATOR: CharFilter = DIGIT.with_bytes(b"_");

pub const DIGIT_BIN: CharFilter = CharFilter::empty().with_bytes(b"01_");

pub const DIGIT_OCT: CharFilter = CharFilter::empty()
    .with_range(b'0', b'7')
    .with_bytes(b"_");

pub const DIGIT_HEX: CharFilter = DIGIT_OR_SEPARATOR
    .with_range(b'a', b'f')
    .with_range(b'A', b'F');

pub const ID_START: CharFilter = CharFilter::empty().with_bytes(ID_START_CHARSTR);

// Non-ASCII bytes are checked separately, as any UTF-8 sequence that isn't whitespace continues an
// identifier.
pub const ID_CONTINUE: CharFilter = ID_START.with_range(b'0', b'9');

// Tab, vertical tab, form feed and space. Line terminators are handled separately, as they matter
// for ASI.
pub const WHITESPACE: CharFilter = CharFilter::empty().with_bytes(b"\x09\x0b\x0c\x20");

/// Length of the Unicode whitespace or line terminator sequence at the start of `s`, and whether it
/// is a line terminator. Only the characters minifiers see in practice are recognised: NBSP, BOM,
/// U+2028 and U+2029.
pub fn unicode_space(s: &[u8]) -> Option<(usize, bool)> {
    match s {
        [0xC2, 0xA0, ..] => Some((2, false)),
        [0xEF, 0xBB, 0xBF, ..] => Some((3, false)),
        [0xE2, 0x80, 0xA8, ..] | [0xE2, 0x80, 0xA9, ..] => Some((3, true)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{DIGIT_HEX, ID_CONTINUE, ID_START, WHITESPACE};

    #[test]
    fn test_char_filters() {
        assert!(DIGIT_HEX.has(b'F') && DIGIT_HEX.has(b'_') && !DIGIT_HEX.has(b'g'));
        assert!(ID_START.has(b'$') && !ID_START.has(b'1'));
        assert!(ID_CONTINUE.has(b'1') && !ID_CONTINUE.has(b'-'));
        assert!(WHITESPACE.has(b'\t') && !WHITESPACE.has(b'\n'));
    }
}
