//! Byte escaping for C++ string and character literals.
//!
//! Every byte maps to the shortest spelling that is valid inside the literal
//! it is written into. The quote that delimits the literal is escaped, the
//! other quote character is left alone.

use std::fmt;

/// Which kind of literal a byte is being written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeContext {
    /// Inside `"..."`
    String,
    /// Inside `'...'`
    Char,
}

/// Spelling of one escaped byte, at most four characters (`\xHH`)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Escaped {
    buf: [u8; 4],
    len: u8,
}

impl Escaped {
    fn raw(byte: u8) -> Self {
        Self {
            buf: [byte, 0, 0, 0],
            len: 1,
        }
    }

    fn pair(c: u8) -> Self {
        Self {
            buf: [b'\\', c, 0, 0],
            len: 2,
        }
    }

    fn hex(byte: u8) -> Self {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        Self {
            buf: [
                b'\\',
                b'x',
                DIGITS[(byte >> 4) as usize],
                DIGITS[(byte & 0x0f) as usize],
            ],
            len: 4,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    /// Escapes only ever contain ASCII
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Number of characters in the spelling
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_hex_escape(&self) -> bool {
        self.len == 4
    }

    /// True for an unescaped hexadecimal digit, which would extend a
    /// preceding `\xHH` escape if written right after it
    pub fn is_raw_hex_digit(&self) -> bool {
        self.len == 1 && self.buf[0].is_ascii_hexdigit()
    }
}

impl fmt::Debug for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Escaped({:?})", self.as_str())
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Escape one byte for the given literal context
pub fn escape_byte(byte: u8, context: EscapeContext) -> Escaped {
    match byte {
        b'\t' => Escaped::pair(b't'),
        b'\n' => Escaped::pair(b'n'),
        b'\r' => Escaped::pair(b'r'),
        b'"' if context == EscapeContext::String => Escaped::pair(b'"'),
        b'\'' if context == EscapeContext::Char => Escaped::pair(b'\''),
        b'\\' => Escaped::pair(b'\\'),
        b if b < 32 || b > 127 => Escaped::hex(b),
        b => Escaped::raw(b),
    }
}

/// Inverse of [`escape_byte`] for a single complete spelling.
///
/// Returns `None` when the spelling is not one `escape_byte` could have
/// produced in this context.
pub fn unescape(spelling: &str, context: EscapeContext) -> Option<u8> {
    let bytes = spelling.as_bytes();
    match bytes {
        [b'\\', b't'] => Some(b'\t'),
        [b'\\', b'n'] => Some(b'\n'),
        [b'\\', b'r'] => Some(b'\r'),
        [b'\\', b'"'] if context == EscapeContext::String => Some(b'"'),
        [b'\\', b'\''] if context == EscapeContext::Char => Some(b'\''),
        [b'\\', b'\\'] => Some(b'\\'),
        [b'\\', b'x', hi, lo] => {
            let value = (hex_value(*hi)? << 4) | hex_value(*lo)?;
            (value < 32 || value > 127).then_some(value)
        }
        [b'\\'] => None,
        [b'"'] if context == EscapeContext::String => None,
        [b'\''] if context == EscapeContext::Char => None,
        [b] if (32..=127).contains(b) => Some(*b),
        _ => None,
    }
}

/// Value of one hexadecimal digit
pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
