use std::fmt;
use std::rc::Rc;

/// Immutable sequence of UTF-16 code units.
///
/// Unlike `String`, this may hold unpaired surrogates, which is what the
/// code-point iterator has to tolerate.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsString {
    units: Rc<[u16]>,
}

impl JsString {
    /// Build from raw code units.
    pub fn from_units(units: impl Into<Rc<[u16]>>) -> Self {
        Self {
            units: units.into(),
        }
    }

    /// The empty string.
    pub fn empty() -> Self {
        Self::from_units(Vec::new())
    }

    /// Raw code units.
    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Length in code units (not code points).
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the string has no code units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Copy out the code units in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> JsString {
        Self::from_units(&self.units[start..end])
    }

    /// Decode to a Rust string, replacing unpaired surrogates with U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Write the string quoted with `quote`, escaping control characters and
    /// lone surrogates.
    pub(crate) fn write_quoted(&self, f: &mut fmt::Formatter<'_>, quote: char) -> fmt::Result {
        write!(f, "{quote}")?;
        for decoded in char::decode_utf16(self.units.iter().copied()) {
            match decoded {
                Ok(c) if c == quote || c == '\\' => write!(f, "\\{c}")?,
                Ok('\n') => f.write_str("\\n")?,
                Ok('\r') => f.write_str("\\r")?,
                Ok('\t') => f.write_str("\\t")?,
                Ok(c) if c.is_control() => write!(f, "\\x{:02X}", c as u32)?,
                Ok(c) => write!(f, "{c}")?,
                Err(lone) => write!(f, "\\u{:04X}", lone.unpaired_surrogate())?,
            }
        }
        write!(f, "{quote}")
    }
}

/// Whether `unit` is a leading (high) surrogate.
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Whether `unit` is a trailing (low) surrogate.
pub fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        Self::from_units(s.encode_utf16().collect::<Vec<_>>())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Vec<u16>> for JsString {
    fn from(units: Vec<u16>) -> Self {
        Self::from_units(units)
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_quoted(f, '"')
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
