//! Inspection-style formatting for diagnostics and the CLI.

use std::fmt;

use super::{Object, ObjectKind, PropertyKey, Value};

/// Nesting depth past which objects print as `[Kind]`.
const MAX_DEPTH: usize = 3;

/// Format a number the way the language prints it: integral values without a
/// fraction, `-0` kept distinct.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        let text = if n.is_sign_negative() { "-0" } else { "0" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Inspector::default().write_value(f, self)
    }
}

#[derive(Default)]
struct Inspector {
    /// Objects currently being printed, to catch cycles
    stack: Vec<usize>,
}

impl Inspector {
    fn write_value(&mut self, f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        match value {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::BigInt(n) => write!(f, "{n}n"),
            Value::String(s) => s.write_quoted(f, '\''),
            Value::Symbol(symbol) => write!(f, "{symbol:?}"),
            Value::Object(object) => self.write_object(f, object),
        }
    }

    fn write_object(&mut self, f: &mut fmt::Formatter<'_>, object: &Object) -> fmt::Result {
        if self.stack.contains(&object.addr()) {
            return f.write_str("[Circular]");
        }
        let Some(kind) = object.try_kind() else {
            return f.write_str("[Object]");
        };
        if self.stack.len() >= MAX_DEPTH {
            return write!(f, "[{}]", kind.class_name());
        }

        self.stack.push(object.addr());
        let result = self.write_kind(f, object, &kind);
        self.stack.pop();
        result
    }

    fn write_kind(
        &mut self,
        f: &mut fmt::Formatter<'_>,
        object: &Object,
        kind: &ObjectKind,
    ) -> fmt::Result {
        match kind {
            ObjectKind::Ordinary => self.write_properties(f, object, "{", "}"),
            ObjectKind::Array(array) => {
                f.write_str("[")?;
                let mut holes = 0;
                let mut first = true;
                for slot in array.slots() {
                    match slot {
                        None => holes += 1,
                        Some(value) => {
                            self.flush_holes(f, &mut holes, &mut first)?;
                            separator(f, &mut first)?;
                            self.write_value(f, value)?;
                        }
                    }
                }
                self.flush_holes(f, &mut holes, &mut first)?;
                f.write_str("]")
            }
            ObjectKind::Arguments(args) => {
                f.write_str("[Arguments] [")?;
                let mut first = true;
                for slot in args.values.slots() {
                    separator(f, &mut first)?;
                    match slot {
                        Some(value) => self.write_value(f, value)?,
                        None => f.write_str("undefined")?,
                    }
                }
                f.write_str("]")
            }
            ObjectKind::Function(function) if function.name().is_empty() => {
                f.write_str("[Function (anonymous)]")
            }
            ObjectKind::Function(function) => write!(f, "[Function: {}]", function.name()),
            ObjectKind::RegExp(re) => write!(f, "/{}/{}", re.source, re.flags),
            ObjectKind::Primitive(inner) => {
                write!(f, "[{}: ", kind.class_name())?;
                self.write_value(f, inner)?;
                f.write_str("]")
            }
            ObjectKind::Map(map) => {
                write!(f, "Map ({}) {{", map.len())?;
                let mut first = true;
                for (key, value) in map.iter() {
                    separator(f, &mut first)?;
                    self.write_value(f, key)?;
                    f.write_str(" => ")?;
                    self.write_value(f, value)?;
                }
                f.write_str("}")
            }
            ObjectKind::Set(set) => {
                write!(f, "Set ({}) {{", set.len())?;
                let mut first = true;
                for member in set.iter() {
                    separator(f, &mut first)?;
                    self.write_value(f, member)?;
                }
                f.write_str("}")
            }
            ObjectKind::Iterator(iterator) => write!(f, "[object {}]", iterator.kind()),
        }
    }

    fn write_properties(
        &mut self,
        f: &mut fmt::Formatter<'_>,
        object: &Object,
        open: &str,
        close: &str,
    ) -> fmt::Result {
        let keys = object.property_keys();
        if keys.is_empty() {
            return write!(f, "{open}{close}");
        }
        write!(f, "{open} ")?;
        let mut first = true;
        for key in keys {
            separator(f, &mut first)?;
            match &key {
                PropertyKey::String(s) => write!(f, "{s}")?,
                PropertyKey::Symbol(symbol) => write!(f, "[{symbol:?}]")?,
            }
            f.write_str(": ")?;
            let value = object.get(&key).unwrap_or(Value::Undefined);
            self.write_value(f, &value)?;
        }
        write!(f, " {close}")
    }

    fn flush_holes(
        &mut self,
        f: &mut fmt::Formatter<'_>,
        holes: &mut usize,
        first: &mut bool,
    ) -> fmt::Result {
        if *holes == 0 {
            return Ok(());
        }
        separator(f, first)?;
        let plural = if *holes == 1 { "" } else { "s" };
        write!(f, "<{holes} empty item{plural}>")?;
        *holes = 0;
        Ok(())
    }
}

fn separator(f: &mut fmt::Formatter<'_>, first: &mut bool) -> fmt::Result {
    if *first {
        *first = false;
        Ok(())
    } else {
        f.write_str(", ")
    }
}
