use super::LiteralError;
use crate::environment::Features;
use crate::value::{JsString, Object, OrderedMap, OrderedSet, PropertyKey, SparseArray, Symbol, Value};

/// Deepest nesting of arrays, objects, calls and signs accepted.
pub(super) const MAX_DEPTH: usize = 256;

/// Recursive-descent parser over the input text; offsets are in bytes.
pub(super) struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    features: Features,
}

impl<'a> Parser<'a> {
    pub(super) fn new(input: &'a str, features: Features) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            features,
        }
    }

    /// Parse one literal and require nothing but whitespace after it.
    pub(super) fn parse_complete(mut self) -> Result<Value, LiteralError> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(LiteralError::TrailingInput(self.pos));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::Unexpected {
                found,
                offset: self.pos,
            },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        if self.depth == MAX_DEPTH {
            return Err(LiteralError::TooDeep(self.pos));
        }
        self.depth += 1;
        let value = self.parse_nested();
        self.depth -= 1;
        value
    }

    fn parse_nested(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some(quote @ ('\'' | '"')) => self.parse_string(quote).map(Value::String),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some('/') => self.parse_regexp(),
            Some('-') => {
                self.bump();
                self.skip_whitespace();
                match self.parse_value()? {
                    Value::Number(n) => Ok(Value::Number(-n)),
                    Value::BigInt(n) => Ok(Value::BigInt(-n)),
                    _ => Err(LiteralError::InvalidNumber("-".to_string())),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if is_identifier_start(c) => self.parse_identifier(),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let input = self.input;
        let start = self.pos;
        let rest = &input[start..];
        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().map_or(false, |c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            let digits = &input[digits_start..self.pos];
            let text = &input[start..self.pos];
            if self.peek() == Some('n') {
                self.bump();
                let n = i128::from_str_radix(digits, 16)
                    .map_err(|_| LiteralError::InvalidNumber(text.to_string()))?;
                return self.big_int(n);
            }
            let n = u64::from_str_radix(digits, 16)
                .map_err(|_| LiteralError::InvalidNumber(text.to_string()))?;
            return Ok(Value::Number(n as f64));
        }

        let mut integral = true;
        self.eat_digits();
        if self.peek() == Some('.') {
            integral = false;
            self.bump();
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            integral = false;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.eat_digits();
        }
        let text = &input[start..self.pos];

        if integral && self.peek() == Some('n') {
            self.bump();
            let n: i128 = text
                .parse()
                .map_err(|_| LiteralError::InvalidNumber(format!("{text}n")))?;
            return self.big_int(n);
        }
        text.parse::<f64>()
            .map(Value::Number)
            .map_err(|_| LiteralError::InvalidNumber(text.to_string()))
    }

    fn eat_digits(&mut self) {
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn big_int(&self, n: i128) -> Result<Value, LiteralError> {
        if self.features.big_int {
            Ok(Value::BigInt(n))
        } else {
            Err(LiteralError::BigIntUnsupported)
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<JsString, LiteralError> {
        self.bump();
        let mut units: Vec<u16> = Vec::new();
        loop {
            let escape_offset = self.pos;
            match self.bump() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(JsString::from_units(units)),
                Some('\\') => self.parse_escape(escape_offset, &mut units)?,
                Some(c) => {
                    let mut buf = [0u16; 2];
                    units.extend_from_slice(c.encode_utf16(&mut buf));
                }
            }
        }
    }

    fn parse_escape(&mut self, offset: usize, units: &mut Vec<u16>) -> Result<(), LiteralError> {
        let invalid = || LiteralError::InvalidEscape(offset);
        let c = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let unit = match c {
            'n' => 0x0A,
            'r' => 0x0D,
            't' => 0x09,
            'b' => 0x08,
            'f' => 0x0C,
            'v' => 0x0B,
            '0' => 0x00,
            'x' => {
                let hex = self.take_hex(2).ok_or_else(invalid)?;
                hex as u16
            }
            'u' if self.peek() == Some('{') => {
                self.bump();
                let input = self.input;
                let start = self.pos;
                while self.peek().map_or(false, |c| c.is_ascii_hexdigit()) {
                    self.bump();
                }
                let digits = &input[start..self.pos];
                if self.bump() != Some('}') {
                    return Err(invalid());
                }
                let code_point = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                return push_code_point(code_point, units).ok_or_else(invalid);
            }
            'u' => {
                let hex = self.take_hex(4).ok_or_else(invalid)?;
                hex as u16
            }
            // Line continuation
            '\n' => return Ok(()),
            other => {
                let mut buf = [0u16; 2];
                units.extend_from_slice(other.encode_utf16(&mut buf));
                return Ok(());
            }
        };
        units.push(unit);
        Ok(())
    }

    fn take_hex(&mut self, count: usize) -> Option<u32> {
        let input = self.input;
        let digits = input.get(self.pos..self.pos + count)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        self.pos += count;
        u32::from_str_radix(digits, 16).ok()
    }

    fn parse_array(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut slots = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(',') => {
                    self.bump();
                    slots.push(None);
                    continue;
                }
                _ => {}
            }
            slots.push(Some(self.parse_value()?));
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(Value::Object(Object::sparse_array(SparseArray::from_slots(slots))))
    }

    fn parse_object(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let object = Object::ordinary();
        loop {
            self.skip_whitespace();
            let key = match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(quote @ ('\'' | '"')) => self.parse_string(quote)?,
                Some(c) if is_identifier_part(c) => JsString::from(self.take_identifier()),
                _ => return Err(self.unexpected()),
            };
            self.expect(':')?;
            let value = self.parse_value()?;
            object.set_property(PropertyKey::String(key), value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(Value::Object(object))
    }

    fn parse_regexp(&mut self) -> Result<Value, LiteralError> {
        let input = self.input;
        let open = self.pos;
        self.bump();
        let start = self.pos;
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some('\\') => {
                    self.bump().ok_or(LiteralError::UnexpectedEnd)?;
                }
                Some('/') => break,
                Some(_) => {}
            }
        }
        let source = &input[start..self.pos - 1];
        if source.is_empty() {
            return Err(LiteralError::Unexpected {
                found: '/',
                offset: open,
            });
        }
        let flags_start = self.pos;
        while self.peek().map_or(false, |c| c.is_ascii_alphabetic()) {
            self.bump();
        }
        let flags = &input[flags_start..self.pos];
        Ok(Value::Object(Object::regexp(source, flags)))
    }

    fn take_identifier(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek().map_or(false, is_identifier_part) {
            self.bump();
        }
        &input[start..self.pos]
    }

    fn parse_identifier(&mut self) -> Result<Value, LiteralError> {
        let name = self.take_identifier();
        match name {
            "undefined" => Ok(Value::Undefined),
            "null" => Ok(Value::Null),
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            "NaN" => Ok(Value::Number(f64::NAN)),
            "Infinity" => Ok(Value::Number(f64::INFINITY)),
            "function" => {
                self.skip_whitespace();
                let name = match self.peek() {
                    Some(c) if is_identifier_start(c) => self.take_identifier(),
                    _ => "",
                };
                Ok(Value::Object(Object::function(name, |_, _| Ok(Value::Undefined))))
            }
            "Symbol" => self.parse_symbol(),
            "Object" => {
                let args = self.parse_args()?;
                Ok(Value::Object(match args.into_iter().next() {
                    Some(value) => value.to_object(),
                    None => Object::ordinary(),
                }))
            }
            "Map" => {
                let entries = match self.single_array_arg("Map")? {
                    Some(array) => map_entries(&array)?,
                    None => OrderedMap::new(),
                };
                Ok(Value::Object(Object::map(entries)))
            }
            "Set" => {
                let members: OrderedSet = match self.single_array_arg("Set")? {
                    Some(array) => array_items(&array).into_iter().collect(),
                    None => OrderedSet::new(),
                };
                Ok(Value::Object(Object::set(members)))
            }
            "arguments" => Ok(Value::Object(Object::arguments(self.parse_args()?, true))),
            "sloppyArguments" => Ok(Value::Object(Object::arguments(self.parse_args()?, false))),
            other => Err(LiteralError::UnknownIdentifier(other.to_string())),
        }
    }

    fn parse_symbol(&mut self) -> Result<Value, LiteralError> {
        if self.peek() == Some('.') {
            self.bump();
            return match self.take_identifier() {
                "iterator" => Ok(Value::Symbol(Symbol::iterator())),
                other => Err(LiteralError::UnknownIdentifier(format!("Symbol.{other}"))),
            };
        }
        let args = self.parse_args()?;
        match args.as_slice() {
            [] | [Value::Undefined] => Ok(Value::Symbol(Symbol::new(None))),
            [Value::String(description)] => Ok(Value::Symbol(Symbol::new(Some(
                &description.to_string_lossy(),
            )))),
            _ => Err(LiteralError::InvalidArgument {
                constructor: "Symbol",
                reason: "expected a single string description".to_string(),
            }),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Value>, LiteralError> {
        self.expect('(')?;
        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(args);
        }
        loop {
            args.push(self.parse_value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(args),
                Some(found) => {
                    return Err(LiteralError::Unexpected {
                        found,
                        offset: self.pos - found.len_utf8(),
                    })
                }
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    /// Zero arguments, or exactly one array.
    fn single_array_arg(&mut self, constructor: &'static str) -> Result<Option<Object>, LiteralError> {
        let mut args = self.parse_args()?;
        match args.len() {
            0 => Ok(None),
            1 => match args.remove(0) {
                Value::Object(object) if object.indexed_len().is_some() => Ok(Some(object)),
                other => Err(LiteralError::InvalidArgument {
                    constructor,
                    reason: format!("{other} is not an array"),
                }),
            },
            n => Err(LiteralError::InvalidArgument {
                constructor,
                reason: format!("expected at most one argument, got {n}"),
            }),
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Append `code_point` as UTF-16; surrogate code points go in as raw units.
fn push_code_point(code_point: u32, units: &mut Vec<u16>) -> Option<()> {
    if code_point <= 0xFFFF {
        units.push(code_point as u16);
        return Some(());
    }
    let c = char::from_u32(code_point)?;
    let mut buf = [0u16; 2];
    units.extend_from_slice(c.encode_utf16(&mut buf));
    Some(())
}

fn array_items(array: &Object) -> Vec<Value> {
    let len = array.indexed_len().unwrap_or(0);
    (0..len)
        .map(|index| array.indexed_get(index).unwrap_or(Value::Undefined))
        .collect()
}

fn map_entries(array: &Object) -> Result<OrderedMap, LiteralError> {
    array_items(array)
        .into_iter()
        .map(|entry| match entry.as_object() {
            Some(pair) if pair.indexed_len().is_some() => Ok((
                pair.indexed_get(0).unwrap_or(Value::Undefined),
                pair.indexed_get(1).unwrap_or(Value::Undefined),
            )),
            _ => Err(LiteralError::InvalidArgument {
                constructor: "Map",
                reason: format!("entry {entry} is not an array"),
            }),
        })
        .collect()
}
