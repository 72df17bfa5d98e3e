//! Literal syntax for building values from text.
//!
//! Used by the command-line tool. The syntax borrows from the language the
//! value model describes:
//!
//! | literal | value |
//! |---------|-------|
//! | `undefined`, `null`, `true`, `false` | primitives |
//! | `42`, `-0`, `1.5e3`, `0xff`, `NaN`, `Infinity` | numbers |
//! | `42n` | big integer |
//! | `'text'`, `"a\u{1F4A9}z"`, `'\uD83D'` | strings (lone surrogates allowed) |
//! | `[1, , 3]` | array, holes allowed |
//! | `{ a: 1, 'b': 2 }` | plain object |
//! | `/a/g` | regular expression |
//! | `function`, `function name` | function |
//! | `Object(v)` | boxed primitive |
//! | `Map([[k, v], ...])`, `Set([v, ...])` | collections |
//! | `arguments(a, b)`, `sloppyArguments(a, b)` | arguments objects |
//! | `Symbol('d')`, `Symbol.iterator` | symbols |

mod parser;

use thiserror::Error;

use crate::environment::Features;
use crate::value::Value;

/// Errors produced while parsing a literal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LiteralError {
    /// Input ended in the middle of a literal.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A character that cannot start or continue the current literal.
    #[error("unexpected character '{found}' at offset {offset}")]
    Unexpected {
        /// Offending character
        found: char,
        /// Byte offset into the input
        offset: usize,
    },

    /// Malformed number.
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    /// Malformed escape sequence in a string.
    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),

    /// Identifier that names no known literal or constructor.
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    /// Big integer literal in an environment without big integers.
    #[error("big integer literals are not supported in this environment")]
    BigIntUnsupported,

    /// Constructor called with arguments of the wrong shape.
    #[error("invalid argument to {constructor}: {reason}")]
    InvalidArgument {
        /// Constructor being called
        constructor: &'static str,
        /// What was wrong
        reason: String,
    },

    /// Nesting deeper than the parser accepts.
    #[error("literal nested too deeply at offset {0}")]
    TooDeep(usize),

    /// Input continues after a complete literal.
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
}

/// Parse a single literal under the given features.
pub fn parse(input: &str, features: Features) -> Result<Value, LiteralError> {
    parser::Parser::new(input, features).parse_complete()
}

/// Parse a single literal with every feature enabled.
pub fn parse_default(input: &str) -> Result<Value, LiteralError> {
    parse(input, Features::default())
}
