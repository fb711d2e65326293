use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type name outside the supported set, or a type the instruction cannot operate on.
    UnsupportedType(String),
    StackUnderflow,
    DivisionByZero,
    /// A program record that cannot be turned into an instruction.
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[inline]
    pub fn unsupported(ty: impl Into<String>) -> Self { Error::UnsupportedType(ty.into()) }
    #[inline]
    pub fn malformed(msg: impl Into<String>) -> Self { Error::Malformed(msg.into()) }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnsupportedType(ty) => write!(f, "{}: {}", UNSUPPORTED_TYPE, ty),
            Error::StackUnderflow => f.write_str(STACK_UNDERFLOW),
            Error::DivisionByZero => f.write_str(DIVIDE_BY_ZERO),
            Error::Malformed(msg) => write!(f, "{}: {}", MALFORMED_INSTRUCTION, msg),
        }
    }
}

impl std::error::Error for Error {}

pub const UNSUPPORTED_TYPE: &str = "unsupported value type";
pub const STACK_UNDERFLOW: &str = "stack underflow";
pub const DIVIDE_BY_ZERO: &str = "division by zero";
pub const MALFORMED_INSTRUCTION: &str = "malformed instruction";

// Decoding details carried by `Error::Malformed`
pub const UNKNOWN_INSTRUCTION: &str = "unknown instruction";
pub const MISSING_TYPE: &str = "missing value type";
pub const MISSING_VALUE: &str = "missing value";
pub const INVALID_VALUE: &str = "value is not a number";
