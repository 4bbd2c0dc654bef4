use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of digits in a claim code.
pub const CODE_LEN: usize = 6;

/// Size of the code space (`000000` through `999999`).
pub const CODE_SPACE: u32 = 1_000_000;

/// Six-digit numeric claim code.
///
/// Codes are what a participant keeps to claim a result later, so they are
/// fixed width with leading zeros preserved: `000042` and `42` are not the
/// same code, and only the former is valid.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(String);

impl Code {
    /// Parse a code, accepting only exactly six ASCII digits.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.len() == CODE_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(TypeError::InvalidCode(s.to_string()))
        }
    }

    /// Build the code for a position in the code space.
    ///
    /// Values outside the space wrap around, so any `u32` maps to a valid code.
    pub fn from_index(index: u32) -> Self {
        Self(format!("{:06}", index % CODE_SPACE))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Code {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Code {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.0
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
