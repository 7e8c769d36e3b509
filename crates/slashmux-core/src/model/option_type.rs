//! Application command option types.
//!
//! The platform encodes option types as small integers on the wire, while the
//! pattern DSL spells the value types out by name. [`OptionType`] carries both
//! representations: serde goes through the integer form, and the static
//! [`VALUE_TYPES`] table maps DSL names in both directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The type of an application command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum OptionType {
    SubCommand = 1,
    SubCommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
}

/// Value option types addressable from a pattern, keyed by their DSL name.
///
/// Sub-command and group types are absent: they are expressed by
/// plain path segments, never by a `name:type` token.
pub const VALUE_TYPES: [(&str, OptionType); 7] = [
    ("string", OptionType::String),
    ("integer", OptionType::Integer),
    ("boolean", OptionType::Boolean),
    ("user", OptionType::User),
    ("channel", OptionType::Channel),
    ("role", OptionType::Role),
    ("mentionable", OptionType::Mentionable),
];

impl OptionType {
    /// Returns the DSL name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SubCommand => "subcommand",
            Self::SubCommandGroup => "subcommand_group",
            _ => VALUE_TYPES
                .iter()
                .find(|(_, ty)| *ty == self)
                .map(|(name, _)| *name)
                .unwrap_or("unknown"),
        }
    }

    /// Returns `true` for the two nesting types.
    pub fn is_nesting(self) -> bool {
        matches!(self, Self::SubCommand | Self::SubCommandGroup)
    }

    /// Returns `true` if choices may be attached to options of this type.
    pub fn supports_choices(self) -> bool {
        matches!(self, Self::String | Self::Integer)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a value type from its DSL name.
///
/// Nesting types are not parseable: `"subcommand"` is an unknown option type
/// as far as the pattern grammar is concerned.
impl FromStr for OptionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VALUE_TYPES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, ty)| *ty)
            .ok_or(())
    }
}

impl From<OptionType> for u8 {
    fn from(ty: OptionType) -> Self {
        ty as u8
    }
}

impl TryFrom<u8> for OptionType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::SubCommand,
            2 => Self::SubCommandGroup,
            3 => Self::String,
            4 => Self::Integer,
            5 => Self::Boolean,
            6 => Self::User,
            7 => Self::Channel,
            8 => Self::Role,
            9 => Self::Mentionable,
            other => return Err(format!("unsupported option type: {other}")),
        })
    }
}
