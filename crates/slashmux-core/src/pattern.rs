//! The pattern grammar.
//!
//! A pattern declares the shape of one routable command in a single line:
//!
//! ```text
//! /<name> [<subcmd>] [<group> <subcmd>] [<opt> ...]
//!
//! <opt>  := <optName>[?]:<type>[<choice,choice=value,...>]
//! <type> := string | integer | boolean | user | channel | role | mentionable
//! ```
//!
//! Tokens are whitespace separated. Plain tokens after the command name form
//! the sub-command path (at most two: a group and a sub-command); tokens
//! containing `:` are options and must come last. A trailing `?` on an option
//! name makes it optional. A choice without `=value` uses its name as value.
//!
//! ```rust
//! use slashmux_core::pattern::parse;
//!
//! let parsed = parse("/math add num1:integer num2?:integer").unwrap();
//! assert_eq!(parsed.name, "math");
//! assert_eq!(parsed.path, ["add"]);
//! assert!(parsed.options[0].required);
//! assert!(!parsed.options[1].required);
//! ```

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PatternError, PatternResult};
use crate::key::DispatchKey;
use crate::model::{Choice, ChoiceValue, CommandOption, OptionType};

/// Maximum number of plain path segments below the command name.
pub const MAX_DEPTH: usize = 2;

const MAX_CHOICE_NAME_LEN: usize = 100;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("name pattern is a valid regex")
});

/// A parsed option token.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub name: String,
    pub kind: OptionType,
    pub required: bool,
    /// Choices in declaration order; empty when the option is free-form.
    pub choices: Vec<Choice>,
}

impl OptionSpec {
    /// Converts this descriptor into a registration schema option.
    pub fn to_command_option(&self) -> CommandOption {
        CommandOption::value(&self.name, self.kind, self.required, self.choices.clone())
    }
}

/// The result of parsing a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPattern {
    /// Command name without the leading slash.
    pub name: String,
    /// Sub-command path: empty, `[sub]` or `[group, sub]`.
    pub path: Vec<String>,
    pub options: Vec<OptionSpec>,
}

impl ParsedPattern {
    /// Returns the dispatch key of this pattern.
    pub fn key(&self) -> DispatchKey {
        DispatchKey::from_pattern(self)
    }
}

impl FromStr for ParsedPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn normalize(pattern: &str) -> String {
    pattern.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Checks a command, sub-command or option name.
pub fn validate_name(name: &str) -> PatternResult<()> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(PatternError::invalid_name(name))
    }
}

/// Parses a pattern string.
pub fn parse(pattern: &str) -> PatternResult<ParsedPattern> {
    let normalized = normalize(pattern);
    let mut tokens = normalized.split(' ').filter(|t| !t.is_empty());

    let Some(head) = tokens.next() else {
        return Err(PatternError::malformed(pattern, "pattern must not be empty"));
    };
    let Some(name) = head.strip_prefix('/') else {
        return Err(PatternError::malformed(&normalized, "pattern must start with '/'"));
    };
    validate_name(name)?;

    let mut path: Vec<String> = Vec::new();
    let mut options: Vec<OptionSpec> = Vec::new();

    for token in tokens {
        if token.contains(':') {
            let option = parse_option(&normalized, token)?;
            if options.iter().any(|o| o.name == option.name) {
                return Err(PatternError::malformed(
                    &normalized,
                    format!("duplicate option `{}`", option.name),
                ));
            }
            options.push(option);
            continue;
        }

        if !options.is_empty() {
            return Err(PatternError::malformed(
                &normalized,
                "options must trail the sub-command path",
            ));
        }

        validate_name(token)?;
        path.push(token.to_string());

        if path.len() > MAX_DEPTH {
            return Err(PatternError::NestingTooDeep {
                pattern: normalized.clone(),
            });
        }
    }

    Ok(ParsedPattern {
        name: name.to_string(),
        path,
        options,
    })
}

fn parse_option(pattern: &str, token: &str) -> PatternResult<OptionSpec> {
    let (raw_name, type_spec) = token
        .split_once(':')
        .ok_or_else(|| PatternError::malformed(pattern, format!("invalid option `{token}`")))?;

    let (name, required) = match raw_name.strip_suffix('?') {
        Some(stripped) => (stripped, false),
        None => (raw_name, true),
    };
    validate_name(name)?;

    let (type_name, choice_list) = match type_spec.split_once('<') {
        Some((ty, rest)) => {
            let body = rest.strip_suffix('>').ok_or_else(|| {
                PatternError::malformed(
                    pattern,
                    format!("unterminated choice list for option `{name}`"),
                )
            })?;
            (ty, Some(body))
        }
        None => (type_spec, None),
    };

    let kind: OptionType = type_name
        .parse()
        .map_err(|()| PatternError::UnknownOptionType {
            option: name.to_string(),
            ty: type_name.to_string(),
        })?;

    let choices = match choice_list {
        Some(body) => parse_choices(pattern, name, kind, body)?,
        None => Vec::new(),
    };

    Ok(OptionSpec {
        name: name.to_string(),
        kind,
        required,
        choices,
    })
}

fn parse_choices(
    pattern: &str,
    option: &str,
    kind: OptionType,
    body: &str,
) -> PatternResult<Vec<Choice>> {
    if !kind.supports_choices() {
        return Err(PatternError::UnsupportedChoiceType {
            option: option.to_string(),
            ty: kind,
        });
    }
    if body.is_empty() {
        return Err(PatternError::malformed(
            pattern,
            format!("empty choice list for option `{option}`"),
        ));
    }

    let mut choices: Vec<Choice> = Vec::new();
    for entry in body.split(',') {
        let (name, raw_value) = match entry.split_once('=') {
            Some((name, value)) => (name, value),
            None => (entry, entry),
        };

        let name_len = name.chars().count();
        if name_len == 0 || name_len > MAX_CHOICE_NAME_LEN || raw_value.is_empty() {
            return Err(PatternError::malformed(
                pattern,
                format!("invalid choice `{entry}` for option `{option}`"),
            ));
        }
        if choices.iter().any(|c| c.name == name) {
            return Err(PatternError::malformed(
                pattern,
                format!("duplicate choice `{name}` for option `{option}`"),
            ));
        }

        let value = match kind {
            OptionType::Integer => {
                raw_value
                    .parse::<i64>()
                    .map(ChoiceValue::Integer)
                    .map_err(|_| PatternError::InvalidChoiceValue {
                        option: option.to_string(),
                        ty: kind,
                        choice: entry.to_string(),
                    })?
            }
            _ => ChoiceValue::String(raw_value.to_string()),
        };

        choices.push(Choice {
            name: name.to_string(),
            value,
        });
    }

    Ok(choices)
}
