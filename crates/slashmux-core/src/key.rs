//! Dispatch keys.
//!
//! A dispatch key names one routable command variant: `"/name"`,
//! `"/name sub"` or `"/name group sub"`. The same key is derived at
//! registration time from a pattern and at dispatch time from the live
//! interaction, so both derivations share one joining routine and must stay
//! byte-identical for any command shape the grammar accepts.

use std::borrow::Borrow;
use std::fmt;

use crate::error::PatternResult;
use crate::model::{CommandData, OptionType};
use crate::pattern::{self, ParsedPattern};

/// The canonical, option-free identifier of a command variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchKey(String);

impl DispatchKey {
    fn join<'a>(name: &str, path: impl IntoIterator<Item = &'a str>) -> Self {
        let mut key = format!("/{name}");
        for segment in path {
            key.push(' ');
            key.push_str(segment);
        }
        Self(key)
    }

    /// Derives the key of a parsed pattern.
    pub fn from_pattern(parsed: &ParsedPattern) -> Self {
        Self::join(&parsed.name, parsed.path.iter().map(String::as_str))
    }

    /// Derives the key of an incoming command invocation.
    ///
    /// Only the first top-level option is inspected: the platform sends exactly
    /// one sub-command or group entry when the command branches, and plain
    /// value options otherwise.
    pub fn from_interaction(data: &CommandData) -> Self {
        let path: Vec<&str> = match data.options.first() {
            Some(group) if group.kind == OptionType::SubCommandGroup => {
                std::iter::once(group.name.as_str())
                    .chain(group.options.first().map(|sub| sub.name.as_str()))
                    .collect()
            }
            Some(sub) if sub.kind == OptionType::SubCommand => vec![sub.name.as_str()],
            _ => Vec::new(),
        };
        Self::join(&data.name, path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the command name without the leading slash.
    pub fn command_name(&self) -> &str {
        let rest = &self.0[1..];
        rest.split(' ').next().unwrap_or(rest)
    }
}

/// Parses `pattern` and returns its dispatch key, discarding option details.
pub fn dispatch_key(pattern: &str) -> PatternResult<DispatchKey> {
    pattern::parse(pattern).map(|parsed| parsed.key())
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DispatchKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DispatchKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<DispatchKey> for String {
    fn from(key: DispatchKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommandDataOption;

    #[test]
    fn test_key_strips_options_and_whitespace() {
        let key = dispatch_key("  /math   add  num1:integer num2:integer<a=1>").unwrap();
        assert_eq!(key.as_str(), "/math add");
        assert_eq!(key.command_name(), "math");
    }

    #[test]
    fn test_options_and_choices_do_not_change_key() {
        assert_eq!(
            dispatch_key("/hi mood:string<happy,sad>").unwrap(),
            dispatch_key("/hi other?:integer").unwrap()
        );
    }

    #[test]
    fn test_key_from_plain_interaction() {
        let data = CommandData::new(
            "hi",
            vec![CommandDataOption::value("happy", OptionType::String, "happy")],
        );
        assert_eq!(DispatchKey::from_interaction(&data).as_str(), "/hi");
    }

    #[test]
    fn test_key_from_group_interaction() {
        let data = CommandData::new(
            "echo",
            vec![CommandDataOption::group(
                "two",
                CommandDataOption::sub_command("layers", Vec::new()),
            )],
        );
        let key = DispatchKey::from_interaction(&data);
        assert_eq!(key.as_str(), "/echo two layers");
        assert_eq!(key.command_name(), "echo");
    }

    #[test]
    fn test_key_from_group_without_sub_command() {
        let mut group = CommandDataOption::group("g", CommandDataOption::sub_command("s", Vec::new()));
        group.options.clear();
        let data = CommandData::new("cmd", vec![group]);
        assert_eq!(DispatchKey::from_interaction(&data).as_str(), "/cmd g");
    }

    #[test]
    fn test_borrow_as_str_for_lookup() {
        let mut table = std::collections::HashMap::new();
        table.insert(dispatch_key("/ping").unwrap(), 1);
        assert_eq!(table.get("/ping"), Some(&1));
    }
}
