//! Command registration schema.
//!
//! These types serialize to the JSON shape the platform expects in a bulk
//! overwrite request. Sub-commands and sub-command groups are themselves
//! options (of type `1` and `2`), which is how the three-level hierarchy
//! command → group → sub-command is expressed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::option_type::OptionType;

/// The kind of an application command. Only chat-input commands are built from
/// patterns; the other kinds exist so that command listings round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CommandType {
    #[default]
    ChatInput,
    User,
    Message,
}

impl From<CommandType> for u8 {
    fn from(kind: CommandType) -> Self {
        match kind {
            CommandType::ChatInput => 1,
            CommandType::User => 2,
            CommandType::Message => 3,
        }
    }
}

impl TryFrom<u8> for CommandType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::ChatInput),
            2 => Ok(Self::User),
            3 => Ok(Self::Message),
            other => Err(format!("unsupported command type: {other}")),
        }
    }
}

/// A top-level application command definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommand {
    /// Assigned by the platform once published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: CommandType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl ApplicationCommand {
    /// Creates a chat-input command whose description is its own name.
    pub fn chat_input(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: None,
            application_id: None,
            guild_id: None,
            description: name.clone(),
            name,
            kind: CommandType::ChatInput,
            options: Vec::new(),
        }
    }

    /// Returns `true` if this command branches into sub-commands or groups.
    pub fn has_nesting(&self) -> bool {
        self.options.iter().any(|o| o.kind.is_nesting())
    }

    /// Finds a direct child option by name and type.
    pub fn find_option(&self, name: &str, kind: OptionType) -> Option<&CommandOption> {
        self.options
            .iter()
            .find(|o| o.name == name && o.kind == kind)
    }
}

/// A command option: a typed value, a sub-command, or a sub-command group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OptionType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    fn named(name: impl Into<String>, kind: OptionType) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            kind,
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Creates an empty sub-command node.
    pub fn sub_command(name: impl Into<String>) -> Self {
        Self::named(name, OptionType::SubCommand)
    }

    /// Creates an empty sub-command group node.
    pub fn group(name: impl Into<String>) -> Self {
        Self::named(name, OptionType::SubCommandGroup)
    }

    /// Creates a value option.
    pub fn value(
        name: impl Into<String>,
        kind: OptionType,
        required: bool,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            required,
            choices,
            ..Self::named(name, kind)
        }
    }

    /// Finds a nested option by name and type.
    pub fn find_option(&self, name: &str, kind: OptionType) -> Option<&CommandOption> {
        self.options
            .iter()
            .find(|o| o.name == name && o.kind == kind)
    }
}

/// One entry of an option's choice set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: ChoiceValue,
}

/// A choice value; its variant always matches the owning option's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Integer(i64),
    String(String),
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serializes_platform_shape() {
        let mut cmd = ApplicationCommand::chat_input("hi");
        cmd.options.push(CommandOption::value(
            "mood",
            OptionType::String,
            true,
            vec![Choice {
                name: "happy".into(),
                value: ChoiceValue::String("happy".into()),
            }],
        ));

        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "hi",
                "description": "hi",
                "type": 1,
                "options": [{
                    "name": "mood",
                    "description": "mood",
                    "type": 3,
                    "required": true,
                    "choices": [{ "name": "happy", "value": "happy" }]
                }]
            })
        );
    }

    #[test]
    fn test_optional_flag_omitted_when_false() {
        let opt = CommandOption::value("flag", OptionType::Boolean, false, Vec::new());
        let value = serde_json::to_value(&opt).unwrap();
        assert!(value.get("required").is_none());
    }

    #[test]
    fn test_choice_value_untagged() {
        let int: ChoiceValue = serde_json::from_str("7").unwrap();
        assert_eq!(int, ChoiceValue::Integer(7));
        let text: ChoiceValue = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(text, ChoiceValue::String("7".into()));
    }

    #[test]
    fn test_has_nesting() {
        let mut cmd = ApplicationCommand::chat_input("math");
        assert!(!cmd.has_nesting());
        cmd.options.push(CommandOption::sub_command("add"));
        assert!(cmd.has_nesting());
        assert!(cmd.find_option("add", OptionType::SubCommand).is_some());
        assert!(cmd.find_option("add", OptionType::SubCommandGroup).is_none());
    }
}
