//! Live interaction payloads.
//!
//! An [`Interaction`] is what the session delivers when a user invokes a
//! published command. Its [`CommandData`] mirrors the registered tree: the
//! first option may be a sub-command or a group wrapping one sub-command, and
//! the actual values sit at the innermost level.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::command::CommandType;
use super::option_type::OptionType;

/// The kind of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    MessageComponent,
    Autocomplete,
    ModalSubmit,
}

impl From<InteractionType> for u8 {
    fn from(kind: InteractionType) -> Self {
        match kind {
            InteractionType::Ping => 1,
            InteractionType::ApplicationCommand => 2,
            InteractionType::MessageComponent => 3,
            InteractionType::Autocomplete => 4,
            InteractionType::ModalSubmit => 5,
        }
    }
}

impl TryFrom<u8> for InteractionType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            4 => Self::Autocomplete,
            5 => Self::ModalSubmit,
            other => return Err(format!("unsupported interaction type: {other}")),
        })
    }
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
}

/// A user's membership in the guild an interaction came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// An interaction delivered by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    #[serde(default)]
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CommandData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Present for interactions inside a guild.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
    /// Present for interactions in direct messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub token: String,
}

impl Interaction {
    /// Creates an application-command interaction carrying `data`.
    pub fn command(id: impl Into<String>, data: CommandData) -> Self {
        Self {
            id: id.into(),
            application_id: String::new(),
            kind: InteractionType::ApplicationCommand,
            data: Some(data),
            guild_id: None,
            channel_id: None,
            member: None,
            user: None,
            token: String::new(),
        }
    }

    /// Returns the command data for command and autocomplete interactions.
    pub fn command_data(&self) -> Option<&CommandData> {
        match self.kind {
            InteractionType::ApplicationCommand | InteractionType::Autocomplete => {
                self.data.as_ref()
            }
            _ => None,
        }
    }

    /// Returns the invoking user, whether the interaction came from a guild or
    /// a direct message.
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }

    /// Returns the value options at the innermost level of the command.
    pub fn options(&self) -> &[CommandDataOption] {
        self.command_data().map(CommandData::values).unwrap_or(&[])
    }

    /// Finds a value option by name.
    pub fn option(&self, name: &str) -> Option<&CommandDataOption> {
        self.options().iter().find(|o| o.name == name)
    }
}

/// Looks up the value option `name` on `interaction`, descending through any
/// sub-command or group level first.
pub fn command_option<'a>(interaction: &'a Interaction, name: &str) -> Option<&'a CommandDataOption> {
    interaction.option(name)
}

/// The command part of an interaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: CommandType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandDataOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
}

impl CommandData {
    /// Creates command data for `name` with the given top-level options.
    pub fn new(name: impl Into<String>, options: Vec<CommandDataOption>) -> Self {
        Self {
            name: name.into(),
            options,
            ..Default::default()
        }
    }

    /// Returns the value options, skipping over a sub-command or group level.
    pub fn values(&self) -> &[CommandDataOption] {
        match self.options.first() {
            Some(first) if first.kind == OptionType::SubCommandGroup => first
                .options
                .first()
                .map(|sub| sub.options.as_slice())
                .unwrap_or(&[]),
            Some(first) if first.kind == OptionType::SubCommand => &first.options,
            _ => &self.options,
        }
    }
}

/// One option as received in an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDataOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OptionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandDataOption>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub focused: bool,
}

impl CommandDataOption {
    /// Creates a sub-command entry wrapping `options`.
    pub fn sub_command(name: impl Into<String>, options: Vec<CommandDataOption>) -> Self {
        Self {
            name: name.into(),
            kind: OptionType::SubCommand,
            value: None,
            options,
            focused: false,
        }
    }

    /// Creates a group entry wrapping a single sub-command.
    pub fn group(name: impl Into<String>, sub_command: CommandDataOption) -> Self {
        Self {
            name: name.into(),
            kind: OptionType::SubCommandGroup,
            value: None,
            options: vec![sub_command],
            focused: false,
        }
    }

    /// Creates a value entry.
    pub fn value(name: impl Into<String>, kind: OptionType, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: Some(value.into()),
            options: Vec::new(),
            focused: false,
        }
    }

    /// Returns the value as an integer. Floating point payloads are accepted
    /// only when they are whole and fit in an `i64`.
    pub fn int_value(&self) -> Option<i64> {
        let value = self.value.as_ref()?;
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    pub fn string_value(&self) -> Option<&str> {
        self.value.as_ref()?.as_str()
    }

    pub fn bool_value(&self) -> Option<bool> {
        self.value.as_ref()?.as_bool()
    }

    /// Returns the id carried by user, channel, role and mentionable options.
    pub fn snowflake(&self) -> Option<&str> {
        match self.kind {
            OptionType::User | OptionType::Channel | OptionType::Role | OptionType::Mentionable => {
                self.string_value()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn math_add() -> Interaction {
        serde_json::from_value(json!({
            "id": "1",
            "application_id": "42",
            "type": 2,
            "channel_id": "c1",
            "member": { "user": { "id": "u1", "username": "ada" } },
            "data": {
                "id": "99",
                "name": "math",
                "type": 1,
                "options": [{
                    "name": "add",
                    "type": 1,
                    "options": [
                        { "name": "num1", "type": 4, "value": 2 },
                        { "name": "num2", "type": 4, "value": 3 }
                    ]
                }]
            },
            "token": "tok"
        }))
        .unwrap()
    }

    #[test]
    fn test_options_descend_into_sub_command() {
        let interaction = math_add();
        assert_eq!(interaction.options().len(), 2);
        assert_eq!(command_option(&interaction, "num1").unwrap().int_value(), Some(2));
        assert_eq!(command_option(&interaction, "num2").unwrap().int_value(), Some(3));
        assert!(command_option(&interaction, "num3").is_none());
    }

    #[test]
    fn test_int_value_rejects_lossy_floats() {
        let option = |value| CommandDataOption::value("n", OptionType::Integer, value);
        assert_eq!(option(json!(7.0)).int_value(), Some(7));
        assert_eq!(option(json!(-3)).int_value(), Some(-3));
        assert_eq!(option(json!(2.5)).int_value(), None);
        assert_eq!(option(json!(1e300)).int_value(), None);
        assert_eq!(option(json!("7")).int_value(), None);
    }

    #[test]
    fn test_options_descend_into_group() {
        let data = CommandData::new(
            "echo",
            vec![CommandDataOption::group(
                "two",
                CommandDataOption::sub_command(
                    "layers",
                    vec![CommandDataOption::value("flag", OptionType::Boolean, true)],
                ),
            )],
        );
        let interaction = Interaction::command("1", data);
        assert_eq!(interaction.option("flag").unwrap().bool_value(), Some(true));
    }

    #[test]
    fn test_top_level_options() {
        let data = CommandData::new(
            "hi",
            vec![CommandDataOption::value("happy", OptionType::String, "sad")],
        );
        let interaction = Interaction::command("1", data);
        assert_eq!(interaction.option("happy").unwrap().string_value(), Some("sad"));
    }

    #[test]
    fn test_invoker_prefers_member() {
        let interaction = math_add();
        assert_eq!(interaction.invoker().unwrap().id, "u1");

        let mut dm = interaction.clone();
        dm.member = None;
        dm.user = Some(User {
            id: "u2".into(),
            ..Default::default()
        });
        assert_eq!(dm.invoker().unwrap().id, "u2");
    }

    #[test]
    fn test_component_interaction_has_no_command_data() {
        let mut interaction = math_add();
        interaction.kind = InteractionType::MessageComponent;
        assert!(interaction.command_data().is_none());
        assert!(interaction.options().is_empty());
    }

    #[test]
    fn test_snowflake_only_for_entity_types() {
        let user = CommandDataOption::value("who", OptionType::User, "123");
        assert_eq!(user.snowflake(), Some("123"));
        let text = CommandDataOption::value("text", OptionType::String, "123");
        assert_eq!(text.snowflake(), None);
    }
}
