//! Platform data model: the command registration schema, interaction
//! payloads and responses.

pub mod command;
pub mod interaction;
pub mod option_type;
pub mod response;

pub use command::{ApplicationCommand, Choice, ChoiceValue, CommandOption, CommandType};
pub use interaction::{
    CommandData, CommandDataOption, Interaction, InteractionType, Member, User, command_option,
};
pub use option_type::{OptionType, VALUE_TYPES};
pub use response::{EPHEMERAL, InteractionResponse, Permissions, ResponseData, ResponseType};
