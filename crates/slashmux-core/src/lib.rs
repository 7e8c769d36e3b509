//! # slashmux core
//!
//! The pure half of slashmux: everything needed to turn pattern strings into
//! command definitions and to map interactions back onto them, without any
//! I/O.
//!
//! - **Pattern grammar** ([`pattern`]): `"/math add num1:integer num2:integer"`
//!   → name, sub-command path, typed option descriptors.
//! - **Command tree** ([`registry`]): folds parsed patterns into the
//!   platform's command → group → sub-command hierarchy.
//! - **Dispatch keys** ([`key`]): the canonical `"/math add"` form, derived
//!   identically from a pattern and from a live interaction.
//! - **Data model** ([`model`]): serde types for registration, interactions
//!   and responses.
//!
//! ```rust
//! use slashmux_core::{CommandRegistry, DispatchKey, parse};
//! use slashmux_core::model::{CommandData, CommandDataOption, OptionType};
//!
//! let parsed = parse("/math add num1:integer num2:integer").unwrap();
//! let mut registry = CommandRegistry::new();
//! registry.register(&parsed).unwrap();
//!
//! let data = CommandData::new(
//!     "math",
//!     vec![CommandDataOption::sub_command(
//!         "add",
//!         vec![
//!             CommandDataOption::value("num1", OptionType::Integer, 2),
//!             CommandDataOption::value("num2", OptionType::Integer, 3),
//!         ],
//!     )],
//! );
//! assert_eq!(DispatchKey::from_interaction(&data), parsed.key());
//! ```

pub mod error;
pub mod key;
pub mod model;
pub mod pattern;
pub mod registry;

pub use error::{PatternError, PatternResult, RegistryError, RegistryResult};
pub use key::{DispatchKey, dispatch_key};
pub use model::{
    ApplicationCommand, Choice, ChoiceValue, CommandData, CommandDataOption, CommandOption,
    Interaction, InteractionResponse, InteractionType, OptionType, Permissions, command_option,
};
pub use pattern::{OptionSpec, ParsedPattern, normalize, parse};
pub use registry::CommandRegistry;
