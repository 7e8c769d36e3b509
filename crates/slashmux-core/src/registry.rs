//! The command tree builder.
//!
//! [`CommandRegistry`] folds parsed patterns into top-level
//! [`ApplicationCommand`] definitions, creating sub-command and group nodes on
//! demand. Every node is owned by its parent; lookups are linear scans since
//! the platform caps each level at a few dozen entries anyway.

use tracing::trace;

use crate::error::{RegistryError, RegistryResult};
use crate::model::{ApplicationCommand, CommandOption, OptionType};
use crate::pattern::{MAX_DEPTH, OptionSpec, ParsedPattern};

/// The set of command definitions built from registered patterns.
///
/// Commands keep their first-registration order, which is also the order in
/// which they are published.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<ApplicationCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Adds the branch described by `parsed` to the tree.
    ///
    /// Fails without touching the tree if the exact dispatch key is already
    /// present, or if the pattern would mix a bare command with sub-commands,
    /// or reuse a name for a different node type.
    pub fn register(&mut self, parsed: &ParsedPattern) -> RegistryResult<()> {
        let key = parsed.key();
        let existing = self.commands.iter().find(|c| c.name == parsed.name);

        match parsed.path.as_slice() {
            [] => {
                if existing.is_some() {
                    return Err(RegistryError::duplicate(key.as_str()));
                }
            }
            [sub] => {
                if let Some(cmd) = existing {
                    if !cmd.has_nesting() {
                        return Err(RegistryError::conflict(
                            key.as_str(),
                            format!("`/{}` is registered without sub-commands", cmd.name),
                        ));
                    }
                    if cmd.find_option(sub, OptionType::SubCommandGroup).is_some() {
                        return Err(RegistryError::conflict(
                            key.as_str(),
                            format!("`{sub}` is already a sub-command group"),
                        ));
                    }
                    if cmd.find_option(sub, OptionType::SubCommand).is_some() {
                        return Err(RegistryError::duplicate(key.as_str()));
                    }
                }
            }
            [group, sub] => {
                if let Some(cmd) = existing {
                    if !cmd.has_nesting() {
                        return Err(RegistryError::conflict(
                            key.as_str(),
                            format!("`/{}` is registered without sub-commands", cmd.name),
                        ));
                    }
                    if cmd.find_option(group, OptionType::SubCommand).is_some() {
                        return Err(RegistryError::conflict(
                            key.as_str(),
                            format!("`{group}` is already a sub-command"),
                        ));
                    }
                    let taken = cmd
                        .find_option(group, OptionType::SubCommandGroup)
                        .and_then(|g| g.find_option(sub, OptionType::SubCommand))
                        .is_some();
                    if taken {
                        return Err(RegistryError::duplicate(key.as_str()));
                    }
                }
            }
            _ => {
                return Err(RegistryError::conflict(
                    key.as_str(),
                    format!("sub-commands can only be nested {MAX_DEPTH} layers deep"),
                ));
            }
        }

        let options: Vec<CommandOption> = parsed
            .options
            .iter()
            .map(OptionSpec::to_command_option)
            .collect();
        let command = self.command_mut(&parsed.name);

        match parsed.path.as_slice() {
            [] => command.options = options,
            [sub] => {
                let mut node = CommandOption::sub_command(sub);
                node.options = options;
                command.options.push(node);
            }
            [group, sub] => {
                let group_node = match command
                    .options
                    .iter()
                    .position(|o| o.name == *group && o.kind == OptionType::SubCommandGroup)
                {
                    Some(idx) => &mut command.options[idx],
                    None => {
                        command.options.push(CommandOption::group(group));
                        let last = command.options.len() - 1;
                        &mut command.options[last]
                    }
                };
                let mut node = CommandOption::sub_command(sub);
                node.options = options;
                group_node.options.push(node);
            }
            _ => unreachable!("depth checked above"),
        }

        trace!(key = %key, "command pattern added to tree");
        Ok(())
    }

    fn command_mut(&mut self, name: &str) -> &mut ApplicationCommand {
        let idx = match self.commands.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.commands.push(ApplicationCommand::chat_input(name));
                self.commands.len() - 1
            }
        };
        &mut self.commands[idx]
    }

    /// Returns the definition of the top-level command `name`.
    pub fn get(&self, name: &str) -> Option<&ApplicationCommand> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Returns all command definitions in registration order.
    pub fn commands(&self) -> &[ApplicationCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn into_commands(self) -> Vec<ApplicationCommand> {
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse;

    fn registry(patterns: &[&str]) -> RegistryResult<CommandRegistry> {
        let mut registry = CommandRegistry::new();
        for pattern in patterns {
            registry.register(&parse(pattern).unwrap())?;
        }
        Ok(registry)
    }

    #[test]
    fn test_bare_command_options() {
        let registry = registry(&["/hi happy:string<happy,sad>"]).unwrap();
        let cmd = registry.get("hi").unwrap();
        assert_eq!(cmd.description, "hi");
        assert_eq!(cmd.options.len(), 1);
        assert_eq!(cmd.options[0].kind, OptionType::String);
        assert!(cmd.options[0].required);
    }

    #[test]
    fn test_bare_duplicate() {
        let err = registry(&["/foo", "/foo"]).unwrap_err();
        assert_eq!(err, RegistryError::duplicate("/foo"));
    }

    #[test]
    fn test_duplicate_ignores_options() {
        let err = registry(&["/foo a:string", "/foo b:integer"]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicatePattern { .. }));
    }

    #[test]
    fn test_sibling_sub_commands() {
        let registry = registry(&["/foo bar", "/foo baz"]).unwrap();
        assert_eq!(registry.len(), 1);
        let cmd = registry.get("foo").unwrap();
        let names: Vec<_> = cmd.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["bar", "baz"]);
        assert!(cmd.options.iter().all(|o| o.kind == OptionType::SubCommand));
    }

    #[test]
    fn test_sub_command_and_group_side_by_side() {
        let registry = registry(&["/echo one text:string", "/echo two layers flag:boolean"]).unwrap();
        let cmd = registry.get("echo").unwrap();
        assert_eq!(cmd.options.len(), 2);

        let one = cmd.find_option("one", OptionType::SubCommand).unwrap();
        assert_eq!(one.options[0].name, "text");

        let two = cmd.find_option("two", OptionType::SubCommandGroup).unwrap();
        let layers = two.find_option("layers", OptionType::SubCommand).unwrap();
        assert_eq!(layers.options[0].kind, OptionType::Boolean);
    }

    #[test]
    fn test_group_collects_sub_commands() {
        let registry = registry(&["/cfg get key", "/cfg get all", "/cfg set key v:string"]).unwrap();
        let cmd = registry.get("cfg").unwrap();
        let get = cmd.find_option("get", OptionType::SubCommandGroup).unwrap();
        assert_eq!(get.options.len(), 2);
        assert!(cmd.find_option("set", OptionType::SubCommandGroup).is_some());
    }

    #[test]
    fn test_nested_duplicates() {
        assert!(matches!(
            registry(&["/a b", "/a b x:string"]).unwrap_err(),
            RegistryError::DuplicatePattern { .. }
        ));
        assert!(matches!(
            registry(&["/a g s", "/a g s"]).unwrap_err(),
            RegistryError::DuplicatePattern { .. }
        ));
    }

    #[test]
    fn test_bare_after_nested_is_duplicate() {
        assert!(matches!(
            registry(&["/a b", "/a"]).unwrap_err(),
            RegistryError::DuplicatePattern { .. }
        ));
    }

    #[test]
    fn test_nested_after_bare_conflicts() {
        assert!(matches!(
            registry(&["/a", "/a b"]).unwrap_err(),
            RegistryError::ConflictingShape { .. }
        ));
        assert!(matches!(
            registry(&["/a x:string", "/a g s"]).unwrap_err(),
            RegistryError::ConflictingShape { .. }
        ));
    }

    #[test]
    fn test_name_reused_across_node_types() {
        assert!(matches!(
            registry(&["/a b", "/a b c"]).unwrap_err(),
            RegistryError::ConflictingShape { .. }
        ));
        assert!(matches!(
            registry(&["/a b c", "/a b"]).unwrap_err(),
            RegistryError::ConflictingShape { .. }
        ));
    }

    #[test]
    fn test_failed_registration_leaves_tree_untouched() {
        let mut registry = registry(&["/a b"]).unwrap();
        let before = registry.commands().to_vec();
        assert!(registry.register(&parse("/a b").unwrap()).is_err());
        assert!(registry.register(&parse("/a b c").unwrap()).is_err());
        assert_eq!(registry.commands(), before.as_slice());
    }

    #[test]
    fn test_hand_built_deep_path_rejected() {
        let mut parsed = parse("/a b c").unwrap();
        parsed.path.push("d".into());
        let mut registry = CommandRegistry::new();
        assert!(registry.register(&parsed).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registration_order_preserved() {
        let registry = registry(&["/zeta", "/alpha", "/mid x"]).unwrap();
        let names: Vec<_> = registry.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }
}
