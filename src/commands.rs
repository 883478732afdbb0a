use anyhow::Result;
use teloxide::types::BotCommand;
use tracing::info;

/// What a registered command does when invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Help,
    Dates,
}

/// One entry of the command table: its names, a one-line description for
/// `/help`, and the action it runs
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub names: &'static [&'static str],
    pub description: &'static str,
    pub action: Action,
}

/// Commands in registration order
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// The commands this bot answers
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(CommandSpec {
            names: &["start"],
            description: "Say hello",
            action: Action::Start,
        })?;
        registry.register(CommandSpec {
            names: &["help"],
            description: "List the available commands",
            action: Action::Help,
        })?;
        registry.register(CommandSpec {
            names: &["dates", "termine"],
            description: "Show the upcoming LUG Taunus meeting dates",
            action: Action::Dates,
        })?;
        Ok(registry)
    }

    /// Register a command. Every name must be unique across the table.
    pub fn register(&mut self, spec: CommandSpec) -> Result<()> {
        if spec.names.is_empty() {
            anyhow::bail!("Command '{}' has no names", spec.description);
        }
        for name in spec.names {
            if self.resolve(name).is_some() {
                anyhow::bail!("Command name '/{}' is already registered", name);
            }
        }
        info!(
            "Registered command: /{} - {}",
            spec.names.join(", /"),
            spec.description
        );
        self.commands.push(spec);
        Ok(())
    }

    /// Find the command registered under `name` (exact, case-sensitive)
    pub fn resolve(&self, name: &str) -> Option<&CommandSpec> {
        self.commands
            .iter()
            .find(|spec| spec.names.iter().any(|n| *n == name))
    }

    /// One line per command, in registration order.
    pub fn help_text(&self) -> String {
        self.commands
            .iter()
            .map(|spec| {
                let names = spec
                    .names
                    .iter()
                    .map(|name| format!("/{}", name))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} - {}", names, spec.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Entries for Telegram's command menu; aliases get their own entry.
    pub fn bot_commands(&self) -> Vec<BotCommand> {
        self.commands
            .iter()
            .flat_map(|spec| {
                spec.names
                    .iter()
                    .map(move |name| BotCommand::new(*name, spec.description))
            })
            .collect()
    }
}

/// Extract the command name from a message like `/dates@lug_bot now`.
///
/// Returns `None` for plain text and for commands addressed to another bot.
pub fn parse_command<'a>(text: &'a str, bot_username: Option<&str>) -> Option<&'a str> {
    let token = text.split_whitespace().next()?;
    let token = token.strip_prefix('/')?;

    let (name, target) = match token.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (token, None),
    };

    if let (Some(target), Some(me)) = (target, bot_username) {
        if !target.eq_ignore_ascii_case(me) {
            return None;
        }
    }

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
