use compact_str::{CompactString, ToCompactString};

/// Failure to run a submitted line as a command.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No command is registered under the first word of the line.
    #[error("Command {0} not found")]
    UnknownCommand(CompactString),

    /// The arguments after the command name did not match its parameters.
    #[error("Command \"{command}\" argument parse error, expected {expected}")]
    ArgumentParse {
        /// Name of the command
        command: CompactString,
        /// Parameter list, as produced by [`CommandRegistry::usage`]
        expected: String,
    },
}

impl CommandError {
    /// The lines echoed into the terminal history for this error.
    pub fn history_lines(&self) -> Vec<String> {
        match self {
            Self::UnknownCommand(name) => vec![format!("  Command {name} not found")],
            Self::ArgumentParse { command, expected } => vec![
                format!("  Command \"{command}\" argument parse error"),
                format!("   expected {expected}"),
            ],
        }
    }
}

/// Type of a command parameter.
///
/// Vector types consume one whitespace-separated token per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// `true` or `false`
    Bool,
    /// One integer
    Int,
    /// Two integers
    Int2,
    /// Three integers
    Int3,
    /// Four integers
    Int4,
    /// One float
    Float,
    /// Two floats
    Vec2,
    /// Three floats
    Vec3,
    /// Four floats
    Vec4,
    /// One word
    String,
}

impl ArgType {
    /// Name shown in usage strings.
    pub const fn label(self) -> &'static str {
        match self {
            ArgType::Bool => "bool",
            ArgType::Int => "int",
            ArgType::Int2 => "int2",
            ArgType::Int3 => "int3",
            ArgType::Int4 => "int4",
            ArgType::Float => "float",
            ArgType::Vec2 => "vec2",
            ArgType::Vec3 => "vec3",
            ArgType::Vec4 => "vec4",
            ArgType::String => "string",
        }
    }

    fn components(self) -> usize {
        match self {
            ArgType::Int2 | ArgType::Vec2 => 2,
            ArgType::Int3 | ArgType::Vec3 => 3,
            ArgType::Int4 | ArgType::Vec4 => 4,
            _ => 1,
        }
    }

    fn parse<'a>(self, tokens: &mut impl Iterator<Item = &'a str>) -> Option<ArgValue> {
        let mut take = || tokens.next();

        let value = match self {
            ArgType::Bool => ArgValue::Bool(take()?.parse().ok()?),
            ArgType::String => ArgValue::String(take()?.to_compact_string()),
            ArgType::Int | ArgType::Int2 | ArgType::Int3 | ArgType::Int4 => {
                let ints = (0..self.components())
                    .map(|_| take()?.parse().ok())
                    .collect::<Option<Vec<i32>>>()?;
                ArgValue::Ints(ints)
            },
            ArgType::Float | ArgType::Vec2 | ArgType::Vec3 | ArgType::Vec4 => {
                let floats = (0..self.components())
                    .map(|_| take()?.parse().ok())
                    .collect::<Option<Vec<f32>>>()?;
                ArgValue::Floats(floats)
            },
        };
        Some(value)
    }
}

/// A parsed argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// From [`ArgType::Bool`]
    Bool(bool),
    /// From the integer types, one entry per component
    Ints(Vec<i32>),
    /// From the float types, one entry per component
    Floats(Vec<f32>),
    /// From [`ArgType::String`]
    String(CompactString),
}

/// Parsed arguments of one invocation, addressed by parameter label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<(CompactString, ArgValue)>,
}

impl Args {
    /// The value of parameter `label`.
    pub fn get(&self, label: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// Number of parsed arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for commands without parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A `bool` parameter.
    pub fn bool(&self, label: &str) -> Option<bool> {
        match self.get(label)? {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The first component of an integer parameter.
    pub fn int(&self, label: &str) -> Option<i32> {
        self.ints(label)?.first().copied()
    }

    /// All components of an integer parameter.
    pub fn ints(&self, label: &str) -> Option<&[i32]> {
        match self.get(label)? {
            ArgValue::Ints(v) => Some(v),
            _ => None,
        }
    }

    /// The first component of a float parameter.
    pub fn float(&self, label: &str) -> Option<f32> {
        self.floats(label)?.first().copied()
    }

    /// All components of a float parameter.
    pub fn floats(&self, label: &str) -> Option<&[f32]> {
        match self.get(label)? {
            ArgValue::Floats(v) => Some(v),
            _ => None,
        }
    }

    /// A string parameter.
    pub fn string(&self, label: &str) -> Option<&str> {
        match self.get(label)? {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }
}

type Handler<Ctx> = Box<dyn FnMut(&mut Ctx, &Args)>;

struct Command<Ctx> {
    name: CompactString,
    params: Vec<(CompactString, ArgType)>,
    description: CompactString,
    handler: Handler<Ctx>,
}

/// Named commands run against submitted terminal lines.
///
/// The first word of a line selects the command; the remaining words are
/// parsed into its typed parameters. `Ctx` is whatever the handlers need
/// to mutate, typically the host application or the
/// [`super::TerminalState`] itself.
pub struct CommandRegistry<Ctx> {
    commands: Vec<Command<Ctx>>,
}

impl<Ctx> Default for CommandRegistry<Ctx> {
    fn default() -> Self {
        Self { commands: Vec::new() }
    }
}

impl<Ctx> std::fmt::Debug for CommandRegistry<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.commands.iter().map(|c| &c.name))
            .finish()
    }
}

impl<Ctx> CommandRegistry<Ctx> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command without parameters, replacing any command of the same name.
    pub fn register<F>(&mut self, name: &str, description: &str, mut handler: F)
    where
        F: FnMut(&mut Ctx) + 'static,
    {
        self.insert(Command {
            name: name.into(),
            params: Vec::new(),
            description: description.into(),
            handler: Box::new(move |ctx, _| handler(ctx)),
        });
    }

    /// Registers a command taking `params`, given as `(label, type)` pairs.
    pub fn register_with_args<F>(
        &mut self,
        name: &str,
        params: &[(&str, ArgType)],
        description: &str,
        handler: F,
    ) where
        F: FnMut(&mut Ctx, &Args) + 'static,
    {
        self.insert(Command {
            name: name.into(),
            params: params
                .iter()
                .map(|&(label, ty)| (label.into(), ty))
                .collect(),
            description: description.into(),
            handler: Box::new(handler),
        });
    }

    fn insert(&mut self, command: Command<Ctx>) {
        tracing::debug!(name = %command.name, params = command.params.len(), "command registered");

        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
    }

    /// True if a command named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Names and descriptions of all commands, in registration order.
    pub fn descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands
            .iter()
            .map(|c| (c.name.as_str(), c.description.as_str()))
    }

    /// The parameter list of `name`, e.g. `x (int), y (float)`.
    pub fn usage(&self, name: &str) -> Option<String> {
        self.find(name).map(usage_of)
    }

    fn find(&self, name: &str) -> Option<&Command<Ctx>> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Runs the command named by the first word of `line`.
    ///
    /// Blank lines are ignored. Words past the last parameter are ignored.
    ///
    /// # Errors
    /// [`CommandError::UnknownCommand`] if no command matches, and
    /// [`CommandError::ArgumentParse`] if the words after the name do not
    /// parse as the command's parameters; the handler is not run.
    pub fn execute(&mut self, ctx: &mut Ctx, line: &str) -> Result<(), CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(());
        };

        let command = self
            .commands
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| CommandError::UnknownCommand(name.into()))?;

        let mut args = Args::default();
        for (label, ty) in &command.params {
            let Some(value) = ty.parse(&mut tokens) else {
                tracing::debug!(command = name, param = %label, "argument parse failed");
                return Err(CommandError::ArgumentParse {
                    command: command.name.clone(),
                    expected: usage_of(command),
                });
            };
            args.values.push((label.clone(), value));
        }

        (command.handler)(ctx, &args);
        Ok(())
    }
}

fn usage_of<Ctx>(command: &Command<Ctx>) -> String {
    command
        .params
        .iter()
        .map(|(label, ty)| format!("{label} ({})", ty.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<String>);

    fn registry() -> CommandRegistry<Log> {
        let mut registry = CommandRegistry::new();
        registry.register("clear", "empties the log", |log: &mut Log| log.0.clear());
        registry.register_with_args(
            "move",
            &[("x", ArgType::Int), ("speed", ArgType::Float)],
            "moves by x",
            |log: &mut Log, args| {
                log.0.push(format!("{:?} {:?}", args.int("x"), args.float("speed")));
            },
        );
        registry.register_with_args(
            "paint",
            &[("on", ArgType::Bool), ("rgb", ArgType::Int3), ("name", ArgType::String)],
            "",
            |log: &mut Log, args| {
                log.0.push(format!(
                    "{:?} {:?} {:?}",
                    args.bool("on"),
                    args.ints("rgb"),
                    args.string("name")
                ));
            },
        );
        registry
    }

    #[test]
    fn runs_commands_with_typed_args() {
        let mut registry = registry();
        let mut log = Log::default();

        registry.execute(&mut log, "move 3 0.5").unwrap();
        registry.execute(&mut log, "  paint true 1 2 3 sky extra").unwrap();

        assert_eq!(log.0, vec![
            "Some(3) Some(0.5)".to_string(),
            "Some(true) Some([1, 2, 3]) Some(\"sky\")".to_string(),
        ]);

        registry.execute(&mut log, "clear").unwrap();
        assert!(log.0.is_empty());
    }

    #[test]
    fn parse_errors_describe_the_parameters() {
        let mut registry = registry();
        let mut log = Log::default();

        let err = registry.execute(&mut log, "move left 1.0").unwrap_err();
        assert_eq!(err, CommandError::ArgumentParse {
            command: "move".into(),
            expected: "x (int), speed (float)".to_string(),
        });
        assert_eq!(err.history_lines(), vec![
            "  Command \"move\" argument parse error".to_string(),
            "   expected x (int), speed (float)".to_string(),
        ]);

        // too few components
        assert!(registry.execute(&mut log, "paint true 1 2").is_err());
        assert!(log.0.is_empty());
    }

    #[test]
    fn unknown_and_blank_lines() {
        let mut registry = registry();
        let mut log = Log::default();

        let err = registry.execute(&mut log, "jump 1").unwrap_err();
        assert_eq!(err.history_lines(), vec!["  Command jump not found".to_string()]);
        assert!(registry.execute(&mut log, "   ").is_ok());
    }

    #[test]
    fn registering_twice_replaces() {
        let mut registry = registry();
        registry.register("move", "no args now", |log: &mut Log| log.0.push("moved".into()));

        let mut log = Log::default();
        registry.execute(&mut log, "move").unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.usage("move").as_deref(), Some(""));
        assert_eq!(log.0, vec!["moved".to_string()]);
    }
}
