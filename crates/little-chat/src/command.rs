//! Parsing of the lines typed at the prompt.

/// Help text listing the available commands.
pub const HELP: &str = "\
/key <api key>        set the API key (empty to unset)
/model <model id>     choose the model
/models               list known models
/system <text>        set the system message
/settings             show the current settings
/clear                clear the conversation
/help                 show this help
/quit                 exit";

/// What a line typed at the prompt asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Nothing to do.
    Empty,
    /// Send the text as a new turn.
    Submit(String),
    /// Replace the API key.
    SetCredential(String),
    /// Replace the model.
    SetModel(String),
    /// Replace the system message.
    SetSystemInstruction(String),
    /// Print the settings.
    ShowSettings,
    /// Print the known models.
    ListModels,
    /// Clear the conversation.
    Clear,
    /// Print the help.
    Help,
    /// Exit.
    Quit,
    /// The command exists but the argument is missing; carries the usage.
    Usage(&'static str),
    /// Unrecognized command.
    Unknown(String),
}

impl Command {
    /// Parses one input line.
    ///
    /// Lines starting with `/` are commands, anything else that is not
    /// blank is submitted as-is, without the trailing newline.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Command::Empty;
        }
        let Some(command) = line.trim_start().strip_prefix('/') else {
            return Command::Submit(line.to_owned());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "key" => Command::SetCredential(arg.to_owned()),
            "model" if arg.is_empty() => Command::Usage("/model <model id>"),
            "model" => Command::SetModel(arg.to_owned()),
            "system" if arg.is_empty() => Command::Usage("/system <text>"),
            "system" => Command::SetSystemInstruction(arg.to_owned()),
            "settings" => Command::ShowSettings,
            "models" => Command::ListModels,
            "clear" => Command::Clear,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(name.to_owned()),
        }
    }
}
