//! Input line parsing

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a message to the current team
    Chat(String),
    /// Route every message by keywords
    Auto,
    /// Pin a team
    Team(String),
    /// Show or hide reasoning
    ToggleThinking,
    /// List teams
    Teams,
    /// Start a new conversation
    New,
    /// List saved conversations
    History,
    /// Continue a saved conversation
    Open(i64),
    Help,
    Quit,
    /// Blank line
    Empty,
    /// Slash command that is not known, or missing its argument
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  /auto          route each message to a team by keywords
  /team <id>     always use team <id>
  /thinking      show or hide reasoning
  /teams         list teams
  /new           start a new conversation
  /history       list saved conversations
  /open <id>     continue saved conversation <id>
  /help          show this help
  /quit          exit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Chat(line.to_string());
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        match name.as_str() {
            "auto" => Command::Auto,
            "team" if !arg.is_empty() => Command::Team(arg.to_string()),
            "team" => Command::Invalid("usage: /team <id>".to_string()),
            "thinking" => Command::ToggleThinking,
            "teams" => Command::Teams,
            "new" | "clear" => Command::New,
            "history" => Command::History,
            "open" => match arg.parse() {
                Ok(id) => Command::Open(id),
                Err(_) => Command::Invalid("usage: /open <id>".to_string()),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Invalid(format!("unknown command: /{}", other)),
        }
    }
}
