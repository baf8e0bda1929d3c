/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a command replaces the text being synthesized
    Text(String),
    Language(String),
    Voice(String),
    Languages,
    Voices,
    Play,
    Refresh,
    Save,
    Help,
    Quit,
}

pub enum LocalCommandResult {
    Command(Command),

    /// Input was recognised as a command but could not be used
    Invalid { msg: String },
}

pub const HELP: &str = "\
Type any text to have it spoken once you stop typing.
  /lang <code|name>  switch language (loads its sample text)
  /voice <id>        switch voice within the current language
  /languages         list languages
  /voices            list voices for the current language
  /play              play the latest audio
  /refresh           synthesize the current text again
  /save              remember language and voice in the settings file
  /quit              exit";

pub fn parse_command(input: &str) -> LocalCommandResult {
    let input = input.trim();
    let Some(command) = input.strip_prefix('/') else {
        return LocalCommandResult::Command(Command::Text(input.to_string()));
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    let command = match (name, argument) {
        ("lang" | "language", "") => {
            return LocalCommandResult::Invalid {
                msg: "Usage: /lang <code|name>".to_string(),
            }
        }
        ("lang" | "language", language) => Command::Language(language.to_string()),
        ("voice", "") => {
            return LocalCommandResult::Invalid {
                msg: "Usage: /voice <id>, see /voices".to_string(),
            }
        }
        ("voice", voice) => Command::Voice(voice.to_string()),
        ("languages", _) => Command::Languages,
        ("voices", _) => Command::Voices,
        ("play" | "p", _) => Command::Play,
        ("refresh", _) => Command::Refresh,
        ("save", _) => Command::Save,
        ("help" | "?", _) => Command::Help,
        ("exit" | "quit" | "q", _) => Command::Quit,
        _ => {
            return LocalCommandResult::Invalid {
                msg: format!("Unknown command /{name}, type /help"),
            }
        }
    };
    LocalCommandResult::Command(command)
}
