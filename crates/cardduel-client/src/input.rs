//! Console command parsing.

/// One line typed at the console, understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `upload <path>`
    Upload(String),
    /// `pass`
    Pass,
    /// `play <card id>`
    Play(String),
    /// `resign`
    Resign,
    /// `quit`
    Quit,
}

/// Parses a console line. Returns the trimmed line back as the error if
/// it is not a known command.
pub fn parse_console(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    match line {
        "pass" => return Ok(ConsoleCommand::Pass),
        "resign" => return Ok(ConsoleCommand::Resign),
        "quit" => return Ok(ConsoleCommand::Quit),
        _ => {}
    }

    if let Some(path) = line.strip_prefix("upload ") {
        let path = path.trim();
        if !path.is_empty() {
            return Ok(ConsoleCommand::Upload(path.to_string()));
        }
    }
    if let Some(card) = line.strip_prefix("play ") {
        let card = card.trim();
        if !card.is_empty() {
            return Ok(ConsoleCommand::Play(card.to_string()));
        }
    }

    Err(line.to_string())
}
