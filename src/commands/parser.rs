//! Splitting raw chat text into a command name and arguments.

/// Split `/name arg arg` into `("name", ["arg", "arg"])`.
///
/// Returns `None` for anything that is not a slash command. A trailing
/// `@botname` suffix on the command is stripped, as chat platforms append
/// it in group conversations.
pub fn parse_command(text: &str) -> Option<(&str, Vec<&str>)> {
    let rest = text.trim().strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().filter(|name| !name.is_empty())?;
    let name = name.split('@').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    Some((name, parts.collect()))
}
