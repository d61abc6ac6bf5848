use std::io::{BufRead, Write};

use crate::api::User;
use crate::app::Result;

use super::feed::FeedKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Open(FeedKind),
    Quit,
}

/// Line-oriented mode picker shown outside the alternate screen, so errors
/// from the following fetch stay visible on the plain terminal.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, user: &User) -> Result<MenuChoice> {
    let handle = user
        .username
        .as_deref()
        .map(|u| format!("@{}", u))
        .unwrap_or_else(|| user.id.clone());

    writeln!(output, "xcli ({})", handle)?;
    for (n, kind) in FeedKind::ALL.iter().enumerate() {
        writeln!(output, "  {}) {}", n + 1, kind.title())?;
    }
    writeln!(output, "  q) Quit")?;

    loop {
        write!(output, "Select: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(MenuChoice::Quit);
        }

        match parse_choice(line.trim()) {
            Some(choice) => return Ok(choice),
            None => writeln!(output, "Unknown choice: {}", line.trim())?,
        }
    }
}

fn parse_choice(s: &str) -> Option<MenuChoice> {
    match s.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(MenuChoice::Quit),
        "m" | "mentions" => Some(MenuChoice::Open(FeedKind::Mentions)),
        "t" | "thread" | "posts" => Some(MenuChoice::Open(FeedKind::Thread)),
        "h" | "timeline" | "home" => Some(MenuChoice::Open(FeedKind::Timeline)),
        other => other
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| FeedKind::ALL.get(i))
            .map(|kind| MenuChoice::Open(*kind)),
    }
}
