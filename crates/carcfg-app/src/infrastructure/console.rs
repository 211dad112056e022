//! Line-oriented console front end.
//!
//! `carcfg run` reads one command per line from stdin.  This module turns a
//! line into a [`ConsoleCommand`], runs it against the UI bridge, and renders
//! the answer as text.  The actual stdin loop lives in `main.rs`.
//!
//! ```text
//! > color blue
//! > toggle spoiler
//! > down 100
//! > move 160
//! > up
//! > share
//! http://localhost:3000/?config=JTdC...  (copied)
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use thiserror::Error;

use crate::infrastructure::ui_bridge::{self, AppState, CommandResult, ConfiguratorViewDto, PointerEventDto};

/// Help text printed by the `help` command.
pub const HELP: &str = "\
commands:
  color <id>     select a paint color (white, blue, grey, pink, black)
  toggle <id>    add or remove an accessory (spoiler, sunroof, alloy_wheels, roof_box)
  save           save the current configuration
  load           read the saved configuration back from the store
  share          create a share link and copy it to the clipboard
  down <x>       press the pointer on the viewer at horizontal position x
  move <x>       move the pointer to x (rotates the car while pressed)
  up | leave     release the pointer
  show           print the current view
  help           print this help
  quit           exit";

/// Error type for console input.
#[derive(Debug, Error, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{command}' needs an argument")]
    MissingArgument { command: &'static str },
    #[error("'{value}' is not a number")]
    InvalidNumber { value: String },
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Color(String),
    Toggle(String),
    Save,
    Load,
    Share,
    Pointer(PointerEventDto),
    Show,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parses a line.  Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] for unknown commands, missing arguments, and
    /// non-numeric pointer positions.
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();

        let cmd = match verb.to_ascii_lowercase().as_str() {
            "color" => Self::Color(required(arg, "color")?.to_string()),
            "toggle" => Self::Toggle(required(arg, "toggle")?.to_string()),
            "save" => Self::Save,
            "load" => Self::Load,
            "share" => Self::Share,
            "down" => Self::Pointer(PointerEventDto::Down {
                x: number(required(arg, "down")?)?,
            }),
            "move" => Self::Pointer(PointerEventDto::Move {
                x: number(required(arg, "move")?)?,
            }),
            "up" => Self::Pointer(PointerEventDto::Up),
            "leave" => Self::Pointer(PointerEventDto::Leave),
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ConsoleError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

fn required<'a>(arg: Option<&'a str>, command: &'static str) -> Result<&'a str, ConsoleError> {
    arg.ok_or(ConsoleError::MissingArgument { command })
}

fn number(value: &str) -> Result<f32, ConsoleError> {
    value.parse().map_err(|_| ConsoleError::InvalidNumber {
        value: value.to_string(),
    })
}

/// Runs `command` and returns the text to print.
///
/// `Quit` produces no output; the caller is expected to stop reading.
pub async fn execute(state: &Arc<AppState>, command: ConsoleCommand) -> String {
    let state = Arc::clone(state);
    match command {
        ConsoleCommand::Color(id) => view_or_error(ui_bridge::select_color(state, id).await),
        ConsoleCommand::Toggle(id) => view_or_error(ui_bridge::toggle_accessory(state, id).await),
        ConsoleCommand::Save => match ui_bridge::save_configuration(state).await {
            CommandResult { success: true, .. } => "saved".to_string(),
            r => error_text(r.error),
        },
        ConsoleCommand::Load => match ui_bridge::load_saved_configuration(Arc::clone(&state)).await {
            CommandResult { data: Some(true), .. } => {
                view_or_error(ui_bridge::get_view(state).await)
            }
            CommandResult { data: Some(false), .. } => "no saved configuration".to_string(),
            r => error_text(r.error),
        },
        ConsoleCommand::Share => match ui_bridge::share_configuration(state).await {
            CommandResult { data: Some(share), .. } => {
                let note = if share.copied { "copied" } else { "not copied" };
                format!("{}  ({note})", share.url)
            }
            r => error_text(r.error),
        },
        ConsoleCommand::Pointer(event) => match ui_bridge::pointer_event(state, event).await {
            CommandResult { data: Some(yaw), .. } => format!("rotation: {yaw:.2} rad"),
            r => error_text(r.error),
        },
        ConsoleCommand::Show => view_or_error(ui_bridge::get_view(state).await),
        ConsoleCommand::Help => HELP.to_string(),
        ConsoleCommand::Quit => String::new(),
    }
}

fn view_or_error(result: CommandResult<ConfiguratorViewDto>) -> String {
    match result.data {
        Some(view) => render_view(&view),
        None => error_text(result.error),
    }
}

fn error_text(error: Option<String>) -> String {
    format!("error: {}", error.unwrap_or_else(|| "unknown failure".to_string()))
}

/// Renders the page as plain text: nav bar, both selectors, the preview
/// panel and the last share link.
pub fn render_view(view: &ConfiguratorViewDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {} {}", view.nav.logo, view.nav.title, view.nav.user_menu_icon);

    out.push_str("Colors:");
    for c in &view.colors {
        let mark = if c.checked { "(•)" } else { "( )" };
        let _ = write!(out, " {mark} {}", c.id);
    }
    out.push('\n');

    out.push_str("Accessories:");
    for a in &view.accessories {
        let mark = if a.checked { "[x]" } else { "[ ]" };
        let _ = write!(out, " {mark} {} {}", a.icon, a.id);
    }
    out.push('\n');

    out.push_str(&view.preview.text);
    if let Some(share) = &view.last_share {
        let _ = writeln!(out, "Share link: {}", share.url);
    }
    if let Some(yaw) = view.body_yaw {
        let _ = writeln!(out, "Rotation: {yaw:.2} rad");
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(
            ConsoleCommand::parse("color blue"),
            Ok(Some(ConsoleCommand::Color("blue".to_string())))
        );
        assert_eq!(
            ConsoleCommand::parse("  toggle   roof_box "),
            Ok(Some(ConsoleCommand::Toggle("roof_box".to_string())))
        );
        assert_eq!(
            ConsoleCommand::parse("move -12.5"),
            Ok(Some(ConsoleCommand::Pointer(PointerEventDto::Move { x: -12.5 })))
        );
    }

    #[test]
    fn test_parse_is_case_insensitive_for_verbs() {
        assert_eq!(ConsoleCommand::parse("SHARE"), Ok(Some(ConsoleCommand::Share)));
        assert_eq!(ConsoleCommand::parse("Quit"), Ok(Some(ConsoleCommand::Quit)));
    }

    #[test]
    fn test_parse_blank_line_is_none() {
        assert_eq!(ConsoleCommand::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            ConsoleCommand::parse("paint red"),
            Err(ConsoleError::Unknown("paint".to_string()))
        );
        assert_eq!(
            ConsoleCommand::parse("color"),
            Err(ConsoleError::MissingArgument { command: "color" })
        );
        assert_eq!(
            ConsoleCommand::parse("down left"),
            Err(ConsoleError::InvalidNumber {
                value: "left".to_string()
            })
        );
    }
}
