//! services/client/src/commands.rs
//!
//! Parses the line-oriented commands typed into the terminal client.

use coursehub_core::catalog::{Category, UnknownKey};
use coursehub_core::workflow::SetupForm;

pub const HELP: &str = "\
Commands:
  setup <major> <year> [semester]   complete setup (keys, e.g. DataScience Year2 Semester-a)
  courses                           show the course list
  open <course-id | number>         select a course
  category <key>                    choose past-papers | slides | homeworks | other
  switch                            reopen the category chooser
  close                             close the category chooser
  back                              return to the course list
  chat                              show or hide the chat panel
  draft <text>                      edit the pending question
  ask [question]                    ask a question (defaults to the pending one)
  dismiss                           clear the error message
  show                              redraw the current view
  help                              this text
  quit                              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Setup(SetupForm),
    Courses,
    Open(String),
    Category(Category),
    Switch,
    Close,
    Back,
    Chat,
    Draft(String),
    Ask(Option<String>),
    Dismiss,
    Show,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    BadCategory(#[from] UnknownKey),
}

/// Parses one input line. Blank lines parse to `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let required = |name: &'static str| {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "setup" => {
            let mut fields = rest.split_whitespace();
            let major = fields.next().unwrap_or_default();
            let year = fields.next().unwrap_or_default();
            let semester = fields.next().unwrap_or_default();
            Command::Setup(SetupForm::new(major, year, semester))
        }
        "courses" => Command::Courses,
        "open" => Command::Open(required("open")?),
        "category" => Command::Category(required("category")?.parse()?),
        "switch" => Command::Switch,
        "close" => Command::Close,
        "back" => Command::Back,
        "chat" => Command::Chat,
        "draft" => Command::Draft(rest.to_string()),
        "ask" => Command::Ask((!rest.is_empty()).then(|| rest.to_string())),
        "dismiss" => Command::Dismiss,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_fields_may_be_missing() {
        assert_eq!(
            parse("setup DataScience Year2").unwrap(),
            Some(Command::Setup(SetupForm::new("DataScience", "Year2", "")))
        );
    }

    #[test]
    fn ask_keeps_the_question_verbatim() {
        assert_eq!(
            parse("ask What is a binary search tree?").unwrap(),
            Some(Command::Ask(Some("What is a binary search tree?".into())))
        );
        assert_eq!(parse("ask").unwrap(), Some(Command::Ask(None)));
    }

    #[test]
    fn category_must_be_a_known_key() {
        assert_eq!(
            parse("category slides").unwrap(),
            Some(Command::Category(Category::Slides))
        );
        assert!(matches!(parse("category maps"), Err(CommandError::BadCategory(_))));
        assert_eq!(parse("category"), Err(CommandError::MissingArgument("category")));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".into())));
    }
}
