/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Location(String),
    Search,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
commands:
  query <text>      set the search query
  location <text>   set the location
  search            search with the current query and location
  help              show this text
  quit              stop polling and exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Empty),
            "query" | "q" => Ok(Self::Query(rest.to_string())),
            "location" | "l" => Ok(Self::Location(rest.to_string())),
            "search" | "s" if rest.is_empty() => Ok(Self::Search),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(format!("unknown command: {line}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edits_keeping_inner_spaces() {
        assert_eq!(
            Command::parse("query  coffee shops "),
            Ok(Command::Query("coffee shops".into()))
        );
        assert_eq!(
            Command::parse("location New York"),
            Ok(Command::Location("New York".into()))
        );
        assert_eq!(Command::parse("query"), Ok(Command::Query(String::new())));
    }

    #[test]
    fn parses_bare_commands() {
        assert_eq!(Command::parse("search"), Ok(Command::Search));
        assert_eq!(Command::parse("  QUIT "), Ok(Command::Quit));
        assert_eq!(Command::parse(""), Ok(Command::Empty));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
    }

    #[test]
    fn rejects_unknown_and_search_arguments() {
        assert!(Command::parse("fetch").is_err());
        assert!(Command::parse("search cafes").is_err());
    }
}
