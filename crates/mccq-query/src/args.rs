//! Query-string front end.
//!
//! A query line is split shell-style and then parsed with clap:
//!
//! ```text
//! [-t|--showtypes] [-e|--explode] [-c|--capacity N] [-v|--version V]... TOKEN...
//! ```

use clap::Parser;

use crate::error::QueryError;

/// Largest population still rendered expanded when `--capacity` is not given.
pub const DEFAULT_CAPACITY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "mccq",
    about = "Minecraft command query. Inspired by the in-game help command, with multiple version support and expandable regex search.",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct QueryArguments {
    /// Show argument types
    #[arg(short = 't', long = "showtypes")]
    pub show_types: bool,

    /// Expand all subcommands, regardless of capacity
    #[arg(short, long)]
    pub explode: bool,

    /// Maximum number of subcommands to render before collapsing (0 or more;
    /// negative values are rejected, use 0 to expand only single-child nodes)
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Version(s) to query instead of the defaults (repeatable)
    #[arg(short = 'v', long = "version", value_name = "VERSION")]
    pub versions: Vec<String>,

    /// Command path, one pattern per token (`.` matches anything)
    #[arg(value_name = "COMMAND", required = true)]
    pub tokens: Vec<String>,
}

impl QueryArguments {
    /// Arguments with default flags for the given token path.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            show_types: false,
            explode: false,
            capacity: DEFAULT_CAPACITY,
            versions: Vec::new(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a raw query line.
    pub fn parse_line(line: &str) -> Result<Self, QueryError> {
        let words = split_command_line(line).map_err(|m| QueryError::ArgumentParserFailed {
            command: line.to_string(),
            message: m.to_string(),
        })?;
        Self::parse_words(line, words)
    }

    /// Parse words that were already split, e.g. from the process arguments.
    pub fn from_words(words: &[String]) -> Result<Self, QueryError> {
        Self::parse_words(&words.join(" "), words.iter().cloned())
    }

    fn parse_words(
        command: &str,
        words: impl IntoIterator<Item = String>,
    ) -> Result<Self, QueryError> {
        Self::try_parse_from(words).map_err(|err| {
            let rendered = err.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            QueryError::ArgumentParserFailed {
                command: command.to_string(),
                message: first.trim_start_matches("error: ").to_string(),
            }
        })
    }
}

/// Shell-style word splitting.
///
/// Whitespace separates words. Single quotes keep everything literally;
/// double quotes keep whitespace and honor `\"` and `\\`; outside quotes a
/// backslash escapes any character. `""` yields an empty word.
pub fn split_command_line(line: &str) -> Result<Vec<String>, &'static str> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('\''), c) => current.push(c),
            (Some(_), '"') => quote = None,
            (Some(_), '\\') => match chars.peek() {
                Some(&next) if next == '"' || next == '\\' => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push('\\'),
            },
            (Some(_), c) => current.push(c),
            (None, '\\') => match chars.next() {
                Some(next) => {
                    current.push(next);
                    in_word = true;
                }
                None => return Err("no escaped character"),
            },
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    out.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("no closing quotation");
    }
    if in_word {
        out.push(current);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        split_command_line(line).expect("split")
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(words("  tag   .  add "), vec!["tag", ".", "add"]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn quotes_group_words() {
        assert_eq!(words(r#"say "hello world""#), vec!["say", "hello world"]);
        assert_eq!(words("say 'a b' c"), vec!["say", "a b", "c"]);
        assert_eq!(words(r#"x"y z"w"#), vec!["xy zw"]);
        assert_eq!(words(r#"a "" b"#), vec!["a", "", "b"]);
    }

    #[test]
    fn backslash_escapes() {
        assert_eq!(words(r"a\ b"), vec!["a b"]);
        assert_eq!(words(r#""say \"hi\"""#), vec![r#"say "hi""#]);
        // Regex classes survive inside quotes.
        assert_eq!(words(r#""\d+""#), vec![r"\d+"]);
        assert_eq!(words(r"'\w'"), vec![r"\w"]);
    }

    #[test]
    fn unbalanced_input_is_rejected() {
        assert_eq!(split_command_line(r#"say "oops"#), Err("no closing quotation"));
        assert_eq!(split_command_line("say 'oops"), Err("no closing quotation"));
        assert_eq!(split_command_line("trailing \\"), Err("no escaped character"));
    }

    #[test]
    fn parses_flags_and_tokens() {
        let args = QueryArguments::parse_line("-t -c 5 -v 1.13 --version 1.14 tag . add").unwrap();
        assert!(args.show_types);
        assert!(!args.explode);
        assert_eq!(args.capacity, 5);
        assert_eq!(args.versions, vec!["1.13", "1.14"]);
        assert_eq!(args.tokens, vec!["tag", ".", "add"]);
    }

    #[test]
    fn flags_may_follow_tokens() {
        let args = QueryArguments::parse_line("scoreboard players --explode").unwrap();
        assert!(args.explode);
        assert_eq!(args.capacity, DEFAULT_CAPACITY);
        assert_eq!(args.tokens, vec!["scoreboard", "players"]);
    }

    #[test]
    fn parse_failures_keep_the_command() {
        for line in ["", "-t", "-c nope tag", "-c -1 tag", "--bogus tag", "tag 'open"] {
            match QueryArguments::parse_line(line) {
                Err(QueryError::ArgumentParserFailed { command, message }) => {
                    assert_eq!(command, line);
                    assert!(!message.is_empty());
                }
                other => panic!("expected parser failure for {line:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn pre_split_words_skip_shell_splitting() {
        let words: Vec<String> = ["-v", "1.13", "say", "hello world"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let args = QueryArguments::from_words(&words).unwrap();
        assert_eq!(args.versions, vec!["1.13"]);
        assert_eq!(args.tokens, vec!["say", "hello world"]);
    }

    #[test]
    fn new_uses_default_flags() {
        let args = QueryArguments::new(["gamemode"]);
        assert_eq!(args.tokens, vec!["gamemode"]);
        assert_eq!(args.capacity, DEFAULT_CAPACITY);
        assert!(args.versions.is_empty());
    }
}
