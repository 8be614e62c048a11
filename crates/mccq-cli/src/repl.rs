//! Interactive query shell.
//!
//! By default we use `rustyline` for line editing, history and tab completion.
//! A minimal stdin-based fallback exists behind `--no-default-features`.
//!
//! Lines starting with `\` are meta commands; anything else is a query.

use anyhow::{anyhow, Result};
use colored::Colorize;
use mccq_query::{split_command_line, QueryEngine, QueryError, VersionResults};
use std::io::{self, Write};
use std::sync::Arc;

const PROMPT: &str = "> ";

const HELP: &str = "\
Queries:
  [-t] [-e] [-c N] [-v VERSION]... TOKEN...
    -t, --showtypes      show argument types
    -e, --explode        expand all subcommands, regardless of capacity
    -c, --capacity N     maximum number of subcommands to render before collapsing
                         (N >= 0; 0 expands only single-child nodes)
    -v, --version V      version(s) to query instead of the defaults (repeatable)
  Each TOKEN is a case-insensitive regex matched against one command level;
  `.` matches anything.

Meta commands:
  \\show VERSION...      set the default versions (\\s)
  \\versions            show default and loaded versions (\\v)
  \\reload              drop loaded versions so they are read again (\\r)
  \\help                this text (\\h, \\?)
  \\exit                leave the shell (\\quit, \\q)";

const META_COMMANDS: &[&str] = &[
    "\\exit", "\\quit", "\\q", "\\reload", "\\r", "\\show", "\\s", "\\versions", "\\v",
    "\\help", "\\h", "\\?",
];

#[derive(Debug, PartialEq, Eq)]
enum ReplControl {
    Continue,
    Exit,
}

pub fn cmd_repl(engine: Arc<QueryEngine>) -> Result<()> {
    #[cfg(feature = "repl-rustyline")]
    {
        return cmd_repl_rustyline(engine);
    }
    #[cfg(not(feature = "repl-rustyline"))]
    {
        return cmd_repl_simple(engine);
    }
}

fn print_banner(engine: &QueryEngine, completion: bool) {
    println!("{}", "[::] Minecraft Command Query [::]".green().bold());
    if completion {
        println!("Tab-completion enabled.");
    }
    let defaults = engine.show_versions();
    if defaults.is_empty() {
        println!("No default versions; use \\show VERSION to set some.");
    } else {
        println!("Default versions: {}", defaults.join(", "));
    }
    println!("Enter a command query, \\help for help, or \\exit to leave.\n");
}

#[cfg(not(feature = "repl-rustyline"))]
fn cmd_repl_simple(engine: Arc<QueryEngine>) -> Result<()> {
    print_banner(&engine, false);

    let stdin = io::stdin();
    loop {
        print!("{}", PROMPT.cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        match dispatch_line(&engine, line.trim(), &mut io::stdout().lock()) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e:#}", "error:".red().bold()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(feature = "repl-rustyline")]
fn cmd_repl_rustyline(engine: Arc<QueryEngine>) -> Result<()> {
    use rustyline::error::ReadlineError;
    use rustyline::Editor;

    print_banner(&engine, true);

    let helper = ReplLineHelper::new(Arc::clone(&engine));
    let mut rl: Editor<ReplLineHelper, rustyline::history::DefaultHistory> =
        Editor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
    rl.set_helper(Some(helper));

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        rl.add_history_entry(line)
            .map_err(|e| anyhow!("failed to record history: {e}"))?;

        match dispatch_line(&engine, line, &mut io::stdout().lock()) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e:#}", "error:".red().bold()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn dispatch_line(engine: &QueryEngine, line: &str, out: &mut impl Write) -> Result<ReplControl> {
    if line.is_empty() {
        return Ok(ReplControl::Continue);
    }
    if let Some(meta) = line.strip_prefix('\\') {
        return dispatch_meta(engine, meta, out);
    }

    match engine.results(line) {
        Ok(results) => print_results(out, &results)?,
        Err(QueryError::NoVersionRequested) => {
            writeln!(out, "No versions provided, use \\show to set the default(s).")?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(ReplControl::Continue)
}

fn dispatch_meta(engine: &QueryEngine, meta: &str, out: &mut impl Write) -> Result<ReplControl> {
    let words = split_command_line(meta).map_err(|e| anyhow!("invalid meta command: {e}"))?;
    let Some((name, rest)) = words.split_first() else {
        return Err(anyhow!("empty meta command, try \\help"));
    };

    match name.as_str() {
        "exit" | "quit" | "q" => return Ok(ReplControl::Exit),
        "reload" | "r" => {
            engine.registry().reload();
            writeln!(out, "Cleared loaded versions.")?;
        }
        "show" | "s" => {
            engine.set_show_versions(rest.to_vec());
            if rest.is_empty() {
                writeln!(out, "Cleared default versions.")?;
            } else {
                writeln!(out, "Default versions: {}", rest.join(", "))?;
            }
        }
        "versions" | "v" => {
            let defaults = engine.show_versions();
            let cached = engine.registry().cached_versions();
            writeln!(out, "Default versions: {}", list_or_none(&defaults))?;
            writeln!(out, "Loaded versions: {}", list_or_none(&cached))?;
            if !engine.registry().whitelist().is_empty() {
                writeln!(out, "Whitelist: {}", engine.registry().whitelist().join(", "))?;
            }
        }
        "help" | "h" | "?" => writeln!(out, "{HELP}")?,
        other => return Err(anyhow!("unknown meta command `\\{other}`, try \\help")),
    }
    Ok(ReplControl::Continue)
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// `# <version>` followed by one line per command, for each version.
pub fn print_results(out: &mut impl Write, results: &[VersionResults]) -> io::Result<()> {
    for result in results {
        writeln!(out, "# {}", result.version)?;
        for line in &result.lines {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

#[cfg(feature = "repl-rustyline")]
struct ReplLineHelper {
    engine: Arc<QueryEngine>,
}

#[cfg(feature = "repl-rustyline")]
impl ReplLineHelper {
    fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }

    fn pairs(items: impl IntoIterator<Item = String>) -> Vec<rustyline::completion::Pair> {
        items
            .into_iter()
            .map(|item| rustyline::completion::Pair {
                display: item.clone(),
                // Trailing space so a single candidate completes in full.
                replacement: format!("{item} "),
            })
            .collect()
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::Helper for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::highlight::Highlighter for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::hint::Hinter for ReplLineHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::validate::Validator for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::completion::Completer for ReplLineHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);

        if line.starts_with('\\') {
            if start > 0 {
                return Ok((start, Vec::new()));
            }
            let word = &line[..pos];
            let metas = META_COMMANDS
                .iter()
                .filter(|m| m.starts_with(word))
                .map(|m| m.to_string());
            return Ok((0, Self::pairs(metas)));
        }

        Ok((start, Self::pairs(self.engine.completions(&line[..pos]))))
    }
}
