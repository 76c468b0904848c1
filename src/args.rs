use std::path::PathBuf;

use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};

const USAGE: &str = "\
Converts an NFA into a DFA by subset construction and runs words against it.

USAGE:
    nfa2dfa [OPTIONS] [NFA_FILE]

ARGS:
    <NFA_FILE>    NFA definition to convert [default: nfa.txt]

OPTIONS:
    -o, --output <PATH>      where to write the DFA [default: output.txt]
    -w, --words <PATH>       words to test, one per line [default: words.txt]
    -r, --results <PATH>     where to write the results [default: results.txt]
    -a, --alphabet <SYMS>    alphabet to build over, e.g. 01 [default: symbols used by the NFA]
    -e, --epsilon <TOKEN>    symbol token meaning epsilon [default: h]
        --dot <DIR>          also write DIR/nfa.dot and DIR/dfa.dot
        --no-color           disable colored output
    -q, --quiet              do not print the DFA listing or the results
    -v, --verbose            raise log verbosity, repeatable
    -h, --help               print this message
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub nfa: PathBuf,
    pub output: PathBuf,
    pub words: PathBuf,
    pub results: PathBuf,
    pub alphabet: Option<String>,
    pub epsilon: String,
    pub dot_dir: Option<PathBuf>,
    pub color: bool,
    pub quiet: bool,
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nfa: PathBuf::from("nfa.txt"),
            output: PathBuf::from("output.txt"),
            words: PathBuf::from("words.txt"),
            results: PathBuf::from("results.txt"),
            alphabet: None,
            epsilon: "h".to_string(),
            dot_dir: None,
            color: true,
            quiet: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Parses the command line. `Ok(None)` means help was requested.
    pub fn parse(p: &mut Parser) -> anyhow::Result<Option<Config>> {
        let mut config = Config::default();
        let mut nfa = None;

        while let Some(arg) = p.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(None),
                Arg::Short('o') | Arg::Long("output") => {
                    config.output = p.value().context("--output")?.into();
                }
                Arg::Short('w') | Arg::Long("words") => {
                    config.words = p.value().context("--words")?.into();
                }
                Arg::Short('r') | Arg::Long("results") => {
                    config.results = p.value().context("--results")?.into();
                }
                Arg::Short('a') | Arg::Long("alphabet") => {
                    config.alphabet = Some(p.value()?.string().context("--alphabet")?);
                }
                Arg::Short('e') | Arg::Long("epsilon") => {
                    let epsilon = p.value()?.string().context("--epsilon")?;
                    if epsilon.is_empty() || epsilon.contains(char::is_whitespace) {
                        anyhow::bail!("--epsilon: token must be non-empty and without whitespace");
                    }
                    config.epsilon = epsilon;
                }
                Arg::Long("dot") => {
                    config.dot_dir = Some(p.value().context("--dot")?.into());
                }
                Arg::Long("no-color") => config.color = false,
                Arg::Short('q') | Arg::Long("quiet") => config.quiet = true,
                Arg::Short('v') | Arg::Long("verbose") => {
                    config.verbosity = config.verbosity.saturating_add(1);
                }
                Arg::Value(value) if nfa.is_none() => nfa = Some(PathBuf::from(value)),
                arg => return Err(arg.unexpected().into()),
            }
        }

        if let Some(nfa) = nfa {
            config.nfa = nfa;
        }
        Ok(Some(config))
    }

    pub fn usage() -> &'static str {
        USAGE
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
