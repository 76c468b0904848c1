use std::{fs, io::Write};

use anyhow::Context;
use colored::Colorize;
use log::info;

use nfa2dfa::{save_results, Alphabet, MatchOutcome, Nfa};

mod args;

use args::Config;

fn main() {
    let config = match Config::parse(&mut lexopt::Parser::from_env()) {
        Ok(Some(config)) => config,
        Ok(None) => {
            print!("{}", Config::usage());
            return;
        }
        Err(err) => exit_with_error(err),
    };

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    if !config.color {
        colored::control::set_override(false);
    }

    if let Err(err) = run(&config) {
        exit_with_error(err);
    }
}

fn exit_with_error(err: anyhow::Error) -> ! {
    let message = if std::env::var("RUST_BACKTRACE").map_or(false, |v| v == "1") {
        format!("{:?}", err)
    } else {
        format!("{:#}", err)
    };
    let _ = writeln!(&mut std::io::stderr(), "{} {}", "error:".red().bold(), message);
    std::process::exit(1);
}

fn run(config: &Config) -> anyhow::Result<()> {
    let nfa = Nfa::from_file(&config.nfa, &config.epsilon).context("failed to load the NFA")?;

    let alphabet = match &config.alphabet {
        Some(symbols) => Alphabet::new(symbols.chars().filter(|symbol| !symbol.is_whitespace())),
        None => Alphabet::from_nfa(&nfa),
    };
    alphabet.ensure_excludes(&config.epsilon)?;
    info!("alphabet: {:?}", alphabet.symbols());

    let dfa = nfa.to_dfa(&alphabet);
    dfa.save(&config.output).context("failed to save the DFA")?;

    if let Some(dot_dir) = &config.dot_dir {
        fs::create_dir_all(dot_dir)
            .with_context(|| format!("failed to create {}", dot_dir.display()))?;
        nfa.dump(dot_dir.join("nfa.dot"))?;
        dfa.dump(dot_dir.join("dfa.dot"))?;
    }

    if !config.quiet {
        println!("{}", dfa);
    }

    let words = fs::read_to_string(&config.words)
        .with_context(|| format!("failed to read words from {}", config.words.display()))?;
    let results = dfa.run_words(&words);
    save_results(&config.results, &results).context("failed to save the results")?;

    if !config.quiet {
        println!("\n{}", "Word results:".bold());
        for result in results.iter() {
            match result.outcome {
                MatchOutcome::Accepted => println!("{}", result.to_string().green()),
                MatchOutcome::Rejected(_) => println!("{}", result.to_string().red()),
            }
        }
    }

    Ok(())
}
