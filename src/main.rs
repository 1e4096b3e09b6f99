mod cli;

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use topdown::error_handling::{Error, ErrorType, Location};
use topdown::generator::{self, GenerateError};
use topdown::reader;
use topdown::{Grammar, TopDownParser};

use cli::{Cli, Command, GrammarArgs};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn print_errors<T: ErrorType>(errors: &[Error<T>]) {
    for error in errors {
        eprintln!("{}", error);
    }
}

fn load_grammar(args: &GrammarArgs) -> Option<Grammar> {
    let grammar = match reader::read_file(&args.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            print_errors(&errors);
            return None;
        }
    };

    Some(match &args.start {
        Some(start) => grammar.with_start(start.clone()),
        None => grammar,
    })
}

fn parse_sentences(grammar: &Grammar, sentences: &[String]) -> bool {
    let parser = TopDownParser::new(grammar);
    let mut ok = true;

    for sentence in sentences {
        println!("==========================");
        println!("{}", sentence);
        println!("--------------------------");

        match parser.parse_sentence(sentence) {
            Ok(parses) => {
                let mut count = 0;
                for (index, (tree, _)) in parses.enumerate() {
                    println!("Parse #{}:\n{}", index, tree);
                    count += 1;
                }
                println!("--------------------------");
                println!("Count: {}", count);
            }
            Err(e) => {
                eprintln!("{}: {}", sentence, e);
                ok = false;
            }
        }
    }

    ok
}

fn generate_sentences(grammar: &Grammar, args: &GrammarArgs, amount: u32) -> bool {
    let mut rng = rand::thread_rng();

    for _ in 0..amount {
        match generator::generate(grammar, &mut rng) {
            Ok(tree) => println!("{}", generator::sentence(&tree)),
            Err(error) => {
                print_errors(&[GenerateError {
                    location: Location {
                        file: args.file.clone(),
                        line: 0
                    },
                    error
                }]);
                return false;
            }
        }
    }

    true
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ok = match &cli.command {
        Command::Parse { grammar, sentences } => load_grammar(grammar)
            .is_some_and(|g| parse_sentences(&g, sentences)),
        Command::Generate { grammar, amount } => load_grammar(grammar)
            .is_some_and(|g| generate_sentences(&g, grammar, amount.unwrap_or(1))),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
