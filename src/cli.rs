use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More logging, repeat for more detail (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8
}

#[derive(Args)]
pub struct GrammarArgs {
    /// File containing the grammar
    pub file: PathBuf,

    /// Start symbol (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>
}

#[derive(Subcommand)]
pub enum Command {
    /// Print every derivation of each sentence
    Parse {
        #[command(flatten)]
        grammar: GrammarArgs,

        /// Sentences to parse
        #[arg(required = true)]
        sentences: Vec<String>
    },

    /// Print random sentences of the grammar
    Generate {
        #[command(flatten)]
        grammar: GrammarArgs,

        /// Amount to generate (default: 1)
        #[arg(short = 'n', long, value_name = "AMOUNT")]
        amount: Option<u32>
    }
}
