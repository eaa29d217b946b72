use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use crate::display::{print_error, print_section, print_success, stats_table};
use crate::error::SeqFormResult;
use crate::games::{Goofspiel, KuhnPoker, LeducHoldem, LiarsDice};
use crate::sequence_form::{build, SequenceForm};

#[derive(Parser)]
#[command(
    name = "seqform",
    version = "1.0.0",
    about = "Convert imperfect-information games to sequence form."
)]
struct Cli {
    /// Log more (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum GameKind {
    Kuhn,
    Leduc,
    Goofspiel,
    #[value(name = "liars-dice")]
    LiarsDice,
}

#[derive(Args)]
struct GameArgs {
    /// Game to convert
    game: GameKind,
    /// Card ranks, lowest first (Leduc default JQK, Goofspiel default A234)
    #[arg(short, long)]
    cards: Option<String>,
    /// Dice per player (Liar's Dice)
    #[arg(short, long, default_value = "1")]
    dice: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the sequence form of a game and write it as JSON
    Build {
        #[command(flatten)]
        game: GameArgs,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print the size of a game's sequence form
    Stats {
        #[command(flatten)]
        game: GameArgs,
    },
    /// Load a sequence-form JSON file and check its layout
    Check {
        /// JSON file produced by `build`
        path: PathBuf,
    },
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    dispatch(cli);
}

fn dispatch(cli: Cli) {
    init_logging(cli.verbose);
    let result = match cli.command {
        Commands::Build {
            game,
            output,
            pretty,
        } => cmd_build(&game, output, pretty),
        Commands::Stats { game } => cmd_stats(&game),
        Commands::Check { path } => cmd_check(path),
    };
    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // A second init (e.g. repeated run_with_args) keeps the first logger.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn build_game(args: &GameArgs) -> SeqFormResult<SequenceForm<String, String>> {
    match args.game {
        GameKind::Kuhn => build(&KuhnPoker::new()),
        GameKind::Leduc => match &args.cards {
            Some(cards) => build(&LeducHoldem::with_ranks(cards)?),
            None => build(&LeducHoldem::new()),
        },
        GameKind::Goofspiel => match &args.cards {
            Some(cards) => build(&Goofspiel::with_cards(cards)?),
            None => build(&Goofspiel::new()),
        },
        GameKind::LiarsDice => build(&LiarsDice::new(args.dice)?),
    }
}

fn cmd_build(args: &GameArgs, output: Option<PathBuf>, pretty: bool) -> SeqFormResult<()> {
    let form = build_game(args)?;
    let json = if pretty {
        form.to_json_pretty()?
    } else {
        form.to_json()?
    };
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!("wrote {}", path.display());
            print_success(&format!("Wrote {}", path.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_stats(args: &GameArgs) -> SeqFormResult<()> {
    let form = build_game(args)?;
    print_section("Sequence form", &stats_table(&form));
    Ok(())
}

fn cmd_check(path: PathBuf) -> SeqFormResult<()> {
    let json = std::fs::read_to_string(&path)?;
    let form: SequenceForm<serde_json::Value, serde_json::Value> = SequenceForm::from_json(&json)?;
    form.validate()?;
    print_section("Sequence form", &stats_table(&form));
    print_success(&format!("{} is a valid sequence form", path.display()));
    Ok(())
}
