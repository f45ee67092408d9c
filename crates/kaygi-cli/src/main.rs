mod commands;
mod output;

use clap::{Parser, Subcommand};
use kaygi_core::session::Session;
use kaygi_core::settings::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kaygi",
    version,
    about = "Anxiety-severity prediction with a history log, PDF reports and simulated e-mail"
)]
struct Cli {
    /// Settings file (default: kaygi.json in the working directory, if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the form, predict the anxiety level and record it in the history
    Predict {
        #[command(flatten)]
        form: commands::predict::FormArgs,

        /// Read the form from a JSON file instead of flags
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show past predictions
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Write the most recent prediction as a PDF report
    Report {
        /// Destination file (default: the configured report file name)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Send the latest PDF report to an e-mail address (simulated)
    Send {
        /// Recipient address
        address: String,
    },
    /// Show the loaded model and the features it expects
    Model,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Remove every recorded prediction (the column header is kept)
    Clear,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match Settings::discover(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    log::debug!("settings: {settings:?}");
    let session = Session::open(&settings);

    let result = match cli.command {
        Commands::Predict {
            form,
            input,
            output,
        } => commands::predict::run(&session, form, input, &output),
        Commands::History { action, output } => match action {
            None => commands::history::show(&session, &output),
            Some(HistoryAction::Clear) => commands::history::clear(&session),
        },
        Commands::Report { out } => commands::report::run(&session, out),
        Commands::Send { address } => commands::send::run(&session, &address),
        Commands::Model => commands::model::run(&session),
    };

    if let Err(e) = result {
        if e.is_informational() {
            println!("ℹ️  {e}");
            return;
        }
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
