mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "owasp-terminal",
    about = "Exploit the OWASP Top 10 from a fake hacker terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: ~/.owasp-terminal)
    #[arg(long, global = true, env = "OWASP_TERMINAL_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Never contact the text-generation service
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all levels with completion marks
    Levels,

    /// Show the briefing for a level
    Show { id: u32 },

    /// Open an interactive console for a level
    Play { id: u32 },

    /// Submit one command for a level
    Submit {
        id: u32,
        /// The exploit command (joined with spaces)
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show score and progress
    Status,

    /// Forget all progress
    Reset,

    /// Start the HTTP game server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3141")]
        port: u16,
        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Levels => cmd::levels::run(&root, cli.json),
        Commands::Show { id } => cmd::show::run(&root, id, cli.offline, cli.json),
        Commands::Play { id } => cmd::play::run(&root, id, cli.offline),
        Commands::Submit { id, command } => {
            cmd::submit::run(&root, id, &command.join(" "), cli.offline, cli.json)
        }
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Reset => cmd::reset::run(&root, cli.json),
        Commands::Serve { port, no_open } => cmd::serve::run(&root, port, no_open, cli.offline),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
