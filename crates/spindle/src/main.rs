use clap::{Parser, Subcommand};
use spindle::roster::{ItemLabel, Roster};
use std::io::Write;
use std::os::unix::net::UnixStream;

const SOCKET_PATH: &str = "/tmp/rondel.sock";

#[derive(Parser, Debug)]
#[command(name = "spindle", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the wheel overlay
    Show,
    /// Hide the wheel overlay
    Hide,
    /// Spin the wheel (shows the overlay if it is hidden)
    Spin,
    /// Add an item to the wheel
    Add {
        /// The item name; quoting is optional, trailing words are joined
        name: Vec<String>,
    },
    /// Remove the item at the given position (as printed by `list`)
    Remove { index: usize },
    /// Remove every item from the wheel
    Clear,
    /// Print the saved items in slice order
    List,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send_command("show"),
        Commands::Hide => send_command("hide"),
        Commands::Spin => send_command("spin"),
        Commands::Add { name } => add(&name.join(" ")),
        Commands::Remove { index } => send_command(&format!("remove {}", index)),
        Commands::Clear => send_command("clear"),
        Commands::List => list(),
    }
}

fn add(raw: &str) -> anyhow::Result<()> {
    let label = ItemLabel::normalized(raw)
        .ok_or_else(|| anyhow::anyhow!("Nothing to add: the item name is empty."))?;
    send_command(&format!("add {}", label))
}

fn list() -> anyhow::Result<()> {
    for (index, item) in Roster::load_or_seed().iter().enumerate() {
        println!("{:>3}  {}", index, item);
    }
    Ok(())
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to the rondel daemon at {}: {}. Is rondel running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
