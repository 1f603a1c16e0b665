use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, search, show, track};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelkeeper")]
#[command(about = "Reelkeeper - Track what you want to watch and what you've seen")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the movie database by title
    #[command(long_about = "Search the OMDb database by free-text title. Shows up to the first 10 candidates; rows already on one of your lists are flagged so you don't add them twice.")]
    Search {
        /// Title to search for
        query: Vec<String>,
    },

    /// Add a title to your to-watch list
    #[command(long_about = "Look up a title by its IMDb identifier (e.g. tt1375666, shown in search results) and add it to the to-watch list.")]
    Add {
        /// IMDb identifier of the title
        imdb_id: String,
    },

    /// Mark a title as watched
    #[command(long_about = "Look up a title by its IMDb identifier and add it to the watched list. A title already on the to-watch list transfers instead of duplicating.")]
    Watched {
        /// IMDb identifier of the title
        imdb_id: String,

        /// Star rating to set immediately (1-5)
        #[arg(long)]
        rating: Option<u8>,
    },

    /// Rate a watched title
    #[command(long_about = "Set the star rating (1-5) on a title in the watched list. A rating of 0 clears it.")]
    Rate {
        /// IMDb identifier of the title
        imdb_id: String,

        /// Stars, 0-5 (0 clears the rating)
        stars: u8,
    },

    /// Remove a title from a list
    Remove {
        /// IMDb identifier of the title
        imdb_id: String,

        /// Remove from the watched list instead of the to-watch list
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,
    },

    /// Show your tracked lists
    List {
        /// Show only the to-watch list
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "watched")]
        to_watch: bool,

        /// Show only the watched list
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,
    },

    /// Configure the OMDb API key
    #[command(long_about = "Manage configuration. Running without a subcommand shows the current configuration; use 'set-key' to store an OMDb API key (free keys at https://www.omdbapi.com/apikey.aspx).")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },

    /// Clear stored lists and configuration
    Clear {
        /// Clear everything
        #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["data", "config"])]
        all: bool,

        /// Clear the stored lists
        #[arg(long, action = ArgAction::SetTrue)]
        data: bool,

        /// Clear the configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        config: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the full API key instead of a masked value
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Set the OMDb API key
    SetKey {
        /// API key (if not provided, will prompt)
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => search::run_search(&query.join(" "), &output).await,
        Commands::Add { imdb_id } => track::run_add(&imdb_id, &output).await,
        Commands::Watched { imdb_id, rating } => {
            track::run_watched(&imdb_id, rating, &output).await
        }
        Commands::Rate { imdb_id, stars } => track::run_rate(&imdb_id, stars, &output),
        Commands::Remove { imdb_id, watched } => track::run_remove(&imdb_id, watched, &output),
        Commands::List { to_watch, watched } => show::run_list(to_watch, watched, &output),
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output)
        }
        Commands::Clear { all, data, config } => clear::run_clear(all, data, config, &output),
    }
}
