use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::catalog::CatalogCommand;
use commands::GlobalArgs;

#[derive(Parser, Debug)]
#[command(
    name = "relmap",
    version,
    about = "Explore explicit and implied table relationships in a Postgres catalog"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the MCP server exposing the catalog tools.
    Serve(commands::serve::ServeArgs),

    /// Show explicit and implied relationships of a table.
    Relationships {
        table: String,
    },

    /// List all schemas.
    Schemas,

    /// List tables and views of the schema.
    Tables {
        /// Name pattern; `*` and `?` as well as SQL `%` and `_` are accepted.
        #[arg(long = "name-like")]
        name_like: Option<String>,

        #[arg(long, default_value_t = false)]
        case_sensitive: bool,
    },

    /// Describe the columns of a table.
    Describe {
        table: String,
    },

    /// List declared foreign keys of a table.
    ForeignKeys {
        table: String,
    },

    /// Show the detected cloud provider and its deployment notes.
    Cloud,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the stdio transport keeps stdout to itself.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve(args) => commands::serve::execute(&cli.global, args).await?,
        Command::Relationships { table } => {
            commands::catalog::execute(&cli.global, CatalogCommand::Relationships { table }).await?
        }
        Command::Schemas => commands::catalog::execute(&cli.global, CatalogCommand::Schemas).await?,
        Command::Tables {
            name_like,
            case_sensitive,
        } => {
            commands::catalog::execute(
                &cli.global,
                CatalogCommand::Tables {
                    name_like,
                    case_sensitive,
                },
            )
            .await?
        }
        Command::Describe { table } => {
            commands::catalog::execute(&cli.global, CatalogCommand::Describe { table }).await?
        }
        Command::ForeignKeys { table } => {
            commands::catalog::execute(&cli.global, CatalogCommand::ForeignKeys { table }).await?
        }
        Command::Cloud => commands::cloud::execute(&cli.global)?,
    }

    Ok(())
}
