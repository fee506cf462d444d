use clap::{Parser, Subcommand};
use client::{Config, config::timeout_from_secs};
use tracing_subscriber::{EnvFilter, fmt};

mod camera;
mod shell;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Backend base URL, overrides VERIFIKASI_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds, 0 disables it
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode text with the routing table
    Encode { text: String },

    /// Decode a routing token
    Decode { token: String },

    /// Build the X-Slice header for a backend operation
    Slice { controller: String, function: String },

    /// Interactive client
    Shell {
        /// Camera ids the console camera reports, comma separated
        #[arg(long, value_delimiter = ',', default_value = "back")]
        cameras: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Encode { text } => println!("{}", slice::encode(&text)),
        Command::Decode { token } => println!("{}", slice::decode(&token)),
        Command::Slice {
            controller,
            function,
        } => println!("{}", slice::make_slice(&controller, &function)),
        Command::Shell { cameras } => {
            let mut config = Config::load()?;
            if let Some(api_url) = args.api_url {
                config.api_url = api_url;
            }
            if let Some(secs) = args.timeout_secs {
                config.timeout = timeout_from_secs(secs);
            }

            shell::run(config, cameras).await?;
        }
    }

    Ok(())
}
