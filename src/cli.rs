use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use log::info;
use songmore::clients::errors::Result;
use songmore::server;
use songmore::service::{ConfigBuilder, SongService};

#[derive(Parser)]
#[command(name = "songmore")]
#[command(version, about = "Serve song previews for a guessing game", long_about = None)]
struct Cli {
    /// Catalogue API base URL (overrides SONGMORE_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides SONGMORE_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Pick a track from a playlist and print it, without fetching audio
    Pick {
        /// Playlist ID or genre name
        playlist: String,
        #[arg(long)]
        seed: Option<String>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = ConfigBuilder::new();
    if let Some(api_base) = cli.api_base {
        builder = builder.api_base(api_base);
    }

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                builder = builder.bind(bind);
            }
            info!("Building config ...");
            server::serve(builder.build()?).await
        }
        Commands::Pick { playlist, seed } => pick(builder, &playlist, seed.as_deref()).await,
    }
}

async fn pick(builder: ConfigBuilder, playlist: &str, seed: Option<&str>) -> Result<()> {
    let config = builder.build()?;
    let service = SongService::new(&config)?;
    let playlist_id = match service.genres().playlist_id(playlist) {
        Some(id) => id.to_string(),
        None => playlist.to_string(),
    };

    let picked = service.pick(&playlist_id, seed).await?;
    println!(
        "#{} {} - {}\n{}",
        picked.index, picked.track.artist.name, picked.track.title, picked.track.preview
    );
    Ok(())
}
