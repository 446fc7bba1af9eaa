use std::io::{BufRead, Write};
use std::path::PathBuf;

use album_client::controller::AlbumController;
use album_client::file::UploadFile;
use album_client::format::format_size;
use album_client::gateway::GatewayClient;
use album_client::state::AlbumState;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "album", version, about = "Browse and manage the shared photo album")]
struct Cli {
    #[arg(
        long,
        env = "ALBUM_API_URL",
        default_value = "http://localhost:8001",
        help = "Address of the album API"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List photos, newest first
    List,
    /// Upload photos, shrinking large ones first
    Upload {
        #[arg(required = true, value_name = "FILE")]
        paths: Vec<PathBuf>,
    },
    /// Delete photos by url
    Delete {
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
        #[arg(short, long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut controller = AlbumController::new(GatewayClient::new(cli.api_url));

    match cli.command {
        Command::List => {
            controller.mount().await;
            print_images(controller.state());
        }
        Command::Upload { paths } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                let file = UploadFile::from_path(path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?;
                files.push(file);
            }

            let mut updates = controller.subscribe();
            let progress = tokio::spawn(async move {
                let mut last = 0;
                while updates.changed().await.is_ok() {
                    let current = updates.borrow_and_update().upload_progress;
                    if current != last && current > 0 {
                        eprintln!("uploading... {current}%");
                    }
                    last = current;
                }
            });

            controller.upload(files).await;
            progress.abort();
            settle(&controller)?;
            print_images(controller.state());
        }
        Command::Delete { urls, yes } => {
            let sent = if yes {
                controller.delete(urls, &mut |_: &str| true).await
            } else {
                controller.delete(urls, &mut ask).await
            };
            if !sent {
                eprintln!("nothing deleted");
                return Ok(());
            }
            settle(&controller)?;
            print_images(controller.state());
        }
    }

    Ok(())
}

/// Fails with the pending notice, if any
fn settle(controller: &AlbumController) -> anyhow::Result<()> {
    if let Some(notice) = &controller.state().notice {
        bail!("{notice}");
    }
    Ok(())
}

fn ask(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush().ok();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_images(state: &AlbumState) {
    if state.images.is_empty() {
        println!("No photos yet");
        return;
    }
    for image in &state.images {
        println!(
            "{}  {:>9}  {}",
            image.uploaded_at.format("%Y-%m-%d %H:%M"),
            format_size(image.size),
            image.url
        );
    }
    println!("{} photos", state.images.len());
}
