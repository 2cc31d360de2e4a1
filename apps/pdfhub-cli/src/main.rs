//! PDF Hub command line
//!
//! Runs one bridge operation and prints the JSON response on stdout.
//! Logs go to stderr.

use clap::{Parser, Subcommand};
use pdfhub_core::{Bridge, CompressionQuality, OperationRequest, PdfService, ServiceConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pdfhub")]
#[command(version, about = "Merge, split, compress and convert PDF files")]
struct Args {
    /// Pretty-print the JSON response
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge PDFs in the given order
    Merge {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Write one PDF per page selection, e.g. `1-3` `4,6` `7`
    Split {
        file: PathBuf,
        #[arg(short = 'd', long)]
        output_dir: PathBuf,
        #[arg(required = true)]
        ranges: Vec<String>,
    },
    /// Re-encode images and compress streams
    Compress {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// low, medium or high
        #[arg(short, long)]
        quality: Option<CompressionQuality>,
    },
    /// One page per image
    Images {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Extract text, optionally saving it to a .txt file
    Text {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Page count and file size
    Info { file: PathBuf },
}

impl Command {
    fn into_request(self) -> OperationRequest {
        match self {
            Command::Merge { output, files } => OperationRequest::Merge { files, output },
            Command::Split {
                file,
                output_dir,
                ranges,
            } => OperationRequest::Split {
                file,
                ranges,
                output_dir,
            },
            Command::Compress {
                file,
                output,
                quality,
            } => OperationRequest::Compress {
                file,
                output,
                quality,
            },
            Command::Images { output, images } => OperationRequest::ImagesToPdf { images, output },
            Command::Text { file, .. } => OperationRequest::ExtractText { file },
            Command::Info { file } => OperationRequest::PdfInfo { file },
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ServiceConfig::from_env();
    tracing::debug!(?config, "Loaded service configuration");
    let bridge = Bridge::new(PdfService::new(config));

    let save_to = match &args.command {
        Command::Text { output, .. } => output.clone(),
        _ => None,
    };

    let mut response = bridge.handle(args.command.into_request());

    if let (true, Some(output), Some(text)) = (response.success, save_to, response.text.clone()) {
        let saved = bridge.handle(OperationRequest::SaveText { text, output });
        if saved.success {
            response.output = saved.output;
        } else {
            response = saved;
        }
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", json);

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
