use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use tracefish_document_manager::config::ConfigLoader;
use tracefish_document_manager::domain::{DocumentNumber, DocumentRequest, PDF_MEDIA_TYPE};
use tracefish_document_manager::download::HttpArtifactDownloader;
use tracefish_document_manager::error::DocError;
use tracefish_document_manager::generation::GenerationHttpClient;
use tracefish_document_manager::output::{ConsoleNotifier, JsonOutput, OutputMode};
use tracefish_document_manager::pipeline::{DocumentPipeline, Notice, Notifier, RunReport};
use tracefish_document_manager::platform::{NativePlatform, Platform, SharePayload};
use tracefish_document_manager::storage::Store;

#[derive(Parser)]
#[command(name = "tracefish-doc")]
#[command(about = "Fetch, store and hand off compliance PDFs for traceability records")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Generate the compliance document for a record and save it locally")]
    Generate(GenerateArgs),
    #[command(about = "Open a previously saved document in the system viewer")]
    Open(FileArgs),
    #[command(about = "Hand a previously saved document to the share integration")]
    Share(ShareArgs),
}

#[derive(Args)]
struct GenerateArgs {
    record_id: String,

    #[arg(long)]
    document_no: String,

    #[arg(long)]
    open: bool,

    #[arg(long)]
    share: bool,
}

#[derive(Args)]
struct FileArgs {
    path: String,
}

#[derive(Args)]
struct ShareArgs {
    path: String,

    #[arg(long)]
    document_no: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(doc) = report.downcast_ref::<DocError>() {
            return ExitCode::from(map_exit_code(doc));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &DocError) -> u8 {
    match error {
        DocError::MissingConfig
        | DocError::ConfigRead(_)
        | DocError::ConfigParse(_)
        | DocError::InvalidBaseUrl(_)
        | DocError::MissingCredential(_)
        | DocError::InvalidRecordId(_)
        | DocError::InvalidDocumentNumber(_)
        | DocError::PermissionDenied => 2,
        DocError::GenerationHttp(_)
        | DocError::ServerError { .. }
        | DocError::InvalidGenerationResponse
        | DocError::DownloadHttp(_)
        | DocError::DownloadFailed { .. }
        | DocError::EmptyArtifact => 3,
        _ => 1,
    }
}

/// User-facing advice per failure class, mirrored on the service help desk
/// scripts.
fn advice(error: &DocError) -> &'static str {
    match error {
        DocError::ServerError { .. } | DocError::GenerationHttp(_) => {
            "Server error occurred. Please check your connection and try again."
        }
        DocError::DownloadFailed { .. } | DocError::DownloadHttp(_) => {
            "Failed to download PDF. The file may be temporarily unavailable."
        }
        DocError::EmptyArtifact => "The generated PDF file is empty. Please contact support.",
        DocError::PermissionDenied => {
            "Storage permission denied. Please enable storage access in settings."
        }
        DocError::AllStorageTargetsFailed { .. } => {
            "Failed to save the PDF. Please check available storage."
        }
        _ => "Failed to generate document. Please try again.",
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    match cli.command {
        Commands::Generate(args) => run_generate(args, cli.config.as_deref(), output_mode),
        Commands::Open(args) => run_open(args),
        Commands::Share(args) => run_share(args),
    }
}

fn run_generate(
    args: GenerateArgs,
    config_path: Option<&str>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let config = ConfigLoader::resolve(config_path)?;
    let token = std::env::var(&config.token_env)
        .map_err(|_| DocError::MissingCredential(config.token_env.clone()))?;

    let request = DocumentRequest::new(args.record_id.parse()?, args.document_no.parse()?);

    let generation = GenerationHttpClient::new(&config.api_base_url, &token)?;
    let downloader = HttpArtifactDownloader::new()?;
    let store = Store::resolve(&config)?;
    let pipeline = DocumentPipeline::new(generation, downloader, NativePlatform, store);

    let sink: Box<dyn Notifier> = match output_mode {
        OutputMode::Interactive => Box::new(ConsoleNotifier),
        OutputMode::NonInteractive => Box::new(JsonOutput),
    };

    let persisted = match pipeline.run(&request, sink.as_ref()) {
        Ok(persisted) => persisted,
        Err(err) => {
            sink.notify(Notice::error("Generation Failed", advice(&err)));
            return Err(err.into());
        }
    };

    if matches!(output_mode, OutputMode::NonInteractive) {
        JsonOutput::print_report(&RunReport::new(&request, &persisted)).into_diagnostic()?;
    }

    if args.open {
        if let Err(err) = pipeline.open(&persisted) {
            tracing::debug!(error = %err, "viewer handoff failed");
            sink.notify(Notice::error("Open Failed", "No app available to open PDF files."));
        }
    }
    if args.share {
        if let Err(err) = pipeline.share(&request, &persisted) {
            tracing::debug!(error = %err, "share handoff failed");
            sink.notify(Notice::error(
                "Share Failed",
                "Unable to share PDF file. Please try opening the file directly.",
            ));
        }
    }

    Ok(())
}

fn run_open(args: FileArgs) -> miette::Result<()> {
    let path = Utf8PathBuf::from(args.path);
    NativePlatform.open_file(&path)?;
    Ok(())
}

fn run_share(args: ShareArgs) -> miette::Result<()> {
    let document_no: DocumentNumber = args.document_no.parse()?;
    let path = Utf8PathBuf::from(args.path);
    let payload = SharePayload {
        title: format!("Traceability Record - {document_no}"),
        message: format!("Traceability Record PDF: {document_no}"),
        file: path,
        media_type: PDF_MEDIA_TYPE.to_string(),
    };
    NativePlatform.share_file(&payload)?;
    Ok(())
}
