use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docintake_db::DbConfig;
use docintake_service::viewer::{load_views, render_text};
use docintake_service::{submit, DocumentFile, HttpService, LocalService, SubmissionForm};
use docintake_store::{content_type_for_key, StoreConfig};
use tokio::net::TcpListener;
use tracing::info;

use docintake_server::config::{ClientArgs, ServeArgs, SubmitArgs};

#[derive(Parser)]
#[command(name = "docintake-server", about = "Trade document intake portal")]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web portal (the default)
    Serve,
    /// Upload files to a running server and record one submission
    Submit(SubmitArgs),
    /// Print every submission, newest first
    List(ClientArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        None | Some(Commands::Serve) => run_server(cli.serve).await,
        Some(Commands::Submit(args)) => run_submit(args).await,
        Some(Commands::List(args)) => run_list(args).await,
    }
}

async fn run_server(args: ServeArgs) -> Result<()> {
    let addr = args.socket_addr()?;

    let store = docintake_store::create_store(&StoreConfig::from_env())?;
    let db = docintake_db::open_database(&DbConfig::from_env()).await?;
    let service = LocalService::new(db, store).with_public_base(&args.public_url);

    let listener = TcpListener::bind(addr).await?;
    info!("docintake-server listening on http://{addr}");

    docintake_server::serve(listener, service, args.max_upload_bytes).await
}

async fn run_submit(args: SubmitArgs) -> Result<()> {
    if args.files.is_empty() {
        bail!("nothing to submit, pass at least one --file CATEGORY=PATH");
    }

    let mut form = SubmissionForm::new(args.company.clone());
    for file in &args.files {
        let data = tokio::fs::read(&file.path)
            .await
            .with_context(|| format!("read {}", file.path.display()))?;
        let filename = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let content_type = content_type_for_key(&filename);
        form.add_file(file.category, DocumentFile::new(filename, content_type, data));
    }

    let service = HttpService::new(&args.client.server);
    service.health_check().await?;

    let report = submit(&service, &form).await?;
    for failure in &report.failures {
        eprintln!(
            "skipped {} ({}): {}",
            failure.filename,
            failure.category.label(),
            failure.message
        );
    }
    eprintln!(
        "Saved submission {} with {} file(s)",
        report.submission.id,
        report.submission.document_paths.total()
    );
    for (category, paths) in report.submission.document_paths.non_empty() {
        for path in paths {
            println!("{category}\t{path}");
        }
    }
    Ok(())
}

async fn run_list(args: ClientArgs) -> Result<()> {
    let service = HttpService::new(&args.server);
    let views = load_views(&service).await?;
    print!("{}", render_text(&views));
    Ok(())
}
