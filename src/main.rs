use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pixdrop::api;
use pixdrop::models::{AppConfig, Control, PipelineStatus};
use pixdrop::server;

#[derive(Parser)]
#[command(name = "pixdrop")]
#[command(about = "Pixdrop - live transform previews from the image processing service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP view bridge
    Serve,
    /// Process one image and write the result
    Process {
        /// Source image
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to `<input stem>.processed.<ext>`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resize width in pixels (needs --height)
        #[arg(long)]
        width: Option<f64>,

        /// Resize height in pixels (needs --width)
        #[arg(long)]
        height: Option<f64>,

        /// Contrast adjustment, 0 for none
        #[arg(short, long, allow_hyphen_values = true)]
        contrast: Option<f64>,

        /// Print the transforms field instead of calling the service
        #[arg(long)]
        dry_run: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixdrop API",
        description = "View bridge of the transform-pipeline preview client",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_state,
        api::handle_events,
        api::handle_select,
        api::handle_clear,
        api::handle_source_image,
        api::handle_source_data_url,
        api::handle_control,
        api::handle_directive,
        api::handle_refresh,
        api::handle_preview,
        api::handle_preview_data_url,
    ),
    components(schemas(
        api::StateResponse,
        api::SelectionInfo,
        api::ArtifactInfo,
        api::ErrorInfo,
        api::SelectionResponse,
        api::ControlRequest,
        api::DirectiveRequest,
        api::ChangeResponse,
    )),
    tags(
        (name = "State", description = "Published pipeline state"),
        (name = "Selection", description = "Source image selection"),
        (name = "Transforms", description = "Transform controls and directives"),
        (name = "Preview", description = "Processed preview retrieval")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Process {
            input,
            output,
            width,
            height,
            contrast,
            dry_run,
        }) => run_process_command(&input, output, width, height, contrast, dry_run).await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Load config from CONFIG_FILE, with PROCESS_ENDPOINT overriding the endpoint
fn load_config() -> AppConfig {
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let mut config = AppConfig::load(config_file.as_deref());
    if let Ok(endpoint) = std::env::var("PROCESS_ENDPOINT") {
        config.endpoint = endpoint;
    }
    config
}

/// Process a single image through the coordinator
async fn run_process_command(
    input: &Path,
    output: Option<PathBuf>,
    width: Option<f64>,
    height: Option<f64>,
    contrast: Option<f64>,
    dry_run: bool,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixdrop=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = Arc::new(load_config());
    let delimiter = config.directive_delimiter.to_string();
    let state = server::create_app_state(config)?;
    let coordinator = state.coordinator;

    // Controls first: without a selection they only shape the directives
    for (control, value) in [
        (Control::Width, width),
        (Control::Height, height),
        (Control::Contrast, contrast),
    ] {
        if value.is_some() {
            coordinator.set_control(control, value).await;
        }
    }

    if dry_run {
        let transforms = coordinator.snapshot().transforms;
        println!("{}", transforms.join(&delimiter));
        return Ok(());
    }

    let bytes = std::fs::read(input)?;
    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().to_string());
    coordinator
        .select_file(Some(Arc::from(bytes)), filename.as_deref())
        .await;

    let snapshot = coordinator.wait_settled().await;
    match (snapshot.status, snapshot.artifact) {
        (PipelineStatus::ReadyWithArtifact, Some(artifact)) => {
            let extension = artifact
                .mime
                .strip_prefix("image/")
                .map(|ext| if ext == "jpeg" { "jpg" } else { ext })
                .unwrap_or("bin")
                .to_string();
            let output = output.unwrap_or_else(|| default_output(input, &extension));
            std::fs::write(&output, &artifact.bytes)?;
            println!(
                "Processed {} -> {} ({} bytes, transforms: [{}])",
                input.display(),
                output.display(),
                artifact.size(),
                artifact.transforms.join(", ")
            );
            Ok(())
        }
        _ => {
            let message = snapshot
                .failure
                .map(|f| f.message)
                .unwrap_or_else(|| format!("pipeline ended in state {}", snapshot.status));
            Err(anyhow::anyhow!("Processing failed: {message}"))
        }
    }
}

fn default_output(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}.processed.{extension}"))
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let endpoint = std::env::var("PROCESS_ENDPOINT").ok();

    println!("Pixdrop v{VERSION}");
    println!("Transform-pipeline preview client\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR        = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE      = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  PROCESS_ENDPOINT = {}",
        endpoint.as_deref().unwrap_or("(not set)")
    );

    let config = load_config();
    println!("\nEffective Configuration:");
    println!("  Endpoint:    {}", config.endpoint);
    println!("  Timeout:     {}s", config.request_timeout_secs);
    println!("  Delimiter:   '{}'", config.directive_delimiter);
    println!("  Default ext: {}", config.default_extension);
    println!("  Max upload:  {} bytes", config.max_upload_bytes);
    println!(
        "  On error:    {}",
        if config.keep_artifact_on_error {
            "keep previous preview"
        } else {
            "clear preview"
        }
    );

    println!("\nCommands:");
    println!("  pixdrop serve     Start the HTTP view bridge");
    println!("  pixdrop process   Process one image to a file");
    println!("\nRun 'pixdrop --help' for more details.");
}

/// Run the HTTP view bridge
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixdrop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = Arc::new(load_config());
    tracing::info!(
        endpoint = %config.endpoint,
        delimiter = %config.directive_delimiter,
        "Processing service configured"
    );

    let state = server::create_app_state(config)?;

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Pixdrop view bridge listening");

    axum::serve(listener, app).await?;

    Ok(())
}
