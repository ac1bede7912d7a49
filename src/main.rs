mod cli;

use screenguard::{
    config,
    probe::{self, Prober, VideoMetadata},
    requirements::RequirementsStore,
    server,
    service::ValidationService,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // CLI flags win over the config file
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting Screenguard server");
    tracing::info!(
        "Requirements document: {}",
        config.validation.requirements_path.display()
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "screenguard=trace,screenguard_av=trace,tower_http=debug".to_string()
        } else {
            "screenguard=debug,screenguard_av=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Probe { file, json } => probe_file(&file, cli.config.as_deref(), json),
        Commands::Check { file, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            let valid = rt.block_on(check_file(&file, cli.config.as_deref(), json))?;
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("screenguard {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn probe_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let prober = probe::ffprobe_from_config(&config.tools);
    let report = prober.probe(file)?;
    let metadata = VideoMetadata::from_report(&report);

    if json {
        let value = serde_json::json!({
            "file": file,
            "metadata": metadata.as_ref().ok(),
            "error": metadata.as_ref().err().map(|e| e.to_string()),
            "streams": report.streams,
            "format": report.format,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    if let Some(ref format) = report.format {
        if let Some(ref name) = format.format_name {
            println!("Container: {}", name);
        }
        if let Some(ref duration) = format.duration {
            println!("Duration: {} s", duration);
        }
        if let Some(ref size) = format.size {
            println!("Size: {} bytes", size);
        }
    }

    println!("\nStreams: {}", report.streams.len());
    for stream in &report.streams {
        print!(
            "  [{}] {} {}",
            stream.index,
            stream.codec_type.as_deref().unwrap_or("unknown"),
            stream.codec_name.as_deref().unwrap_or("?")
        );
        if let (Some(w), Some(h)) = (stream.width, stream.height) {
            print!(" {}x{}", w, h);
        }
        if let Some(rate) = stream.frame_rate_expr() {
            print!(" @ {}", rate);
        }
        println!();
    }

    println!();
    match metadata {
        Ok(meta) => println!(
            "Video: {} (normalized {}) at {} fps",
            meta.raw_codec, meta.codec, meta.fps
        ),
        Err(e) => println!("Video: {}", e),
    }

    Ok(())
}

/// Validate a local file; returns whether it passed.
async fn check_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<bool> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let requirements = Arc::new(RequirementsStore::new(
        config.validation.requirements_path.clone(),
    ));
    let prober = Arc::new(probe::ffprobe_from_config(&config.tools));
    let service = ValidationService::from_config(&config, requirements, prober);

    let report = service.validate_file(file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mark = if report.is_valid() { "✓" } else { "✗" };
        println!(
            "{} {} ({} at {} fps)",
            mark,
            file.display(),
            report.metadata.raw_codec,
            report.metadata.fps
        );
        for error in &report.result.errors {
            println!("  - {}", error);
        }
    }

    Ok(report.is_valid())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = probe::check_tools(config.tools.ffprobe_path.as_deref());
    let mut ffprobe_ok = false;

    for tool in &tools {
        let status = if tool.available { "✓" } else { "✗" };
        if tool.name == "ffprobe" {
            ffprobe_ok = tool.available;
        }

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if ffprobe_ok {
        println!("ffprobe is available; uploads can be validated.");
    } else {
        println!("ffprobe is missing. Install FFmpeg to enable validation.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_config_summary(&config);
        }
    }

    Ok(())
}

fn print_config_summary(config: &config::Config) {
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!(
        "  Requirements: {}",
        config.validation.requirements_path.display()
    );
    println!(
        "  Max upload: {} MB",
        config.validation.max_upload_bytes / (1024 * 1024)
    );
    println!("  FPS tolerance: {}", config.validation.fps_tolerance);
    if let Some(ref dir) = config.validation.upload_dir {
        println!("  Upload dir: {}", dir.display());
    }
    if let Some(ref ffprobe) = config.tools.ffprobe_path {
        println!("  ffprobe: {}", ffprobe.display());
    }
}
