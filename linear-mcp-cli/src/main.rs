use std::process;

use clap::CommandFactory;
use linear_mcp::LinearConfig;
use linear_mcp_cli::cli::{Cli, Commands};
use linear_mcp_cli::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use linear_mcp_cli::stale::run_stale_command;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Fast path for help
    let Some(command) = cli.command.as_ref() else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {e}");
        }
        process::exit(EXIT_SUCCESS);
    };

    use is_terminal::IsTerminal;
    let is_mcp_mode = cli.is_mcp_mode(std::io::stdin().is_terminal());
    let config = LinearConfig::from_env();
    init_logging(&cli, is_mcp_mode, &config);

    let exit_code = match command {
        Commands::Serve => {
            tracing::info!("Starting MCP server");
            run_server(config).await
        }
        Commands::Stale(args) => {
            tracing::info!("Running stale command");
            match run_stale_command(&config, args.options(), args.format).await {
                Ok(code) => code,
                Err(e) => {
                    tracing::error!("{:#}", e);
                    EXIT_ERROR
                }
            }
        }
    };

    process::exit(exit_code);
}

fn init_logging(cli: &Cli, is_mcp_mode: bool, config: &LinearConfig) {
    use tracing::Level;

    let log_level = if is_mcp_mode {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::TRACE
    } else {
        Level::INFO
    };

    if !is_mcp_mode {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(log_level)
            .init();
        return;
    }

    // stdout belongs to the MCP transport, so logs go to ~/.linear-mcp
    let log_dir = dirs::home_dir()
        .map(|home| home.join(".linear-mcp"))
        .unwrap_or_else(|| std::path::PathBuf::from(".linear-mcp"));

    let opened = std::fs::create_dir_all(&log_dir).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join(&config.log_file))
    });

    match opened {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_writer(file)
                .with_max_level(log_level)
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_max_level(log_level)
                .init();
            tracing::warn!("Failed to open log file, using stderr: {}", e);
        }
    }
}

async fn run_server(config: LinearConfig) -> i32 {
    use linear_mcp::LinearMcpServer;
    use rmcp::serve_server;
    use rmcp::transport::io::stdio;
    use tokio_util::sync::CancellationToken;

    tracing::debug!("Server configuration: {:?}", config);
    let server = match LinearMcpServer::from_config(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to create MCP server: {}", e);
            eprintln!("Failed to create MCP server: {e}");
            return EXIT_ERROR;
        }
    };

    let ct = CancellationToken::new();
    let ct_clone = ct.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        ct_clone.cancel();
    });

    match serve_server(server, stdio()).await {
        Ok(running_service) => {
            tracing::info!("MCP server started successfully");

            tokio::select! {
                quit = running_service.waiting() => match quit {
                    Ok(reason) => tracing::info!("MCP client disconnected: {:?}", reason),
                    Err(e) => {
                        tracing::error!("MCP server task failed: {}", e);
                        return EXIT_WARNING;
                    }
                },
                _ = ct.cancelled() => {
                    tracing::info!("MCP server shutting down");
                }
            }

            tracing::info!("MCP server exited successfully");
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::error!("MCP server error: {}", e);
            EXIT_WARNING
        }
    }
}
