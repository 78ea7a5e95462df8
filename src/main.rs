//! weft CLI: terminal client for knowledge-agent services.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use weft::client::AgentClient;
use weft::config::ClientConfig;
use weft::error::WeftResult;
use weft::graph;
use weft::paths::WeftPaths;
use weft::tui::WeftTui;

#[derive(Parser)]
#[command(name = "weft", version, about = "Terminal client for knowledge-agent services")]
struct Cli {
    /// Backend base URL (overrides the config file).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Config file path (default: $XDG_CONFIG_HOME/weft/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat + memory TUI (the default when no command is given).
    Chat,

    /// One-shot health check against the backend.
    Health,

    /// Fetch a memory snapshot and print its co-occurrence graph.
    Graph {
        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: GraphFormat,
    },

    /// Inspect or persist module toggles.
    Modules {
        #[command(subcommand)]
        action: ModulesAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GraphFormat {
    Text,
    Json,
    Dot,
}

#[derive(Subcommand)]
enum ModulesAction {
    /// List configured modules and their flags.
    List,
    /// Enable a module and save the config.
    Enable { name: String },
    /// Disable a module and save the config.
    Disable { name: String },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (paths, config_path, mut config) = resolve_config(cli.backend, cli.config)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            WeftTui::new(config).run()?;
        }

        Commands::Health => {
            let client = AgentClient::new(&config.backend);
            let check = client.health()?;
            println!("{} :: {}", client.base_url(), check.status);
            if check.modules_active.is_empty() {
                println!("no modules active");
            } else {
                println!("active modules: {}", check.modules_active.join(", "));
            }
        }

        Commands::Graph { format } => {
            let client = AgentClient::new(&config.backend);
            let snapshot = client.memory_snapshot()?;
            let (graph, diagnostics) = graph::build(&snapshot);

            match format {
                GraphFormat::Text => {
                    println!("Concepts ({}):", graph.nodes.len());
                    for node in &graph.nodes {
                        println!("  \"{}\" :: {}", node.id, node.tooltip);
                    }
                    println!("Links ({}):", graph.edges.len());
                    for edge in &graph.edges {
                        println!(
                            "  \"{}\" -- \"{}\" (weight {})",
                            edge.from, edge.to, edge.weight
                        );
                    }
                    if !diagnostics.is_empty() {
                        println!("Dropped {} inconsistent edge(s):", diagnostics.len());
                        for diag in &diagnostics {
                            println!("  {diag}");
                        }
                    }
                }
                GraphFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&graph).into_diagnostic()?
                    );
                }
                GraphFormat::Dot => {
                    print!("{}", graph.to_dot());
                }
            }
        }

        Commands::Modules { action } => {
            match action {
                ModulesAction::List => {
                    for (name, enabled) in config.modules.iter() {
                        println!("{name} = {}", if enabled { "on" } else { "off" });
                    }
                }
                ModulesAction::Enable { name } => {
                    set_module(&mut config, &config_path, &paths, &name, true)?;
                }
                ModulesAction::Disable { name } => {
                    set_module(&mut config, &config_path, &paths, &name, false)?;
                }
            }
        }
    }

    Ok(())
}

/// Resolve paths and config, applying CLI overrides.
fn resolve_config(
    backend: Option<String>,
    config_path: Option<PathBuf>,
) -> WeftResult<(WeftPaths, PathBuf, ClientConfig)> {
    let paths = WeftPaths::resolve()?;
    let config_path = config_path.unwrap_or_else(|| paths.config_file());
    let mut config = ClientConfig::load(&config_path)?;
    if let Some(url) = backend {
        config.backend.url = url;
    }
    Ok((paths, config_path, config))
}

fn set_module(
    config: &mut ClientConfig,
    config_path: &std::path::Path,
    paths: &WeftPaths,
    name: &str,
    enabled: bool,
) -> Result<()> {
    config.modules.set(name, enabled)?;
    paths.ensure_dirs()?;
    config.save(config_path)?;
    println!(
        "module {name} {} (saved to {})",
        if enabled { "enabled" } else { "disabled" },
        config_path.display()
    );
    Ok(())
}
