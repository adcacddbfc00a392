use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use globalize::config::{BundleConfig, ResolvedConfig, parse_external};
use globalize::{Bundler, FsSourceProvider};
use globalize_path_resolve::entry_module;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bundle TypeScript declaration files into one global namespace
#[derive(Parser)]
#[command(name = "globalize", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the bundled declaration file
    Bundle(BundleArgs),
    /// Print the module graph as JSON
    Graph(BundleArgs),
}

#[derive(Args)]
struct BundleArgs {
    /// Config file (TOML, or a JSON parameter array)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Global namespace name (e.g. `Lib` or `React.Addons`)
    #[arg(short, long = "global")]
    global_name: Option<String>,

    /// Entry declaration file
    #[arg(short, long)]
    entry: Option<PathBuf>,

    /// External module mapping, MODULE=GLOBAL (repeatable)
    #[arg(short = 'x', long = "external", value_name = "MODULE=GLOBAL")]
    externals: Vec<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl BundleArgs {
    fn resolve(self) -> anyhow::Result<ResolvedConfig> {
        let file = match &self.config {
            Some(path) => BundleConfig::load(path)?,
            None => BundleConfig::default(),
        };
        let flags = BundleConfig {
            global_name: self.global_name,
            entry: self.entry,
            out: self.out,
            externals: self
                .externals
                .iter()
                .map(|arg| parse_external(arg))
                .collect::<Result<_, _>>()?,
        };
        Ok(file.merge(flags).resolve()?)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Bundle(args) => {
            let config = args.resolve()?;
            let (root, entry) = entry_module(&config.entry);
            let sources = FsSourceProvider::new(root);
            let output = Bundler::new(&sources, &config.global_name, &config.externals)
                .bundle(&entry)
                .with_context(|| format!("failed to bundle {}", config.entry.display()))?;

            match &config.out {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(path, output)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(out = %path.display(), "bundle written");
                }
                None => print!("{output}"),
            }
        }
        Command::Graph(args) => {
            let config = args.resolve()?;
            let (root, entry) = entry_module(&config.entry);
            let sources = FsSourceProvider::new(root);
            let files = Bundler::new(&sources, &config.global_name, &config.externals)
                .graph(&entry)
                .with_context(|| format!("failed to read {}", config.entry.display()))?;
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
