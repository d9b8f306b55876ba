use anyhow::Result;
use clap::Parser;
use simp::commands::{self, BatchReport, Config};
use simp::error::exit_code_for;
use simp::runtime::{RealRuntime, Runtime};
use simp::ui::Reporter;
use std::io::Write;
use std::path::PathBuf;

/// simp - copy reusable source snippets between a package repository and
/// your working directory.
///
/// Packages live under `<root>/packages/<language>/<package>/`.
///
/// Examples:
///   simp install python/singleton   # Copy a package into the current directory
///   simp publish rust               # Publish the current directory as rust/<dirname>
///   simp list java                  # List the java packages
#[derive(Parser, Debug)]
#[command(author, version = env!("SIMP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Install root directory (overrides the config file; also via SIMP_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "SIMP_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub install_root: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Copy package files into the current directory
    #[command(visible_alias = "i")]
    Install(PackagesArgs),

    /// Copy files into the repository as a new or updated package
    Publish(PublishArgs),

    /// Remove a package's files from the current directory
    Uninstall(PackagesArgs),

    /// List the packages of a language, or the files of a package
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct PackagesArgs {
    /// Packages in the format "language/package"
    #[arg(value_name = "LANGUAGE/PACKAGE")]
    pub packages: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct PublishArgs {
    /// "language/package", or just "language" to use the current directory's name
    #[arg(value_name = "LANGUAGE[/PACKAGE]")]
    pub package: Option<String>,

    /// Directory or file to publish (defaults to the current directory)
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// A language, or a package in the format "language/package"
    #[arg(value_name = "LANGUAGE[/PACKAGE]")]
    pub targets: Vec<String>,
}

impl PublishArgs {
    /// The positional arguments in order, as the publish driver expects them.
    fn into_args(self) -> Vec<String> {
        self.package.into_iter().chain(self.source).collect()
    }
}

fn run<R: Runtime, O: Write, E: Write>(
    runtime: &R,
    cli: Cli,
    reporter: &mut Reporter<O, E>,
) -> Result<BatchReport> {
    let config = Config::load(runtime, cli.install_root)?;
    match cli.command {
        Commands::Install(args) => commands::install(runtime, &config, &args.packages, reporter),
        Commands::Publish(args) => {
            commands::publish(runtime, &config, &args.into_args(), reporter)
        }
        Commands::Uninstall(args) => {
            commands::uninstall(runtime, &config, &args.packages, reporter)
        }
        Commands::List(args) => commands::list(runtime, &config, &args.targets, reporter),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let mut reporter = Reporter::stdio();

    let code = match run(&runtime, cli, &mut reporter) {
        Ok(report) => report.exit_code(),
        Err(e) => {
            let _ = reporter.error(format!("{:#}", e));
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}
