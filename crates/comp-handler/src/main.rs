//! `comp-handler` command line

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use comp_dom::{Document, HostCapabilities};
use comp_handler::{ComponentHandler, HandlerConfig, RegistryManifest, UpgradeReport};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("comp-handler")
        .version(comp_handler::VERSION)
        .about("Upgrade marked-up documents with registered components")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level"),
        )
        .subcommand(
            Command::new("upgrade")
                .about("Bootstrap a document against a component manifest")
                .arg(
                    Arg::new("document")
                        .long("document")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Document tree as JSON"),
                )
                .arg(
                    Arg::new("registry")
                        .long("registry")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Component manifest as JSON"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Handler configuration as JSON"),
                )
                .arg(
                    Arg::new("legacy-host")
                        .long("legacy-host")
                        .action(ArgAction::SetTrue)
                        .help("Simulate a host without modern DOM primitives"),
                )
                .arg(
                    Arg::new("downgrade")
                        .long("downgrade")
                        .value_name("CSS_CLASS")
                        .help("Downgrade every element carrying this marker class afterwards"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a component manifest")
                .arg(
                    Arg::new("registry")
                        .long("registry")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Component manifest as JSON"),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_manifest(path: &Path) -> Result<RegistryManifest> {
    RegistryManifest::from_json(&read(path)?).with_context(|| format!("invalid manifest {}", path.display()))
}

fn run_upgrade(args: &ArgMatches) -> Result<()> {
    let document = args.get_one::<PathBuf>("document").context("missing --document")?;
    let registry = args.get_one::<PathBuf>("registry").context("missing --registry")?;

    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => {
            HandlerConfig::from_json(&read(path)?).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => HandlerConfig::default(),
    };
    let capabilities = if args.get_flag("legacy-host") {
        HostCapabilities::legacy()
    } else {
        HostCapabilities::modern()
    };

    let mut doc = Document::from_json(&read(document)?, capabilities)
        .with_context(|| format!("invalid document {}", document.display()))?;
    let mut handler = ComponentHandler::with_config(config);
    load_manifest(registry)?.register_all(&mut handler)?;

    let upgraded = handler.bootstrap(&mut doc)?;
    let downgraded = match args.get_one::<String>("downgrade") {
        Some(css_class) => {
            let targets = doc.query_by_class(css_class);
            handler.downgrade_elements(&mut doc, targets)?
        }
        None => 0,
    };

    let report = UpgradeReport::collect(&handler, &doc, upgraded, downgraded);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn run_check(args: &ArgMatches) -> Result<bool> {
    let registry = args.get_one::<PathBuf>("registry").context("missing --registry")?;
    let manifest = load_manifest(registry)?;

    let mut handler = ComponentHandler::new();
    match manifest.register_all(&mut handler) {
        Ok(count) => {
            println!("{count} components registered");
            Ok(true)
        }
        Err(e) => {
            println!("registration failed after {} components: {e}", handler.registry().len());
            Ok(false)
        }
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("upgrade", args)) => run_upgrade(args),
        Some(("check", args)) => {
            if !run_check(args)? {
                std::process::exit(1);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
