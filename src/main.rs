use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tagcomp::cli::{self, BufferArgs};
use tagcomp::config::Config;
use tagcomp::editor::Workspace;
use tagcomp::gather::TagsSource;
use tagcomp::params::ParamsOverride;
use tagcomp::{rpc, scope, util};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("TAGCOMP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn workspace(args: BufferArgs) -> Result<Workspace> {
    let cwd = match args.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir().with_context(|| "read current dir")?,
    };
    if args.tags.is_empty() {
        let option = args
            .tags_option
            .unwrap_or_else(|| Config::get().tags_option.clone());
        Ok(Workspace::new(cwd, args.buffer, &option))
    } else {
        Ok(Workspace::with_tag_files(cwd, args.buffer, args.tags))
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = cli::Args::parse();
    let source = TagsSource::new();

    match args.command {
        cli::Command::Gather {
            complete_str,
            buffer,
            params,
            params_file,
            max_size,
            report,
        } => {
            let mut overrides = ParamsOverride::default();
            if let Some(path) = params_file {
                overrides = overrides.overlay(ParamsOverride::from_file(&path)?);
            }
            if let Some(raw) = params {
                let value: Value =
                    serde_json::from_str(&raw).with_context(|| "parse --params JSON")?;
                overrides = overrides.overlay(ParamsOverride::from_value(&value));
            }
            if max_size.is_some() {
                overrides.max_size = max_size;
            }
            let workspace = workspace(buffer)?;
            let result = source.gather_report(&workspace, &complete_str, &overrides);
            let gathered = match result {
                Ok(gathered) => gathered,
                Err(err) => {
                    source.print_error(&workspace, &format!("{err:#}"))?;
                    std::process::exit(1);
                }
            };
            if report {
                println!("{}", serde_json::to_string_pretty(&gathered)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&gathered.candidates)?);
            }
            Ok(())
        }
        cli::Command::Scope { buffer } => {
            let workspace = workspace(buffer)?;
            let files = scope::select(&workspace)?;
            println!("{}", serde_json::to_string_pretty(&files)?);
            Ok(())
        }
        cli::Command::Params => {
            println!("{}", serde_json::to_string_pretty(source.params())?);
            Ok(())
        }
        cli::Command::Serve => rpc::serve(&source),
        cli::Command::Request {
            method,
            params,
            params_file,
            id,
        } => {
            let params_raw = if let Some(path) = params_file {
                util::read_to_string(&path)?
            } else {
                params
            };
            let response = rpc::call(&source, method, &params_raw, &id)?;
            println!("{response}");
            Ok(())
        }
    }
}
