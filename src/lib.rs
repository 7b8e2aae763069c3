pub mod boolean;
pub mod catalog;
pub mod cli;
pub mod compiler;
pub mod data;
pub mod error;
pub mod formatter;
pub mod io_utils;
pub mod number;
pub mod options;
pub mod plan;
pub mod preview;
pub mod semantic_type;
pub mod sql;
pub mod table;
pub mod temporal;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    catalog::FormatCatalog,
    cli::{CatalogArgs, Cli, Commands, CompileArgs, FormatArgs},
    compiler::CastCompiler,
    formatter::ColumnFormatter,
    plan::ImportPlan,
    semantic_type::SemanticType,
};

pub use crate::{compiler::CastRequest, error::CoerceError};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_coerce", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compile(args) => handle_compile(&args),
        Commands::Format(args) => handle_format(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Types => handle_types(),
        Commands::Catalog(args) => handle_catalog(&args),
    }
}

fn handle_compile(args: &CompileArgs) -> Result<()> {
    let plan = ImportPlan::load(&args.plan)?;
    let catalog = match &args.catalog {
        Some(path) => FormatCatalog::load(path)?,
        None => plan.resolve_catalog()?,
    };
    debug!("Date formats available: {:?}", catalog.format_ids());
    let compiler = CastCompiler::new(catalog);
    let compiled = plan
        .compile(&compiler)
        .with_context(|| format!("Compiling import plan {:?}", args.plan))?;
    if args.statement {
        println!("{};", plan.insert_statement(&compiled));
    } else {
        for column in &compiled {
            println!("{}: {}", column.output_name, column.expression);
        }
    }
    info!(
        "Compiled {} column(s) from {:?}",
        compiled.len(),
        args.plan
    );
    Ok(())
}

fn handle_format(args: &FormatArgs) -> Result<()> {
    let plan = ImportPlan::load(&args.plan)?;
    println!("{};", plan.format_statement(&ColumnFormatter));
    info!(
        "Rendered export projection for {} column(s)",
        plan.columns.len()
    );
    Ok(())
}

fn handle_types() -> Result<()> {
    for ty in SemanticType::ALL {
        println!("{ty}\t{}", ty.category());
    }
    Ok(())
}

fn handle_catalog(args: &CatalogArgs) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => FormatCatalog::load(path)?,
        None => FormatCatalog::builtin(),
    };
    print!("{}", catalog.to_yaml()?);
    Ok(())
}
