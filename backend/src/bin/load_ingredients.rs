//! Bulk-load ingredients from a JSON file into the catalogue.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use backend::domain::IngredientSeed;
use backend::domain::ports::CatalogueRepository;
use backend::outbound::persistence::{DbPool, DieselCatalogueRepository, PoolConfig};
use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use serde::Deserialize;
use tokio::runtime::Builder;

const DATABASE_URL_VARS: [&str; 2] = ["FOODGRAM_DATABASE_URL", "DATABASE_URL"];

/// `load-ingredients` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-ingredients",
    about = "Insert ingredients from a JSON array, skipping ones already present",
    version
)]
struct CliArgs {
    /// JSON file holding `[{"name": ..., "measurement_unit": ...}]`.
    #[arg(value_name = "file.json")]
    path: PathBuf,
    /// Database connection URL. Falls back to `FOODGRAM_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let seeds = parse_seeds(&read_file(&args.path)?)?;

    let database_url = resolve_database_url(args.database_url, |key| env::var(key).ok())?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let repository = DieselCatalogueRepository::new(pool);
    let inserted = repository
        .insert_ingredients(&seeds)
        .await
        .map_err(|error| io::Error::other(format!("insert ingredients: {error}")))?;

    println!("read={}", seeds.len());
    println!("inserted={inserted}");
    Ok(())
}

fn read_file(path: &Path) -> io::Result<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open input parent directory '{}': {error}",
            parent.display()
        ))
    })?;
    let mut file = directory.open(Path::new(file_name)).map_err(|error| {
        io::Error::other(format!("open input file '{}': {error}", path.display()))
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|error| {
        io::Error::other(format!("read input file '{}': {error}", path.display()))
    })?;
    Ok(contents)
}

/// Parse and validate every record; a single bad entry aborts the load.
fn parse_seeds(raw: &str) -> io::Result<Vec<IngredientSeed>> {
    let records: Vec<IngredientRecord> = serde_json::from_str(raw).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("parse ingredients JSON: {error}"),
        )
    })?;
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            IngredientSeed::new(&record.name, &record.measurement_unit).map_err(|error| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("ingredient #{index} ({:?}): {error}", record.name),
                )
            })
        })
        .collect()
}

fn resolve_database_url(
    explicit: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    DATABASE_URL_VARS
        .iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url, FOODGRAM_DATABASE_URL or DATABASE_URL",
            )
        })
}
