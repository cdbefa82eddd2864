// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use sql_scope_catalog::{Catalog, StaticCatalog};
use sql_scope_completion::{referenced_tables, CompletionContext, EngineConfig, HydratedVisibility};
use sql_scope_semantic::{char_to_byte_offset, extract_scopes, Scope, Visibility, VisibilityResolver};
use tracing_subscriber::EnvFilter;

/// Resolve SQL scopes and the names visible at a caret
#[derive(Parser, Debug)]
#[command(name = "sql-scope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL file to read (stdin when omitted)
    file: Option<PathBuf>,

    /// Caret position as a byte offset
    #[arg(long, conflicts_with = "char_caret")]
    caret: Option<usize>,

    /// Caret position as a character index, as editors count it
    #[arg(long)]
    char_caret: Option<usize>,

    /// Catalog JSON used to fill table columns
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Engine configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also list grandparent and further ancestor aliases
    #[arg(long)]
    ancestors: bool,
}

impl Cli {
    /// Config file values, with `--ancestors` able to switch ancestors on but never off
    fn engine_config(&self) -> Result<EngineConfig> {
        let config = load_config(self.config.as_deref())?;
        let ancestors = config.include_ancestor_aliases || self.ancestors;
        Ok(config.with_ancestor_aliases(ancestors))
    }

    fn byte_caret(&self, sql: &str) -> Option<usize> {
        self.caret
            .or_else(|| self.char_caret.map(|c| char_to_byte_offset(sql, c)))
    }
}

#[derive(Serialize)]
struct Report {
    scopes: Vec<Scope>,
    referenced_tables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<Resolution>,
}

#[derive(Serialize)]
struct Resolution {
    caret: usize,
    scope_index: usize,
    level: usize,
    visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved_tables: Vec<String>,
}

impl Resolution {
    fn hydrated(caret: usize, hydrated: HydratedVisibility) -> Self {
        Self {
            caret,
            scope_index: hydrated.scope_index,
            level: hydrated.level,
            visibility: hydrated.visibility,
            unresolved_tables: hydrated.unresolved_tables,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let sql = read_sql(cli.file.as_deref())?;
    let config = cli.engine_config()?;

    let scopes = extract_scopes(&sql);
    tracing::info!(scopes = scopes.len(), "Extracted scopes");

    let resolution = match cli.byte_caret(&sql) {
        Some(caret) => Some(resolve(&cli, &sql, &scopes, caret, config).await?),
        None => None,
    };

    let report = Report {
        referenced_tables: referenced_tables(&scopes),
        scopes,
        resolution,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_sql(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SQL from {}", path.display())),
        None => {
            let mut sql = String::new();
            std::io::stdin()
                .read_to_string(&mut sql)
                .context("Failed to read SQL from stdin")?;
            Ok(sql)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    EngineConfig::from_json(&json).with_context(|| format!("Invalid config in {}", path.display()))
}

async fn resolve(
    cli: &Cli,
    sql: &str,
    scopes: &[Scope],
    caret: usize,
    config: EngineConfig,
) -> Result<Resolution> {
    let Some(catalog_path) = cli.catalog.as_deref() else {
        let scope = VisibilityResolver::scope_at(scopes, caret)
            .context("No scope found at caret")?;
        let visibility =
            VisibilityResolver::visibility_at_with(scopes, scope, config.visibility_options());
        return Ok(Resolution {
            caret,
            scope_index: scope.index,
            level: scope.level,
            visibility,
            unresolved_tables: Vec::new(),
        });
    };

    let json = std::fs::read_to_string(catalog_path)
        .with_context(|| format!("Failed to read catalog from {}", catalog_path.display()))?;
    let catalog: Arc<dyn Catalog> = Arc::new(
        StaticCatalog::from_json(&json)
            .with_context(|| format!("Invalid catalog in {}", catalog_path.display()))?,
    );

    let context = CompletionContext::new(config, catalog)?;
    let hydrated = context.resolve(sql, caret).await?;
    Ok(Resolution::hydrated(caret, hydrated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_caret_flags_conflict() {
        let parsed = Cli::try_parse_from(["sql-scope", "--caret", "3", "--char-caret", "3"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_char_caret_is_converted() {
        let cli = Cli::try_parse_from(["sql-scope", "q.sql", "--char-caret", "9"]).unwrap();
        assert_eq!(cli.file.as_deref(), Some(Path::new("q.sql")));
        assert_eq!(cli.byte_caret("SELECT 'é', x"), Some(10));
    }

    #[test]
    fn test_config_file_ancestors_survive_without_flag() {
        let path = std::env::temp_dir().join(format!("sql-scope-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "include_ancestor_aliases": true }"#).unwrap();

        let arg = path.to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["sql-scope", "--config", arg.as_str()]).unwrap();
        let config = cli.engine_config();
        std::fs::remove_file(&path).unwrap();
        assert!(config.unwrap().include_ancestor_aliases);

        let cli = Cli::try_parse_from(["sql-scope", "--ancestors"]).unwrap();
        assert!(cli.engine_config().unwrap().include_ancestor_aliases);
        let cli = Cli::try_parse_from(["sql-scope"]).unwrap();
        assert!(!cli.engine_config().unwrap().include_ancestor_aliases);
    }

    #[tokio::test]
    async fn test_resolve_without_catalog() {
        let cli = Cli::try_parse_from(["sql-scope", "--caret", "20"]).unwrap();
        let sql = "SELECT * FROM t a, (SELECT b FROM u) d";
        let scopes = extract_scopes(sql);
        let resolution = resolve(&cli, sql, &scopes, 20, EngineConfig::default())
            .await
            .unwrap();
        assert_eq!(resolution.scope_index, 1);
        assert_eq!(resolution.visibility.aliases[0].name, "u");
        assert_eq!(resolution.visibility.parent_aliases.len(), 2);
    }
}
