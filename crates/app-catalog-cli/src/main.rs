//! App Catalog CLI
//!
//! The `app-catalog` command lists catalog apps the same way the listing
//! screen does.
//!
//! ## Commands
//!
//! - `list`: fetch, filter and order apps (fixtures or catalog service)
//! - `presets`: show the sort presets offered by the listing screen
//! - `endpoint`: show which service endpoint a query would use

mod output;
mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app_catalog_core::{
    preset, select_endpoint, sort_presets, AppCatalog, CatalogConfig, ListQuery, SortKey,
    SortOrder, SortSpec,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, Level};

#[derive(Parser, Debug)]
#[command(name = "app-catalog")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse the app catalog from local fixtures or the catalog service", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List apps, ordered and optionally filtered by category
    List {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the sort presets
    Presets,

    /// Show the endpoint a query would be sent to, without fetching
    Endpoint {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct QueryArgs {
    /// Field to sort by (id, price, rating, downloads, reviews, category or any field)
    #[arg(long, value_name = "KEY")]
    sort_by: Option<SortKey>,

    /// Sort direction (asc or desc)
    #[arg(long)]
    order: Option<SortOrder>,

    /// Only list apps in this category
    #[arg(short, long)]
    category: Option<String>,

    /// Use a sort preset by index (see `presets`)
    #[arg(long, conflicts_with_all = ["sort_by", "order"])]
    preset: Option<usize>,
}

impl QueryArgs {
    fn to_query(&self) -> ListQuery {
        let sort = match self.preset {
            Some(index) => preset(index).spec,
            None => SortSpec {
                sort_by: self.sort_by.clone().unwrap_or_default(),
                order: self.order.unwrap_or_default(),
            },
        };
        ListQuery {
            sort,
            category: self.category.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
struct SourceArgs {
    /// Serve from local fixtures instead of the catalog service
    #[arg(long, conflicts_with = "remote")]
    mock: bool,

    /// Force the catalog service even if APP_CATALOG_USE_MOCK is set
    #[arg(long)]
    remote: bool,

    /// Catalog service base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token for the catalog service
    #[arg(long)]
    token: Option<String>,

    /// Fixture file (JSON array of apps)
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

impl SourceArgs {
    fn apply(&self, mut config: CatalogConfig) -> CatalogConfig {
        if self.mock {
            config.use_mock = true;
        }
        if self.remote {
            config.use_mock = false;
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        if let Some(path) = &self.fixtures {
            config = config.with_fixtures_path(path);
        }
        config
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Aligned text table
    Table,
    /// Pretty-printed JSON array
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    telemetry::init_tracing(cli.json_logs, level);

    let text = match cli.command {
        Commands::List {
            query,
            source,
            format,
        } => {
            let config = source.apply(
                CatalogConfig::from_env().context("Failed to read catalog configuration")?,
            );
            cmd_list(&config, &query.to_query(), format).await?
        }
        Commands::Presets => output::render_presets(&sort_presets()),
        Commands::Endpoint { query } => cmd_endpoint(&query.to_query()),
    };

    print!("{}", text);
    Ok(())
}

async fn cmd_list(config: &CatalogConfig, query: &ListQuery, format: OutputFormat) -> Result<String> {
    debug!(
        "Listing from {} (mock: {})",
        config.base_url, config.use_mock
    );

    let catalog = AppCatalog::from_config(config).context("Failed to set up catalog")?;
    let listing = catalog
        .list_detailed(query)
        .await
        .context("Failed to load apps")?;

    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(&listing.records)?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Table => {
            if listing.records.is_empty() {
                return Ok(format!(
                    "No apps found (source: {})\n",
                    output::describe_source(&listing)
                ));
            }
            Ok(format!(
                "{}\n{} apps from {}\n",
                output::render_table(&listing.records),
                listing.records.len(),
                output::describe_source(&listing)
            ))
        }
    }
}

fn cmd_endpoint(query: &ListQuery) -> String {
    let selection = select_endpoint(query);
    format!(
        "path:      {}\nrule:      {}\npresorted: {}\n",
        selection.endpoint, selection.rule, selection.presorted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_with_sort_and_category() {
        let cli = Cli::try_parse_from([
            "app-catalog",
            "list",
            "--sort-by",
            "downloads",
            "--order",
            "desc",
            "-c",
            "games",
            "--mock",
        ])
        .unwrap();

        match cli.command {
            Commands::List { query, source, format } => {
                let q = query.to_query();
                assert_eq!(q.sort, SortSpec::new(SortKey::Downloads, SortOrder::Desc));
                assert_eq!(q.category(), Some("games"));
                assert!(source.mock);
                assert_eq!(format, OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_unknown_order() {
        assert!(Cli::try_parse_from(["app-catalog", "list", "--order", "sideways"]).is_err());
        assert!(Cli::try_parse_from(["app-catalog", "list", "--order", "DESC"]).is_err());
    }

    #[test]
    fn preset_conflicts_with_explicit_sort() {
        assert!(
            Cli::try_parse_from(["app-catalog", "list", "--preset", "1", "--order", "asc"])
                .is_err()
        );
    }

    #[test]
    fn preset_out_of_range_uses_default() {
        let args = QueryArgs {
            preset: Some(9),
            ..QueryArgs::default()
        };
        assert_eq!(args.to_query().sort, SortSpec::default());

        let args = QueryArgs {
            preset: Some(2),
            ..QueryArgs::default()
        };
        assert_eq!(
            args.to_query().sort,
            SortSpec::new(SortKey::Rating, SortOrder::Desc)
        );
    }

    #[test]
    fn source_args_override_config() {
        let source = SourceArgs {
            remote: true,
            base_url: Some("http://catalog.internal/api".to_string()),
            token: Some("tok".to_string()),
            ..SourceArgs::default()
        };
        let config = source.apply(CatalogConfig::default().with_mock(true));
        assert!(!config.use_mock);
        assert_eq!(config.base_url, "http://catalog.internal/api");
        assert_eq!(config.token.as_deref(), Some("tok"));
    }

    #[test]
    fn endpoint_command_reports_selection() {
        let text = cmd_endpoint(&ListQuery::new(SortSpec::new(
            SortKey::Downloads,
            SortOrder::Desc,
        )));
        assert!(text.contains("/apps/sort/downloads"));
        assert!(text.contains("presorted: true"));
    }

    #[tokio::test]
    async fn list_in_mock_mode_renders_json() {
        let config = CatalogConfig::default().with_mock(true);
        let query = ListQuery::new(SortSpec::new(SortKey::Rating, SortOrder::Desc))
            .with_category("games");

        let text = cmd_list(&config, &query, OutputFormat::Json).await.unwrap();
        let records: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        let ids: Vec<i64> = records.iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, vec![3, 7, 1]);
    }

    #[tokio::test]
    async fn list_in_mock_mode_renders_table_footer() {
        let config = CatalogConfig::default().with_mock(true);
        let text = cmd_list(&config, &ListQuery::default(), OutputFormat::Table)
            .await
            .unwrap();
        assert!(text.contains("8 apps from local fixtures"));
    }
}
