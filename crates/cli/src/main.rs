use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scout_api::{InProcApi, SearchApi};
use scout_core::{
    Context, FuzzyMatcherKind, FuzzySearchRequest, QueryOptions, SearchConfig, SearchRequest,
    SearchResponse,
};
use tracing::info;

mod dump;

use dump::StateDump;

#[derive(Parser, Debug)]
#[command(name = "scoutctl", version, about = "Scout CLI: prefix and fuzzy search over a state dump")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    /// State dump (JSON) to search
    #[arg(long = "state", env = "SCOUT_STATE", global = true)]
    state: Option<PathBuf>,

    /// Namespace to search (default: "default")
    #[arg(long = "ns", env = "SCOUT_NAMESPACE", global = true, default_value = "")]
    namespace: String,

    /// ACL token secret
    #[arg(long = "token", env = "SCOUT_TOKEN", global = true, default_value = "", hide_env_values = true)]
    token: String,

    /// Context to search: all, jobs, nodes, allocs, evals, deployment, ...
    #[arg(long = "context", short = 'c', global = true, default_value = "all")]
    context: Context,

    /// Block until the response index exceeds this value
    #[arg(long = "min-index", global = true, default_value_t = 0)]
    min_index: u64,

    /// Longest a blocking query may wait, in seconds
    #[arg(long = "wait", global = true)]
    wait_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

#[derive(Subcommand, Debug)]
enum Commands {
    /// Identifiers starting with a prefix
    Prefix {
        prefix: String,
    },
    /// Names containing a substring or pattern
    Fuzzy {
        text: String,
        /// Maximum names per context (overrides SCOUT_FUZZY_LIMIT_RESULTS)
        #[arg(long = "limit")]
        limit: Option<usize>,
        /// pattern | subsequence (overrides SCOUT_FUZZY_MATCHER)
        #[arg(long = "matcher")]
        matcher: Option<FuzzyMatcherKind>,
    },
}

fn init_tracing() {
    let env = std::env::var("SCOUT_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

fn init_metrics() {
    if let Ok(addr) = std::env::var("SCOUT_METRICS_ADDR") {
        if let Ok(sock) = addr.parse::<std::net::SocketAddr>() {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            match builder.with_http_listener(sock).install() {
                Ok(_) => tracing::info!(addr = %addr, "Prometheus metrics exporter listening"),
                Err(e) => tracing::warn!(error = %e, "failed to install metrics exporter"),
            }
        } else {
            tracing::warn!(addr = %addr, "invalid SCOUT_METRICS_ADDR; expected host:port");
        }
    }
}

fn render_human(resp: &SearchResponse) -> String {
    let mut out = String::new();
    for (ctx, ids) in &resp.matches {
        let more = if resp.is_truncated(ctx) { " (truncated)" } else { "" };
        out.push_str(&format!("{}{}:\n", ctx, more));
        if ids.is_empty() {
            out.push_str("  -\n");
        }
        for id in ids {
            out.push_str(&format!("  {}\n", id));
        }
    }
    out.push_str(&format!("index: {}\n", resp.meta.index));
    out
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    init_metrics();
    let cli = Cli::parse();

    let path = cli.state.as_deref().context("no state dump given; pass --state or set SCOUT_STATE")?;
    let dump = StateDump::load(path)?;
    let store = dump.restore()?;
    info!(resources = dump.resources.len(), index = store.current().latest_index(), "state loaded");

    let mut config = dump.search.clone().unwrap_or_else(SearchConfig::from_env);
    if let Commands::Fuzzy { limit, matcher, .. } = &cli.command {
        if let Some(limit) = limit {
            config.limit_results = *limit;
        }
        if let Some(matcher) = matcher {
            config.fuzzy_matcher = *matcher;
        }
    }
    let api: Arc<dyn SearchApi> =
        Arc::new(InProcApi::new(store).with_config(config).with_tokens(Arc::new(dump.acl)));

    let options = QueryOptions {
        namespace: cli.namespace.clone(),
        auth_token: cli.token.clone(),
        min_query_index: cli.min_index,
        max_query_time: cli.wait_secs.map(Duration::from_secs),
    };
    let resp = match &cli.command {
        Commands::Prefix { prefix } => {
            let req = SearchRequest::new(prefix.clone(), cli.context.clone()).with_options(options);
            api.prefix_search(req).await.context("prefix search failed")?
        }
        Commands::Fuzzy { text, .. } => {
            let req = FuzzySearchRequest::new(text.clone(), cli.context.clone()).with_options(options);
            api.fuzzy_search(req).await.context("fuzzy search failed")?
        }
    };

    match cli.output {
        Output::Human => print!("{}", render_human(&resp)),
        Output::Json => println!("{}", serde_json::to_string_pretty(&resp)?),
    }
    Ok(())
}
