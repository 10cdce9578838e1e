use anyhow::{Context, Result};
use clap::Parser;
use larkbase_connector::{
    ExecutionContext, HttpTransport, Item, JsonMap, LarkBaseNode, NodeParameters,
    ParameterSource, Settings,
};
use serde::Deserialize;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Run LarkBase record operations over a batch of JSON items.
#[derive(Parser, Debug)]
#[command(name = "larkbase", version, about)]
struct Args {
    /// Node parameters: one JSON object for all items, or an array with one object per item.
    #[arg(long, short)]
    params: PathBuf,

    /// JSON array of input items. Read from stdin when omitted.
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Settings file (TOML, JSON or YAML), overridden by LARKBASE__* environment variables.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Emit `{"error": ...}` items for failed inputs instead of aborting.
    #[arg(long)]
    continue_on_fail: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParamsFile {
    PerItem(Vec<NodeParameters>),
    Shared(NodeParameters),
}

impl ParameterSource for ParamsFile {
    fn parameters(&self, item_index: usize) -> larkbase_connector::Result<NodeParameters> {
        match self {
            ParamsFile::PerItem(params) => params.parameters(item_index),
            ParamsFile::Shared(params) => params.parameters(item_index),
        }
    }
}

async fn read_items(input: Option<&PathBuf>) -> Result<Vec<Item>> {
    let raw = match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read input {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read input from stdin")?;
            raw
        }
    };
    let items: Vec<JsonMap> =
        serde_json::from_str(&raw).context("input must be a JSON array of objects")?;
    Ok(items.into_iter().map(Item::from).collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    let params: ParamsFile = serde_json::from_str(
        &tokio::fs::read_to_string(&args.params)
            .await
            .with_context(|| format!("failed to read parameters {}", args.params.display()))?,
    )
    .context("invalid node parameters")?;
    let items = read_items(args.input.as_ref()).await?;

    let node = LarkBaseNode::new(HttpTransport::new(&settings)?, settings.page_size);
    let context = ExecutionContext {
        continue_on_fail: args.continue_on_fail,
    };
    let output = node.execute(&context, &params, &items).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output.items)?;
    writeln!(stdout)?;
    Ok(())
}
