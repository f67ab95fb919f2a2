//! Lower a serialized expression document into kernel-graph JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use npugen::{compile_with_symbol, critical, trace, ExprDocument};

#[derive(Parser)]
#[command(name = "npugen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lower fused composite functions into NPU kernel graphs")]
struct Cli {
    /// Expression document (JSON) whose root is the offloaded function
    input: PathBuf,

    /// Symbol to use when the function carries no global_symbol
    #[arg(long)]
    symbol: Option<String>,

    /// Write graph JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the constant table as JSON
    #[arg(long)]
    params: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let document = ExprDocument::parse(&text)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;
    let root = document.build()?;

    let module = compile_with_symbol(&root, cli.symbol.as_deref())?;
    trace!("compiled {}", module.symbol);

    let graph_json = if cli.pretty {
        let value: serde_json::Value = serde_json::from_str(&module.graph_json)?;
        serde_json::to_string_pretty(&value)?
    } else {
        module.graph_json.clone()
    };

    match &cli.output {
        Some(path) => fs::write(path, &graph_json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", graph_json),
    }

    if let Some(path) = &cli.params {
        let value = module.params_json()?;
        let text = if cli.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        critical!("{:#}", err);
        std::process::exit(1);
    }
}
