use clap::Parser;
use eyre::Result;

use crate::app::Args;

mod app;
mod documents;
mod report;

#[tokio::main]
async fn main() -> Result<()> {
    flow_props::init_tracing();

    let args = Args::parse();
    let document = documents::load_flow_document(&args.document).await?;
    tracing::debug!(
        "Loaded {} property records from {}",
        document.props.len(),
        document.path.display()
    );

    let output = report::render(&document.props, args.format, args.source.as_deref())?;
    println!("{}", output);
    Ok(())
}
