use clap::{Parser, ValueEnum};

/// Show where a flow's properties come from and what they inherit from
#[derive(Parser, Debug)]
#[command(name = "flowprops", version)]
pub struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Only report the property set with this source
    #[arg(short, long)]
    pub source: Option<String>,

    /// Path to a flow document (JSON or YAML)
    pub document: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// One line per property set, with its inheritance chain
    Text,
    /// The `props` list as it appears in a flow document
    Json,
}
