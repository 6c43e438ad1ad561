use std::path::{Path, PathBuf};

use flow_props::{FlowPropsError, FlowPropsSet};

type Result<T> = std::result::Result<T, FlowDocumentError>;

#[derive(thiserror::Error, Debug)]
pub enum FlowDocumentError {
    #[error("Failed to read flow document: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    #[error("Invalid flow document {0}: {1}")]
    InvalidFlowDocument(PathBuf, FlowPropsError),
}

pub struct FlowDocument {
    pub path: PathBuf,
    pub props: FlowPropsSet,
}

/// Load a flow document and extract its property records
///
/// YAML is a superset of JSON, so both formats go through the YAML parser.
pub async fn load_flow_document(path: impl AsRef<Path>) -> Result<FlowDocument> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(&content)?;
    let json_value: serde_json::Value = serde_yaml::from_value(yaml_value)?;
    parse_flow_document(&json_value, path)
}

fn parse_flow_document(
    json_value: &serde_json::Value,
    path: impl AsRef<Path>,
) -> Result<FlowDocument> {
    let props = FlowPropsSet::from_flow_document(json_value).map_err(|e| {
        FlowDocumentError::InvalidFlowDocument(path.as_ref().to_path_buf(), e)
    })?;

    Ok(FlowDocument {
        path: path.as_ref().to_path_buf(),
        props,
    })
}
