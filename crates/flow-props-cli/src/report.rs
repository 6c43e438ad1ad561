use flow_props::{FlowProps, FlowPropsSet};

use crate::app::Format;

const NO_SOURCE: &str = "(none)";

/// Render the property records of a flow, optionally limited to one source
pub fn render(
    props: &FlowPropsSet,
    format: Format,
    only: Option<&str>,
) -> Result<String, serde_json::Error> {
    let selected: FlowPropsSet = match only {
        Some(source) => props.get(source).cloned().into_iter().collect(),
        None => props.clone(),
    };

    match format {
        Format::Json => serde_json::to_string_pretty(&selected),
        Format::Text => Ok(selected
            .iter()
            .map(|record| render_line(props, record))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

// Chains are resolved against the whole set, even when only one record is shown.
fn render_line(props: &FlowPropsSet, record: &FlowProps) -> String {
    let chain = match (record.source(), record.parent_source_id()) {
        (Some(source), _) => props.inheritance_chain(source),
        (None, Some(parent)) => {
            let mut chain = props.inheritance_chain(parent);
            if chain.is_empty() {
                chain.push(parent.clone());
            }
            chain
        }
        (None, None) => Vec::new(),
    };

    let mut parts: Vec<&str> = Vec::with_capacity(chain.len() + 1);
    if record.source().is_none() {
        parts.push(NO_SOURCE);
    }
    parts.extend(chain.iter().map(|id| id.as_str()));
    parts.join(" <- ")
}
