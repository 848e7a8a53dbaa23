//! Estimation JSON output

use estimator_model::EstimationDocument;

/// Pretty-printed, camelCase JSON with a trailing newline.
pub fn render_json(doc: &EstimationDocument) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    Ok(text)
}
