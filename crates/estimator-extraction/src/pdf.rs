use camino::Utf8Path;
use estimator_utils::error::ExtractionError;

use crate::failed;

/// Text layer of every page, pages separated by a newline.
///
/// pdf-extract marks page breaks with form feeds; blank pages are dropped.
pub(crate) fn extract(path: &Utf8Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path).map_err(|e| failed(path, e))?;
    // pdf-extract panics on some malformed inputs instead of returning Err.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
        .map_err(|_| failed(path, "PDF parser aborted on malformed input"))?
        .map_err(|e| failed(path, format!("failed to extract PDF text: {e}")))?;

    Ok(join_pages(&text))
}

fn join_pages(text: &str) -> String {
    text.split('\x0c')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_joined_with_newline() {
        let text = "  Page one text \n\x0c\n\x0cPage three\n";
        assert_eq!(join_pages(text), "Page one text\nPage three");
    }

    #[test]
    fn test_no_form_feed_is_single_page() {
        assert_eq!(join_pages("  only page  "), "only page");
    }
}
