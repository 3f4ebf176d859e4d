use super::{hidden_form_fields, set_field, unescape};
use crate::{
    error::{Error, Result},
    judge::Session,
    types::TestData,
};
use log::{debug, info};
use regex::Regex;
use std::collections::HashMap;

const VIEW_FORM: &str = "udebug-custom-problem-view-input-output-form";

struct DebugRegex {
    input_anchor: Regex,
    output_area: Regex,
}

impl DebugRegex {
    fn new() -> Self {
        DebugRegex {
            input_anchor: Regex::new(r#"<a[^>]*class="[^"]*input_desc[^"]*"[^>]*data-id="([^"]+)""#)
                .unwrap(),
            output_area: Regex::new(r#"(?s)<textarea[^>]*id="edit-output-data"[^>]*>(.*?)</textarea>"#)
                .unwrap(),
        }
    }
}

/// Fetch one problem's reference input/output pair from udebug. The
/// accepted output comes back from replaying the page's own hidden form
/// with the selected input filled in.
pub async fn crawl_test_data(session: &Session, id: u32) -> Result<TestData> {
    let regex = DebugRegex::new();
    let page_url = format!("{}/UVa/{}", session.debug_url(), id);
    info!("crawling test data for {} from {}", id, page_url);
    let body = session.get_text(&page_url).await?;

    // Some problems take no input; a missing anchor is the normal case
    // for those, not a scrape failure.
    let input = match selected_input_id(&regex, &body) {
        Some(input_id) => fetch_selected_input(session, &input_id).await?,
        None => String::new(),
    };

    let mut form = hidden_form_fields(&body, VIEW_FORM)?;
    if !input.is_empty() {
        set_field(&mut form, "input_data".to_string(), input.clone());
    }
    let result = session.post_form(&page_url, &form).await?;
    let output = accepted_output(&regex, &result)?;
    debug!("test data for {}: {} input, {} output bytes", id, input.len(), output.len());
    Ok(TestData { input, output })
}

fn selected_input_id(regex: &DebugRegex, body: &str) -> Option<String> {
    regex
        .input_anchor
        .captures(body)
        .map(|c| c[1].to_string())
}

/// The input text itself comes from a small AJAX exchange keyed by the
/// anchor's data id.
async fn fetch_selected_input(session: &Session, input_id: &str) -> Result<String> {
    let url = format!("{}/udebug-custom-get-selected-input-ajax", session.debug_url());
    let body = session
        .client()
        .post(&url)
        .form(&[("input_nid", input_id)])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let mut reply: HashMap<String, String> =
        serde_json::from_str(&body).map_err(|_| Error::Malformed("selected input reply"))?;
    reply
        .remove("input_value")
        .ok_or(Error::Malformed("selected input reply"))
}

fn accepted_output(regex: &DebugRegex, body: &str) -> Result<String> {
    regex
        .output_area
        .captures(body)
        .map(|c| unescape(&c[1]))
        .ok_or(Error::Malformed("output textarea"))
}
