use crate::error::{Error, Result};
use regex::Regex;

pub mod meta;
pub mod testdata;

/// Category id of a Problem Set Volume. Total over volumes 1..=17, the
/// range the judge has published for years; anything outside is `None`.
pub fn volume_to_category(volume: u32) -> Option<u32> {
    match volume {
        1..=9 => Some(volume + 2),
        10..=12 => Some(volume + 235),
        13..=15 => Some(volume + 433),
        16 => Some(825),
        17 => Some(859),
        _ => None,
    }
}

/// Collect the `(name, value)` pairs of every `<input>` following the
/// first occurrence of `form_marker`, up to the closing `</form>`. Both
/// login and udebug replay forms this way.
pub(crate) fn hidden_form_fields(html: &str, form_marker: &'static str) -> Result<Vec<(String, String)>> {
    let start = html.find(form_marker).ok_or(Error::Malformed(form_marker))?;
    let scope = &html[start..];
    let scope = &scope[..scope.find("</form>").unwrap_or(scope.len())];
    let input = Regex::new(r"<input[^>]*>").unwrap();
    let name = Regex::new(r#"name="([^"]*)""#).unwrap();
    let value = Regex::new(r#"value="([^"]*)""#).unwrap();
    let mut fields = Vec::new();
    for tag in input.find_iter(scope) {
        let tag = tag.as_str();
        if let Some(n) = name.captures(tag) {
            let v = value
                .captures(tag)
                .map(|c| unescape(&c[1]))
                .unwrap_or_default();
            set_field(&mut fields, unescape(&n[1]), v);
        }
    }
    Ok(fields)
}

pub(crate) fn set_field(fields: &mut Vec<(String, String)>, name: String, value: String) {
    match fields.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = value,
        None => fields.push((name, value)),
    }
}

/// Undo the handful of entities the judge's markup actually uses.
pub(crate) fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&nbsp;", "\u{a0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping_is_total_over_known_volumes() {
        for volume in 1..=17 {
            assert!(volume_to_category(volume).is_some(), "volume {}", volume);
        }
        assert_eq!(volume_to_category(1), Some(3));
        assert_eq!(volume_to_category(10), Some(245));
        assert_eq!(volume_to_category(13), Some(446));
        assert_eq!(volume_to_category(16), Some(825));
        assert_eq!(volume_to_category(17), Some(859));
    }

    #[test]
    fn category_mapping_sentinel_outside_range() {
        assert_eq!(volume_to_category(0), None);
        assert_eq!(volume_to_category(18), None);
        assert_eq!(volume_to_category(u32::MAX), None);
    }

    #[test]
    fn form_fields_are_replayed_verbatim() {
        let html = r#"
            <form id="the-form" method="post">
              <input type="hidden" name="form_id" value="view_form" />
              <input type="hidden" name="form_token" value="a&amp;b" />
              <input type="submit" value="Go" />
            </form>
            <form><input name="outside" value="nope" /></form>"#;
        let fields = hidden_form_fields(html, "the-form").unwrap();
        assert_eq!(
            fields,
            vec![
                ("form_id".to_string(), "view_form".to_string()),
                ("form_token".to_string(), "a&b".to_string()),
            ]
        );
    }

    #[test]
    fn missing_form_is_malformed() {
        assert!(matches!(
            hidden_form_fields("<html></html>", "the-form"),
            Err(Error::Malformed("the-form"))
        ));
    }
}
