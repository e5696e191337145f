use std::sync::LazyLock;

use regex::Regex;

use super::{FormInput, MarkupStrategy, parse_building_id};
use crate::types::BuildingId;

static RE_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<input([^>]*)>").expect("invalid regex: input"));
static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)name="([^"]*)""#).expect("invalid regex: name"));
static RE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)value="([^"]*)""#).expect("invalid regex: value"));
static RE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)type="([^"]*)""#).expect("invalid regex: type"));
static RE_USER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span id="fm1_lbl_userName">(.*)&nbsp;</span>"#)
        .expect("invalid regex: user name")
});
static RE_RESULTS_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<table[^>]*id="GridView_Results"[^>]*>(.*?)</table>"#)
        .expect("invalid regex: results table")
});
static RE_RESULT_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<tr class="rowstyle"[^>]*>(.*?)</tr>"#).expect("invalid regex: result row")
});
static RE_BUILDING_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)href="/Ejendomspraesentation\.aspx\?bid=([^"]*)""#)
        .expect("invalid regex: building link")
});

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Regular-expression matching over the raw page text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMarkup;

impl MarkupStrategy for PatternMarkup {
    fn form_inputs(&self, html: &str) -> Vec<FormInput> {
        RE_INPUT
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .map(|attrs| {
                let attrs = attrs.as_str();
                FormInput {
                    name: first_capture(&RE_NAME, attrs),
                    value: first_capture(&RE_VALUE, attrs),
                    input_type: first_capture(&RE_TYPE, attrs),
                }
            })
            .collect()
    }

    fn logged_in_user(&self, html: &str) -> Option<String> {
        first_capture(&RE_USER_NAME, html).map(|name| name.trim().to_string())
    }

    fn building_ids(&self, html: &str) -> Vec<BuildingId> {
        let Some(table) = first_capture(&RE_RESULTS_TABLE, html) else {
            log::debug!("No results table on the waitlist page");
            return Vec::new();
        };

        RE_RESULT_ROW
            .captures_iter(&table)
            .filter_map(|row| first_capture(&RE_BUILDING_LINK, &row[1]))
            .filter_map(|bid| parse_building_id(&bid))
            .collect()
    }
}
