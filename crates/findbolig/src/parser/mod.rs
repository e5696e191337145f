//! Extraction of structured data from the portal's markup.
//!
//! The portal's HTML is not under our control, so everything that depends on
//! its exact shape sits behind [`MarkupStrategy`]. [`PatternMarkup`] matches
//! the pages with regular expressions; [`DomMarkup`] walks a parsed document
//! with CSS selectors.

mod dom;
mod pattern;

use std::str::FromStr;

use crate::types::BuildingId;

pub use dom::DomMarkup;
pub use pattern::PatternMarkup;

/// One `<input>` element of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub name: Option<String>,
    pub value: Option<String>,
    pub input_type: Option<String>,
}

impl FormInput {
    pub fn is_button(&self) -> bool {
        self.input_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("button"))
    }
}

pub trait MarkupStrategy {
    /// Every `<input>` element on the page, in document order.
    fn form_inputs(&self, html: &str) -> Vec<FormInput>;

    /// The name shown next to the log-out link once authenticated.
    fn logged_in_user(&self, html: &str) -> Option<String>;

    /// Building ids linked from the data rows of the waitlist results table.
    /// Empty when the table is missing.
    fn building_ids(&self, html: &str) -> Vec<BuildingId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extractor {
    #[default]
    Pattern,
    Dom,
}

impl MarkupStrategy for Extractor {
    fn form_inputs(&self, html: &str) -> Vec<FormInput> {
        match self {
            Extractor::Pattern => PatternMarkup.form_inputs(html),
            Extractor::Dom => DomMarkup.form_inputs(html),
        }
    }

    fn logged_in_user(&self, html: &str) -> Option<String> {
        match self {
            Extractor::Pattern => PatternMarkup.logged_in_user(html),
            Extractor::Dom => DomMarkup.logged_in_user(html),
        }
    }

    fn building_ids(&self, html: &str) -> Vec<BuildingId> {
        match self {
            Extractor::Pattern => PatternMarkup.building_ids(html),
            Extractor::Dom => DomMarkup.building_ids(html),
        }
    }
}

/// Shared by both strategies: a bad `bid` is logged and dropped, never fatal.
fn parse_building_id(raw: &str) -> Option<BuildingId> {
    BuildingId::from_str(raw)
        .inspect_err(|e| log::warn!("Skipping waitlist row: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn ids(values: &[u64]) -> Vec<BuildingId> {
        values.iter().map(|v| BuildingId::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_strategies_agree_on_waitlist_fixture() {
        let html = fs::read_to_string("fixtures/waitlist.html").expect("Failed to read fixture");

        let expected = ids(&[1043, 2210, 87, 1043]);
        assert_eq!(Extractor::Pattern.building_ids(&html), expected);
        assert_eq!(Extractor::Dom.building_ids(&html), expected);
    }

    #[test]
    fn test_strategies_agree_on_login_fixture() {
        let html = fs::read_to_string("fixtures/login.html").expect("Failed to read fixture");

        let names = |inputs: Vec<FormInput>| -> Vec<Option<String>> {
            inputs
                .into_iter()
                .filter(|i| !i.is_button())
                .map(|i| i.name)
                .collect()
        };

        assert_eq!(
            names(Extractor::Pattern.form_inputs(&html)),
            names(Extractor::Dom.form_inputs(&html))
        );
    }

    #[test]
    fn test_strategies_agree_on_logged_in_user() {
        let html =
            fs::read_to_string("fixtures/logged_in.html").expect("Failed to read fixture");

        assert_eq!(
            Extractor::Pattern.logged_in_user(&html),
            Some("Jens Hansen".to_string())
        );
        assert_eq!(
            Extractor::Dom.logged_in_user(&html),
            Some("Jens Hansen".to_string())
        );
    }

    #[test]
    fn test_is_button_ignores_case() {
        let input = FormInput {
            name: Some("go".to_string()),
            value: None,
            input_type: Some("BUTTON".to_string()),
        };
        assert!(input.is_button());
    }
}
