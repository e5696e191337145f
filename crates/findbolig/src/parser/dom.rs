use scraper::{ElementRef, Html, Selector};

use super::{FormInput, MarkupStrategy, parse_building_id};
use crate::config::{RESULT_ROW_CLASS, RESULTS_TABLE_ID};
use crate::types::BuildingId;

const BUILDING_LINK_PREFIX: &str = "/Ejendomspraesentation.aspx?bid=";

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// CSS selector queries over a parsed document. Attribute values come back
/// entity-decoded, unlike [`super::PatternMarkup`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DomMarkup;

impl MarkupStrategy for DomMarkup {
    fn form_inputs(&self, html: &str) -> Vec<FormInput> {
        let document = Html::parse_document(html);
        let input_selector = Selector::parse("input").unwrap();

        document
            .select(&input_selector)
            .map(|e| {
                let attr = |name: &str| e.value().attr(name).map(str::to_string);
                FormInput {
                    name: attr("name"),
                    value: attr("value"),
                    input_type: attr("type"),
                }
            })
            .collect()
    }

    fn logged_in_user(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let name_selector = Selector::parse("span#fm1_lbl_userName").unwrap();

        document
            .select(&name_selector)
            .next()
            .map(|e| elem_text(e).trim().to_string())
            .filter(|name| !name.is_empty())
    }

    fn building_ids(&self, html: &str) -> Vec<BuildingId> {
        let document = Html::parse_document(html);
        let table_selector = Selector::parse(&format!("table#{}", RESULTS_TABLE_ID)).unwrap();
        let row_selector = Selector::parse(&format!("tr[class=\"{}\"]", RESULT_ROW_CLASS)).unwrap();
        let link_selector = Selector::parse(&format!("a[href^=\"{}\"]", BUILDING_LINK_PREFIX)).unwrap();

        let Some(table) = document.select(&table_selector).next() else {
            log::debug!("No results table on the waitlist page");
            return Vec::new();
        };

        table
            .select(&row_selector)
            .filter_map(|row| row.select(&link_selector).next())
            .filter_map(|link| link.value().attr("href"))
            .filter_map(|href| href.strip_prefix(BUILDING_LINK_PREFIX))
            .filter_map(parse_building_id)
            .collect()
    }
}
