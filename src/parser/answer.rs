use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use url::Url;

use super::flatten_text;
use crate::csv::{IMAGE_ANSWER_PREFIX, NO_ANSWER};

static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Resolve the answer for a question paragraph.
///
/// Only the element directly after the paragraph counts: a `<ul>` there is
/// read as a choice list, anything else is checked for an image. Every
/// unrecognized shape falls back to the placeholder.
pub fn resolve(paragraph: &ElementRef, base_url: &Url) -> String {
    let Some(sibling) = next_element_sibling(paragraph) else {
        return NO_ANSWER.to_string();
    };

    let found = if sibling.value().name() == "ul" {
        list_answer(&sibling)
    } else {
        image_answer(&sibling, base_url)
    };
    found.unwrap_or_else(|| NO_ANSWER.to_string())
}

/// First element (skipping text and comment nodes) among the following
/// siblings.
fn next_element_sibling<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// The correct choice carries a red-styled span; the answer is the full
/// text of the closest list item holding that span.
fn list_answer(list: &ElementRef) -> Option<String> {
    let marker = list
        .select(&SPAN)
        .find(|span| span.value().attr("style").is_some_and(is_red_highlight))?;
    let item = marker
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "li")?;
    Some(flatten_text(&item))
}

/// Substring test for an inline style that declares a red color. Case
/// matters: `color: #FF0000` does not match, while `background-color: red`
/// does.
pub(crate) fn is_red_highlight(style: &str) -> bool {
    style.contains("color") && (style.contains("red") || style.contains("#ff0000"))
}

/// An image directly after the question, either a bare `<img>` or one
/// wrapped in another element, answers it with its absolute source URL.
fn image_answer(sibling: &ElementRef, base_url: &Url) -> Option<String> {
    let img = if sibling.value().name() == "img" {
        *sibling
    } else {
        sibling.select(&IMG).next()?
    };
    let src = img.value().attr("src")?;
    let resolved = base_url.join(src).ok()?;
    Some(format!("{IMAGE_ANSWER_PREFIX}{resolved}"))
}
