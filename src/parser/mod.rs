pub mod answer;
pub mod question;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use crate::csv::QaPair;

static CONTENT_AREA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.thecontent").unwrap());
static EMPHASIS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("strong, b").unwrap());

/// Extract numbered question/answer pairs from one page, in document order.
///
/// A question is a `<p>` directly under the content container that holds
/// bold text and flattens to a "N." prefix. A page without the container is
/// not an error: it logs a warning and yields nothing.
pub fn extract_pairs(html: &str, base_url: &Url) -> Vec<QaPair> {
    let document = Html::parse_document(html);

    let Some(content) = document.select(&CONTENT_AREA).next() else {
        warn!("could not find the main content area");
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for paragraph in content.children().filter_map(ElementRef::wrap) {
        if paragraph.value().name() != "p" {
            continue;
        }
        // Plain paragraphs are commentary, not questions.
        if paragraph.select(&EMPHASIS).next().is_none() {
            continue;
        }
        let text = flatten_text(&paragraph);
        if !question::is_numbered(&text) {
            continue;
        }
        let answer = answer::resolve(&paragraph, base_url);
        pairs.push(QaPair {
            question: text,
            answer,
        });
    }
    pairs
}

/// Visible text of an element: every text node trimmed, empty segments
/// dropped, the rest concatenated without separators.
pub(crate) fn flatten_text(el: &ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::{IMAGE_ANSWER_PREFIX, NO_ANSWER};

    fn base() -> Url {
        Url::parse("https://itexamanswers.example.net/ccna-2-v7-final.html").unwrap()
    }

    fn exam_page() -> Vec<QaPair> {
        let html = std::fs::read_to_string("tests/fixtures/exam_page.html").unwrap();
        extract_pairs(&html, &base())
    }

    #[test]
    fn pairs_come_back_in_document_order() {
        let pairs = exam_page();
        let prefixes: Vec<String> = pairs
            .iter()
            .map(|p| p.question.chars().take_while(|c| *c != '.').collect::<String>())
            .collect();
        assert_eq!(prefixes, ["1", "2", "3", "4", "6", "8"]);
    }

    #[test]
    fn commentary_and_unbolded_numbers_are_skipped() {
        let pairs = exam_page();
        assert_eq!(pairs.len(), 6);
        assert!(pairs.iter().all(|p| !p.question.contains("Ctrl+F")));
        assert!(pairs.iter().all(|p| !p.question.contains("passing score")));
        assert!(pairs.iter().all(|p| !p.question.starts_with("Note:")));
    }

    #[test]
    fn list_answers_come_from_the_red_span() {
        let pairs = exam_page();
        assert_eq!(
            pairs[0].question,
            "1.Which statement describes a characteristic of standard IPv4 ACLs?"
        );
        assert_eq!(
            pairs[0].answer,
            "They filter traffic based on source IP addresses only."
        );
        assert_eq!(pairs[1].answer, "It globally enables DHCP snooping on the switch.");
    }

    #[test]
    fn inner_emphasis_drops_surrounding_spaces() {
        let pairs = exam_page();
        assert_eq!(pairs[1].question, "2.What is the effect of theip dhcp snoopingcommand?");
    }

    #[test]
    fn fully_bolded_question_keeps_inner_spacing() {
        let pairs = exam_page();
        assert_eq!(
            pairs[2].question,
            "3. Refer to the exhibit. Which switch will be elected the root bridge?"
        );
    }

    #[test]
    fn exhibit_image_is_resolved_against_the_page_url() {
        let pairs = exam_page();
        assert_eq!(
            pairs[2].answer,
            format!(
                "{IMAGE_ANSWER_PREFIX}https://itexamanswers.example.net/wp-content/uploads/2019/12/i212934v1n1_Exhibit-3.png"
            )
        );
    }

    #[test]
    fn unanswered_questions_share_the_placeholder() {
        let pairs = exam_page();
        assert_eq!(pairs[3].answer, NO_ANSWER);
        assert_eq!(pairs[4].answer, NO_ANSWER);
        assert_eq!(pairs[5].answer, NO_ANSWER);
    }

    #[test]
    fn page_without_content_area_yields_nothing() {
        let html = r#"<html><body><div class="content"><p><b>1.</b> q?</p></div></body></html>"#;
        assert!(extract_pairs(html, &base()).is_empty());
    }

    #[test]
    fn flattened_question_text_is_exact() {
        let html = r#"<div class="thecontent">
            <p><strong>12.</strong> What is the answer?</p>
            <ul><li><span style="color: #ff0000">B. Forty-two</span></li></ul>
        </div>"#;
        let pairs = extract_pairs(html, &base());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "12.What is the answer?");
        assert_eq!(pairs[0].answer, "B. Forty-two");
    }

    #[test]
    fn bare_image_directly_under_the_container_counts() {
        let html = r#"<div class="thecontent">
            <p><b>3.</b> Which topology is shown?</p><img src="/img/topology.png">
        </div>"#;
        let pairs = extract_pairs(html, &base());
        assert_eq!(
            pairs[0].answer,
            "IMAGE ANSWER: https://itexamanswers.example.net/img/topology.png"
        );
    }

    #[test]
    fn only_direct_children_are_scanned() {
        let html = r#"<div class="thecontent">
            <blockquote><p><b>1.</b> quoted question?</p></blockquote>
            <p><b>2.</b> real question?</p>
        </div>"#;
        let pairs = extract_pairs(html, &base());
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].question.starts_with("2."));
    }

    #[test]
    fn unicode_question_text_survives() {
        let html = r#"<div class="thecontent">
            <p><strong>9.</strong> ¿Qué comando muestra la tabla de enrutamiento?</p>
            <ul><li><span style="color: red">show ip route</span></li></ul>
        </div>"#;
        let pairs = extract_pairs(html, &base());
        assert_eq!(pairs[0].question, "9.¿Qué comando muestra la tabla de enrutamiento?");
        assert_eq!(pairs[0].answer, "show ip route");
    }
}
