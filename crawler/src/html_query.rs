//! Small query layer over a parsed `scraper::Html` document.
//!
//! The extractor only ever needs four shapes of query — first-by-tag,
//! all-by-tag, attribute lookup, and concatenated text — so this module
//! keeps to exactly those instead of exposing `scraper`'s full selector
//! language to callers.

use scraper::{ElementRef, Html, Selector};

/// Builds a `scraper::Selector` matching `tag` with every `attrs` pair
/// required as an exact attribute-value match (CSS attribute-equality
/// selectors), e.g. `by_tag_attrs("meta", &[("name", "robots")])`.
fn selector_for(tag: &str, attrs: &[(&str, &str)]) -> Selector {
    let mut css = tag.to_string();
    for (k, v) in attrs {
        css.push_str(&format!("[{k}=\"{}\"]", css_escape(v)));
    }
    // A selector built from a fixed tag name and escaped literal values
    // cannot fail to parse; `scraper` selectors are otherwise infallible
    // for this shape of input.
    Selector::parse(&css).unwrap_or_else(|_| Selector::parse(tag).expect("tag-only selector"))
}

fn css_escape(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Returns all descendants of `doc` with the given tag name, in document order.
pub fn by_tag<'a>(tag: &str, doc: &'a Html) -> Vec<ElementRef<'a>> {
    let sel = selector_for(tag, &[]);
    doc.select(&sel).collect()
}

/// Returns the first descendant matching `tag` and every `attrs` constraint, if any.
pub fn first<'a>(tag: &str, attrs: &[(&str, &str)], doc: &'a Html) -> Option<ElementRef<'a>> {
    let sel = selector_for(tag, attrs);
    doc.select(&sel).next()
}

/// Returns all descendants matching `tag` and every `attrs` constraint.
pub fn all<'a>(tag: &str, attrs: &[(&str, &str)], doc: &'a Html) -> Vec<ElementRef<'a>> {
    let sel = selector_for(tag, attrs);
    doc.select(&sel).collect()
}

/// Returns the attribute value, or the empty string if `node` is absent or
/// lacks the attribute.
pub fn attr(name: &str, node: Option<ElementRef<'_>>) -> String {
    node.and_then(|n| n.value().attr(name))
        .unwrap_or_default()
        .to_string()
}

/// Concatenates all text-node descendants of `node` in document order.
pub fn text(node: Option<ElementRef<'_>>) -> String {
    node.map(|n| n.text().collect::<String>()).unwrap_or_default()
}

/// Splits a `class` attribute value on ASCII whitespace.
pub fn classes(node: ElementRef<'_>) -> Vec<&str> {
    node.value()
        .attr("class")
        .map(|c| c.split_whitespace().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn first_by_tag() {
        let d = doc("<html><body><h1>One</h1><h1>Two</h1></body></html>");
        let h1 = first("h1", &[], &d);
        assert_eq!(text(h1), "One");
    }

    #[test]
    fn first_with_attrs() {
        let d = doc(
            r#"<html><head>
                <meta name="description" content="desc here">
                <meta name="robots" content="noindex">
               </head></html>"#,
        );
        let m = first("meta", &[("name", "robots")], &d);
        assert_eq!(attr("content", m), "noindex");
    }

    #[test]
    fn all_by_tag() {
        let d = doc("<html><body><a href=\"/a\">a</a><a href=\"/b\">b</a></body></html>");
        assert_eq!(all("a", &[], &d).len(), 2);
    }

    #[test]
    fn attr_on_absent_node_is_empty() {
        assert_eq!(attr("href", None), "");
    }

    #[test]
    fn text_concatenates_descendants() {
        let d = doc("<html><body><p>Hello <b>World</b>!</p></body></html>");
        let p = first("p", &[], &d);
        assert_eq!(text(p), "Hello World!");
    }

    #[test]
    fn classes_split_whitespace() {
        let d = doc("<html><body><div class=\"a  b\tc\"></div></body></html>");
        let div = first("div", &[], &d).unwrap();
        assert_eq!(classes(div), vec!["a", "b", "c"]);
    }
}
