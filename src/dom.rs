//! Typed HTML tree over `scraper`
//!
//! The scoring and harvesting code only ever asks three questions of the DOM:
//! which elements match a CSS selector, what text they contain, and what a
//! given attribute holds. `Document` and `Node` expose exactly that.

use scraper::{ElementRef, Html, Selector};

use crate::normalize::collapse_whitespace;

/// Parse a CSS selector, logging and returning `None` when it is invalid
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            log::debug!("invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

/// A parsed HTML document
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML document. html5ever recovers from any malformed input.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// A document with no content, for pages that were never parsed
    pub fn empty() -> Self {
        Self {
            html: Html::new_document(),
        }
    }

    /// All elements matching `css`, in document order
    pub fn find(&self, css: &str) -> Vec<Node<'_>> {
        match selector(css) {
            Some(sel) => self.html.select(&sel).map(Node).collect(),
            None => Vec::new(),
        }
    }

    /// First element matching `css`
    pub fn first(&self, css: &str) -> Option<Node<'_>> {
        let sel = selector(css)?;
        self.html.select(&sel).next().map(Node)
    }

    /// Number of elements matching `css`
    pub fn count(&self, css: &str) -> usize {
        match selector(css) {
            Some(sel) => self.html.select(&sel).count(),
            None => 0,
        }
    }

    /// Whether any element matches `css`
    pub fn exists(&self, css: &str) -> bool {
        self.first(css).is_some()
    }

    /// Whitespace-collapsed text of `<body>`, empty if there is none
    pub fn body_text(&self) -> String {
        self.first("body").map(|b| b.text()).unwrap_or_default()
    }
}

/// An element inside a `Document`
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// Descendant elements matching `css`, excluding this element itself
    pub fn find(&self, css: &str) -> Vec<Node<'a>> {
        match selector(css) {
            Some(sel) => self.find_with(&sel),
            None => Vec::new(),
        }
    }

    /// Descendant elements matching a pre-parsed selector
    pub fn find_with(&self, sel: &Selector) -> Vec<Node<'a>> {
        let own_id = self.0.id();
        self.0
            .select(sel)
            .filter(|el| el.id() != own_id)
            .map(Node)
            .collect()
    }

    /// First descendant matching `css`
    pub fn first(&self, css: &str) -> Option<Node<'a>> {
        self.find(css).into_iter().next()
    }

    /// Whitespace-collapsed text content
    pub fn text(&self) -> String {
        collapse_whitespace(&self.0.text().collect::<Vec<_>>().join(" "))
    }

    /// Raw text nodes below this element, in document order
    pub fn text_nodes(&self) -> impl Iterator<Item = &'a str> {
        self.0.text()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Lowercase tag name
    pub fn tag(&self) -> &'a str {
        self.0.value().name()
    }

    pub fn matches(&self, sel: &Selector) -> bool {
        sel.matches(&self.0)
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.0.parent().and_then(ElementRef::wrap).map(Node)
    }

    /// Following sibling elements, nearest first
    pub fn next_siblings(&self) -> impl Iterator<Item = Node<'a>> {
        self.0.next_siblings().filter_map(ElementRef::wrap).map(Node)
    }

    /// Enclosing elements, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'a>> {
        self.0.ancestors().filter_map(ElementRef::wrap).map(Node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><body>
            <div class="card" id="outer">
                <h2>  Hello
                    World </h2>
                <a href="/one">One</a>
                <div class="card"><a href="/two">Two</a></div>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_find_and_text() {
        let doc = Document::parse(HTML);
        assert_eq!(doc.count(".card"), 2);
        assert_eq!(doc.first("h2").unwrap().text(), "Hello World");
        assert_eq!(doc.first("a").unwrap().attr("href"), Some("/one"));
        assert!(doc.exists("#outer"));
        assert!(!doc.exists("article"));
    }

    #[test]
    fn test_node_find_excludes_self() {
        let doc = Document::parse(HTML);
        let outer = doc.first("#outer").unwrap();
        assert_eq!(outer.find(".card").len(), 1);
        assert_eq!(outer.find("a").len(), 2);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let doc = Document::parse(HTML);
        let link = doc.find("a")[1];
        let card_sel = selector(".card").unwrap();
        let nearest = link.ancestors().find(|n| n.matches(&card_sel)).unwrap();
        assert_eq!(nearest.attr("id"), None);
        assert_eq!(link.parent().unwrap().tag(), "div");
    }

    #[test]
    fn test_next_siblings_skip_text() {
        let doc = Document::parse("<div><h3>A</h3> text <span>B</span><p>C</p></div>");
        let heading = doc.first("h3").unwrap();
        let tags: Vec<&str> = heading.next_siblings().map(|n| n.tag()).collect();
        assert_eq!(tags, vec!["span", "p"]);
        assert!(Document::empty().find("*").iter().all(|n| n.text().is_empty()));
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = Document::parse(HTML);
        assert!(doc.find("[[[").is_empty());
        assert_eq!(doc.count("[[["), 0);
    }
}
