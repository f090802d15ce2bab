use ego_tree::iter::Edge;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use scrape_logging::scrape_warn;

/// Subtrees whose text never reaches the screen.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Parsed page, queried by CSS selector. Built once per request.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements matching `selector` in document order.
    ///
    /// A selector that fails to parse matches nothing.
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(sel) => self.html.select(&sel).collect(),
            None => Vec::new(),
        }
    }

    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let sel = parse_selector(selector)?;
        self.html.select(&sel).next()
    }
}

pub(crate) fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(err) => {
            scrape_warn!("invalid selector {:?}: {:?}", selector, err);
            None
        }
    }
}

/// Text a reader would see: hidden subtrees skipped, whitespace collapsed, trimmed.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    let mut hidden_depth = 0usize;

    for edge in element.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) => {
                    if hidden_depth > 0 || HIDDEN_TAGS.contains(&el.name()) {
                        hidden_depth += 1;
                    } else if el.name() == "br" {
                        raw.push(' ');
                    }
                }
                Node::Text(text) if hidden_depth == 0 => raw.push_str(text),
                _ => {}
            },
            Edge::Close(node) => {
                if node.value().is_element() && hidden_depth > 0 {
                    hidden_depth -= 1;
                }
            }
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
