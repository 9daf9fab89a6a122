//! Minimal structural HTML model
//!
//! Just enough of a document tree for the augmentation passes: parse the
//! generated markup, locate an anchor element by tag name, insert adjacent
//! to or inside it, and re-serialize deterministically. Not a general HTML
//! parser; the input is always one of our own generated documents.

use std::fmt;

/// Elements that never carry children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching close tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const INDENT: &str = "  ";

/// A structural parse failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub detail: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl std::error::Error for ParseError {}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Doctype declaration, stored as the raw text after `<!`
    Doctype(String),
    Comment(String),
    Text(String),
    Element(Element),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute append; attribute order is preserved
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.contains(&self.tag.as_str())
    }
}

/// An in-memory HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// Parse markup into a document tree
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Parser::new(input).run()
    }

    /// First element with the given tag name, depth-first
    pub fn find(&self, tag: &str) -> Option<&Element> {
        find_in(&self.children, tag)
    }

    /// Whether any element matches tag plus an exact attribute value.
    /// Used as the idempotence guard before injecting.
    pub fn contains_element(&self, tag: &str, attr: &str, value: &str) -> bool {
        contains_in(&self.children, tag, attr, value)
    }

    /// Insert `node` as the next sibling of the first element with the
    /// anchor tag. Returns false when the anchor is absent.
    pub fn insert_after(&mut self, anchor_tag: &str, node: Node) -> bool {
        insert_after_in(&mut self.children, anchor_tag, node).is_none()
    }

    /// Append `node` as the last child of the first element with the given
    /// tag. Returns false when the anchor is absent.
    pub fn append_child(&mut self, parent_tag: &str, node: Node) -> bool {
        append_child_in(&mut self.children, parent_tag, node).is_none()
    }

    /// Serialize to indented text. Deterministic: two-space indentation,
    /// attributes in insertion order, one element per line except
    /// text-only elements which render inline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            render_node(node, 0, &mut out);
        }
        out
    }
}

fn find_in<'a>(nodes: &'a [Node], tag: &str) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(el) = node {
            if el.tag == tag {
                return Some(el);
            }
            if let Some(found) = find_in(&el.children, tag) {
                return Some(found);
            }
        }
    }
    None
}

fn contains_in(nodes: &[Node], tag: &str, attr: &str, value: &str) -> bool {
    nodes.iter().any(|node| match node {
        Node::Element(el) => {
            (el.tag == tag && el.attr_value(attr) == Some(value))
                || contains_in(&el.children, tag, attr, value)
        }
        _ => false,
    })
}

// The mutating walks return the node back in Some when no anchor was found,
// so the caller keeps ownership for the next subtree.
fn insert_after_in(nodes: &mut Vec<Node>, anchor_tag: &str, node: Node) -> Option<Node> {
    let mut pending = node;
    for i in 0..nodes.len() {
        let is_anchor = matches!(&nodes[i], Node::Element(el) if el.tag == anchor_tag);
        if is_anchor {
            nodes.insert(i + 1, pending);
            return None;
        }
        if let Node::Element(el) = &mut nodes[i] {
            match insert_after_in(&mut el.children, anchor_tag, pending) {
                None => return None,
                Some(returned) => pending = returned,
            }
        }
    }
    Some(pending)
}

fn append_child_in(nodes: &mut [Node], parent_tag: &str, node: Node) -> Option<Node> {
    let mut pending = node;
    for item in nodes.iter_mut() {
        if let Node::Element(el) = item {
            if el.tag == parent_tag {
                el.children.push(pending);
                return None;
            }
            match append_child_in(&mut el.children, parent_tag, pending) {
                None => return None,
                Some(returned) => pending = returned,
            }
        }
    }
    Some(pending)
}

fn render_node(node: &Node, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    match node {
        Node::Doctype(decl) => {
            out.push_str(&pad);
            out.push_str("<!");
            out.push_str(decl);
            out.push_str(">\n");
        }
        Node::Comment(text) => {
            out.push_str(&pad);
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->\n");
        }
        Node::Text(text) => {
            out.push_str(&pad);
            out.push_str(text);
            out.push('\n');
        }
        Node::Element(el) => {
            out.push_str(&pad);
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
            out.push('>');

            if el.is_void() {
                out.push('\n');
                return;
            }

            let text_only = el.children.iter().all(|c| matches!(c, Node::Text(_)));
            if text_only {
                for child in &el.children {
                    if let Node::Text(text) = child {
                        out.push_str(text);
                    }
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push_str(">\n");
            } else {
                out.push('\n');
                for child in &el.children {
                    render_node(child, depth + 1, out);
                }
                out.push_str(&pad);
                out.push_str("</");
                out.push_str(&el.tag);
                out.push_str(">\n");
            }
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn run(mut self) -> Result<Document, ParseError> {
        let mut doc = Document {
            children: Vec::new(),
        };
        let mut stack: Vec<Element> = Vec::new();

        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];

            if let Some(comment) = rest.strip_prefix("<!--") {
                let end = comment
                    .find("-->")
                    .ok_or_else(|| self.error("unterminated comment"))?;
                let node = Node::Comment(comment[..end].to_string());
                push_node(&mut doc, &mut stack, node);
                self.pos += 4 + end + 3;
            } else if rest.starts_with("<!") {
                let end = rest
                    .find('>')
                    .ok_or_else(|| self.error("unterminated doctype"))?;
                let node = Node::Doctype(rest[2..end].to_string());
                push_node(&mut doc, &mut stack, node);
                self.pos += end + 1;
            } else if rest.starts_with("</") {
                let end = rest
                    .find('>')
                    .ok_or_else(|| self.error("unterminated closing tag"))?;
                let name = rest[2..end].trim().to_ascii_lowercase();
                let top = stack
                    .pop()
                    .ok_or_else(|| self.error(&format!("unmatched closing tag </{}>", name)))?;
                if top.tag != name {
                    return Err(self.error(&format!(
                        "closing tag </{}> does not match open <{}>",
                        name, top.tag
                    )));
                }
                push_node(&mut doc, &mut stack, Node::Element(top));
                self.pos += end + 1;
            } else if rest.starts_with('<') {
                let element = self.parse_open_tag()?;
                if element.is_void() {
                    push_node(&mut doc, &mut stack, Node::Element(element));
                } else if element.is_raw_text() {
                    let element = self.parse_raw_text(element)?;
                    push_node(&mut doc, &mut stack, Node::Element(element));
                } else {
                    stack.push(element);
                }
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                let text = rest[..end].trim();
                if !text.is_empty() {
                    push_node(&mut doc, &mut stack, Node::Text(text.to_string()));
                }
                self.pos += end;
            }
        }

        if let Some(open) = stack.last() {
            return Err(self.error(&format!("unclosed element <{}>", open.tag)));
        }
        Ok(doc)
    }

    /// Parse `<name attr="value" ...>` starting at `<`; leaves pos after `>`.
    /// A trailing `/>` is accepted and treated as an empty element.
    fn parse_open_tag(&mut self) -> Result<Element, ParseError> {
        self.pos += 1; // consume '<'
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
        if name.is_empty() {
            return Err(self.error("expected tag name"));
        }
        let mut element = Element::new(&name);

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error("unterminated tag")),
                Some('>') => {
                    self.pos += 1;
                    return Ok(element);
                }
                Some('/') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek() != Some('>') {
                        return Err(self.error("expected '>' after '/'"));
                    }
                    self.pos += 1;
                    // Self-closed elements are treated as empty
                    return Ok(element);
                }
                Some(_) => {
                    let attr_name = self.take_while(|c| !c.is_whitespace() && !"=/>".contains(c));
                    if attr_name.is_empty() {
                        return Err(self.error("expected attribute name"));
                    }
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        self.parse_attr_value()?
                    } else {
                        String::new()
                    };
                    element.attrs.push((attr_name, value));
                }
            }
        }
    }

    fn parse_attr_value(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let value = self.take_while(|c| c != quote);
                if self.peek() != Some(quote) {
                    return Err(self.error("unterminated attribute value"));
                }
                self.pos += 1;
                Ok(value)
            }
            _ => Ok(self.take_while(|c| !c.is_whitespace() && !">/".contains(c))),
        }
    }

    /// Capture raw content of script/style up to the matching close tag
    fn parse_raw_text(&mut self, mut element: Element) -> Result<Element, ParseError> {
        let close = format!("</{}", element.tag);
        let rest = &self.input[self.pos..];
        let end = rest
            .to_ascii_lowercase()
            .find(&close)
            .ok_or_else(|| self.error(&format!("unclosed <{}>", element.tag)))?;

        let content = rest[..end].trim();
        if !content.is_empty() {
            element.children.push(Node::Text(content.to_string()));
        }

        let after = &rest[end..];
        let gt = after
            .find('>')
            .ok_or_else(|| self.error("unterminated closing tag"))?;
        self.pos += end + gt + 1;
        Ok(element)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let rest = &self.input[self.pos..];
        let end = rest
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_string()
    }

    fn error(&self, detail: &str) -> ParseError {
        ParseError {
            detail: format!("{} (byte {})", detail, self.pos),
        }
    }
}

fn push_node(doc: &mut Document, stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        doc.children.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\">\n    <title>demo</title>\n  </head>\n  <body>\n    <div id=\"app\"></div>\n  </body>\n</html>\n";

    #[test]
    fn parses_base_document() {
        let doc = Document::parse(BASE).unwrap();
        assert!(doc.find("head").is_some());
        let title = doc.find("title").unwrap();
        assert_eq!(title.children, vec![Node::Text("demo".to_string())]);
        let meta = doc.find("meta").unwrap();
        assert_eq!(meta.attr_value("charset"), Some("utf-8"));
    }

    #[test]
    fn render_is_stable_across_reparse() {
        let doc = Document::parse(BASE).unwrap();
        let once = doc.render();
        let twice = Document::parse(&once).unwrap().render();
        assert_eq!(once, twice);
    }

    #[test]
    fn insert_after_places_sibling_of_anchor() {
        let mut doc = Document::parse(BASE).unwrap();
        let script = Element::new("script").attr("src", "js/require.js");
        assert!(doc.insert_after("title", Node::Element(script)));

        let head = doc.find("head").unwrap();
        let tags: Vec<&str> = head
            .children
            .iter()
            .filter_map(|n| match n {
                Node::Element(el) => Some(el.tag.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tags, vec!["meta", "title", "script"]);
    }

    #[test]
    fn insert_after_missing_anchor_reports_failure() {
        let mut doc = Document::parse("<html><body></body></html>").unwrap();
        let script = Element::new("script");
        assert!(!doc.insert_after("title", Node::Element(script)));
    }

    #[test]
    fn append_child_goes_last() {
        let mut doc = Document::parse(BASE).unwrap();
        let link = Element::new("link").attr("href", "css/app.css");
        assert!(doc.append_child("head", Node::Element(link)));

        let head = doc.find("head").unwrap();
        match head.children.last().unwrap() {
            Node::Element(el) => assert_eq!(el.tag, "link"),
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn contains_element_matches_exact_attribute() {
        let mut doc = Document::parse(BASE).unwrap();
        doc.append_child(
            "head",
            Node::Element(Element::new("link").attr("href", "css/app.css")),
        );
        assert!(doc.contains_element("link", "href", "css/app.css"));
        assert!(!doc.contains_element("link", "href", "css/other.css"));
    }

    #[test]
    fn script_content_is_raw_text() {
        let doc =
            Document::parse("<html><head><script>if (a < b) { go(); }</script></head></html>")
                .unwrap();
        let script = doc.find("script").unwrap();
        assert_eq!(
            script.children,
            vec![Node::Text("if (a < b) { go(); }".to_string())]
        );
    }

    #[test]
    fn mismatched_close_tag_is_an_error() {
        let err = Document::parse("<html><head></body></html>").unwrap_err();
        assert!(err.detail.contains("</body>"));
    }

    #[test]
    fn unclosed_element_is_an_error() {
        let err = Document::parse("<html><head>").unwrap_err();
        assert!(err.detail.contains("unclosed"));
    }
}
