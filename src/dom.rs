//! A small element tree standing in for the page DOM.
//!
//! Text and attribute values are stored raw and escaped only by `render`,
//! so server-supplied strings never turn into markup.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn tag(&self) -> &str {
        self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(attr) => attr.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Child elements, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![Node::Text(text.to_string())];
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|e| e.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(e) => e.find_by_id_mut(id),
            Node::Text(_) => None,
        })
    }

    pub fn first_by_tag(&self, tag: &str) -> Option<&Element> {
        self.elements()
            .find_map(|e| if e.tag == tag { Some(e) } else { e.first_by_tag(tag) })
    }

    pub fn first_by_tag_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(e) => {
                if e.tag == tag {
                    Some(e)
                } else {
                    e.first_by_tag_mut(tag)
                }
            }
            Node::Text(_) => None,
        })
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, escape(value))?;
        }
        if is_void(self.tag) {
            return write!(f, ">");
        }
        write!(f, ">")?;
        for child in &self.children {
            match child {
                Node::Text(t) => write!(f, "{}", escape(t))?,
                Node::Element(e) => write!(f, "{}", e)?,
            }
        }
        write!(f, "</{}>", self.tag)
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img" | "meta")
}

pub fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_escapes_text_and_attributes() {
        let el = Element::new("td")
            .with_attr("data-plate", "x\"onclick=\"alert(1)")
            .with_text("<script>alert('x')</script>");
        assert_eq!(
            el.render(),
            "<td data-plate=\"x&quot;onclick=&quot;alert(1)\">&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</td>"
        );
        assert_eq!(el.text_content(), "<script>alert('x')</script>");
    }

    #[test]
    fn finds_nested_ids_and_mutates() {
        let mut root = Element::new("section").with_id("root").with_child(
            Element::new("div").with_child(Element::new("span").with_id("inner").with_text("a")),
        );
        root.find_by_id_mut("inner").unwrap().set_text("b");
        assert_eq!(root.find_by_id("inner").unwrap().text_content(), "b");
        assert!(root.find_by_id("missing").is_none());
        assert_eq!(root.find_by_id("root").unwrap().tag(), "section");
    }

    #[test]
    fn first_by_tag_mut_reaches_nested_elements() {
        let mut table = Element::new("table")
            .with_child(Element::new("thead").with_child(Element::new("tr")))
            .with_child(Element::new("tbody"));
        table
            .first_by_tag_mut("tbody")
            .unwrap()
            .append(Element::new("tr").with_text("row"));
        assert_eq!(table.first_by_tag("tbody").unwrap().text_content(), "row");
        table.first_by_tag_mut("tr").unwrap().set_text("head");
        assert_eq!(table.first_by_tag("thead").unwrap().text_content(), "head");
        assert!(table.first_by_tag_mut("tfoot").is_none());
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let input = Element::new("input").with_id("plate").with_attr("value", "A&B");
        assert_eq!(input.render(), "<input id=\"plate\" value=\"A&amp;B\">");
    }

    #[test]
    fn set_attr_replaces_existing_value() {
        let mut el = Element::new("span").with_class("badge");
        el.set_attr("class", "badge bg-success");
        assert_eq!(el.attr("class"), Some("badge bg-success"));
        assert_eq!(el.render(), "<span class=\"badge bg-success\"></span>");
    }
}
