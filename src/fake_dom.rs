//! In-memory [`Dom`] used by the tests.
//!
//! Supports compound selectors made of a tag, `#id` and `.class` parts
//! (`time.auction-end-time`, `#last-updated`, `a`); no combinators.

use std::cell::RefCell;

use crate::dom::Dom;
use crate::error::{AnnotateError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
enum Child {
    Text(String),
    Element(NodeId),
}

#[derive(Debug)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<Child>,
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Node {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }
}

struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    fn parse(selector: &str) -> Selector {
        let mut parsed = Selector { tag: None, id: None, classes: Vec::new() };
        let mut current = String::new();
        let mut kind = ' ';
        for ch in selector.trim().chars().chain(std::iter::once('\0')) {
            if ch == '.' || ch == '#' || ch == '\0' {
                if !current.is_empty() {
                    match kind {
                        '.' => parsed.classes.push(current.clone()),
                        '#' => parsed.id = Some(current.clone()),
                        _ => parsed.tag = Some(current.clone()),
                    }
                }
                current.clear();
                kind = ch;
            } else {
                current.push(ch);
            }
        }
        parsed
    }

    fn matches(&self, node: &Node) -> bool {
        self.tag.as_ref().map_or(true, |tag| tag.eq_ignore_ascii_case(&node.tag))
            && self.id.as_ref().map_or(true, |id| node.id.as_ref() == Some(id))
            && self.classes.iter().all(|class| node.classes.contains(class))
    }
}

pub struct FakeDom {
    nodes: RefCell<Vec<Node>>,
}

impl FakeDom {
    pub fn new() -> Self {
        FakeDom {
            nodes: RefCell::new(vec![Node::new("body", None)]),
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element described as `tag#id.class.class` to `parent`.
    pub fn append(&self, parent: NodeId, descriptor: &str) -> NodeId {
        let selector = Selector::parse(descriptor);
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        let mut node = Node::new(selector.tag.as_deref().unwrap_or("div"), Some(parent));
        node.id = selector.id;
        node.classes = selector.classes;
        nodes.push(node);
        nodes[parent.0].children.push(Child::Element(id));
        id
    }

    pub fn append_text(&self, parent: NodeId, text: &str) {
        self.nodes.borrow_mut()[parent.0]
            .children
            .push(Child::Text(text.to_string()));
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let attributes = &mut nodes[node.0].attributes;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0]
            .style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.clone())
    }

    /// Serialise `node` and its subtree, for whole-state assertions.
    pub fn markup(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        write_markup(&nodes, node, &mut out);
        out
    }

    fn descendants(&self, from: NodeId, out: &mut Vec<NodeId>) {
        out.push(from);
        let children: Vec<NodeId> = self.nodes.borrow()[from.0]
            .children
            .iter()
            .filter_map(|child| match child {
                Child::Element(id) => Some(*id),
                Child::Text(_) => None,
            })
            .collect();
        for child in children {
            self.descendants(child, out);
        }
    }
}

fn write_markup(nodes: &[Node], id: NodeId, out: &mut String) {
    let node = &nodes[id.0];
    out.push('<');
    out.push_str(&node.tag);
    if let Some(element_id) = &node.id {
        out.push_str(&format!(" id=\"{}\"", element_id));
    }
    if !node.classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", node.classes.join(" ")));
    }
    for (name, value) in &node.attributes {
        out.push_str(&format!(" {}=\"{}\"", name, value));
    }
    if !node.style.is_empty() {
        let style: Vec<String> = node
            .style
            .iter()
            .map(|(key, value)| format!("{}: {};", key, value))
            .collect();
        out.push_str(&format!(" style=\"{}\"", style.join(" ")));
    }
    out.push('>');
    for child in &node.children {
        match child {
            Child::Text(text) => out.push_str(text),
            Child::Element(child) => write_markup(nodes, *child, out),
        }
    }
    out.push_str(&format!("</{}>", node.tag));
}

/// `classList` rejects empty tokens and tokens containing whitespace.
fn check_token(class: &str) -> Result<()> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(AnnotateError::Dom(format!("invalid class token '{}'", class)));
    }
    Ok(())
}

fn collect_text(nodes: &[Node], id: NodeId, out: &mut String) {
    for child in &nodes[id.0].children {
        match child {
            Child::Text(text) => out.push_str(text),
            Child::Element(child) => collect_text(nodes, *child, out),
        }
    }
}

impl Dom for FakeDom {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_all(&format!("#{}", id)).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let selector = Selector::parse(selector);
        let mut all = Vec::new();
        self.descendants(self.body(), &mut all);
        let nodes = self.nodes.borrow();
        all.into_iter()
            .filter(|id| selector.matches(&nodes[id.0]))
            .collect()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[element.0]
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn text(&self, element: &NodeId) -> String {
        let mut text = String::new();
        collect_text(&self.nodes.borrow(), *element, &mut text);
        text
    }

    fn set_text(&self, element: &NodeId, text: &str) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let removed = std::mem::replace(
            &mut nodes[element.0].children,
            vec![Child::Text(text.to_string())],
        );
        for child in removed {
            if let Child::Element(id) = child {
                nodes[id.0].parent = None;
            }
        }
        Ok(())
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[element.0]
            .classes
            .iter()
            .any(|existing| existing == class)
    }

    fn add_class(&self, element: &NodeId, class: &str) -> Result<()> {
        check_token(class)?;
        if !self.has_class(element, class) {
            self.nodes.borrow_mut()[element.0].classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, element: &NodeId, class: &str) -> Result<()> {
        check_token(class)?;
        self.nodes.borrow_mut()[element.0]
            .classes
            .retain(|existing| existing != class);
        Ok(())
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[element.0].style;
        match style.iter_mut().find(|(key, _)| key == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => style.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn closest(&self, element: &NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector);
        let nodes = self.nodes.borrow();
        let mut current = Some(*element);
        while let Some(id) = current {
            if selector.matches(&nodes[id.0]) {
                return Some(id);
            }
            current = nodes[id.0].parent;
        }
        None
    }

    fn previous_element_sibling(&self, element: &NodeId) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let parent = nodes[element.0].parent?;
        let siblings = &nodes[parent.0].children;
        let position = siblings
            .iter()
            .position(|child| matches!(child, Child::Element(id) if id == element))?;
        siblings[..position].iter().rev().find_map(|child| match child {
            Child::Element(id) => Some(*id),
            Child::Text(_) => None,
        })
    }

    fn wrap_children(&self, element: &NodeId, tag: &str) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let wrapper = NodeId(nodes.len());
        let moved = std::mem::replace(
            &mut nodes[element.0].children,
            vec![Child::Element(wrapper)],
        );
        for child in &moved {
            if let Child::Element(id) = child {
                nodes[id.0].parent = Some(wrapper);
            }
        }
        let mut node = Node::new(tag, Some(*element));
        node.children = moved;
        nodes.push(node);
        Ok(())
    }

    fn prepend_text(&self, element: &NodeId, text: &str) -> Result<()> {
        self.nodes.borrow_mut()[element.0]
            .children
            .insert(0, Child::Text(text.to_string()));
        Ok(())
    }

    fn strip_leading_text(&self, element: &NodeId, prefix: &str) -> Result<bool> {
        let mut nodes = self.nodes.borrow_mut();
        let children = &mut nodes[element.0].children;
        let rest = match children.first() {
            Some(Child::Text(text)) => match text.strip_prefix(prefix) {
                Some(rest) => rest.to_string(),
                None => return Ok(false),
            },
            _ => return Ok(false),
        };
        if rest.is_empty() {
            children.remove(0);
        } else {
            children[0] = Child::Text(rest);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_and_document_order() {
        let dom = FakeDom::new();
        let list = dom.append(dom.body(), "ul#listings");
        let first = dom.append(list, "time.auction-end-time");
        let other = dom.append(list, "time.posted");
        let second = dom.append(list, "time.auction-end-time.featured");

        assert_eq!(dom.query_all("time.auction-end-time"), vec![first, second]);
        assert_eq!(dom.query_all(".posted"), vec![other]);
        assert_eq!(dom.element_by_id("listings"), Some(list));
        assert_eq!(dom.element_by_id("missing"), None);
    }

    #[test]
    fn test_closest_and_previous_sibling() {
        let dom = FakeDom::new();
        let item = dom.append(dom.body(), "li");
        let link = dom.append(item, "a");
        dom.append_text(item, " ends ");
        let time = dom.append(item, "time");
        let nested = dom.append(link, "time");

        assert_eq!(dom.closest(&nested, "a"), Some(link));
        assert_eq!(dom.closest(&time, "a"), None);
        assert_eq!(dom.previous_element_sibling(&time), Some(link));
        assert_eq!(dom.previous_element_sibling(&link), None);
    }

    #[test]
    fn test_wrap_prepend_and_strip() {
        let dom = FakeDom::new();
        let link = dom.append(dom.body(), "a");
        dom.append_text(link, "Silver dollar ");
        let time = dom.append(link, "time");
        dom.append_text(time, "ends 5pm");

        dom.prepend_text(&link, "⏰ ").unwrap();
        assert_eq!(dom.text(&link), "⏰ Silver dollar ends 5pm");

        assert!(dom.strip_leading_text(&link, "⏰ ").unwrap());
        assert!(!dom.strip_leading_text(&link, "⏰ ").unwrap());

        dom.wrap_children(&link, "s").unwrap();
        assert_eq!(
            dom.markup(link),
            "<a><s>Silver dollar <time>ends 5pm</time></s></a>"
        );
        assert_eq!(dom.closest(&time, "a"), Some(link));
    }

    #[test]
    fn test_class_list_rejects_bad_tokens() {
        let dom = FakeDom::new();
        let link = dom.append(dom.body(), "a");

        assert!(dom.add_class(&link, "").is_err());
        assert!(dom.add_class(&link, "sold out").is_err());
        assert!(dom.remove_class(&link, "").is_err());
        assert_eq!(dom.markup(link), "<a></a>");

        dom.add_class(&link, "ended").unwrap();
        dom.add_class(&link, "ended").unwrap();
        assert_eq!(dom.markup(link), "<a class=\"ended\"></a>");
    }
}
