//! The slice of the document the annotator reads and mutates.
//!
//! Everything goes through [`Dom`] so the formatter and marker logic can run
//! against an in-memory tree in tests. Reads never fail; a missing element or
//! attribute is `None`. Mutations can fail in the browser when the underlying
//! call throws.

use crate::error::Result;

pub trait Dom {
    type Element: Clone;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn text(&self, element: &Self::Element) -> String;

    fn set_text(&self, element: &Self::Element, text: &str) -> Result<()>;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn add_class(&self, element: &Self::Element, class: &str) -> Result<()>;

    fn remove_class(&self, element: &Self::Element, class: &str) -> Result<()>;

    fn set_style(&self, element: &Self::Element, property: &str, value: &str) -> Result<()>;

    /// Nearest ancestor-or-self matching `selector`.
    fn closest(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;

    fn previous_element_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Move every child of `element` into a new `tag` element appended to it.
    fn wrap_children(&self, element: &Self::Element, tag: &str) -> Result<()>;

    /// Insert a text node in front of the existing children.
    fn prepend_text(&self, element: &Self::Element, text: &str) -> Result<()>;

    /// Remove `prefix` from the first child when that child is a text node
    /// starting with it. Returns whether anything was removed.
    fn strip_leading_text(&self, element: &Self::Element, prefix: &str) -> Result<bool>;
}
