use std::rc::Rc;
use std::time::Duration;

use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use wasm_bindgen::JsCast;

use crate::annotator::Annotator;
use crate::clock::SystemClock;
use crate::config::AnnotatorConfig;
use crate::dom::Dom;
use crate::error::{AnnotateError, Result};
use crate::scheduler::{self, Timers};

/// [`Dom`] over the live `web_sys::Document`.
#[derive(Clone)]
pub struct BrowserDom {
    document: web_sys::Document,
}

impl BrowserDom {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    pub fn current() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| AnnotateError::MissingElement("document".to_string()))?;
        Ok(Self::new(document))
    }
}

impl Dom for BrowserDom {
    type Element = web_sys::Element;

    fn element_by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<web_sys::Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            tracing::warn!("invalid selector '{}'", selector);
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect()
    }

    fn attribute(&self, element: &web_sys::Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn text(&self, element: &web_sys::Element) -> String {
        element.text_content().unwrap_or_default()
    }

    fn set_text(&self, element: &web_sys::Element, text: &str) -> Result<()> {
        element.set_text_content(Some(text));
        Ok(())
    }

    fn has_class(&self, element: &web_sys::Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&self, element: &web_sys::Element, class: &str) -> Result<()> {
        Ok(element.class_list().add_1(class)?)
    }

    fn remove_class(&self, element: &web_sys::Element, class: &str) -> Result<()> {
        Ok(element.class_list().remove_1(class)?)
    }

    fn set_style(&self, element: &web_sys::Element, property: &str, value: &str) -> Result<()> {
        let html_element = element
            .dyn_ref::<web_sys::HtmlElement>()
            .ok_or_else(|| AnnotateError::Dom(format!("<{}> has no inline style", element.tag_name())))?;
        Ok(html_element.style().set_property(property, value)?)
    }

    fn closest(&self, element: &web_sys::Element, selector: &str) -> Option<web_sys::Element> {
        element.closest(selector).ok().flatten()
    }

    fn previous_element_sibling(&self, element: &web_sys::Element) -> Option<web_sys::Element> {
        element.previous_element_sibling()
    }

    fn wrap_children(&self, element: &web_sys::Element, tag: &str) -> Result<()> {
        let wrapper = self.document.create_element(tag)?;
        while let Some(child) = element.first_child() {
            wrapper.append_child(&child)?;
        }
        element.append_child(&wrapper)?;
        Ok(())
    }

    fn prepend_text(&self, element: &web_sys::Element, text: &str) -> Result<()> {
        Ok(element.prepend_with_str_1(text)?)
    }

    fn strip_leading_text(&self, element: &web_sys::Element, prefix: &str) -> Result<bool> {
        let Some(first) = element.first_child() else {
            return Ok(false);
        };
        if first.node_type() != web_sys::Node::TEXT_NODE {
            return Ok(false);
        }
        let text = first.text_content().unwrap_or_default();
        let Some(rest) = text.strip_prefix(prefix) else {
            return Ok(false);
        };
        if rest.is_empty() {
            element.remove_child(&first)?;
        } else {
            first.set_text_content(Some(rest));
        }
        Ok(true)
    }
}

/// Browser intervals, kept alive for the lifetime of the page.
pub struct BrowserTimers;

impl Timers for BrowserTimers {
    fn every(&mut self, period: Duration, tick: Box<dyn FnMut()>) {
        // gloo hands the delay to setInterval as an i32
        let millis = u32::try_from(period.as_millis())
            .unwrap_or(u32::MAX)
            .min(i32::MAX as u32);
        Interval::new(millis, tick).forget();
    }
}

/// Build the annotator for the current page and start its ticks.
pub fn launch() -> Result<()> {
    let dom = BrowserDom::current()?;
    let config = AnnotatorConfig::from_dom(&dom);
    let annotator = Rc::new(Annotator::new(dom, SystemClock, config));
    scheduler::start(annotator, &mut BrowserTimers);
    Ok(())
}

/// Run `f` once the document has been parsed.
pub fn on_ready(f: impl FnOnce() + 'static) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| f()).forget();
    } else {
        f();
    }
}
