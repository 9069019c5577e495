//! DOM bindings for the login and dashboard pages.
//!
//! Elements are looked up by id on every use, so the adapters hold no JS handles and
//! satisfy the `Send + Sync` bounds of the seams they implement.

use std::sync::Arc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement};

use crate::panels::Region;
use crate::session::{Navigator, RenderedStatus, SessionBridge, StatusDisplay};

#[derive(Debug)]
pub enum DomError {
    Unsupported(&'static str),
    MissingElement(String),
    Operation(String),
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomError::Unsupported(msg) => write!(f, "DOM unsupported: {msg}"),
            DomError::MissingElement(id) => write!(f, "No element with id '{id}'"),
            DomError::Operation(msg) => write!(f, "DOM error: {msg}"),
        }
    }
}

impl std::error::Error for DomError {}

pub type DomResult<T> = Result<T, DomError>;

const NO_DOCUMENT: &str = "window.document is not available in this environment";

fn document() -> DomResult<Document> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or(DomError::Unsupported(NO_DOCUMENT))
}

fn element(id: &str) -> DomResult<Element> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| DomError::MissingElement(id.to_string()))
}

/// Whether the page carries an element with this id.
pub fn has_element(id: &str) -> bool {
    element(id).is_ok()
}

/// Reads a `data-*` attribute, e.g. the WhatsApp id on the conversation list.
pub fn data_attribute(id: &str, name: &str) -> Option<String> {
    element(id)
        .ok()?
        .get_attribute(&format!("data-{name}"))
        .filter(|value| !value.is_empty())
}

fn input_value(id: &str) -> String {
    element(id)
        .ok()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

/// `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = window.location().set_href(path) {
            log::error!("navigation to {path} failed: {}", js_value_to_string(&err));
        }
    }
}

/// Status element whose text and colour mirror the bridge status.
#[derive(Clone, Debug)]
pub struct StatusElement {
    id: String,
}

impl StatusElement {
    /// `None` when the page has no such element.
    pub fn find(id: &str) -> Option<Self> {
        has_element(id).then(|| Self { id: id.to_string() })
    }
}

impl StatusDisplay for StatusElement {
    fn show(&self, status: &RenderedStatus) {
        let Ok(el) = element(&self.id) else {
            return;
        };
        el.set_text_content(Some(&status.text));
        if let Ok(html) = el.dyn_into::<HtmlElement>() {
            let _ = html.style().set_property("color", status.color);
        }
    }
}

/// Panel region backed by an element's `innerHTML`.
#[derive(Clone, Debug)]
pub struct ElementRegion {
    id: String,
}

impl ElementRegion {
    pub fn find(id: &str) -> Option<Self> {
        has_element(id).then(|| Self { id: id.to_string() })
    }
}

impl Region for ElementRegion {
    fn set_html(&self, markup: &str) {
        if let Ok(el) = element(&self.id) {
            el.set_inner_html(markup);
        }
    }
}

/// Runs `bridge.sign_in` with the two input values whenever the button is clicked.
pub fn bind_sign_in(
    bridge: &Arc<SessionBridge>,
    button_id: &str,
    email_id: &str,
    password_id: &str,
) -> DomResult<()> {
    let button = element(button_id)?;
    let bridge = Arc::clone(bridge);
    let email_id = email_id.to_string();
    let password_id = password_id.to_string();
    let handler = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        let bridge = Arc::clone(&bridge);
        let email = input_value(&email_id);
        let password = input_value(&password_id);
        wasm_bindgen_futures::spawn_local(async move {
            let _ = bridge.sign_in(&email, &password).await;
        });
    });
    button
        .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
        .map_err(|err| DomError::Operation(js_value_to_string(&err)))?;
    // The listener lives as long as the page.
    handler.forget();
    Ok(())
}

/// Runs `bridge.sign_out` when the control is clicked, suppressing its default action.
pub fn bind_sign_out(bridge: &Arc<SessionBridge>, control_id: &str) -> DomResult<()> {
    let control = element(control_id)?;
    let bridge = Arc::clone(bridge);
    let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let bridge = Arc::clone(&bridge);
        wasm_bindgen_futures::spawn_local(async move {
            bridge.sign_out().await;
        });
    });
    control
        .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
        .map_err(|err| DomError::Operation(js_value_to_string(&err)))?;
    handler.forget();
    Ok(())
}

fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
