//! DOM style application (wasm32 only).
//!
//! Applies the session's per-cell style strings to rendered grid cells.
//! Cells are located under a root element by their `data-cell` attribute
//! holding the canonical A1 address. Styles are merged onto whatever
//! inline `style` attribute the renderer already put on the element, so
//! layout styling owned by the host survives.
//!
//! Rendering frameworks commit DOM asynchronously, so besides the
//! immediate [`StyleApplicator::apply_now`] there is
//! [`StyleApplicator::schedule_after_render`], which waits two animation
//! frames: the first fires before paint of the pending commit, the second
//! runs after that paint, when the cell elements exist.
//! [`StyleApplicator::apply_on_event`] re-runs that schedule on every
//! content-loaded notification from the host, covering data-driven
//! reflows that destroy and rebuild the cell elements.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::error::{Result, XlBridgeError};
use crate::session::{DocumentSession, OpenTicket};
use crate::style_string;

/// Applies one open's styles to the DOM, aborting once superseded.
#[derive(Clone)]
pub struct StyleApplicator {
    root: Element,
    session: Rc<RefCell<DocumentSession>>,
    ticket: OpenTicket,
}

impl StyleApplicator {
    pub fn new(
        root: Element,
        session: Rc<RefCell<DocumentSession>>,
        ticket: OpenTicket,
    ) -> Self {
        Self {
            root,
            session,
            ticket,
        }
    }

    /// Apply the session's style map to the cells under the root now.
    ///
    /// A stale ticket is a silent no-op: the styles belong to an open
    /// that has been superseded, and the DOM now shows a newer document.
    pub fn apply_now(&self) -> Result<()> {
        let session = self.session.borrow();
        if !session.is_current(self.ticket) {
            return Ok(());
        }

        for (addr, css) in session.styles() {
            let selector = format!("[data-cell=\"{addr}\"]");
            let Some(element) = self
                .root
                .query_selector(&selector)
                .map_err(|_| XlBridgeError::Decode(format!("bad selector for cell {addr}")))?
            else {
                continue;
            };
            merge_style_attribute(&element, css)?;
        }
        Ok(())
    }

    /// Apply after the host's pending render has been committed and
    /// painted, via two chained animation frames.
    pub fn schedule_after_render(&self) -> Result<()> {
        let window = web_sys::window().ok_or_else(no_window)?;

        let applicator = self.clone();
        let inner = Closure::once(move || {
            // Errors here have nowhere to go but the console.
            if let Err(e) = applicator.apply_now() {
                web_sys::console::warn_1(&e.to_string().into());
            }
        });
        let outer = Closure::once(move |_: f64| {
            if let Some(window) = web_sys::window() {
                let callback: &js_sys::Function = inner.as_ref().unchecked_ref();
                if window.request_animation_frame(callback).is_ok() {
                    // Callback owns itself until the frame fires.
                    inner.forget();
                }
            }
        });

        window
            .request_animation_frame(outer.as_ref().unchecked_ref())
            .map_err(|_| XlBridgeError::Decode("requestAnimationFrame failed".to_string()))?;
        outer.forget();
        Ok(())
    }

    /// Re-apply after every firing of the host's content-loaded event.
    ///
    /// The listener stays registered for the lifetime of the root element
    /// and fires on each notification; once this open is superseded the
    /// stale-ticket check turns further firings into no-ops.
    pub fn apply_on_event(&self, event_name: &str) -> Result<()> {
        let applicator = self.clone();
        let listener = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(
            move |_event: web_sys::Event| {
                if let Err(e) = applicator.schedule_after_render() {
                    web_sys::console::warn_1(&e.to_string().into());
                }
            },
        ));

        self.root
            .add_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref())
            .map_err(|_| XlBridgeError::Decode(format!("cannot listen for {event_name}")))?;
        listener.forget();
        Ok(())
    }
}

/// Merge a style string into an element's `style` attribute. Properties
/// already on the element keep their values unless the new string sets
/// them.
fn merge_style_attribute(element: &Element, css: &str) -> Result<()> {
    let existing = element.get_attribute("style").unwrap_or_default();
    let updates = style_string::parse(css);
    let merged = style_string::merge(&existing, &updates);
    element
        .set_attribute("style", &merged)
        .map_err(|_| XlBridgeError::Decode("cannot set style attribute".to_string()))
}

fn no_window() -> XlBridgeError {
    XlBridgeError::Decode("no window object".to_string())
}
