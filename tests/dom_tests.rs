#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_test::*;
use web_sys::Element;

use xlbridge::dom::StyleApplicator;
use xlbridge::session::DocumentSession;
use xlbridge::style_string::PropertyMap;

wasm_bindgen_test_configure!(run_in_browser);

const CONTENT_LOADED: &str = "grid-content-loaded";

fn grid_root() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(r#"<span data-cell="A1"></span><span data-cell="B1"></span>"#);
    document.body().unwrap().append_child(&root).unwrap();
    root
}

fn cell(root: &Element, addr: &str) -> Element {
    root.query_selector(&format!("[data-cell=\"{addr}\"]"))
        .unwrap()
        .unwrap()
}

fn color_update(value: &str) -> PropertyMap {
    let mut props = PropertyMap::new();
    props.insert("color".to_string(), value.to_string());
    props
}

async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}

/// Wait out the two chained animation frames the applicator schedules.
async fn settle() {
    for _ in 0..3 {
        next_frame().await;
    }
}

#[wasm_bindgen_test]
fn test_apply_now_merges_onto_existing_style() {
    let root = grid_root();
    cell(&root, "A1")
        .set_attribute("style", "width: 80px")
        .unwrap();

    let mut session = DocumentSession::new();
    let ticket = session.begin_open();
    session.apply_cell_style("A1", &color_update("red"));
    let session = Rc::new(RefCell::new(session));

    StyleApplicator::new(root.clone(), session, ticket)
        .apply_now()
        .unwrap();

    let style = cell(&root, "A1").get_attribute("style").unwrap();
    assert!(style.contains("color: red"));
    assert!(style.contains("width: 80px"));
}

#[wasm_bindgen_test]
fn test_missing_cells_are_skipped() {
    let root = grid_root();
    let mut session = DocumentSession::new();
    let ticket = session.begin_open();
    session.apply_cell_style("ZZ99", &color_update("red"));
    let session = Rc::new(RefCell::new(session));

    StyleApplicator::new(root, session, ticket).apply_now().unwrap();
}

#[wasm_bindgen_test]
async fn test_content_loaded_fires_on_every_notification() {
    let root = grid_root();
    let mut session = DocumentSession::new();
    let ticket = session.begin_open();
    session.apply_cell_style("A1", &color_update("red"));
    let session = Rc::new(RefCell::new(session));

    StyleApplicator::new(root.clone(), Rc::clone(&session), ticket)
        .apply_on_event(CONTENT_LOADED)
        .unwrap();

    root.dispatch_event(&web_sys::Event::new(CONTENT_LOADED).unwrap())
        .unwrap();
    settle().await;
    let style = cell(&root, "A1").get_attribute("style").unwrap();
    assert!(style.contains("color: red"), "first notification: {style}");

    // A data-driven reflow rebuilds the cells and fires again.
    root.set_inner_html(r#"<span data-cell="A1"></span>"#);
    session
        .borrow_mut()
        .apply_cell_style("A1", &color_update("blue"));

    root.dispatch_event(&web_sys::Event::new(CONTENT_LOADED).unwrap())
        .unwrap();
    settle().await;
    let style = cell(&root, "A1").get_attribute("style").unwrap();
    assert!(style.contains("color: blue"), "second notification: {style}");
}

#[wasm_bindgen_test]
async fn test_superseded_open_stops_applying() {
    let root = grid_root();
    let mut session = DocumentSession::new();
    let ticket = session.begin_open();
    session.apply_cell_style("A1", &color_update("red"));
    let session = Rc::new(RefCell::new(session));

    StyleApplicator::new(root.clone(), Rc::clone(&session), ticket)
        .apply_on_event(CONTENT_LOADED)
        .unwrap();

    // A newer open supersedes the one this applicator belongs to.
    session.borrow_mut().begin_open();

    root.dispatch_event(&web_sys::Event::new(CONTENT_LOADED).unwrap())
        .unwrap();
    settle().await;
    assert_eq!(cell(&root, "A1").get_attribute("style"), None);
}
