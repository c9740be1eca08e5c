//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add new UI elements, add a
//! field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlTextAreaElement};

// ── Helpers ──

fn doc() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn by_id(id: &str) -> Option<Element> {
    doc()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_hidden(el: &Element, hidden: bool) {
    toggle_class(el, "hidden", hidden);
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    doc()
        .ok_or_else(|| JsValue::from_str("no document"))?
        .create_element(tag)
}

// ── Elements struct ──

/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub msg_area: HtmlTextAreaElement,
    pub wave_btn: HtmlButtonElement,
    pub wave_label: Element,
    pub wave_spinner: Element,
    pub connect_btn: HtmlButtonElement,
    pub total_waves: Element,
    pub waves_body: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id).ok_or_else(|| {
            JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id))
        })?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            msg_area: get_typed!(HtmlTextAreaElement, "msgArea"),
            wave_btn: get_typed!(HtmlButtonElement, "waveBtn"),
            wave_label: get_el!("waveLabel"),
            wave_spinner: get_el!("waveSpinner"),
            connect_btn: get_typed!(HtmlButtonElement, "connectBtn"),
            total_waves: get_el!("totalWaves"),
            waves_body: get_el!("wavesBody"),
        })
    }
}
