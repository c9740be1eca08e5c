//! Applies a `ViewModel` to the bound elements.

use crate::dom::{self, Elements};
use gloo_console as console;
use time::UtcOffset;
use wasm_bindgen::prelude::*;
use wp_portal_core::{PortalState, ViewModel, WaveRow};

/// Viewer's offset at `timestamp`, so DST is honoured per row.
pub fn local_offset(timestamp: u64) -> UtcOffset {
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp as f64 * 1000.0));
    // getTimezoneOffset is minutes *behind* UTC
    let minutes = -(date.get_timezone_offset() as i32);
    UtcOffset::from_whole_seconds(minutes * 60).unwrap_or(UtcOffset::UTC)
}

pub fn render_state(els: &Elements, state: &PortalState) {
    let view = ViewModel::project(state, local_offset);
    if let Err(err) = render(els, &view) {
        console::error!("render failed", err);
    }
}

pub fn render(els: &Elements, view: &ViewModel) -> Result<(), JsValue> {
    // Rewriting an identical value would move the caret
    if els.msg_area.value() != view.draft {
        els.msg_area.set_value(&view.draft);
    }

    els.wave_btn.set_disabled(view.wave_button.disabled);
    dom::set_hidden(&els.wave_label, view.wave_button.spinner);
    dom::set_hidden(&els.wave_spinner, !view.wave_button.spinner);
    dom::set_hidden(&els.connect_btn, !view.show_connect);
    dom::set_text(&els.total_waves, &view.total_waves.to_string());

    render_rows(&els.waves_body, &view.rows)
}

fn render_rows(body: &web_sys::Element, rows: &[WaveRow]) -> Result<(), JsValue> {
    body.set_inner_html("");
    for row in rows {
        let tr = dom::create_element("tr")?;
        tr.set_class_name("logs");

        let address = cell("left", &row.address_short)?;
        address.set_attribute("title", &row.address)?;
        tr.append_child(&address)?;
        let message = cell("center", &row.message)?;
        tr.append_child(&message)?;
        let date = cell("right", &row.date)?;
        tr.append_child(&date)?;

        body.append_child(&tr)?;
    }
    Ok(())
}

// text content only: messages are untrusted
fn cell(align: &str, text: &str) -> Result<web_sys::Element, JsValue> {
    let td = dom::create_element("td")?;
    td.set_attribute("style", &format!("text-align: {align}"))?;
    dom::set_text(&td, text);
    Ok(td)
}
