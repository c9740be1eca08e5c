//! Event binding.
//!
//! Async handlers are spawned via `wasm_bindgen_futures::spawn_local`; each
//! logs its outcome, nothing is surfaced beyond the rendered state.

use crate::dom::{self, Elements};
use crate::provider::BrowserPortal;
use crate::state;
use gloo_console as console;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wp_portal_core::PortalError;

/// Helper: attach async click handler to an element.
macro_rules! on_click_async {
    ($el:expr, $portal:expr, $handler:expr) => {{
        let portal = $portal.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let portal = portal.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&portal).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements, portal: &Rc<BrowserPortal>) -> Result<(), JsValue> {
    on_click_async!(els.wave_btn, portal, on_wave);
    on_click_async!(els.connect_btn, portal, on_connect);

    // ── Draft ──
    {
        let portal = portal.clone();
        let area = els.msg_area.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            portal.set_draft(area.value());
        }) as Box<dyn FnMut(_)>);
        els.msg_area
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // ── Unmount ──
    {
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            state::release_subscription();
        }) as Box<dyn FnMut(_)>);
        dom::window()?.add_event_listener_with_callback("pagehide", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}

pub async fn on_wave(portal: &BrowserPortal) {
    match portal.wave().await {
        Ok(receipt) => console::log!(format!("Mined -- {}", receipt.tx_hash)),
        Err(err) => console::error!(format!("wave failed: {err}")),
    }
}

pub async fn on_connect(portal: &BrowserPortal) {
    match portal.connect_wallet().await {
        Ok(account) => console::log!(format!("Connected {account}")),
        Err(PortalError::NoProvider) => {
            if let Ok(window) = dom::window() {
                let _ = window.alert_with_message("Get MetaMask!");
            }
        }
        Err(err) => console::error!(format!("connect failed: {err}")),
    }
}
