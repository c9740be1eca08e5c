//! Wave Portal WASM Frontend
//!
//! Binds the page, renders the portal state, and drives the injected
//! wallet. Component logic lives in `wp-portal-core`; this crate is DOM glue.

pub mod dom;
pub mod events;
pub mod provider;
pub mod render;
pub mod state;
pub mod watch;

use gloo_console as console;
use provider::{BrowserHost, BrowserPortal, BrowserProviders};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wp_chain_eip1193::Polling;
use wp_portal_core::{Portal, PortalConfig, PortalError};

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Drop the live subscription (page unmount).
#[wasm_bindgen]
pub fn teardown() {
    state::release_subscription();
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = load_config();

    let polling = Polling {
        interval: config.poll_interval(),
        confirmation_timeout: config.confirmation_timeout(),
    };
    let host = BrowserHost::new(BrowserProviders, polling);
    let portal: Rc<BrowserPortal> = Rc::new(Portal::new(host, config));

    // Re-render on every state transition
    {
        let els = els.clone();
        portal
            .state()
            .on_change(move |state| render::render_state(&els, state));
    }
    render::render_state(&els, &portal.state().snapshot());

    events::bind_events(&els, &portal)?;

    wasm_bindgen_futures::spawn_local(check_if_wallet_is_connected(portal.clone()));
    wasm_bindgen_futures::spawn_local(watch::subscribe_to_wave_events(portal));

    Ok(())
}

async fn check_if_wallet_is_connected(portal: Rc<BrowserPortal>) {
    match portal.check_if_wallet_is_connected().await {
        Ok(Some(account)) => console::log!(format!("Found an authorized account: {account}")),
        Ok(None) => console::log!("No authorized account found"),
        Err(PortalError::NoProvider) => console::log!("Make sure you have metamask!"),
        Err(err) => console::error!(format!("startup check failed: {err}")),
    }
}

/// Optional `<script id="portalConfig" type="application/json">` overrides.
fn load_config() -> PortalConfig {
    let Some(el) = dom::by_id("portalConfig") else {
        return PortalConfig::default();
    };
    let raw = el.text_content().unwrap_or_default();
    match PortalConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            console::warn!(format!("ignoring portalConfig: {err}"));
            PortalConfig::default()
        }
    }
}
