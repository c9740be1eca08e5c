//! `window.ethereum` as an EIP-1193 transport.
//!
//! The injected object is looked up on every use, never cached: wallets can
//! inject late, and a missing provider must read as "absent", not an error.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wp_chain_eip1193::{Eip1193Host, Eip1193Transport, TransportSource};
use wp_portal_core::Portal;

pub type BrowserHost = Eip1193Host<BrowserProviders>;
pub type BrowserPortal = Portal<BrowserHost>;

#[derive(Clone)]
pub struct InjectedEthereum {
    ethereum: JsValue,
}

impl InjectedEthereum {
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }
}

/// Best-effort message out of a thrown JS value (provider errors carry
/// `{ code, message }`).
fn js_error(value: JsValue) -> anyhow::Error {
    let message = js_sys::Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    let code = js_sys::Reflect::get(&value, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    match code {
        Some(code) => anyhow!("{message} (code {code})"),
        None => anyhow!(message),
    }
}

#[async_trait(?Send)]
impl Eip1193Transport for InjectedEthereum {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| anyhow!("{method} arguments: {err}"))?;

        let request: js_sys::Function = js_sys::Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow!("provider has no request()"))?;
        let promise: js_sys::Promise = request
            .call1(&self.ethereum, &args)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow!("{method} did not return a promise"))?;

        let result = JsFuture::from(promise)
            .await
            .map_err(js_error)
            .with_context(|| method.to_owned())?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|err| anyhow!("{method} result: {err}"))
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// Detects the injected provider on demand.
pub struct BrowserProviders;

impl TransportSource for BrowserProviders {
    type Transport = InjectedEthereum;

    fn locate(&self) -> Option<InjectedEthereum> {
        InjectedEthereum::detect()
    }
}
