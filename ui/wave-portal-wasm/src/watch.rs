//! Live `NewWave` polling for the page's lifetime.

use crate::provider::BrowserPortal;
use crate::state;
use gloo_console as console;
use std::rc::Rc;
use wp_portal_core::PortalError;

/// Subscribe, hand the guard to `state`, and pump until it is released.
pub async fn subscribe_to_wave_events(portal: Rc<BrowserPortal>) {
    let (mut subscription, guard) = match portal.subscribe().await {
        Ok(pair) => pair,
        Err(err) => {
            console::log!(format!("NewWave subscription unavailable: {err}"));
            return;
        }
    };
    state::hold_subscription(guard);

    let interval = portal.config().poll_interval();
    loop {
        gloo_timers::future::sleep(interval).await;
        match subscription.pump().await {
            Ok(0) => {}
            Ok(appended) => console::log!(format!("NewWave: {appended} appended")),
            Err(PortalError::SubscriptionClosed) => break,
            Err(err) => console::warn!(format!("NewWave poll failed: {err}")),
        }
    }
}
