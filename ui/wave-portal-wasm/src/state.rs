//! Page-lifetime handles.
//!
//! Portal state itself lives in `wp_portal_core::SharedState`; this only
//! keeps what must outlive the mount task.

use std::cell::RefCell;
use wp_portal_core::SubscriptionGuard;

thread_local! {
    static SUBSCRIPTION: RefCell<Option<SubscriptionGuard>> = const { RefCell::new(None) };
}

/// Keep the live subscription registered until `release_subscription`.
pub fn hold_subscription(guard: SubscriptionGuard) {
    SUBSCRIPTION.with(|s| *s.borrow_mut() = Some(guard));
}

/// Returns whether a subscription was registered.
pub fn release_subscription() -> bool {
    // take first: the guard's drop must not run under the borrow
    let guard = SUBSCRIPTION.with(|s| s.borrow_mut().take());
    guard.is_some()
}
