//! UI view modules: pure rendering functions.
//!
//! Views read from [`AppState`](crate::state::AppState) and send
//! [`UiEvent`](crate::events::UiEvent)s on user interaction. No async, no
//! network, no wallet logic.

pub mod dashboard;
pub mod toast;
