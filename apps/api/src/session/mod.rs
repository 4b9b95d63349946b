// Session controller: per-session state machine (idle → running → idle),
// append-only history, reset counter and summary language switch.

pub mod controller;
pub mod handlers;
pub mod state;
pub mod store;
pub mod view;

pub use store::SessionStore;
