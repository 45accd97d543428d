//! lazyhog TUI library exports.

pub mod api_client;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod fetch;
pub mod inspector;
pub mod intent;
pub mod json;
pub mod keys;
pub mod layout;
pub mod list;
pub mod logging;
pub mod nav;
pub mod notifications;
pub mod pivot;
pub mod poll;
pub mod runtime;
pub mod search;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
