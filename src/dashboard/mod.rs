//! Engine dashboard
//!
//! Serves the embedded HTML dashboard at `/dashboard` (and `/`) with the
//! engine analytics and dataset summary rendered server-side, plus the
//! `/ws/engine` WebSocket the page and the 3D model use for live readings.

pub mod handler;
pub mod websocket;

pub use handler::{assets_handler, dashboard_handler, render_dashboard};
pub use websocket::{accept_frame, websocket_handler};
