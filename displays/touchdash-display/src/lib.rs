//! Retained-mode renderer for the touchdash panel
//!
//! This crate provides:
//! - `RenderScheduler`, the GUI runtime driven by the tick pump
//! - `StripeCanvas`, an `embedded-graphics` draw target over one draw-buffer
//!   stripe
//! - `Scene` trait and the `DashboardScreen` scene
//! - Theme colors
//!
//! # Architecture
//!
//! ```text
//!   tick_inc / timer_handler
//!            │
//!   ┌────────▼────────┐  read_pointer   ┌──────────────┐
//!   │ RenderScheduler ├────────────────►│ PointerInput │
//!   │                 │                 └──────────────┘
//!   │  invalid area   │  flush(stripe)  ┌──────────────┐
//!   │  draw buffer    ├────────────────►│ FlushTarget  │
//!   └────────┬────────┘                 └──────────────┘
//!            │ draw(StripeCanvas)
//!   ┌────────▼────────┐
//!   │      Scene      │
//!   └─────────────────┘
//! ```
//!
//! Only the invalidated area is redrawn. It is cut into horizontal stripes
//! that fit the draw buffer; the whole scene is drawn into each stripe and
//! clipped there.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod dashboard;
pub mod scene;
pub mod scheduler;
pub mod stripe;
pub mod theme;

// Re-export key types
pub use dashboard::DashboardScreen;
pub use scene::Scene;
pub use scheduler::{RenderScheduler, SchedulerConfig, SchedulerStats};
pub use stripe::StripeCanvas;
pub use theme::Theme;
