//! Intersection-driven page runtime.
//!
//! - `viewport`: viewport, root margins and observation policies
//! - `observer`: intersection observer emulation over laid-out boxes
//! - `visibility`: generic visibility engine and scroll reveal
//! - `nav_highlight`: active-section highlighting
//! - `timer`: page clock and one-shot timers
//! - `page`: a started page and its input handlers
//! - `pipeline`: load, parse, lay out, start

pub mod nav_highlight;
pub mod observer;
pub mod page;
pub mod pipeline;
pub mod timer;
pub mod viewport;
pub mod visibility;
