//! Page collaborators that sit around the visibility engine.
//!
//! - `smooth_scroll`: in-page anchor clicks become animated scrolls
//! - `mobile_nav`: hamburger toggle and menu closing
//! - `konami`: key sequence detector and its easter egg
//! - `cursor_trail`: pointer-following dots (wide viewports only)
//! - `parallax`: scroll-linked translation (wide viewports only)
//! - `banner`: console greeting

pub mod banner;
pub mod cursor_trail;
pub mod konami;
pub mod mobile_nav;
pub mod parallax;
pub mod smooth_scroll;
