//! Viewport geometry and observation policies.
//!
//! Rects here are in client (viewport) coordinates unless noted. A policy's
//! root margin grows (positive) or trims (negative) the viewport box before
//! targets are intersected with it.

use crate::render::layout::LayoutBox;

/// The scrollable window onto the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll(&self, document_height: f32) -> f32 {
        (document_height - self.height).max(0.0)
    }

    /// Document-space box to client space.
    pub fn to_client(&self, b: LayoutBox) -> Rect {
        Rect {
            left: b.x,
            top: b.y - self.scroll_y,
            right: b.x + b.width,
            bottom: b.y + b.height - self.scroll_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Edge-inclusive intersection: touching rects intersect with zero area.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (r.left <= r.right && r.top <= r.bottom).then_some(r)
    }
}

/// A single root-margin side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
}

impl Length {
    fn resolve(self, basis: f32) -> f32 {
        match self {
            Length::Px(v) => v,
            Length::Percent(p) => basis * p / 100.0,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        let t = token.trim();
        if let Some(p) = t.strip_suffix('%') {
            return p.parse().ok().map(Length::Percent);
        }
        if let Some(px) = t.strip_suffix("px") {
            return px.parse().ok().map(Length::Px);
        }
        // Bare zero is the only unitless length CSS allows.
        match t.parse::<f32>() {
            Ok(v) if v == 0.0 => Some(Length::Px(0.0)),
            _ => None,
        }
    }
}

/// Four-sided inset/outset applied to the viewport box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

/// Invalid policy parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyError {
    pub message: String,
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PolicyError {}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: Length::Px(0.0),
        right: Length::Px(0.0),
        bottom: Length::Px(0.0),
        left: Length::Px(0.0),
    };

    /// Parse CSS margin shorthand with 1 to 4 values.
    pub fn parse(s: &str) -> Result<Self, PolicyError> {
        let parts: Vec<Length> = s
            .split_whitespace()
            .map(|t| {
                Length::parse(t).ok_or_else(|| PolicyError {
                    message: format!("rootMargin `{}`: bad length `{}`", s, t),
                })
            })
            .collect::<Result<_, _>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [a] => (*a, *a, *a, *a),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => {
                return Err(PolicyError {
                    message: format!("rootMargin `{}`: expected 1 to 4 values", s),
                })
            }
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// The viewport box adjusted by this margin, or `None` when the margins
    /// overlap so far that nothing is left.
    pub fn apply(&self, viewport: &Viewport) -> Option<Rect> {
        let (w, h) = (viewport.width, viewport.height);
        let mut r = Rect {
            left: -self.left.resolve(w),
            top: -self.top.resolve(h),
            right: w + self.right.resolve(w),
            bottom: h + self.bottom.resolve(h),
        };
        // Percent pairs like -20%/-80% meet exactly; tolerate rounding.
        const EPS: f32 = 1e-3;
        if r.right < r.left - EPS || r.bottom < r.top - EPS {
            return None;
        }
        r.right = r.right.max(r.left);
        r.bottom = r.bottom.max(r.top);
        Some(r)
    }
}

/// When a target counts as "intersecting".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationPolicy {
    pub threshold: f32,
    pub root_margin: RootMargin,
}

impl ObservationPolicy {
    pub fn new(threshold: f32, root_margin: &str) -> Result<Self, PolicyError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PolicyError {
                message: format!("threshold {} outside [0, 1]", threshold),
            });
        }
        Ok(Self {
            threshold,
            root_margin: RootMargin::parse(root_margin)?,
        })
    }

    /// Scroll reveals: 10% of the element on screen.
    pub fn reveal() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::ZERO,
        }
    }

    /// Nav band 20% below the top edge (`-20% 0px -80% 0px`).
    pub fn nav_band_offset() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin {
                top: Length::Percent(-20.0),
                right: Length::Px(0.0),
                bottom: Length::Percent(-80.0),
                left: Length::Px(0.0),
            },
        }
    }

    /// Nav band at the vertical center (`-50% 0px -50% 0px`).
    pub fn nav_band_centered() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin {
                top: Length::Percent(-50.0),
                right: Length::Px(0.0),
                bottom: Length::Percent(-50.0),
                left: Length::Px(0.0),
            },
        }
    }

    /// Visible ratio of `target` against the margin-adjusted viewport, and
    /// whether that counts as intersecting under this policy.
    pub fn evaluate(&self, target: &Rect, viewport: &Viewport) -> (f32, bool) {
        let root = match self.root_margin.apply(viewport) {
            Some(r) => r,
            None => return (0.0, false),
        };
        let hit = match target.intersect(&root) {
            Some(r) => r,
            None => return (0.0, false),
        };
        let target_area = target.area();
        let ratio = if target_area > 0.0 {
            (hit.area() / target_area).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let intersecting = if self.threshold > 0.0 {
            ratio >= self.threshold
        } else {
            true
        };
        (ratio, intersecting)
    }
}

impl Default for ObservationPolicy {
    fn default() -> Self {
        Self::reveal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(top: f32, bottom: f32) -> Rect {
        Rect {
            left: 0.0,
            top,
            right: 100.0,
            bottom,
        }
    }

    #[test]
    fn margin_shorthand() {
        let m = RootMargin::parse("-20% 0px -80% 0px").unwrap();
        assert_eq!(m, ObservationPolicy::nav_band_offset().root_margin);
        let one = RootMargin::parse("0px").unwrap();
        assert_eq!(one, RootMargin::ZERO);
        let two = RootMargin::parse("10px 5%").unwrap();
        assert_eq!(two.bottom, Length::Px(10.0));
        assert_eq!(two.left, Length::Percent(5.0));
        assert!(RootMargin::parse("").is_err());
        assert!(RootMargin::parse("1 2 3 4 5").is_err());
        assert!(RootMargin::parse("10em").is_err());
    }

    #[test]
    fn policy_rejects_out_of_range_threshold() {
        assert!(ObservationPolicy::new(1.5, "0px").is_err());
        assert!(ObservationPolicy::new(0.5, "0px").is_ok());
    }

    #[test]
    fn offset_band_collapses_to_a_line() {
        let vp = Viewport::new(1000.0, 800.0);
        let root = ObservationPolicy::nav_band_offset().root_margin.apply(&vp).unwrap();
        assert_eq!(root.top, 160.0);
        assert_eq!(root.bottom, 160.0);
    }

    #[test]
    fn threshold_ratio() {
        let vp = Viewport::new(100.0, 800.0);
        let policy = ObservationPolicy::reveal();
        // 50px of a 1000px element: 5%, under the 10% threshold.
        let (ratio, hit) = policy.evaluate(&rect(750.0, 1750.0), &vp);
        assert!((ratio - 0.05).abs() < 1e-4);
        assert!(!hit);
        let (_, hit) = policy.evaluate(&rect(600.0, 1600.0), &vp);
        assert!(hit);
        let (ratio, hit) = policy.evaluate(&rect(900.0, 1000.0), &vp);
        assert_eq!(ratio, 0.0);
        assert!(!hit);
    }

    #[test]
    fn band_is_edge_inclusive() {
        let vp = Viewport::new(100.0, 800.0);
        let policy = ObservationPolicy::nav_band_offset();
        assert!(policy.evaluate(&rect(0.0, 160.0), &vp).1);
        assert!(policy.evaluate(&rect(100.0, 700.0), &vp).1);
        assert!(!policy.evaluate(&rect(161.0, 700.0), &vp).1);
        assert!(!policy.evaluate(&rect(-500.0, 159.0), &vp).1);
    }

    #[test]
    fn client_rect_follows_scroll() {
        let mut vp = Viewport::new(100.0, 800.0);
        vp.scroll_y = 300.0;
        let r = vp.to_client(LayoutBox {
            x: 0.0,
            y: 1000.0,
            width: 100.0,
            height: 50.0,
        });
        assert_eq!(r.top, 700.0);
        assert_eq!(r.bottom, 750.0);
        assert_eq!(vp.max_scroll(500.0), 0.0);
    }
}
