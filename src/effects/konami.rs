//! Konami code easter egg.

use crate::config::KonamiConfig;
use crate::dom::{Document, NodeId};
use crate::engine::timer::{TimerAction, TimerQueue};

/// Progress through a fixed key sequence.
///
/// Any key that is not the next expected one drops progress back to zero;
/// that key is not re-tested as the start of a new attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct KonamiDetector {
    sequence: Vec<String>,
    index: usize,
}

impl KonamiDetector {
    pub fn new(sequence: Vec<String>) -> Self {
        Self { sequence, index: 0 }
    }

    pub fn progress(&self) -> usize {
        self.index
    }

    /// Feed one key. Returns `true` when it completes the sequence.
    pub fn advance(&mut self, key: &str) -> bool {
        if self.sequence.is_empty() {
            return false;
        }
        if self.sequence[self.index] != key {
            self.index = 0;
            return false;
        }
        self.index += 1;
        if self.index == self.sequence.len() {
            self.index = 0;
            return true;
        }
        false
    }
}

impl Default for KonamiDetector {
    fn default() -> Self {
        Self::new(KonamiConfig::default().sequence)
    }
}

const MESSAGE_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "50%"),
    ("left", "50%"),
    ("transform", "translate(-50%, -50%)"),
    ("background", "var(--yellow)"),
    ("border", "4px solid var(--black)"),
    ("padding", "2rem"),
    ("font-family", "var(--font-display)"),
    ("font-size", "1.5rem"),
    ("z-index", "10000"),
    ("box-shadow", "8px 8px 0 var(--black)"),
    ("animation", "popIn 0.3s ease"),
];

/// The one-shot visual effect.
#[derive(Debug, Clone)]
pub struct EasterEgg {
    message: String,
    filter_secs: f32,
    message_secs: f32,
}

impl EasterEgg {
    pub fn new(cfg: &KonamiConfig) -> Self {
        Self {
            message: cfg.message.clone(),
            filter_secs: cfg.filter_secs,
            message_secs: cfg.message_secs,
        }
    }

    /// Rotate the page hue and pop up the message, scheduling both to undo
    /// themselves. Returns the message element, or `None` without a body.
    pub fn trigger(&self, doc: &mut Document, timers: &mut TimerQueue) -> Option<NodeId> {
        let body = doc.body()?;
        doc.set_style(body, "transition", "filter 0.5s ease");
        doc.set_style(body, "filter", "hue-rotate(180deg)");
        timers.schedule(
            self.filter_secs,
            TimerAction::SetStyle {
                node: body,
                property: "filter".into(),
                value: "hue-rotate(0deg)".into(),
            },
        );

        let message = doc.create_element("div");
        doc.add_class(message, "easter-egg");
        for (prop, val) in MESSAGE_STYLE {
            doc.set_style(message, prop, *val);
        }
        doc.append_text(message, self.message.as_str());
        doc.append_child(body, message);
        timers.schedule(self.message_secs, TimerAction::Detach { node: message });

        log::info!("{}", self.message);
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQ: [&str; 10] = [
        "ArrowUp",
        "ArrowUp",
        "ArrowDown",
        "ArrowDown",
        "ArrowLeft",
        "ArrowRight",
        "ArrowLeft",
        "ArrowRight",
        "b",
        "a",
    ];

    #[test]
    fn full_sequence_triggers_once_and_resets() {
        let mut k = KonamiDetector::default();
        let fired: Vec<bool> = SEQ.iter().map(|key| k.advance(key)).collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(fired[9]);
        assert_eq!(k.progress(), 0);
    }

    #[test]
    fn wrong_tenth_key_resets_without_triggering() {
        let mut k = KonamiDetector::default();
        for key in &SEQ[..9] {
            assert!(!k.advance(key));
        }
        assert_eq!(k.progress(), 9);
        assert!(!k.advance("x"));
        assert_eq!(k.progress(), 0);
    }

    #[test]
    fn back_to_back_sequences_trigger_twice() {
        let mut k = KonamiDetector::default();
        let count = SEQ.iter().chain(SEQ.iter()).filter(|key| k.advance(key)).count();
        assert_eq!(count, 2);
    }

    #[test]
    fn mismatched_key_is_not_a_fresh_start() {
        let mut k = KonamiDetector::default();
        k.advance("ArrowUp");
        k.advance("ArrowUp");
        // Third ArrowUp mismatches and does not count as a new first key.
        k.advance("ArrowUp");
        assert_eq!(k.progress(), 0);
    }

    #[test]
    fn effect_undoes_itself() {
        let mut doc = Document::new("about:blank");
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        let root = doc.root();
        doc.append_child(root, html);
        doc.append_child(html, body);

        let mut timers = TimerQueue::new();
        let egg = EasterEgg::new(&KonamiConfig::default());
        let msg = egg.trigger(&mut doc, &mut timers).unwrap();
        assert_eq!(doc.style(body, "filter"), Some("hue-rotate(180deg)"));
        assert_eq!(doc.collect_text(msg), "YOU FOUND THE SECRET!");
        assert!(doc.is_connected(msg));

        timers.advance(2.0, &mut doc);
        assert!(!doc.is_connected(msg));
        assert_eq!(doc.style(body, "filter"), Some("hue-rotate(180deg)"));
        timers.advance(1.0, &mut doc);
        assert_eq!(doc.style(body, "filter"), Some("hue-rotate(0deg)"));
    }

    #[test]
    fn no_body_no_effect() {
        let mut doc = Document::new("about:blank");
        let mut timers = TimerQueue::new();
        assert!(EasterEgg::new(&KonamiConfig::default()).trigger(&mut doc, &mut timers).is_none());
        assert_eq!(timers.pending(), 0);
    }
}
