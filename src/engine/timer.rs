//! Fire-and-forget timers on the page clock.
//!
//! Delays are measured from the moment the timer is scheduled. Timers
//! cannot be cancelled; an action aimed at a node that has left the
//! document is dropped silently.

use crate::dom::{Document, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub enum TimerAction {
    SetStyle {
        node: NodeId,
        property: String,
        value: String,
    },
    Detach {
        node: NodeId,
    },
}

#[derive(Debug, Clone)]
struct Timer {
    due: f64,
    seq: u64,
    action: TimerAction,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: f64,
    next_seq: u64,
    pending: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the page started.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, delay_secs: f32, action: TimerAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer {
            due: self.now + delay_secs.max(0.0) as f64,
            seq,
            action,
        });
    }

    /// Move the clock forward and run every timer that came due, earliest
    /// first (ties in scheduling order). Returns how many ran.
    pub fn advance(&mut self, dt_secs: f64, doc: &mut Document) -> usize {
        self.now += dt_secs.max(0.0);
        let now = self.now;
        let (mut due, rest): (Vec<Timer>, Vec<Timer>) = self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        let fired = due.len();
        for timer in due {
            run_action(timer.action, doc);
        }
        fired
    }
}

fn run_action(action: TimerAction, doc: &mut Document) {
    match action {
        TimerAction::SetStyle { node, property, value } => {
            if doc.is_connected(node) {
                doc.set_style(node, &property, value);
            } else {
                log::debug!("timer: {:?} is gone, skipping {}", node, property);
            }
        }
        TimerAction::Detach { node } => {
            if doc.is_connected(node) {
                doc.detach(node);
            } else {
                log::debug!("timer: {:?} already removed", node);
            }
        }
    }
}
