//! Rolling label window for temporal debouncing
//!
//! Keeps the last N classifier outputs of one detection stream and only
//! moves the committed pose once a label holds a clear majority of the
//! window. Single-frame misclassifications and brief occlusions never reach
//! the timeline.

use super::model::UNKNOWN_POSE;

/// Default number of frames in the voting window
pub const DEBOUNCE_WINDOW: usize = 10;

/// Default number of votes a label needs to be committed
pub const DEBOUNCE_QUORUM: usize = 8;

/// Majority-vote debouncer, one per detection stream
#[derive(Clone, Debug)]
pub struct Debouncer {
    /// Raw classifier labels, one slot per frame of the window
    labels: Vec<String>,

    /// Slot the next label overwrites (the oldest one once full)
    write_index: usize,

    /// No vote is taken until every slot holds a label
    filled: bool,

    quorum: usize,

    /// Label visible to the rest of the engine
    committed: String,
}

impl Debouncer {
    pub fn new(window: usize, quorum: usize) -> Self {
        let window = window.max(1);
        Self {
            labels: vec![String::new(); window],
            write_index: 0,
            filled: false,
            quorum: quorum.clamp(1, window),
            committed: UNKNOWN_POSE.to_string(),
        }
    }

    /// Push the latest raw label and return the committed label
    pub fn push(&mut self, label: &str) -> &str {
        let window = self.labels.len();
        self.labels[self.write_index].clear();
        self.labels[self.write_index].push_str(label);
        self.write_index = (self.write_index + 1) % window;

        if self.write_index == 0 {
            self.filled = true;
        }

        if self.filled {
            if let Some((leader, votes)) = self.leader() {
                if votes >= self.quorum && leader != self.committed {
                    log::debug!("pose committed: {} -> {} ({votes}/{window})", self.committed, leader);
                    self.committed = leader;
                }
            }
        }

        &self.committed
    }

    /// Most frequent label in the window and its vote count
    fn leader(&self) -> Option<(String, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for label in self.chronological() {
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((label, 1)),
            }
        }
        counts
            .into_iter()
            .max_by_key(|&(_, n)| n)
            .map(|(label, n)| (label.to_string(), n))
    }

    /// Labels from oldest to newest
    fn chronological(&self) -> impl Iterator<Item = &str> {
        let window = self.labels.len();
        let (start, len) = if self.filled {
            (self.write_index, window)
        } else {
            (0, self.write_index)
        };
        (0..len).map(move |i| self.labels[(start + i) % window].as_str())
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_ready(&self) -> bool {
        self.filled
    }

    /// Labels currently in the window; reaches the window length once
    /// voting starts
    pub fn frame_count(&self) -> usize {
        if self.filled {
            self.labels.len()
        } else {
            self.write_index
        }
    }

    /// Empty the window and fall back to "unknown"
    pub fn clear(&mut self) {
        for label in &mut self.labels {
            label.clear();
        }
        self.write_index = 0;
        self.filled = false;
        self.committed = UNKNOWN_POSE.to_string();
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW, DEBOUNCE_QUORUM)
    }
}
