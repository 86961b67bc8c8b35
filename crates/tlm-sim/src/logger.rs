//! Node value logging during simulation.

use tlm_graph::{NodeStore, SlotRef};

#[derive(Debug, Clone)]
struct Channel {
    label: String,
    slot: SlotRef,
    data: Vec<f64>,
}

/// Samples registered node slots over a run.
///
/// The caller asks for roughly `num_samples` samples; the logger computes a
/// decimation factor from the step count and keeps every n-th step plus the
/// initial state. `num_samples == 0` keeps every step.
#[derive(Debug, Default)]
pub struct SimLogger {
    channels: Vec<Channel>,
    time: Vec<f64>,
    num_samples: usize,
    decimation: usize,
    counter: usize,
}

impl SimLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_num_samples(&mut self, n: usize) {
        self.num_samples = n;
    }

    pub fn add_channel(&mut self, label: impl Into<String>, slot: SlotRef) {
        self.channels.push(Channel {
            label: label.into(),
            slot,
            data: Vec::new(),
        });
    }

    pub fn clear_channels(&mut self) {
        self.channels.clear();
    }

    /// Reset history and fix the decimation for a run of `total_steps`.
    pub fn begin(&mut self, total_steps: usize) {
        self.decimation = if self.num_samples == 0 {
            1
        } else {
            (total_steps / self.num_samples).max(1)
        };
        self.counter = 0;
        self.time.clear();
        for ch in &mut self.channels {
            ch.data.clear();
        }
    }

    /// Record the current values unconditionally (used for the initial
    /// state).
    pub fn force_sample(&mut self, time: f64, store: &NodeStore) {
        self.time.push(time);
        for ch in &mut self.channels {
            ch.data.push(store.read(ch.slot));
        }
    }

    /// Record the current values if this step falls on the decimation grid.
    pub fn sample(&mut self, time: f64, store: &NodeStore) {
        self.counter += 1;
        if self.counter % self.decimation.max(1) == 0 {
            self.force_sample(time, store);
        }
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.label.as_str())
    }

    /// Registered (label, slot) pairs.
    pub fn slots(&self) -> impl Iterator<Item = (&str, SlotRef)> {
        self.channels.iter().map(|c| (c.label.as_str(), c.slot))
    }

    pub fn series(&self, label: &str) -> Option<&[f64]> {
        self.channels
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.data.as_slice())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
