use std::time::Duration;

use instant::Instant;

use crate::{settings::SettingsDetect, Orientation};

/// Samples the zoom indicator (device pixel ratio) on a fixed interval and
/// reports a trigger only when the sampled value differs from the previous
/// sample.
///
/// There is no change notification for the indicator at the platform
/// boundary, so this is a deliberate low-frequency polling loop. The caller
/// supplies both the clock and the signal, which keeps the trigger logic
/// testable with synthetic sequences.
#[derive(Clone, Debug)]
pub struct ZoomPoll {
    interval: Duration,
    last_sample_at: Option<Instant>,
    last_ratio: Option<f32>,
}

impl ZoomPoll {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sample_at: None,
            last_ratio: None,
        }
    }

    /// Feeds one observation of the zoom indicator. Returns `true` when a
    /// recompute should run.
    ///
    /// Observations arriving before the interval has elapsed are ignored, so
    /// most calls are cheap no-ops. The first accepted observation primes the
    /// cache without triggering.
    pub fn sample(&mut self, now: Instant, ratio: f32) -> bool {
        if let Some(at) = self.last_sample_at {
            if now.duration_since(at) < self.interval {
                return false;
            }
        }
        self.last_sample_at = Some(now);

        match self.last_ratio {
            Some(prev) if prev == ratio => false,
            Some(_) => {
                self.last_ratio = Some(ratio);
                true
            }
            None => {
                self.last_ratio = Some(ratio);
                false
            }
        }
    }
}

/// Defers a recompute until a fixed settle delay after an orientation flip,
/// letting the platform finish its own reflow first.
#[derive(Clone, Debug)]
pub struct OrientationSettle {
    settle: Duration,
    last: Option<Orientation>,
    due_at: Option<Instant>,
}

impl OrientationSettle {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            last: None,
            due_at: None,
        }
    }

    /// Observes the current orientation; a flip arms the one-shot timer.
    pub fn observe(&mut self, now: Instant, orientation: Orientation) {
        if let Some(prev) = self.last {
            if prev != orientation {
                self.due_at = Some(now + self.settle);
            }
        }
        self.last = Some(orientation);
    }

    /// Returns `true` exactly once, when the settle delay has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.due_at.is_some()
    }
}

/// Per-widget-instance detection state, kept across frames in egui's
/// temporary data store.
#[derive(Clone, Debug)]
pub(crate) struct DetectState {
    pub zoom: ZoomPoll,
    pub orientation: OrientationSettle,
}

impl DetectState {
    pub fn new(settings: &SettingsDetect) -> Self {
        Self {
            zoom: ZoomPoll::new(settings.zoom_poll_interval),
            orientation: OrientationSettle::new(settings.orientation_settle),
        }
    }

    pub fn load(ui: &egui::Ui, widget_id: egui::Id, settings: &SettingsDetect) -> Self {
        ui.data_mut(|data| {
            data.get_temp::<DetectState>(widget_id)
                .unwrap_or_else(|| Self::new(settings))
        })
    }

    pub fn save(self, ui: &mut egui::Ui, widget_id: egui::Id) {
        ui.data_mut(|data| {
            data.insert_temp(widget_id, self);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL: Duration = Duration::from_millis(500);
    const SETTLE: Duration = Duration::from_millis(200);

    #[test]
    fn zoom_poll_triggers_only_on_change() {
        let mut poll = ZoomPoll::new(POLL);
        let start = Instant::now();

        let triggers: Vec<bool> = [1., 1., 1., 2., 2., 1.]
            .iter()
            .enumerate()
            .map(|(i, &ratio)| poll.sample(start + POLL * (i as u32 + 1), ratio))
            .collect();

        assert_eq!(triggers, vec![false, false, false, true, false, true]);
        assert_eq!(triggers.iter().filter(|t| **t).count(), 2);
    }

    #[test]
    fn zoom_poll_gates_on_interval() {
        let mut poll = ZoomPoll::new(POLL);
        let start = Instant::now();

        assert!(!poll.sample(start, 1.));
        // Changed value inside the interval is not even sampled.
        assert!(!poll.sample(start + Duration::from_millis(100), 2.));
        // Next eligible sample sees the change.
        assert!(poll.sample(start + POLL, 2.));
    }

    #[test]
    fn orientation_settle_defers_recompute() {
        let mut settle = OrientationSettle::new(SETTLE);
        let start = Instant::now();

        settle.observe(start, Orientation::Landscape);
        assert!(!settle.pending());

        settle.observe(start + Duration::from_millis(10), Orientation::Portrait);
        assert!(settle.pending());

        // Not yet: the flip was observed, the settle delay has not elapsed.
        assert!(!settle.fire(start + Duration::from_millis(100)));
        // After the delay, fires exactly once.
        assert!(settle.fire(start + Duration::from_millis(220)));
        assert!(!settle.fire(start + Duration::from_millis(230)));
    }

    #[test]
    fn orientation_settle_ignores_steady_state() {
        let mut settle = OrientationSettle::new(SETTLE);
        let start = Instant::now();

        for i in 0..10 {
            settle.observe(start + Duration::from_millis(i * 50), Orientation::Landscape);
        }
        assert!(!settle.pending());
        assert!(!settle.fire(start + Duration::from_secs(1)));
    }
}
