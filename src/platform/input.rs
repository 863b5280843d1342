//! Tilt input
//!
//! A background sampler reads the accelerometer at a fixed interval, smooths
//! the horizontal axis with an exponential moving average and posts the
//! result into a single-slot [`TiltMailbox`]. The simulation takes one
//! snapshot of that slot per step.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Exponential moving average over raw tilt samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltFilter {
    value: f32,
    sample_weight: f32,
}

impl TiltFilter {
    /// `sample_weight` is the share of each new sample (0.75 by default)
    pub fn new(sample_weight: f32) -> Self {
        Self {
            value: 0.0,
            sample_weight: sample_weight.clamp(0.0, 1.0),
        }
    }

    /// Fold in a sample and return the smoothed value
    pub fn apply(&mut self, sample: f32) -> f32 {
        self.value = sample * self.sample_weight + self.value * (1.0 - self.sample_weight);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

impl Default for TiltFilter {
    fn default() -> Self {
        Self::new(crate::consts::TILT_SAMPLE_WEIGHT)
    }
}

/// Latest smoothed tilt, shared between the sampler and the step function
#[derive(Debug, Clone, Default)]
pub struct TiltMailbox {
    slot: Arc<Mutex<f32>>,
}

impl TiltMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot contents
    pub fn post(&self, value: f32) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Read the current value without consuming it
    pub fn snapshot(&self) -> f32 {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Source of raw tilt readings (x axis, roughly -1..1)
pub trait TiltSource: Send + 'static {
    /// `None` when no reading is available this interval
    fn sample(&mut self) -> Option<f32>;
}

impl<F> TiltSource for F
where
    F: FnMut() -> Option<f32> + Send + 'static,
{
    fn sample(&mut self) -> Option<f32> {
        self()
    }
}

/// Handle to a running sampler thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct TiltSampler {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TiltSampler {
    /// Spawn a thread that samples `source` every `interval`
    pub fn spawn<S: TiltSource>(
        mut source: S,
        mailbox: TiltMailbox,
        interval: Duration,
        sample_weight: f32,
    ) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("tilt-sampler".into())
            .spawn(move || {
                let mut filter = TiltFilter::new(sample_weight);
                while !thread_stop.load(Ordering::Relaxed) {
                    if let Some(sample) = source.sample() {
                        mailbox.post(filter.apply(sample));
                    }
                    thread::sleep(interval);
                }
                log::debug!("Tilt sampler stopped");
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop sampling and wait for the thread to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Tilt sampler panicked");
            }
        }
    }
}

impl Drop for TiltSampler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_filter_weights_new_sample() {
        let mut filter = TiltFilter::new(0.75);
        assert!((filter.apply(1.0) - 0.75).abs() < 1e-6);
        // 0.75 * 0.0 + 0.25 * 0.75
        assert!((filter.apply(0.0) - 0.1875).abs() < 1e-6);
        assert!((filter.value() - 0.1875).abs() < 1e-6);
    }

    #[test]
    fn test_mailbox_keeps_latest() {
        let mailbox = TiltMailbox::new();
        assert_eq!(mailbox.snapshot(), 0.0);
        let writer = mailbox.clone();
        writer.post(0.2);
        writer.post(-0.4);
        assert_eq!(mailbox.snapshot(), -0.4);
        // Snapshots do not consume
        assert_eq!(mailbox.snapshot(), -0.4);
    }

    #[test]
    fn test_sampler_posts_smoothed_values() {
        let mailbox = TiltMailbox::new();
        let sampler = TiltSampler::spawn(
            || Some(1.0),
            mailbox.clone(),
            Duration::from_millis(1),
            0.75,
        )
        .expect("spawn sampler");

        let deadline = Instant::now() + Duration::from_secs(5);
        while mailbox.snapshot() < 0.9 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        sampler.stop();

        let value = mailbox.snapshot();
        assert!(value > 0.9 && value <= 1.0, "smoothed value {value}");
    }
}
