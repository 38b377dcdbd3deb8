//! Audio sample sinks.

use ringbuf::traits::{Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

/// Receives mixed samples in `-1.0..=1.0`, one call per output sample.
pub trait SampleSink: Send {
    /// Returns false if the sample was dropped.
    fn push(&mut self, sample: f32) -> bool;
}

/// Producer half of a lock-free ring shared with the audio worker.
/// Never blocks: a full ring drops the sample.
pub struct RingSink {
    producer: HeapProd<f32>,
}

impl RingSink {
    /// A sink plus the consumer the audio worker drains.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> (Self, HeapCons<f32>) {
        let (producer, consumer) = HeapRb::<f32>::new(capacity).split();
        (Self { producer }, consumer)
    }
}

impl SampleSink for RingSink {
    fn push(&mut self, sample: f32) -> bool {
        self.producer.try_push(sample).is_ok()
    }
}

/// Collects every sample in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    pub samples: Vec<f32>,
}

impl SampleSink for VecSink {
    fn push(&mut self, sample: f32) -> bool {
        self.samples.push(sample);
        true
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl SampleSink for NullSink {
    fn push(&mut self, _sample: f32) -> bool {
        true
    }
}
