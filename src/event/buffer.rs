//! Per-attempt event buffer
//!
//! An ordered, append-only sequence of samples for the lifetime of one
//! gesture attempt. The first element is always the initiating sample.
//! A buffer belongs to exactly one attempt and is discarded, not reused,
//! on reset.

use super::types::GestureSample;
use uuid::Uuid;

/// Ordered, append-only sample buffer for one gesture attempt
#[derive(Debug, Clone)]
pub struct GestureEventBuffer {
    /// Unique id of the gesture attempt this buffer belongs to
    id: Uuid,
    samples: Vec<GestureSample>,
}

impl GestureEventBuffer {
    /// Create a buffer seeded with the initiating sample
    pub fn new(initial: GestureSample) -> Self {
        Self {
            id: Uuid::new_v4(),
            samples: vec![initial],
        }
    }

    /// Attempt id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Append a sample
    pub fn push(&mut self, sample: GestureSample) {
        self.samples.push(sample);
    }

    /// The initiating sample
    pub fn initial(&self) -> &GestureSample {
        &self.samples[0]
    }

    /// The most recently appended sample
    pub fn latest(&self) -> &GestureSample {
        self.samples.last().unwrap_or_else(|| &self.samples[0])
    }

    /// Number of buffered samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All buffered samples in delivery order
    pub fn samples(&self) -> &[GestureSample] {
        &self.samples
    }
}
