//! Feedback records flowing from console engines back to the adapter.
//!
//! Console engines run in interrupt context, so the only sink they get is a
//! non-blocking one: [`FeedbackSink::push`] either enqueues or reports
//! [`FeedbackError::Full`]. The adapter side drains the queue from a task.

/// Maximum payload carried by one feedback record.
pub const MAX_FB_DATA: usize = 32;

/// Error type for feedback operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackError {
    /// Queue has no free slot; the record was dropped.
    Full,
}

/// Kind of feedback record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackType {
    /// Rumble motor state changed; `data[0]` is the new state.
    Rumble,
    /// Console sent a game identification payload.
    GameId,
}

/// Raw feedback record as produced by a console engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawFeedback {
    /// Port index the record originates from, for every kind (game id
    /// included), never the peripheral channel.
    pub wired_id: u8,
    pub kind: FeedbackType,
    /// Number of valid bytes in `data`.
    pub data_len: u8,
    pub data: [u8; MAX_FB_DATA],
}

impl RawFeedback {
    /// Build a record from a payload slice, truncated to [`MAX_FB_DATA`].
    #[must_use]
    pub fn new(wired_id: u8, kind: FeedbackType, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_FB_DATA);
        let mut data = [0u8; MAX_FB_DATA];
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            wired_id,
            kind,
            data_len: len as u8,
            data,
        }
    }

    /// Valid payload bytes.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.data_len as usize]
    }
}

/// Non-blocking destination for feedback records.
///
/// Implementations must be safe to call from interrupt context: no locks
/// that the interrupted code may hold, no allocation, bounded time.
pub trait FeedbackSink {
    /// Enqueue a record without blocking.
    fn push(&mut self, fb: RawFeedback) -> Result<(), FeedbackError>;
}

impl<S: FeedbackSink + ?Sized> FeedbackSink for &mut S {
    fn push(&mut self, fb: RawFeedback) -> Result<(), FeedbackError> {
        (**self).push(fb)
    }
}

/// Lock-free single-producer single-consumer feedback queue.
///
/// Holds `N - 1` records.
pub type FeedbackQueue<const N: usize> = heapless::spsc::Queue<RawFeedback, N>;

/// Producer half of a [`FeedbackQueue`], owned by the console engine.
pub type FeedbackProducer<'a, const N: usize> = heapless::spsc::Producer<'a, RawFeedback, N>;

/// Consumer half of a [`FeedbackQueue`], owned by the adapter task.
pub type FeedbackConsumer<'a, const N: usize> = heapless::spsc::Consumer<'a, RawFeedback, N>;

impl<const N: usize> FeedbackSink for heapless::spsc::Producer<'_, RawFeedback, N> {
    fn push(&mut self, fb: RawFeedback) -> Result<(), FeedbackError> {
        self.enqueue(fb).map_err(|_| FeedbackError::Full)
    }
}
