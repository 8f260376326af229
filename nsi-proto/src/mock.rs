//! Host-side stand-ins for the peripheral and the feedback queue.

extern crate std;

use std::vec::Vec;

use wired_core::{FeedbackError, FeedbackSink, RawFeedback};

use crate::bus::{channel_base, ChannelConfig, Event, PulseBus, CHANNEL_COUNT, SYMBOLS_PER_CHANNEL};
use crate::codec::{self, Checksum};
use crate::symbol::Symbol;

pub const RAM_LEN: usize = CHANNEL_COUNT * SYMBOLS_PER_CHANNEL;

/// Hardware control call seen by the mock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Configure(u8),
    RxRearm(u8),
    RxStop(u8),
    TxStart(u8),
    IntClear(u32),
    IntEnable(u32),
    IntDisable(u32),
    RoutePin(u8, u8),
    ParkPin(u8, u8),
}

pub struct MockBus {
    pub ram: [Symbol; RAM_LEN],
    pub status: u32,
    pub enabled: u32,
    pub calls: Vec<Call>,
    pub configs: Vec<(u8, ChannelConfig)>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            ram: [Symbol::default(); RAM_LEN],
            status: 0,
            enabled: 0,
            calls: Vec::new(),
            configs: Vec::new(),
        }
    }

    /// Stage a received command in `channel`'s block, as the receiver
    /// would leave it, and raise its receive-done bit.
    pub fn receive(&mut self, channel: u8, bytes: &[u8]) {
        codec::encode(
            &mut self.ram[..],
            channel_base(channel),
            bytes,
            Checksum::Xor,
            Symbol::STOP_BIT_1US,
        );
        self.status |= 1 << Event::RxDone.status_bit(channel);
    }

    /// Bytes currently queued for transmit on `channel`, up to the end symbol.
    pub fn transmitted(&self, channel: u8) -> Vec<u8> {
        let base = channel_base(channel);
        let len = self.symbol_count(channel) / 8;
        let mut out = std::vec![0u8; len];
        codec::decode(&self.ram[..], base, &mut out);
        out
    }

    /// Number of data symbols before the first end symbol of `channel`.
    pub fn symbol_count(&self, channel: u8) -> usize {
        let base = channel_base(channel);
        self.ram[base..]
            .iter()
            .position(|s| s.is_end())
            .unwrap_or(RAM_LEN - base)
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl PulseBus for MockBus {
    type Ram = [Symbol];

    fn ram(&mut self) -> &mut Self::Ram {
        &mut self.ram[..]
    }

    fn configure(&mut self, channel: u8, cfg: &ChannelConfig) {
        self.calls.push(Call::Configure(channel));
        self.configs.push((channel, *cfg));
    }

    fn rx_rearm(&mut self, channel: u8) {
        self.calls.push(Call::RxRearm(channel));
    }

    fn rx_stop(&mut self, channel: u8) {
        self.calls.push(Call::RxStop(channel));
    }

    fn tx_start(&mut self, channel: u8) {
        self.calls.push(Call::TxStart(channel));
    }

    fn int_status(&mut self) -> u32 {
        self.status
    }

    fn int_clear(&mut self, mask: u32) {
        self.calls.push(Call::IntClear(mask));
        self.status &= !mask;
    }

    fn int_enable(&mut self, mask: u32) {
        self.calls.push(Call::IntEnable(mask));
        self.enabled |= mask;
    }

    fn int_disable(&mut self, mask: u32) {
        self.calls.push(Call::IntDisable(mask));
        self.enabled &= !mask;
    }

    fn route_pin(&mut self, pin: u8, channel: u8) {
        self.calls.push(Call::RoutePin(pin, channel));
    }

    fn park_pin(&mut self, pin: u8, channel: u8) {
        self.calls.push(Call::ParkPin(pin, channel));
    }
}

/// Collects feedback records; refuses them once `capacity` is reached.
pub struct MockFeedback {
    pub records: Vec<RawFeedback>,
    pub capacity: usize,
}

impl MockFeedback {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            capacity: usize::MAX,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity,
        }
    }
}

impl FeedbackSink for MockFeedback {
    fn push(&mut self, fb: RawFeedback) -> Result<(), FeedbackError> {
        if self.records.len() >= self.capacity {
            return Err(FeedbackError::Full);
        }
        self.records.push(fb);
        Ok(())
    }
}
