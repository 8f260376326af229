//! Channel interrupt router and engine bring-up.
//!
//! [`NsiEngine`] owns all per-port protocol state and is driven entirely
//! from the peripheral interrupt through [`WiredDriver::on_interrupt`].
//! Each call drains every pending event in increasing status-bit order
//! (channel first, then transmit-done, receive-done, receive-error), then
//! clears the status word with the value read on entry, so events raised
//! while the handler runs stay pending for the next interrupt.

use wired_core::{Config, FeedbackSink, WiredAdapter, WiredDriver, MAX_PORTS};

use crate::bus::{channel_base, channel_event_mask, Event, PulseBus, EVENT_BITS};
use crate::codec;
use crate::config::NsiConfig;
use crate::dispatch::Exchange;
use crate::port::{channel_to_port, PortMap, PortState};

/// Port mask with every port routed.
pub const ALL_PORTS: u16 = (1 << MAX_PORTS) - 1;

/// GameCube protocol engine for up to four ports.
pub struct NsiEngine<F> {
    ports: [PortState; MAX_PORTS],
    map: PortMap,
    config: NsiConfig,
    feedback: F,
}

impl<F: FeedbackSink> NsiEngine<F> {
    #[must_use]
    pub const fn new(map: PortMap, config: NsiConfig, feedback: F) -> Self {
        Self {
            ports: [PortState::new(); MAX_PORTS],
            map,
            config,
            feedback,
        }
    }

    /// Protocol state of `port`.
    #[must_use]
    pub fn port_state(&self, port: usize) -> Option<&PortState> {
        self.ports.get(port)
    }

    #[must_use]
    pub fn port_map(&self) -> &PortMap {
        &self.map
    }

    #[must_use]
    pub fn config(&self) -> &NsiConfig {
        &self.config
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    fn on_command<B: PulseBus + ?Sized>(
        &mut self,
        bus: &mut B,
        channel: u8,
        port: usize,
        adapter: &mut WiredAdapter,
        config: &Config,
    ) {
        bus.rx_stop(channel);

        let mut first = [0u8; 1];
        let item = codec::decode(&*bus.ram(), channel_base(channel), &mut first);

        let (Some(state), Some(data), Some(out_cfg)) = (
            self.ports.get_mut(port),
            adapter.data.get_mut(port),
            config.out_cfg.get(port),
        ) else {
            return;
        };

        Exchange {
            bus,
            config: &self.config,
            feedback: &mut self.feedback,
            state,
            data,
            out_cfg: *out_cfg,
            channel,
            port,
        }
        .run(first[0], item);
    }
}

impl<B: PulseBus + ?Sized, F: FeedbackSink> WiredDriver<B> for NsiEngine<F> {
    fn init(&mut self, bus: &mut B) {
        let cfg = self.config.channel_config();
        for (port, mapping) in self.map.iter().enumerate() {
            let channel = mapping.channel();
            bus.configure(channel, &cfg);
            bus.int_enable(channel_event_mask(channel));
            debug!("port {}: channel {} on pin {}", port, channel, mapping.pin);
        }

        self.port_cfg(bus, ALL_PORTS);

        for mapping in &self.map {
            let channel = mapping.channel();
            bus.int_clear(1 << Event::RxDone.status_bit(channel));
            bus.rx_rearm(channel);
        }
        info!("nsi engine up, {} ports", MAX_PORTS);
    }

    fn port_cfg(&mut self, bus: &mut B, mask: u16) {
        for (port, mapping) in self.map.iter().enumerate() {
            if mask & (1 << port) != 0 {
                bus.route_pin(mapping.pin, mapping.channel());
            } else {
                bus.park_pin(mapping.pin, mapping.channel());
            }
        }
        debug!("port mask {:#x}", mask);
    }

    fn on_interrupt(&mut self, bus: &mut B, adapter: &mut WiredAdapter, config: &Config) {
        let snapshot = bus.int_status();
        let mut pending = snapshot & EVENT_BITS;

        while pending != 0 {
            let bit = pending.trailing_zeros();
            pending &= !(1 << bit);

            let Some((channel, event)) = Event::from_status_bit(bit) else {
                continue;
            };
            let Some(port) = channel_to_port(channel) else {
                continue;
            };

            match event {
                Event::TxDone => bus.rx_rearm(channel),
                Event::RxDone => self.on_command(bus, channel, port, adapter, config),
                Event::RxError => {
                    error!("ch {}: receive error, channel disabled", channel);
                    bus.int_disable(channel_event_mask(channel));
                }
            }
        }

        bus.int_clear(snapshot);
    }
}
