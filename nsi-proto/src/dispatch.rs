//! Protocol dispatcher: one received command in, at most one response out.
//!
//! The handler runs inside the receive-done interrupt. It reads the rest of
//! the command straight from symbol memory, answers through the same
//! channel's memory block and leaves the port state ready for the next
//! frame. Response bytes are assembled in stack buffers sized to the
//! longest frame.

use wired_core::{AccMode, DevMode, FeedbackSink, FeedbackType, OutCfg, RawFeedback, WiredData};

use crate::bus::{channel_base, PulseBus};
use crate::codec::{self, Checksum};
use crate::config::{ChecksumTrailer, NsiConfig};
use crate::gc;
use crate::port::PortState;
use crate::symbol::Symbol;

/// Game/console identification command byte.
pub const GAME_ID_CMD: u8 = 0x1D;

/// Bytes staged after the game-id command.
pub const GAME_ID_STAGED_LEN: usize = 10;

/// Bytes of the game id forwarded as feedback.
pub const GAME_ID_LEN: usize = 8;

/// Poll response length in the default mode.
pub const POLL_LEN: usize = 8;

/// Poll response length in full analog mode (`0x43`).
pub const POLL_LEN_ANALOG: usize = 10;

/// Bytes echoed by the keyboard poll.
pub const KB_POLL_LEN: usize = 7;

/// Bytes following a poll command: analog mode selector and motor.
const POLL_ARGS_LEN: usize = 2;

/// Rumble request bit of the poll motor byte.
const RUMBLE_BIT: u8 = 0x01;

/// Command classified from its first byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `0x00` / `0xFF`
    Identify,
    /// `0x41` / `0x42`, origin fetch and recalibrate.
    Reset,
    /// `0x40`, or `0x43` when `analog` is set.
    Poll { analog: bool },
    /// `0x54`
    KeyboardPoll,
    /// `0x1D`
    GameId,
    Unknown(u8),
}

impl Command {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 | 0xFF => Command::Identify,
            0x41 | 0x42 => Command::Reset,
            0x40 => Command::Poll { analog: false },
            0x43 => Command::Poll { analog: true },
            0x54 => Command::KeyboardPoll,
            GAME_ID_CMD => Command::GameId,
            other => Command::Unknown(other),
        }
    }
}

/// Compress the trigger and extension bytes of an 8-byte poll response.
///
/// `selector` is the analog mode byte of the poll command.
pub fn pack_analog(selector: u8, resp: &mut [u8; POLL_LEN]) {
    match selector {
        1 => {
            resp[4] = (resp[4] & 0xF0) | (resp[5] >> 4);
            resp[5] = resp[6];
            resp[6] = resp[7];
            resp[7] = 0;
        }
        2 => {
            resp[4] = (resp[4] & 0xF0) | (resp[5] >> 4);
            resp[5] = (resp[5] & 0xF0) | (resp[7] >> 4);
            resp[6] = 0;
            resp[7] = 0;
        }
        3 => {}
        4 => {
            resp[6] = 0;
            resp[7] = 0;
        }
        _ => {
            resp[6] = (resp[6] & 0xF0) | (resp[7] >> 4);
            resp[7] = 0;
        }
    }
}

/// Everything one command exchange touches.
pub struct Exchange<'a, B: PulseBus + ?Sized, F: FeedbackSink> {
    pub bus: &'a mut B,
    pub config: &'a NsiConfig,
    pub feedback: &'a mut F,
    pub state: &'a mut PortState,
    pub data: &'a mut WiredData,
    pub out_cfg: OutCfg,
    pub channel: u8,
    pub port: usize,
}

impl<B: PulseBus + ?Sized, F: FeedbackSink> Exchange<'_, B, F> {
    /// Handle the command whose first byte is `first`. `item` is the symbol
    /// index just past that byte.
    pub fn run(&mut self, first: u8, item: usize) {
        let command = Command::from_byte(first);
        match self.out_cfg.dev_mode {
            DevMode::Keyboard => self.keyboard(command, item),
            _ => self.pad(command, item),
        }
    }

    fn pad(&mut self, command: Command, item: usize) {
        match command {
            Command::GameId => self.game_id(item),
            Command::Identify => self.respond_table(&gc::GC_IDENT),
            Command::Poll { analog } => self.poll(analog, item),
            Command::Reset => {
                self.respond_table(&gc::GC_NEUTRAL);
                self.data.output[0] &= !gc::ORIGIN_BIT;
            }
            Command::KeyboardPoll | Command::Unknown(_) => self.unknown(command),
        }
    }

    fn keyboard(&mut self, command: Command, item: usize) {
        match command {
            Command::GameId => self.game_id(item),
            Command::Identify => self.respond_table(&gc::GC_KB_IDENT),
            Command::KeyboardPoll => {
                let base = channel_base(self.channel);
                let ram = self.bus.ram();
                let keys = codec::encode(
                    ram,
                    base,
                    &self.data.output[..KB_POLL_LEN],
                    Checksum::Xor,
                    Symbol::STOP_BIT_2US,
                );
                codec::encode(ram, keys.next, &[keys.checksum], Checksum::Xor, Symbol::STOP_BIT_2US);
                self.bus.tx_start(self.channel);
                self.advance_frame();
            }
            Command::Poll { .. } | Command::Reset | Command::Unknown(_) => self.unknown(command),
        }
    }

    fn poll(&mut self, analog: bool, item: usize) {
        let mut args = [0u8; POLL_ARGS_LEN];
        codec::decode(&*self.bus.ram(), item, &mut args);
        let [selector, motor] = args;

        let mut resp = [0u8; POLL_LEN_ANALOG];
        let btns = self.data.output16(0) & self.data.output_mask16(0);
        resp[..2].copy_from_slice(&btns.to_le_bytes());
        for j in gc::AXES_OFFSET..POLL_LEN {
            let mask = self.data.output_mask[j];
            resp[j] = if mask != 0 { mask } else { self.data.output[j] };
        }
        let trig_l = resp[6];
        let trig_r = resp[7];

        if !self.state.trig_r.is_pressed() {
            resp[1] &= !gc::TRIG_R_BIT;
        }
        if !self.state.trig_l.is_pressed() {
            resp[1] &= !gc::TRIG_L_BIT;
        }

        let len = if analog {
            // Analog A/B are reported as released.
            POLL_LEN_ANALOG
        } else {
            let mut short = [0u8; POLL_LEN];
            short.copy_from_slice(&resp[..POLL_LEN]);
            pack_analog(selector, &mut short);
            resp[..POLL_LEN].copy_from_slice(&short);
            POLL_LEN
        };
        self.respond_table(&resp[..len]);

        self.state.trig_l.update(trig_l);
        self.state.trig_r.update(trig_r);

        if self.out_cfg.acc_mode == AccMode::Rumble {
            let rumble = motor & RUMBLE_BIT;
            if rumble != self.state.last_rumble {
                self.state.last_rumble = rumble;
                self.push_feedback(RawFeedback::new(self.port as u8, FeedbackType::Rumble, &[rumble]));
            }
        }

        self.advance_frame();
        gc::gen_turbo_mask(self.data);
    }

    fn game_id(&mut self, item: usize) {
        let mut staged = [0u8; GAME_ID_STAGED_LEN];
        codec::decode(&*self.bus.ram(), item, &mut staged);
        self.bus.rx_rearm(self.channel);

        self.push_feedback(RawFeedback::new(
            self.port as u8,
            FeedbackType::GameId,
            &staged[..GAME_ID_LEN],
        ));
    }

    fn unknown(&mut self, command: Command) {
        trace!("ch {}: ignoring command {:?}", self.channel, command);
        self.bus.rx_rearm(self.channel);
    }

    /// Transmit `payload` in table-checksum mode from the channel's block.
    fn respond_table(&mut self, payload: &[u8]) {
        let base = channel_base(self.channel);
        let ram = self.bus.ram();
        let body = codec::encode(ram, base, payload, Checksum::Table, Symbol::STOP_BIT_2US);
        if self.config.checksum_trailer == ChecksumTrailer::Append {
            codec::encode(ram, body.next, &[body.checksum], Checksum::Table, Symbol::STOP_BIT_2US);
        }
        self.bus.tx_start(self.channel);
    }

    fn advance_frame(&mut self) {
        self.state.frame_cnt = self.state.frame_cnt.wrapping_add(1);
        self.data.frame_cnt = self.state.frame_cnt;
    }

    fn push_feedback(&mut self, fb: RawFeedback) {
        if self.feedback.push(fb).is_err() {
            warn!("port {}: feedback queue full, dropping {:?}", self.port, fb.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_byte() {
        assert_eq!(Command::from_byte(0x00), Command::Identify);
        assert_eq!(Command::from_byte(0xFF), Command::Identify);
        assert_eq!(Command::from_byte(0x41), Command::Reset);
        assert_eq!(Command::from_byte(0x42), Command::Reset);
        assert_eq!(Command::from_byte(0x40), Command::Poll { analog: false });
        assert_eq!(Command::from_byte(0x43), Command::Poll { analog: true });
        assert_eq!(Command::from_byte(0x54), Command::KeyboardPoll);
        assert_eq!(Command::from_byte(0x1D), Command::GameId);
        assert_eq!(Command::from_byte(0x14), Command::Unknown(0x14));
    }

    fn sample() -> [u8; POLL_LEN] {
        [0x01, 0x80, 0x80, 0x80, 0x12, 0x34, 0x56, 0x78]
    }

    #[test]
    fn test_pack_selector_1() {
        let mut resp = sample();
        pack_analog(1, &mut resp);
        assert_eq!(resp, [0x01, 0x80, 0x80, 0x80, 0x13, 0x56, 0x78, 0x00]);
    }

    #[test]
    fn test_pack_selector_2() {
        let mut resp = sample();
        pack_analog(2, &mut resp);
        assert_eq!(resp, [0x01, 0x80, 0x80, 0x80, 0x13, 0x37, 0x00, 0x00]);
    }

    #[test]
    fn test_pack_selector_3_is_byte_aligned() {
        let mut resp = sample();
        pack_analog(3, &mut resp);
        assert_eq!(resp, sample());
    }

    #[test]
    fn test_pack_selector_4() {
        let mut resp = sample();
        pack_analog(4, &mut resp);
        assert_eq!(resp, [0x01, 0x80, 0x80, 0x80, 0x12, 0x34, 0x00, 0x00]);
    }

    #[test]
    fn test_pack_default() {
        for selector in [0, 5, 0xFF] {
            let mut resp = [0x01, 0x80, 0x80, 0x80, 0x80, 0x80, 0x12, 0x34];
            pack_analog(selector, &mut resp);
            assert_eq!(resp[6], 0x13);
            assert_eq!(resp[7], 0x00);
            assert_eq!(resp[4], 0x80);
        }
    }
}
