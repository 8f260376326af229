//! [`PulseBus`] on the RP2040 PIO.
//!
//! The RP2040 has no pulse-train peripheral, so each controller port gets
//! one PIO0 state machine running a combined receive/transmit program at
//! one cycle per 0.5 µs symbol tick:
//!
//! - **Receive**: samples each bit cell 2 µs after its falling edge,
//!   autopushes 32-bit words, and after an idle gap of about one bit period
//!   pushes the partial word, then the bit count, and raises its IRQ flag.
//! - **Transmit**: takes a bit count and MSB-first bit words from the TX
//!   FIFO, drives the line open-drain (pin value 0, toggling pindir), sends
//!   a 2 µs stop bit and raises the same IRQ flag.
//!
//! A 512-symbol RAM array stands in for the pulse memory. Receive captures
//! are expanded into symbols when the interrupt status is read, clearing
//! the rest of the port's block; transmit
//! packs the channel's symbols back into bit words. The status word the
//! engine sees is emulated with the usual three event bits per channel,
//! using each port's active channel.

use embassy_rp::gpio::{Level, Pull};
use embassy_rp::pac;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{
    Common, Config, Direction, LoadedProgram, Pin, Pio, ShiftConfig, ShiftDirection, StateMachine,
};
use fixed::types::U24F8;
use fixed_macro::fixed;
use nsi_proto::bus::{
    channel_base, channel_event_mask, ChannelConfig, Event, PulseBus, CHANNEL_COUNT,
    SYMBOLS_PER_CHANNEL,
};
use nsi_proto::codec;
use nsi_proto::port::{channel_to_port, NSI_CHANNELS};
use nsi_proto::Symbol;
use pio::pio_asm;
use wired_core::MAX_PORTS;

/// clk_sys (125 MHz) / 62.5 = 2 MHz, one cycle per 0.5 µs tick.
const PIO_CLOCK_DIV: U24F8 = fixed!(62.5: U24F8);

/// End-of-receive gap built into the program, in ticks.
const IDLE_TICKS: u16 = 10;

/// FIFO depth per direction (not joined).
const FIFO_DEPTH: usize = 4;

/// Longest transmission: the first TX word is the bit count.
const TX_MAX_BITS: usize = (FIFO_DEPTH - 1) * 32;

/// Symbols a port may use: its own channel block and the idle one after it.
const PORT_SYMBOLS: usize = SYMBOLS_PER_CHANNEL * 2;

const RAM_LEN: usize = CHANNEL_COUNT * SYMBOLS_PER_CHANNEL;

/// IO_BANK0 function selects.
const FUNCSEL_PIO0: u8 = 6;
const FUNCSEL_NULL: u8 = 0x1F;

/// INTE bit of state machine IRQ flag 0.
const INTE_SM0: u32 = 1 << 8;

/// Loaded NSI program and its entry points.
struct NsiProgram<'d> {
    loaded: LoadedProgram<'d, PIO0>,
    rx: u8,
    tx: u8,
}

fn load_program<'d>(common: &mut Common<'d, PIO0>) -> NsiProgram<'d> {
    let prg = pio_asm!(
        ".side_set 1 opt pindirs",
        ".wrap_target",
        "public rx:",
        "    mov y, ~null",
        "    wait 0 pin 0",
        "sample:",
        "    nop [2]",
        "    in pins, 1",
        "    jmp y-- rise",
        "rise:",
        "    wait 1 pin 0",
        "    set x, 4",
        "idle:",
        "    jmp pin high",
        "    jmp sample",
        "high:",
        "    jmp x-- idle",
        "    push noblock",
        "    mov isr, ~y",
        "    push noblock",
        "    irq nowait 0 rel",
        "public tx:",
        "    pull block",
        "    out x, 32",
        "bitloop:",
        "    out y, 1        side 1",
        "    jmp !y zero",
        "    nop             side 0 [4]",
        "    jmp x-- bitloop",
        "    jmp stop",
        "zero:",
        "    nop [3]",
        "    jmp x-- bitloop side 0 [1]",
        "stop:",
        "    nop             side 1 [3]",
        "    nop             side 0",
        "    irq nowait 0 rel",
        ".wrap",
    );
    let loaded = common.load_program(&prg.program);
    let rx = loaded.origin + prg.public_defines.rx as u8;
    let tx = loaded.origin + prg.public_defines.tx as u8;
    NsiProgram { loaded, rx, tx }
}

/// The four port state machines.
pub struct Machines<'d> {
    pub sm0: StateMachine<'d, PIO0, 0>,
    pub sm1: StateMachine<'d, PIO0, 1>,
    pub sm2: StateMachine<'d, PIO0, 2>,
    pub sm3: StateMachine<'d, PIO0, 3>,
}

macro_rules! with_sm {
    ($machines:expr, $port:expr, |$sm:ident| $body:expr) => {
        match $port {
            0 => {
                let $sm = &mut $machines.sm0;
                $body
            }
            1 => {
                let $sm = &mut $machines.sm1;
                $body
            }
            2 => {
                let $sm = &mut $machines.sm2;
                $body
            }
            _ => {
                let $sm = &mut $machines.sm3;
                $body
            }
        }
    };
}

/// PIO0-backed controller bus for four ports.
pub struct PioPulseBus<'d> {
    _common: Common<'d, PIO0>,
    machines: Machines<'d>,
    program: NsiProgram<'d>,
    pins: [Pin<'d, PIO0>; MAX_PORTS],
    ram: [Symbol; RAM_LEN],
    /// Emulated interrupt status, three bits per channel.
    status: u32,
    enabled: u32,
    /// Ports whose state machine is transmitting.
    tx_busy: u8,
}

impl<'d> PioPulseBus<'d> {
    /// Take over PIO0. `pins` must come from `pio.common.make_pio_pin`,
    /// in port order.
    pub fn new(pio: Pio<'d, PIO0>, mut pins: [Pin<'d, PIO0>; MAX_PORTS]) -> Self {
        let Pio {
            mut common,
            sm0,
            sm1,
            sm2,
            sm3,
            ..
        } = pio;

        for pin in pins.iter_mut() {
            pin.set_pull(Pull::Up);
        }
        let program = load_program(&mut common);

        Self {
            _common: common,
            machines: Machines { sm0, sm1, sm2, sm3 },
            program,
            pins,
            ram: [Symbol::default(); RAM_LEN],
            status: 0,
            enabled: 0,
            tx_busy: 0,
        }
    }

    fn port_of(channel: u8) -> Option<usize> {
        channel_to_port(channel).filter(|&port| NSI_CHANNELS[port][1] == channel)
    }

    fn sm_enable(port: usize, enable: bool) {
        pac::PIO0.ctrl().modify(|w| {
            let mask = 1 << port;
            let current = w.sm_enable();
            w.set_sm_enable(if enable { current | mask } else { current & !mask });
        });
    }

    /// Stop `port`'s state machine and restart it at `addr` with empty
    /// FIFOs and shift registers.
    fn sm_reset_to(port: usize, addr: u8) {
        Self::sm_enable(port, false);
        pac::PIO0.ctrl().modify(|w| w.set_sm_restart(1 << port));
        let sm = pac::PIO0.sm(port);
        sm.shiftctrl().modify(|w| w.set_fjoin_rx(!w.fjoin_rx()));
        sm.shiftctrl().modify(|w| w.set_fjoin_rx(!w.fjoin_rx()));
        // Unconditional JMP encodes as the bare target address.
        sm.instr().write(|w| w.set_instr(addr as u16));
    }

    /// Move a finished capture from `port`'s RX FIFO into symbol memory.
    ///
    /// Returns `false` when the capture does not have the expected shape.
    fn capture(&mut self, port: usize) -> bool {
        let mut words = [0u32; FIFO_DEPTH];
        let mut len = 0;
        while pac::PIO0.fstat().read().rxempty() & (1 << port) == 0 {
            let word = pac::PIO0.rxf(port).read();
            if len < FIFO_DEPTH {
                words[len] = word;
                len += 1;
            }
        }

        let Some((&count, data)) = words[..len].split_last() else {
            return false;
        };
        let base = channel_base(NSI_CHANNELS[port][1]);
        codec::load_capture(&mut self.ram[..], base, PORT_SYMBOLS, data, count as usize).is_some()
    }

    fn sync_inte(&self) {
        let mut bits = 0;
        for (port, channels) in NSI_CHANNELS.iter().enumerate() {
            if self.enabled & channel_event_mask(channels[1]) != 0 {
                bits |= INTE_SM0 << port;
            }
        }
        pac::PIO0.irqs(1).inte().write(|w| w.0 = bits);
    }
}

impl PulseBus for PioPulseBus<'_> {
    type Ram = [Symbol];

    fn ram(&mut self) -> &mut Self::Ram {
        &mut self.ram[..]
    }

    fn configure(&mut self, channel: u8, cfg: &ChannelConfig) {
        let Some(port) = Self::port_of(channel) else {
            return;
        };
        if cfg.idle_threshold != IDLE_TICKS {
            defmt::warn!(
                "ch {}: idle threshold {} ticks, PIO program uses {}",
                channel,
                cfg.idle_threshold,
                IDLE_TICKS
            );
        }

        let pin = &self.pins[port];
        let mut sm_cfg = Config::default();
        sm_cfg.use_program(&self.program.loaded, &[pin]);
        sm_cfg.set_in_pins(&[pin]);
        sm_cfg.set_jmp_pin(pin);
        sm_cfg.clock_divider = PIO_CLOCK_DIV;
        sm_cfg.shift_in = ShiftConfig {
            threshold: 32,
            direction: ShiftDirection::Left,
            auto_fill: true,
        };
        sm_cfg.shift_out = ShiftConfig {
            threshold: 32,
            direction: ShiftDirection::Left,
            auto_fill: true,
        };

        with_sm!(self.machines, port, |sm| {
            sm.set_config(&sm_cfg);
            sm.set_pins(Level::Low, &[pin]);
            sm.set_pin_dirs(Direction::In, &[pin]);
        });
    }

    fn rx_rearm(&mut self, channel: u8) {
        let Some(port) = Self::port_of(channel) else {
            return;
        };
        self.tx_busy &= !(1 << port);
        Self::sm_reset_to(port, self.program.rx);
        pac::PIO0.fdebug().write(|w| w.set_rxstall(1 << port));
        Self::sm_enable(port, true);
    }

    fn rx_stop(&mut self, channel: u8) {
        if let Some(port) = Self::port_of(channel) {
            Self::sm_enable(port, false);
        }
    }

    fn tx_start(&mut self, channel: u8) {
        let Some(port) = Self::port_of(channel) else {
            return;
        };

        let base = channel_base(channel);
        let mut words = [0u32; FIFO_DEPTH - 1];
        let mut bits = 0;
        for &symbol in &self.ram[base..base + PORT_SYMBOLS] {
            if symbol.is_end() {
                break;
            }
            if bits == TX_MAX_BITS {
                defmt::warn!("ch {}: response truncated to {} bits", channel, TX_MAX_BITS);
                break;
            }
            if symbol.is_one() {
                words[bits / 32] |= 1 << (31 - bits % 32);
            }
            bits += 1;
        }
        if bits == 0 {
            return;
        }

        Self::sm_reset_to(port, self.program.tx);
        pac::PIO0.txf(port).write_value(bits as u32 - 1);
        for &word in &words[..bits.div_ceil(32)] {
            pac::PIO0.txf(port).write_value(word);
        }
        self.tx_busy |= 1 << port;
        Self::sm_enable(port, true);
    }

    fn int_status(&mut self) -> u32 {
        let flags = pac::PIO0.irq().read().irq() & 0x0F;
        let stalled = pac::PIO0.fdebug().read().rxstall() & 0x0F;
        pac::PIO0.irq().write(|w| w.set_irq(flags));
        pac::PIO0.fdebug().write(|w| w.set_rxstall(stalled));

        for (port, channels) in NSI_CHANNELS.iter().enumerate() {
            let channel = channels[1];
            let bit = 1 << port;
            if stalled & bit != 0 {
                self.status |= 1 << Event::RxError.status_bit(channel);
            }
            if flags & bit == 0 {
                continue;
            }
            if self.tx_busy & bit != 0 {
                self.tx_busy &= !bit;
                self.status |= 1 << Event::TxDone.status_bit(channel);
            } else if self.capture(port) {
                self.status |= 1 << Event::RxDone.status_bit(channel);
            } else {
                self.status |= 1 << Event::RxError.status_bit(channel);
            }
        }
        self.status & self.enabled
    }

    fn int_clear(&mut self, mask: u32) {
        self.status &= !mask;
    }

    fn int_enable(&mut self, mask: u32) {
        self.enabled |= mask;
        self.sync_inte();
    }

    fn int_disable(&mut self, mask: u32) {
        self.enabled &= !mask;
        self.sync_inte();
    }

    fn route_pin(&mut self, pin: u8, _channel: u8) {
        pac::IO_BANK0.gpio(pin as usize).ctrl().modify(|w| {
            w.set_funcsel(FUNCSEL_PIO0);
            w.set_inover(pac::io::vals::Inover::NORMAL);
        });
    }

    fn park_pin(&mut self, pin: u8, _channel: u8) {
        pac::IO_BANK0.gpio(pin as usize).ctrl().modify(|w| {
            w.set_funcsel(FUNCSEL_NULL);
            w.set_inover(pac::io::vals::Inover::HIGH);
        });
    }
}
