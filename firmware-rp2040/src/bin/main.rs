#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use nsi_proto::gc;
use static_cell::StaticCell;
use wired_gc_rp2040::{
    board, Config, FeedbackConsumer, FeedbackProducer, FeedbackQueue, FeedbackType, NsiEngine,
    PioPulseBus, SystemId, WiredAdapter, WiredDriver, WiredSystem, MAX_PORTS,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Console this build answers as.
const SYSTEM: SystemId = SystemId::Gc;

/// Feedback queue slots (holds one less record).
const FB_QUEUE_LEN: usize = 8;

type Engine = NsiEngine<FeedbackProducer<'static, FB_QUEUE_LEN>>;

/// Everything the bus interrupt touches.
struct Wired {
    system: WiredSystem<Engine>,
    bus: PioPulseBus<'static>,
    adapter: WiredAdapter,
    config: Config,
}

static WIRED: Mutex<CriticalSectionRawMutex, RefCell<Option<Wired>>> =
    Mutex::new(RefCell::new(None));

static FB_QUEUE: StaticCell<FeedbackQueue<FB_QUEUE_LEN>> = StaticCell::new();

/// Bitmask of ports whose rumble motor is on.
static RUMBLE_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, u8>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Wired GC adapter starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let queue = FB_QUEUE.init(FeedbackQueue::new());
    let (producer, consumer) = queue.split();
    let signal = RUMBLE_SIGNAL.init(Signal::new());

    // --- Controller ports ---
    let mut pio = Pio::new(p.PIO0, Irqs);
    let pins = [
        pio.common.make_pio_pin(p.PIN_2),
        pio.common.make_pio_pin(p.PIN_3),
        pio.common.make_pio_pin(p.PIN_4),
        pio.common.make_pio_pin(p.PIN_5),
    ];
    let mut bus = PioPulseBus::new(pio, pins);

    // --- Engine ---
    let config = Config::new();
    let mut adapter = WiredAdapter::new(SYSTEM);
    for (data, out_cfg) in adapter.data.iter_mut().zip(config.out_cfg.iter()) {
        gc::init_buffer(out_cfg.dev_mode, data);
    }

    let mut system = WiredSystem::select(SYSTEM, || {
        NsiEngine::new(board::PORT_MAP, board::NSI_CONFIG, producer)
    });
    if let WiredSystem::Unsupported(id) = &system {
        warn!("{} not supported, ports stay idle", id.name());
    }
    system.init(&mut bus);

    WIRED.lock(|wired| {
        wired.replace(Some(Wired {
            system,
            bus,
            adapter,
            config,
        }));
    });

    interrupt::PIO0_IRQ_1.set_priority(Priority::P0);
    // SAFETY: the handler only touches WIRED, which is fully set up above.
    unsafe { interrupt::PIO0_IRQ_1.enable() };

    let led = Output::new(p.PIN_25, Level::Low);

    spawner.spawn(feedback_task(consumer, signal).unwrap());
    spawner.spawn(rumble_task(led, signal).unwrap());

    info!("{} engine serving {} ports", SYSTEM.name(), MAX_PORTS);
}

#[interrupt]
fn PIO0_IRQ_1() {
    WIRED.lock(|wired| {
        if let Some(w) = wired.borrow_mut().as_mut() {
            w.system.on_interrupt(&mut w.bus, &mut w.adapter, &w.config);
        }
    });
}

/// Feedback task - drains engine feedback and tracks active rumble ports.
#[embassy_executor::task]
async fn feedback_task(
    mut consumer: FeedbackConsumer<'static, FB_QUEUE_LEN>,
    signal: &'static Signal<CriticalSectionRawMutex, u8>,
) {
    let mut rumble: u8 = 0;
    loop {
        while let Some(fb) = consumer.dequeue() {
            match fb.kind {
                FeedbackType::Rumble => {
                    let on = fb.payload().first().copied().unwrap_or(0) != 0;
                    info!("port {}: rumble {}", fb.wired_id, on);
                    let bit = 1u8 << (fb.wired_id & 0x07);
                    rumble = if on { rumble | bit } else { rumble & !bit };
                    signal.signal(rumble);
                }
                FeedbackType::GameId => {
                    info!("port {}: game id {=[u8]:a}", fb.wired_id, fb.payload());
                }
            }
        }
        Timer::after_millis(1).await;
    }
}

/// Rumble task - lights the LED while any port's motor is on.
#[embassy_executor::task]
async fn rumble_task(mut led: Output<'static>, signal: &'static Signal<CriticalSectionRawMutex, u8>) {
    loop {
        let mask = signal.wait().await;
        led.set_level(if mask != 0 { Level::High } else { Level::Low });
    }
}
