//! MorphaLogic is [Embassy](https://embassy.dev)-based firmware for a control expander targeting the
//! [Make Noise Morphagene](https://www.makenoisemusic.com/modules/morphagene), a tape and microsound
//! eurorack module. The firmware runs on the [Nucleo-F767ZI development
//! board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html), which is powered by an F7-series
//! STM32 microcontroller.
//!
//! It works by polling the expander's panel — a slide knob, an organize selector, and a play
//! gate/button — and expressing those readings as control voltages and gates the Morphagene
//! understands. Knob travel is trimmed and normalized by the logic crate
//! ([`morphalogic_lib`]), so the code here is limited to wiring readings to peripherals.

#![no_std]
#![no_main]

mod sources;

use crate::sources::{AdcSource, GpioLevel};
use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::{
    Config,
    adc::{Adc, AdcChannel},
    dac::{Dac, DacCh1, DacCh2, Value},
    gpio::{Input, Level, Output, Pull, Speed},
    mode::Async,
    peripherals::{self, DAC1},
    time::Hertz,
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    watch::{Receiver, Sender, Watch},
};
use embassy_time::Timer;
use morphalogic_lib::{
    input::{Knob, Polarity, Range, Trigger},
    morphagene::Morphagene,
};

use {defmt_rtt as _, panic_probe as _};

/// How many splices the organize selector steps through.
const SPLICE_POSITIONS: i32 = 10;

/// Span of the CV outputs. The DAC tops out at the 3.3 V rail; the op-amp stage behind it
/// scales the signal onto the Morphagene's 0-5 V inputs.
const CV_SPAN_VOLTS: f32 = 3.3;

/// How long the panel rests between polls.
const POLL_PERIOD_MS: u64 = 2;

const PANEL_RECEIVER_CNT: usize = 2;
type PanelSync = Watch<CriticalSectionRawMutex, PanelState, PANEL_RECEIVER_CNT>;
type PanelSender<'a> = Sender<'a, CriticalSectionRawMutex, PanelState, PANEL_RECEIVER_CNT>;
type PanelReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, PanelState, PANEL_RECEIVER_CNT>;

/// Synchronizes panel readings between the polling task and the output tasks.
static PANEL_SYNC: PanelSync = Watch::new();

type SlideKnob = Knob<AdcSource<'static, peripherals::ADC1>>;
type OrganizeKnob = Knob<AdcSource<'static, peripherals::ADC3>>;
type PlayTrigger = Trigger<GpioLevel<'static>>;

/// One complete reading of the expander's panel.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct PanelState {
    /// Normalized position of the slide knob.
    slide: f32,
    /// Zero-based splice selected by the organize knob.
    organize: i32,
    /// Whether the play input asks the Morphagene to run.
    playing: bool,
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing MorphaLogic");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // hse: high-speed external clock
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });

        // pll: phase-locked loop, crucial for dividing clock
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL216,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 216 / 2 = 216Mhz
            divq: None,
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
    }
    let p = embassy_stm32::init(config);

    // The slide knob's travel leaves a dead zone at each end of the sweep; the trimmed window
    // was measured on the first panel run.
    let slide_range = unwrap!(Range::new(8, 1015));
    let slide = Knob::new(
        AdcSource::new(Adc::new(p.ADC1), p.PA3.degrade_adc()),
        slide_range,
    );

    // The organize knob is read as a selector, so the full scale is fine: the switch readout
    // swallows the dead zones on its own.
    let organize = Knob::new(
        AdcSource::new(Adc::new(p.ADC3), p.PC0.degrade_adc()),
        Range::default(),
    );

    // The play jack doubles as a footswitch input: it idles high against the internal pull-up
    // and reads active when pulled to ground.
    let play_pin = Input::new(p.PD1, Pull::Up);
    let play = Trigger::new(GpioLevel::new(play_pin), Polarity::Inverted);

    // set up the DAC to output control voltage to the Morphagene
    // per RM0410 (the reference manual for the chip), DAC channel 1 outputs on port A, pin 4
    let dac_ch1_out = p.PA4;
    // DMA: direct memory access controller
    let dac_ch1_dma = p.DMA1_CH5;

    let dac_ch2_out = p.PA5;
    let dac_ch2_dma = p.DMA1_CH6;

    let (slide_out, organize_out) =
        Dac::new(p.DAC1, dac_ch1_dma, dac_ch2_dma, dac_ch1_out, dac_ch2_out).split();

    let sender = PANEL_SYNC.sender();
    unwrap!(spawner.spawn(panel_task(slide, organize, play, sender)));

    let panel = PANEL_SYNC
        .receiver()
        .expect("Panel synchronizer should have a receiver available");
    unwrap!(spawner.spawn(cv_task(slide_out, organize_out, panel)));

    let play_gate = Output::new(p.PG0, Level::Low, Speed::Low);
    let blue_led = Output::new(p.PB7, Level::Low, Speed::Low);
    let panel = PANEL_SYNC
        .receiver()
        .expect("Panel synchronizer should have a receiver available");
    unwrap!(spawner.spawn(gate_task(play_gate, blue_led, panel)));
}

/// Task responsible for polling the panel and publishing readings when they move.
///
/// The panel is the single source of truth here: every control is sampled in one pass, so the
/// published state is always internally consistent.
#[embassy_executor::task]
async fn panel_task(
    mut slide: SlideKnob,
    mut organize: OrganizeKnob,
    mut play: PlayTrigger,
    sender: PanelSender<'static>,
) -> ! {
    let mut module = Morphagene::default();
    let mut last: Option<PanelState> = None;

    loop {
        module.set_playing(play.read());

        let state = PanelState {
            slide: slide.read(),
            // SPLICE_POSITIONS is a nonzero constant, so the readout cannot fail
            organize: unwrap!(organize.read_switch(SPLICE_POSITIONS)),
            playing: module.is_playing(),
        };

        if last != Some(state) {
            info!(
                "Panel moved: slide {}, organize splice {}, playing {}",
                state.slide, state.organize, state.playing
            );
            sender.send(state);
            last = Some(state);
        }

        Timer::after_millis(POLL_PERIOD_MS).await;
    }
}

/// Task responsible for driving the Morphagene's CV inputs from the panel readings.
#[embassy_executor::task]
async fn cv_task(
    mut slide_out: DacCh1<'static, DAC1, Async>,
    mut organize_out: DacCh2<'static, DAC1, Async>,
    mut panel: PanelReceiver<'static>,
) -> ! {
    loop {
        let state = panel.changed().await;

        let slide_volts = state.slide * CV_SPAN_VOLTS;
        slide_out.set(voltage_to_dac_value(slide_volts));

        // The stepped voltage recreates the detents the organize knob doesn't physically have,
        // so each position lands cleanly on one splice.
        let organize_volts = state.organize as f32 / SPLICE_POSITIONS as f32 * CV_SPAN_VOLTS;
        organize_out.set(voltage_to_dac_value(organize_volts));

        info!(
            "Sending {} V for slide and {} V for organize",
            slide_volts, organize_volts
        );
    }
}

/// Task responsible for mirroring the play state to the Morphagene's play gate and the board LED.
#[embassy_executor::task]
async fn gate_task(
    mut play_gate: Output<'static>,
    mut led: Output<'static>,
    mut panel: PanelReceiver<'static>,
) -> ! {
    loop {
        let state = panel.changed().await;

        if state.playing {
            info!("Play gate is high");
            play_gate.set_high();
            led.set_high();
        } else {
            info!("Play gate is low");
            play_gate.set_low();
            led.set_low();
        }
    }
}

/// Helper function to convert a control voltage to a <abbr name="digital-to-analog converter">DAC</abbr> value.
///
/// There's an uncomfortable amount of hardcoding here. Ideally we could do without it, but, if not, this is the most
/// appropriate place for it, as this is where all the hardware-specific code goes.
fn voltage_to_dac_value(voltage: f32) -> Value {
    Value::Bit12Right(
        (voltage
            // This is the reference voltage 3.333333; TODO: this should not be hardcoded, as reference voltages may vary
            / (10.0 / 3.0)
            // The calculation above gives the percentage of the reference voltage; below we scale it to 12 bits; this
            // also shouldn't be hardcoded, as it's specific to this particular DAC (other hardware might have different
            // resolutions)
            * 4095.0)
            // Casting to u16 serves as a quick and dirty rounding. The DAC resolution is high enough I don't think this will
            // matter.
            as u16,
    )
}
