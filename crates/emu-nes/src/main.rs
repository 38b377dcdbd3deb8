//! Headless NES runner.
//!
//! Loads raw program/character ROM images, runs the machine on a worker
//! thread for a number of frames and drains audio on another. Requested
//! state paths are printed on exit.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use emu_core::{Observable, Value};
use emu_nes::{
    InputSnapshot, Nes, NesConfig, NesError, NesRegion, QuitFlag, RingSink, StandardController,
};
use nes_cartridge::{DiscreteCartridge, Mirroring};
use ringbuf::HeapCons;
use ringbuf::traits::Consumer;
use tracing::{Level, error, info};

#[derive(Parser, Debug)]
#[command(name = "emu-nes", version, about = "Cycle-accurate NES emulator (headless)")]
struct Args {
    /// Raw program ROM image (16 or 32 KiB)
    #[arg(long)]
    program: PathBuf,

    /// Raw character ROM image (8 KiB)
    #[arg(long)]
    character: Option<PathBuf>,

    /// Vertical nametable arrangement
    #[arg(long, conflicts_with = "horizontal")]
    vertical: bool,

    /// Horizontal nametable arrangement (default)
    #[arg(long)]
    horizontal: bool,

    /// Speed multiplier; 0 runs as fast as possible
    #[arg(long, default_value_t = 1.0)]
    throttle: f32,

    /// Stop if emulation falls behind real time
    #[arg(long)]
    strict: bool,

    /// PAL timing
    #[arg(long)]
    pal: bool,

    /// Power-on seed (default: derived from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,

    /// Frames to run before exiting
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// State path to print on exit (repeatable)
    #[arg(long = "query")]
    queries: Vec<String>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}

/// Drains the ring the emulator fills. Tracks the peak level so a run
/// can report whether anything was audible.
fn drain_audio(mut consumer: HeapCons<f32>, quit: &QuitFlag) -> (u64, f32) {
    let mut received = 0u64;
    let mut peak = 0.0f32;
    loop {
        let mut idle = true;
        while let Some(sample) = consumer.try_pop() {
            received += 1;
            peak = peak.max((sample + 1.0).abs());
            idle = false;
        }
        if quit.is_requested() {
            return (received, peak);
        }
        if idle {
            thread::sleep(Duration::from_millis(2));
        }
    }
}

type Report = Vec<(String, Option<Value>)>;

fn run(nes: &mut Nes, frames: u64, queries: &[String]) -> Result<Report, NesError> {
    for _ in 0..frames {
        nes.run_frame()?;
    }
    info!(frames = nes.frame_count(), "run complete");
    Ok(queries
        .iter()
        .map(|path| (path.clone(), nes.query(path)))
        .collect())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mirroring = if args.vertical {
        Mirroring::Vertical
    } else {
        Mirroring::Horizontal
    };
    let cartridge = match DiscreteCartridge::load_from_files(
        &args.program,
        args.character.as_deref(),
        mirroring,
    ) {
        Ok(cart) => cart,
        Err(e) => {
            error!(error = %e, "failed to load cartridge");
            return ExitCode::FAILURE;
        }
    };

    let config = NesConfig {
        region: if args.pal { NesRegion::Pal } else { NesRegion::Ntsc },
        seed: args.seed.unwrap_or_else(clock_seed),
        sample_rate: args.sample_rate,
        throttle: args.throttle,
        strict_timing: args.strict,
        ..NesConfig::default()
    };
    // About a quarter second of audio
    let capacity = (config.sample_rate as usize / 4).max(1);

    let mut nes = Nes::new(Box::new(cartridge), config);
    let (sink, consumer) = RingSink::with_capacity(capacity);
    nes.set_sample_sink(Box::new(sink));
    let input = InputSnapshot::new();
    if let Err(e) = nes.connect(0, Box::new(StandardController::new(input))) {
        error!(error = %e, "controller setup failed");
        return ExitCode::FAILURE;
    }

    let quit = nes.quit_flag();
    let audio_quit = quit.clone();
    let audio = thread::Builder::new()
        .name("audio".into())
        .spawn(move || drain_audio(consumer, &audio_quit));
    let frames = args.frames;
    let queries = args.queries.clone();
    let worker = thread::Builder::new()
        .name("emulation".into())
        .spawn(move || run(&mut nes, frames, &queries));

    let outcome = match worker {
        Ok(handle) => handle.join().unwrap_or(Err(NesError::QuitRequested)),
        Err(e) => {
            error!(error = %e, "failed to start emulation thread");
            Err(NesError::QuitRequested)
        }
    };
    quit.request();
    if let Ok(Ok((received, peak))) = audio.map(thread::JoinHandle::join) {
        info!(received, peak, "audio drained");
    }

    match outcome {
        Ok(report) => {
            for (path, value) in report {
                match value {
                    Some(v) => println!("{path} = {v}"),
                    None => println!("{path} = <unknown>"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "emulation stopped");
            ExitCode::FAILURE
        }
    }
}
