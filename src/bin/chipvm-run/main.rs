// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Runs a Chip-8 ROM headless for a fixed number of frames,
//! then prints the screen and the register file

use chipvm::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Parses a hexadecimal string into a u16
fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on chipvm.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Print a disassembly of every instruction as it runs.")]
    pub debug: bool,
    #[options(help = "Number of 60Hz frames to run.", default = "60", meta = "N")]
    pub frames: usize,
    #[options(help = "Instructions per frame.", default = "10", meta = "IPF")]
    pub speed: usize,
    #[options(help = "Quirks profile to run with (modern, vip).", meta = "PROFILE")]
    pub quirks: Option<Quirks>,
    #[options(help = "Seed the random number generator.", meta = "SEED")]
    pub seed: Option<u64>,
    #[options(
        long = "break",
        help = "Set breakpoints for the machine to stop at.",
        parse(try_from_str = "parse_hex"),
        meta = "BP"
    )]
    pub breakpoints: Vec<u16>,
}

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let mut vm = match options.seed {
        Some(seed) => Machine::seeded(seed),
        None => Machine::default(),
    }
    .with_quirks(options.quirks.unwrap_or_default());
    vm.flags.debug = options.debug;
    for &point in &options.breakpoints {
        vm.set_break(point);
    }
    vm.reset();
    vm.load_program_file(&options.file)?;

    for _ in 0..options.frames {
        if let Err(e) = vm.multistep(options.speed) {
            eprintln!("{}", e.bold().red());
            if e.is_fatal() {
                break;
            }
            // the frame was cut short, but the clock keeps going
            vm.tick_timers();
        }
    }

    print!("{}", vm.screen());
    vm.dump();
    Ok(())
}
