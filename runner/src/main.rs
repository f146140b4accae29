//! Headless runner for the 6502 interpreter core.
//!
//! Loads a raw program image at a base address, runs it to the
//! terminating BRK, and reports the final register state. Supports
//! per-instruction tracing, NES-speed pacing, and memory dumps.

use std::fs;
use std::path::PathBuf;
use std::process;

use mos6502::{trace, Cpu, NTSC_CYCLE};

struct CliArgs {
    image: Option<PathBuf>,
    base: u16,
    trace: bool,
    real_time: bool,
    dump: Option<(u16, u16)>,
}

fn usage() -> ! {
    eprintln!("Usage: mos6502-runner <image.bin> [options]");
    eprintln!("  --base ADDR       load address (hex, default 0600)");
    eprintln!("  --trace           print each instruction as it executes");
    eprintln!("  --real-time       pace execution at NES speed (~559 ns/cycle)");
    eprintln!("  --dump LO:HI      hex-dump a memory range (hex bounds) on exit");
    process::exit(1);
}

fn parse_hex(text: &str) -> Option<u16> {
    let text = text.trim_start_matches("0x").trim_start_matches('$');
    u16::from_str_radix(text, 16).ok()
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        image: None,
        base: 0x0600,
        trace: false,
        real_time: false,
        dump: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--base" => {
                i += 1;
                match args.get(i).and_then(|a| parse_hex(a)) {
                    Some(base) => cli.base = base,
                    None => usage(),
                }
            }
            "--trace" => cli.trace = true,
            "--real-time" => cli.real_time = true,
            "--dump" => {
                i += 1;
                let range = args.get(i).and_then(|a| {
                    let (lo, hi) = a.split_once(':')?;
                    Some((parse_hex(lo)?, parse_hex(hi)?))
                });
                match range {
                    Some(range) => cli.dump = Some(range),
                    None => usage(),
                }
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {arg}");
                usage();
            }
            path => cli.image = Some(PathBuf::from(path)),
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();
    let Some(image_path) = cli.image else {
        usage();
    };

    let image = match fs::read(&image_path) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("Failed to read {}: {err}", image_path.display());
            process::exit(1);
        }
    };

    let mut cpu = Cpu::new();
    if let Err(err) = cpu.load_program(&image, cli.base) {
        eprintln!("Failed to load {}: {err}", image_path.display());
        process::exit(1);
    }
    cpu.reset();

    if cli.real_time {
        cpu.set_cycle_time(Some(NTSC_CYCLE));
    }

    println!(
        "Loaded {} ({} bytes at ${:04X})",
        image_path.display(),
        image.len(),
        cli.base
    );

    let show_trace = cli.trace;
    let result = cpu.run_with_callback(|cpu| {
        if show_trace {
            println!("{}", trace::line(cpu));
        }
    });

    match result {
        Ok(()) => println!("Halted at BRK (${:04X})", cpu.regs.pc),
        Err(err) => eprintln!("Execution stopped: {err}"),
    }

    println!(
        "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PC:{:04X} cycles:{}",
        cpu.regs.a,
        cpu.regs.x,
        cpu.regs.y,
        cpu.regs.p.0,
        cpu.regs.sp,
        cpu.regs.pc,
        cpu.cycles()
    );

    if let Some((lo, hi)) = cli.dump {
        print!("{}", cpu.memory.hex_dump(lo, hi));
    }
}
