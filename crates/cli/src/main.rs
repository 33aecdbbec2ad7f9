//! RISC-V core bring-up CLI.
//!
//! This binary is the operator's entry point for validating the core on the board. It performs:
//! 1. **Decode:** Break down branch instruction words (or every branch in a hex program).
//! 2. **Run:** Load one hex program and drive it through the reset/run/poll handshake.
//! 3. **Suite:** Run the named test programs and summarise pass/fail.
//! 4. **Sort:** Run the built-in bubble sort on a seeded random array and check the result.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rvbringup_core::isa::branch::{BranchFields, branch_target, decode_b_type_imm};
use rvbringup_core::isa::disasm::{disassemble_branch, opcode_name};
use rvbringup_core::isa::instruction::InstructionBits;
use rvbringup_core::isa::rv32i::opcodes::OP_BRANCH;
use rvbringup_core::sim::handshake::Job;
use rvbringup_core::sim::loader::{load_hex_program, parse_hex_word};
use rvbringup_core::sim::{suite, verify, workloads};
use rvbringup_core::{BringupError, Config, Handshake, Platform, Result};

#[derive(Parser, Debug)]
#[command(
    name = "bringup",
    author,
    version,
    about = "RISC-V pipelined core bring-up and validation",
    long_about = "Decode branch immediates, or drive the core on the board through load, reset, run, and result check.\n\nBoard commands map the memory regions from /dev/mem and need root.\nSet RUST_LOG=debug for per-word and polling detail.\n\nExamples:\n  bringup decode FA000EE3 --pc 0x54\n  bringup decode --file test_programs/test_branch.hex\n  bringup run test_programs/test_arithmetic.hex --expect-magic\n  bringup suite --dir test_programs\n  bringup sort --seed 42"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode the B-type immediate of one or more instruction words.
    Decode {
        /// Instruction words in hex (with or without 0x).
        #[arg(value_parser = parse_hex_u32)]
        words: Vec<u32>,

        /// PC of the (first) word; subsequent words are assumed consecutive.
        #[arg(long, value_parser = parse_hex_u32)]
        pc: Option<u32>,

        /// List every branch in a hex program, with its PC and target.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Load and run a single hex program.
    Run {
        /// Hex program, one word per line.
        program: PathBuf,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Require the completion marker at the status address.
        #[arg(long)]
        expect_magic: bool,
    },

    /// Run the named test programs (default: the full suite).
    Suite {
        /// Directory containing `<name>.hex` files.
        #[arg(short, long, default_value = "test_programs")]
        dir: PathBuf,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Test names; omit for the default list.
        names: Vec<String>,
    },

    /// Sort a random array on the core and compare against the host result.
    Sort {
        /// Seed for the input array; a time-based seed is used if omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode { words, pc, file } => cmd_decode(&words, pc, file.as_deref()),
        Commands::Run {
            program,
            config,
            expect_magic,
        } => cmd_run(&program, config.as_deref(), expect_magic),
        Commands::Suite { dir, config, names } => cmd_suite(&dir, config.as_deref(), &names),
        Commands::Sort { seed, config } => cmd_sort(seed, config.as_deref()),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Accepts `1f`, `0x1f`, or `0X1F`.
fn parse_hex_u32(s: &str) -> std::result::Result<u32, String> {
    parse_hex_word(s).ok_or_else(|| format!("'{s}' is not a 32-bit hex word"))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    path.map_or_else(|| Ok(Config::default()), Config::load)
}

#[cfg(unix)]
fn open_platform(config: &Config) -> Result<Platform> {
    Platform::map_physical(config)
}

#[cfg(not(unix))]
fn open_platform(config: &Config) -> Result<Platform> {
    Err(BringupError::Map {
        base: config.memory_map.iram_base,
        size: config.memory_map.bram_size,
        reason: "physical memory mapping requires a unix host".to_string(),
    })
}

/// Prints the field breakdown of each word, plus its target when a PC is known.
///
/// With `--file`, prints one line per branch in the program instead.
fn cmd_decode(words: &[u32], pc: Option<u32>, file: Option<&Path>) -> Result<bool> {
    if let Some(path) = file {
        let program = load_hex_program(path)?;
        let base = pc.unwrap_or(0);
        println!("{}: {} words", path.display(), program.len());
        for (i, &inst) in program.iter().enumerate() {
            if inst.opcode() != OP_BRANCH {
                continue;
            }
            let at = base.wrapping_add(i as u32 * 4);
            let text = disassemble_branch(inst).unwrap_or_else(|| "b???".to_string());
            println!(
                "  [{i:2}] {at:#06x}: {inst:08x}  {text:<24} -> {:#06x}",
                branch_target(at, inst)
            );
        }
        return Ok(true);
    }

    if words.is_empty() {
        eprintln!("nothing to decode: pass instruction words or --file <PROGRAM.hex>");
        return Ok(false);
    }

    for (i, &inst) in words.iter().enumerate() {
        let fields = BranchFields::extract(inst);
        println!("Instruction: {inst:#010x}");
        println!("{fields}");
        println!(
            "Unsigned:  {:#x} ({})",
            fields.unsigned(),
            fields.unsigned()
        );
        println!("Offset:    {:+}", decode_b_type_imm(inst));
        match disassemble_branch(inst) {
            Some(text) => println!("Disasm:    {text}"),
            None => println!(
                "Disasm:    ({} opcode {:#04x} is not a branch)",
                opcode_name(inst.opcode()).unwrap_or("unknown"),
                inst.opcode()
            ),
        }
        if let Some(base) = pc {
            let at = base.wrapping_add(i as u32 * 4);
            println!(
                "Target:    {at:#x} {:+} = {:#x}",
                decode_b_type_imm(inst),
                branch_target(at, inst)
            );
        }
        println!();
    }
    Ok(true)
}

/// Runs one program; passes when done is observed and any expected marker is present.
fn cmd_run(program: &Path, config: Option<&Path>, expect_magic: bool) -> Result<bool> {
    let config = load_config(config)?;
    let words = load_hex_program(program)?;
    let name = program
        .file_stem()
        .map_or_else(|| "program".to_string(), |s| s.to_string_lossy().into_owned());

    let mut job = Job::new(name, words);
    if expect_magic {
        job = job.expect_magic(config.layout.status_addr(), config.layout.magic);
    }

    let mut platform = open_platform(&config)?;
    let mut handshake = Handshake::new(&mut platform, &config);
    let report = handshake.run(&job)?;

    println!(
        "{}: {} after {} polls ({:.3}s)",
        report.name,
        if report.passed() { "PASSED" } else { "FAILED" },
        report.completion.iterations,
        report.completion.elapsed.as_secs_f64()
    );
    for m in &report.mismatches {
        println!("  {m}");
    }
    Ok(report.passed())
}

/// Runs the suite; passes only if every test passes.
fn cmd_suite(dir: &Path, config: Option<&Path>, names: &[String]) -> Result<bool> {
    let config = load_config(config)?;
    let mut platform = open_platform(&config)?;
    let mut handshake = Handshake::new(&mut platform, &config);

    let report = suite::run_suite(&mut handshake, &config.layout, dir, names);
    println!("{report}");
    Ok(report.all_passed())
}

/// Runs the sort workload on a seeded random array.
fn cmd_sort(seed: Option<u64>, config: Option<&Path>) -> Result<bool> {
    let config = load_config(config)?;
    let seed = seed.unwrap_or_else(time_seed);
    let values = workloads::random_array(seed, config.layout.array_len);
    println!("seed {seed}");
    println!("input:  {values:?}");

    let job = workloads::sort_job(&config.layout, &values);
    let mut platform = open_platform(&config)?;
    let mut handshake = Handshake::new(&mut platform, &config);

    let report = match handshake.run(&job) {
        Ok(report) => report,
        Err(e @ BringupError::Timeout { .. }) => {
            println!("FAILED: {e}");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let got: Vec<i32> = report.readback.iter().copied().map(verify::as_signed).collect();
    println!("output: {got:?}");
    if report.passed() {
        println!("PASSED: all {} values sorted correctly", values.len());
    } else {
        println!("FAILED: {} mismatches", report.mismatches.len());
        for m in &report.mismatches {
            println!("  {m}");
        }
    }
    Ok(report.passed())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}
