//! wordvm - Run a 16-bit word VM image
//!
//! # Usage
//!
//! ```bash
//! # Run an image on stdin/stdout
//! wordvm challenge.bin
//!
//! # Trace every executed instruction to stderr
//! wordvm --trace challenge.bin
//!
//! # Dump machine state on halt, as JSON
//! wordvm --coredump --json-dump challenge.bin
//!
//! # Store 10 into IN targets once stdin is exhausted
//! wordvm --eof=10 challenge.bin < input.txt
//! ```
//!
//! # Exit Codes
//!
//! - 0: Program halted or ran off the end of its image
//! - 1: Initialization or load failed, or execution faulted
//! - 2: Invalid arguments or IO error

use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::process::ExitCode;
use wordvm::{
    load_from_file, Coredump, EofPolicy, Interpreter, StdConsole, Traceback, VmConfig,
};

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);

    let mut level = LevelFilter::Warn;
    let mut coredump = false;
    let mut json = false;
    let mut eof = None;
    let mut config_path = None;
    let mut paths = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => level = level.max(LevelFilter::Debug),
            "--trace" => level = LevelFilter::Trace,
            "--coredump" => coredump = true,
            "--json-dump" => json = true,
            "--config" => match args.next() {
                Some(path) => config_path = Some(path),
                None => {
                    eprintln!("Error: --config requires a file\n");
                    print_help();
                    return ExitCode::from(2);
                }
            },
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            _ if arg.starts_with("--eof=") => match EofPolicy::parse(&arg["--eof=".len()..]) {
                Some(policy) => eof = Some(policy),
                None => {
                    eprintln!("Error: invalid EOF policy: {}\n", arg);
                    print_help();
                    return ExitCode::from(2);
                }
            },
            _ if arg.starts_with('-') => {
                eprintln!("Unknown option: {}\n", arg);
                print_help();
                return ExitCode::from(2);
            }
            _ => paths.push(arg),
        }
    }

    let path = match paths.as_slice() {
        [path] => path.clone(),
        [] => {
            eprintln!("Error: No image specified\n");
            print_help();
            return ExitCode::from(2);
        }
        _ => {
            eprintln!("Error: Exactly one image expected\n");
            print_help();
            return ExitCode::from(2);
        }
    };

    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Warning: logger unavailable: {}", e);
    }

    let mut config = match &config_path {
        Some(p) => match VmConfig::from_json_file(p) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return ExitCode::from(2);
            }
        },
        None => VmConfig::default(),
    };
    if coredump {
        config.coredump_on_halt = true;
    }
    if let Some(policy) = eof {
        config = config.with_eof(policy);
    }

    let bytes = match load_from_file(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    let mut vm = match Interpreter::with_console(StdConsole::new(), config) {
        Ok(vm) => vm,
        Err(e) => {
            eprintln!("{}", Traceback::new("initialize", e.to_string()));
            return ExitCode::FAILURE;
        }
    };
    log::debug!("running {} with {:?}", path, vm.config());

    if let Err(e) = vm.load(&bytes) {
        report(&vm, &e);
        vm.free();
        return ExitCode::FAILURE;
    }

    let code = match vm.execute() {
        Ok(outcome) => {
            log::debug!("{} finished: {:?}", path, outcome);
            if let Some(dump) = vm.coredump() {
                print_coredump(dump, json);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&vm, &e);
            if let Some(dump) = vm.coredump() {
                print_coredump(dump, json);
            }
            ExitCode::FAILURE
        }
    };

    vm.free();
    code
}

/// One line naming the failing stage and reason
fn report(vm: &Interpreter, err: &wordvm::VmError) {
    match vm.traceback() {
        Some(tb) => eprintln!("{}", tb),
        None => eprintln!("failed: {}", err),
    }
}

fn print_coredump(dump: &Coredump, json: bool) {
    if json {
        match serde_json::to_string_pretty(dump) {
            Ok(text) => eprintln!("{}", text),
            Err(e) => eprintln!("Error: cannot serialize coredump: {}", e),
        }
    } else {
        eprint!("{}", dump);
    }
}

fn print_help() {
    eprintln!(
        r#"wordvm - Run a 16-bit word VM image

USAGE:
    wordvm [OPTIONS] <IMAGE>

OPTIONS:
    -v, --verbose      Debug logging to stderr
    --trace            Log every executed instruction
    --coredump         Dump registers and stack when the program halts
    --json-dump        Print coredumps as JSON
    --eof=<POLICY>     IN at end of input: 'fault' (default) or a value 0-32767 to store
    --config <FILE>    Load VM settings from a JSON file
    -h, --help         Show this help

EXIT CODES:
    0    Program halted or ran off the end of its image
    1    Initialization or load failed, or execution faulted
    2    Invalid arguments or IO error

EXAMPLES:
    wordvm challenge.bin
    wordvm --trace --coredump challenge.bin
    wordvm --eof=10 challenge.bin < input.txt"#
    );
}
