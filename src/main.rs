use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{bail, IntoDiagnostic, Result};

use synvm::disasm::Disassembler;
use synvm::{loader, DebuggerOptions, Exit, Output, RunEnvironment, Signal, Terminal};
use synvm::{Interrupt, MEMORY_SIZE};

/// synvm runs, debugs and lists program images for the 15-bit Synacor architecture.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a program image to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program image, pausing into the debugger on Ctrl-C
    Run {
        /// Program image to run
        name: PathBuf,
        /// Print every instruction before it executes
        #[arg(short, long)]
        trace: bool,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
    /// Run a program image with a breakpoint and scripted debugger commands
    Debug {
        /// Program image to run
        name: PathBuf,
        /// Pause before the instruction at this address
        #[arg(short, long = "break", value_name = "ADDR")]
        breakpoint: Option<u16>,
        /// Read debugger commands from argument, separated by newlines or `;`
        #[arg(short, long)]
        command: Option<String>,
        /// Print every instruction before it executes
        #[arg(short, long)]
        trace: bool,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
    /// List the instructions of a program image without running it
    Disasm {
        /// Program image to list
        name: PathBuf,
        /// First address to list
        #[arg(long, default_value_t = 0, value_parser = parse_address)]
        from: u16,
        /// Address to stop listing at
        #[arg(long, value_parser = parse_address)]
        to: Option<u16>,
    },
}

fn main() -> Result<()> {
    use MsgColor::*;
    let args = Args::parse();
    synvm::env::init();

    let Some(command) = args.command else {
        let Some(path) = args.path else {
            eprintln!("{SHORT_INFO}");
            bail!("No program image given. Exiting...");
        };
        run(&path, options(None, None, false), false)?;
        return Ok(());
    };

    match command {
        Command::Run {
            name,
            trace,
            minimal,
        } => run(&name, options(None, None, trace), minimal),
        Command::Debug {
            name,
            breakpoint,
            command,
            trace,
            minimal,
        } => run(&name, options(command, breakpoint, trace), minimal),
        Command::Disasm { name, from, to } => {
            let words = loader::read_image(&name)?;
            file_message(Green, "Listing", &name);
            let end = to.map_or(MEMORY_SIZE, |to| to as usize);
            let mut stdout = io::stdout().lock();
            for line in Disassembler::new(&words, from as usize..end) {
                writeln!(stdout, "{line}").into_diagnostic()?;
            }
            Ok(())
        }
    }
}

/// Merge command line options with `SYNVM_*` environment configuration.
fn options(command: Option<String>, breakpoint: Option<u16>, trace: bool) -> DebuggerOptions {
    DebuggerOptions {
        command,
        breakpoint: breakpoint.or_else(synvm::env::breakpoint),
        trace: trace || synvm::env::is_trace_enabled(),
    }
}

fn run(name: &Path, opts: DebuggerOptions, minimal: bool) -> Result<()> {
    Output::set_minimal(minimal);

    file_message(MsgColor::Green, "Loading", name);
    let words = loader::read_image(name)?;

    let interrupt = Interrupt::new();
    install_interrupt_handler(&interrupt)?;

    let mut program = RunEnvironment::from_image(&words, opts, interrupt.clone());
    message(MsgColor::Green, "Running", &format!("{} words", words.len()));

    match program.run(&mut Terminal::new(interrupt)) {
        Exit::Halted => message(MsgColor::Cyan, "Halted", "program finished"),
        Exit::Exited => message(MsgColor::Red, "Exited", "stopped by debugger"),
    }
    Ok(())
}

/// First Ctrl-C pauses into the debugger, a second one exits.
fn install_interrupt_handler(interrupt: &Interrupt) -> Result<()> {
    let interrupt = interrupt.clone();
    ctrlc::set_handler(move || {
        if let Signal::Exit { was_paused: true } = interrupt.raise() {
            // Debugger is blocked reading a command and will never reach a checkpoint
            let _ = io::stdout().flush();
            eprintln!();
            std::process::exit(130);
        }
    })
    .into_diagnostic()
}

fn parse_address(value: &str) -> Result<u16, String> {
    value
        .parse::<u16>()
        .ok()
        .filter(|address| (*address as usize) < MEMORY_SIZE)
        .ok_or_else(|| synvm::arg_bad_address(value))
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("image {}", right.display());
    message(color, left, &right);
}

/// Status line on stderr, so stdout only carries program output.
fn message(color: MsgColor, left: &str, right: &str) {
    if Output::is_minimal() {
        return;
    }
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    eprintln!("{left:>12} {right}");
}

const SHORT_INFO: &str = r"
Welcome to synvm, a virtual machine and debugger for the 15-bit Synacor architecture.
Please use `-h` or `--help` to access the usage instructions and documentation.
";
