use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;
use tmsim::{
    MachineCatalog, MachineLoader, MachineSpec, Mode, Step, TuringMachine, TuringMachineError,
    Verdict,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `TMSIM_LOG=debug`.
const LOG_ENV: &str = "TMSIM_LOG";

/// Exit status for descriptions that fail to load and for I/O failures.
const EXIT_LOAD_ERROR: i32 = 1;
/// Exit status for runs that hit `--max-steps` without a verdict.
const EXIT_STEP_LIMIT: i32 = 2;

/// A single-tape deterministic Turing Machine simulator.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tmsim-cli --machine machines/even-ones.tm --tape D11D
  tmsim-cli --sample binary-palindrome --tape D0110D --debug
  tmsim-cli    (prompts for the description file and the tape)")]
struct Cli {
    /// Path to a machine description file.
    /// Prompted for when neither this nor --sample is given.
    #[clap(short, long, conflicts_with = "sample")]
    machine: Option<String>,

    /// Name of a bundled machine (see --list)
    #[clap(short, long)]
    sample: Option<String>,

    /// The input tape. Prompted for when omitted.
    #[clap(short, long)]
    tape: Option<String>,

    /// Give up after this many transitions
    #[clap(long)]
    max_steps: Option<usize>,

    /// Treat analyzer findings as load errors
    #[clap(long)]
    strict: bool,

    /// Print the transition listing before running
    #[clap(short, long)]
    print_transitions: bool,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the verdict as JSON
    #[clap(long)]
    json: bool,

    /// List the bundled machines and exit
    #[clap(long)]
    list: bool,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if cli.list {
        list_machines();
        return;
    }

    // Prompts are only useful when someone is typing the answers.
    let interactive = atty::is(atty::Stream::Stdin);
    if interactive && ((cli.machine.is_none() && cli.sample.is_none()) || cli.tape.is_none()) {
        println!("Welcome to the Turing Machine simulator!");
    }

    let spec = load_spec(&cli, interactive).unwrap_or_else(|e| fail(&e, EXIT_LOAD_ERROR));

    if cli.print_transitions {
        print!("{}", spec.table.listing());
    }

    let tape = match &cli.tape {
        Some(tape) => tape.clone(),
        None => prompt("Enter your tape (blank is 'D'): ", interactive)
            .unwrap_or_else(|e| fail(&e, EXIT_LOAD_ERROR)),
    };

    let mut machine = TuringMachine::new(&spec);
    if let Err(rejection) = machine.set_tape(&tape) {
        debug!(%rejection, "tape rejected before the run");
    }

    let result = if cli.debug {
        run_traced(&mut machine, cli.max_steps)
    } else {
        match cli.max_steps {
            Some(limit) => machine.run_with_limit(limit),
            None => Ok(machine.run()),
        }
    };

    match result {
        Ok(verdict) => {
            info!(steps = machine.step_count(), verdict = %verdict, "run finished");
            print_verdict(&verdict, cli.json);
        }
        Err(e) => fail(&e, EXIT_STEP_LIMIT),
    }
}

/// Installs the stderr log subscriber, filtered by `TMSIM_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads the description named by `--machine` or `--sample`, prompting for a file name
/// when neither was given.
fn load_spec(cli: &Cli, interactive: bool) -> Result<MachineSpec, TuringMachineError> {
    let mode = if cli.strict { Mode::Strict } else { Mode::Normal };

    if let Some(name) = &cli.sample {
        let text = MachineCatalog::text_by_name(name)?;
        return MachineLoader::load_machine_from_string(text, mode);
    }

    let file = match &cli.machine {
        Some(file) => file.clone(),
        None => prompt("Enter your file name here: ", interactive)
            .map_err(|e| TuringMachineError::FileError(format!("Cannot read file name: {e}")))?,
    };

    MachineLoader::load_machine(Path::new(&file), mode)
}

/// Steps through the run, printing the configuration after every transition.
///
/// `limit` counts applied transitions, as `TuringMachine::run_with_limit` does.
fn run_traced(
    machine: &mut TuringMachine<'_>,
    limit: Option<usize>,
) -> Result<Verdict, TuringMachineError> {
    print_state(machine);

    loop {
        if let Some(limit) = limit {
            if machine.step_count() >= limit && !machine.is_halted() {
                return Err(TuringMachineError::StepLimitExceeded(limit));
            }
        }

        match machine.step() {
            Step::Continue => print_state(machine),
            Step::Halt(verdict) => {
                println!();
                return Ok(verdict);
            }
        }
    }
}

fn print_state(machine: &TuringMachine<'_>) {
    let (tape, head) = machine
        .tape()
        .map(|tape| (tape.to_string(), tape.position()))
        .unwrap_or_default();

    println!(
        "Step: {}, State: {}, Tape: {}, Head: {}",
        machine.step_count(),
        machine.state(),
        tape,
        head
    );
}

fn print_verdict(verdict: &Verdict, json: bool) {
    if !json {
        println!("{verdict}");
        return;
    }

    match serde_json::to_string(verdict) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(EXIT_LOAD_ERROR);
        }
    }
}

fn list_machines() {
    for index in 0..MachineCatalog::count() {
        if let Ok(info) = MachineCatalog::info(index) {
            println!(
                "{:<20} alphabet: {:<6} states: {:<3} transitions: {}",
                info.name, info.alphabet, info.state_count, info.transition_count
            );
        }
    }
}

/// Reads one line from stdin, showing `message` first on a terminal.
fn prompt(message: &str, interactive: bool) -> io::Result<String> {
    if interactive {
        print!("{message}");
        io::stdout().flush()?;
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn fail(error: &dyn std::fmt::Display, code: i32) -> ! {
    eprintln!("{error}");
    process::exit(code);
}
