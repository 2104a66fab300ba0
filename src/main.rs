use bf_fold::cli_util::{print_error, print_interpreter_error};
use bf_fold::config::parse_memory_size;
use bf_fold::source::bf_only;
use bf_fold::{load_program, CellWidth, Config, EofPolicy, Interpreter, Overrides, TimeUnit};
use clap::{ArgGroup, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = "bf";

#[derive(Parser, Debug)]
#[command(name = "bf", version, about = "An interpreter for brainfuck scripts.")]
#[command(group(ArgGroup::new("source").required(true).args(["path", "code"])))]
struct Cli {
    /// Path to the brainfuck script (.b or .bf)
    #[arg(value_name = "file-path")]
    path: Option<PathBuf>,

    /// Run CODE instead of a script file
    #[arg(short = 'e', long = "code", value_name = "CODE", allow_hyphen_values = true)]
    code: Option<String>,

    /// Size of each memory cell in bits: 4, 8, 16 or 32 (fallback BF_CELL_SIZE; default 8)
    #[arg(short = 'c', long = "cell-size", value_name = "BITS")]
    cell_size: Option<CellWidth>,

    /// Number of cells in memory (fallback BF_MEMORY_SIZE; default 30000)
    #[arg(short = 'm', long = "memory-size", value_name = "CELLS", value_parser = parse_memory_size)]
    memory_size: Option<usize>,

    /// Units to report runtime in (fallback BF_RUNTIME_UNITS; default ms)
    #[arg(short = 'r', long = "runtime-units", value_enum, value_name = "UNIT")]
    runtime_units: Option<TimeUnit>,

    /// What ',' does at end of input (fallback BF_EOF; default error)
    #[arg(long = "eof", value_enum, value_name = "POLICY")]
    eof: Option<EofPolicy>,

    /// Print the compiled program instead of executing it
    #[arg(long = "dump")]
    dump: bool,

    /// Do not print the timing report
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Log compiler and tape activity to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> i32 {
    init_logging(cli.verbose);

    // Install SIGINT (ctrl+c) handler to flush and exit immediately
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        print_error(Some(PROGRAM), &format!("failed to set ctrl+c handler: {e}"));
        return 1;
    }

    let overrides = Overrides {
        cell_width: cli.cell_size,
        memory_size: cli.memory_size,
        runtime_units: cli.runtime_units,
        eof: cli.eof,
    };
    let config = match Config::load(&overrides) {
        Ok(c) => c,
        Err(e) => {
            print_error(Some(PROGRAM), &e.to_string());
            return 1;
        }
    };

    let code = match (&cli.path, &cli.code) {
        (Some(path), _) => match load_program(path) {
            Ok(code) => code,
            Err(e) => {
                print_error(Some(PROGRAM), &e.to_string());
                return 1;
            }
        },
        (None, inline) => bf_only(inline.as_deref().unwrap_or_default()),
    };

    info!(
        cell_size = %config.cell_width,
        memory_size = config.memory_size,
        eof = %config.eof,
        symbols = code.len(),
        "starting interpreter"
    );

    let bf = Interpreter::new(code.clone(), &config);

    if cli.dump {
        return match bf.compile() {
            Ok(program) => {
                print!("{program}");
                let _ = io::stdout().flush();
                0
            }
            Err(e) => {
                print_interpreter_error(Some(PROGRAM), &code, &e.into());
                1
            }
        };
    }

    // stdout stays unlocked so the ctrl+c handler can flush it mid-run
    match bf.run(io::stdin().lock(), io::stdout()) {
        Ok(timings) => {
            if !cli.quiet {
                eprintln!("{}", timings.report(config.runtime_units));
                let _ = io::stderr().flush();
            }
            0
        }
        Err(e) => {
            let _ = io::stdout().flush();
            print_interpreter_error(Some(PROGRAM), &code, &e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let code = run(cli);
    std::process::exit(code);
}
