use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::error::LoxError;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::resolver::Resolver;
use rox::scanner::{scan_tokens, Scanner};
use rox::session::{run_on_large_stack, Lox};

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to a file (app.log unless --log-file is given)
    #[arg(long, global = true)]
    log: bool,

    /// Log file path, used with --log
    #[arg(long, global = true, value_name = "PATH", default_value = "app.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a program and prints its AST
    Parse { filename: PathBuf },

    /// Resolves a program and prints every local binding distance
    Resolve { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Reads programs line by line from standard input
    Repl,
}

/// Reads a source file through a memory map. Empty files map to empty source.
fn read_source(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file {:?}", filename))?
        .len();

    if len == 0 {
        info!("{:?} is empty", filename);
        return Ok(String::new());
    }

    // SAFETY: the map is read once and copied out before the file is dropped.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {:?}", filename))?;

    let source = std::str::from_utf8(&mmap)
        .with_context(|| format!("{:?} is not valid UTF-8", filename))?
        .to_owned();

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "{} [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

/// Report a pipeline error and exit with its status code.
fn fail(err: LoxError) -> ! {
    debug!("Exiting on error: {:?}", err);
    eprintln!("{}", err);
    std::process::exit(err.exit_code());
}

fn tokenize(source: &str, json: bool) -> Result<()> {
    if json {
        let tokens = scan_tokens(source).unwrap_or_else(|err| fail(err));
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for token in Scanner::new(source) {
        match token {
            Ok(token) => writeln!(out, "{}", token)?,
            Err(err) => {
                out.flush()?;
                fail(err);
            }
        }
    }

    Ok(())
}

fn parse(source: &str) -> Result<()> {
    let tokens = scan_tokens(source).unwrap_or_else(|err| fail(err));
    let statements = Parser::new(&tokens).parse().unwrap_or_else(|err| fail(err));

    info!("Parsed {} statements", statements.len());
    println!("{}", AstPrinter::print_program(&statements));

    Ok(())
}

fn resolve(source: &str) -> Result<()> {
    let tokens = scan_tokens(source).unwrap_or_else(|err| fail(err));
    let statements = Parser::new(&tokens).parse().unwrap_or_else(|err| fail(err));
    let locals = Resolver::new()
        .resolve(&statements)
        .unwrap_or_else(|err| fail(err));

    for (id, resolved) in locals.entries() {
        println!(
            "#{} {} (line {}) -> {}",
            id.0, resolved.name, resolved.line, resolved.depth
        );
    }

    Ok(())
}

fn evaluate(source: &str) -> Result<()> {
    let tokens = scan_tokens(source).unwrap_or_else(|err| fail(err));
    let expr = Parser::new(&tokens)
        .parse_expression()
        .unwrap_or_else(|err| fail(err));

    let mut interpreter = Interpreter::new();
    let value = interpreter.evaluate(&expr).unwrap_or_else(|err| fail(err));

    debug!("Evaluated to: {}", value);
    println!("{}", value);

    Ok(())
}

fn repl() -> Result<()> {
    let mut session = Lox::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            info!("End of input, leaving REPL");
            println!();
            return Ok(());
        }

        if let Err(err) = session.run(&line) {
            debug!("REPL error: {:?}", err);
            eprintln!("{}", err);
        }
    }
}

fn dispatch(commands: Commands) -> Result<()> {
    match commands {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");
            tokenize(&read_source(&filename)?, json)?;
        }

        Commands::Parse { filename } => {
            info!("Running Parse subcommand");
            parse(&read_source(&filename)?)?;
        }

        Commands::Resolve { filename } => {
            info!("Running Resolve subcommand");
            resolve(&read_source(&filename)?)?;
        }

        Commands::Evaluate { filename } => {
            info!("Running Evaluate subcommand");
            evaluate(&read_source(&filename)?)?;
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");
            let source = read_source(&filename)?;

            if let Err(err) = Lox::new().run(&source) {
                fail(err);
            }

            info!("Program executed successfully");
        }

        Commands::Repl => {
            info!("Running Repl subcommand");
            repl()?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger(&args.log_file)?;
    } else {
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    // Deep Lox recursion needs more stack than the main thread has.
    let commands = args.commands;
    run_on_large_stack(move || dispatch(commands))
        .context("Failed to run the interpreter thread")?
}
