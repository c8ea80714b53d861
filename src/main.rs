use clap::Parser;
use smallsh::cli::ShellArgs;
use smallsh::repl::{BufReadSource, LineSource, ReadlineSource};
use smallsh::session::Session;
use smallsh::{run_shell, signals};
use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal};
use std::process;
use tracing::warn;

fn main() {
    let args = ShellArgs::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    if let Err(e) = signals::install_shell_handlers() {
        warn!(error = %e, "could not install signal handlers");
    }

    let mut config = args.config();

    // Prompts only make sense when someone is typing or piping lines in
    let mut source: Box<dyn LineSource> = if let Some(command) = args.command {
        config.prompt.clear();
        Box::new(BufReadSource::new(Cursor::new(command)))
    } else if let Some(path) = args.script {
        config.prompt.clear();
        match File::open(&path) {
            Ok(file) => Box::new(BufReadSource::new(BufReader::new(file))),
            Err(e) => {
                eprintln!("smallsh: {}: {}", path.display(), e);
                process::exit(1);
            }
        }
    } else if io::stdin().is_terminal() {
        match ReadlineSource::new() {
            Ok(source) => Box::new(source),
            Err(e) => {
                warn!(error = %e, "falling back to plain stdin");
                Box::new(BufReadSource::new(io::stdin().lock()))
            }
        }
    } else {
        Box::new(BufReadSource::new(io::stdin().lock()))
    };

    let mut session = Session::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run_shell(source.as_mut(), &mut session, &mut out) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("smallsh: {}", e);
            process::exit(1);
        }
    }
}
