use gospace::app;
use gospace::cli::{self, Action, Invocation};
use gospace::env::Environment;
use gospace::logging::LogConfig;
use gospace::shell::ExitCode;
use std::path::Path;

/// Exit code for a rejected command line, as argh uses it.
const EXIT_USAGE: ExitCode = 1;
/// Exit code when the shell could not be spawned.
const EXIT_LAUNCH: ExitCode = 4;

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let program = argv
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let rest = argv.get(1..).unwrap_or_default();

    let code = match cli::parse(&program, rest) {
        Ok(Action::Help(text)) => {
            println!("{}", text);
            0
        }
        Ok(Action::Version) => {
            println!("{} {}", program, env!("CARGO_PKG_VERSION"));
            0
        }
        Ok(Action::Launch(invocation)) => launch(&invocation),
        Err(err) => {
            eprintln!("{}", err);
            EXIT_USAGE
        }
    };

    std::process::exit(code);
}

fn launch(invocation: &Invocation) -> ExitCode {
    let env = Environment::new();
    LogConfig::from_env(&env).raise(invocation.verbose).init();
    env.report_skipped();

    let (shell, workspace) = match app::prepare(invocation, &env) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("{}", err);
            return err.exit_code();
        }
    };

    let result = if invocation.dry {
        app::dry_run_report(&shell, &workspace).map(|report| {
            print!("{}", report);
            0
        })
    } else {
        shell.launch(&workspace, &env)
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            EXIT_LAUNCH
        }
    }
}
