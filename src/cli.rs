use crate::env::Environment;
use crate::workspace::SDK_ENV;
use argh::{EarlyExit, FromArgs};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marks the end of gospace options, everything after it goes to the shell.
pub const ARGUMENT_TERMINATOR: &str = "--";

#[derive(FromArgs, Debug)]
/// Shell spawner for go development workspaces.
#[argh(note = "Command line parsing can be terminated using --. All remaining values \
will be passed to the shell command. If no path is specified, the current working \
directory is used.")]
struct Args {
    #[argh(switch, short = 'b')]
    /// overwrite GOPATH instead of extending it
    blank: bool,

    #[argh(switch, short = 'n')]
    /// simulate the shell spawning
    dry: bool,

    #[argh(switch, short = 'v')]
    /// raise the verbosity, may be repeated
    verbose: u8,

    #[argh(option, short = 'g', arg_name = "path")]
    /// include the go installation in the PATH; an empty value uses $GOHOME
    go: Option<String>,

    #[argh(option, short = 's', arg_name = "path")]
    /// run the workspace in a custom shell
    shell: Option<String>,

    #[argh(switch, short = 'V')]
    /// display the application version and exit
    version: bool,

    #[argh(positional, arg_name = "path")]
    /// workspace root followed by additional GOPATH directories
    paths: Vec<String>,
}

/// Everything needed to set up and spawn the workspace shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Directory fragments, not yet resolved.
    pub paths: Vec<String>,
    pub shell: Option<String>,
    /// Arguments after `--`, passed to the shell verbatim.
    pub shell_args: Vec<String>,
    pub go: Option<String>,
    pub blank: bool,
    pub dry: bool,
    pub verbose: u8,
}

impl Invocation {
    /// Go installation to put on the `PATH`, if any.
    ///
    /// An empty `--go` value falls back to `GOHOME`; relative paths are made absolute.
    pub fn toolchain(&self, env: &Environment) -> Option<PathBuf> {
        let sdk = match self.go.as_deref()? {
            "" => env.get_var(SDK_ENV).filter(|value| !value.is_empty())?,
            path => path.to_string(),
        };
        Some(env.absolute(Path::new(&sdk)))
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Usage text, already rendered.
    Help(String),
    Version,
    Launch(Invocation),
}

/// Rejected command line, carrying argh's message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Options whose value may be attached with `=` or left out entirely.
/// A missing value becomes an empty one, which falls back to the environment.
const VALUE_OPTIONS: [(&str, &str); 2] = [("-g", "--go"), ("-s", "--shell")];

/// Rewrite the accepted shorthand forms into tokens argh understands:
/// `--go=PATH` and `-g=PATH` become `--go PATH`, a bare `-g`/`--go` becomes
/// `--go ""` and `-vvv` becomes `-v -v -v`.
fn expand_flags(argv: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(argv.len());
    let mut iter = argv.iter().peekable();

    while let Some(arg) = iter.next() {
        let verbose_run = arg
            .strip_prefix('-')
            .filter(|run| run.len() > 1 && run.chars().all(|c| c == 'v'));
        if let Some(run) = verbose_run {
            out.extend(run.chars().map(|_| "-v".to_string()));
            continue;
        }

        let (name, attached) = match arg.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (arg.as_str(), None),
        };
        let Some((_, long)) = VALUE_OPTIONS
            .iter()
            .find(|(short, long)| name == *short || name == *long)
        else {
            out.push(arg.clone());
            continue;
        };

        let value = match attached {
            Some(value) => value.to_string(),
            None => iter
                .next_if(|next| !next.starts_with('-'))
                .cloned()
                .unwrap_or_default(),
        };
        out.push(long.to_string());
        out.push(value);
    }
    out
}

/// Parse the arguments following the program name.
pub fn parse(program: &str, argv: &[String]) -> Result<Action, UsageError> {
    let (own, passthrough) = match argv.iter().position(|arg| arg == ARGUMENT_TERMINATOR) {
        Some(index) => (&argv[..index], &argv[index + 1..]),
        None => (argv, &argv[argv.len()..]),
    };
    let own = expand_flags(own);
    let own: Vec<&str> = own.iter().map(String::as_str).collect();

    let args = match Args::from_args(&[program], &own) {
        Ok(args) => args,
        Err(EarlyExit {
            output,
            status: Ok(()),
        }) => return Ok(Action::Help(output)),
        Err(EarlyExit {
            output,
            status: Err(()),
        }) => return Err(UsageError(output.trim_end().to_string())),
    };

    if args.version {
        return Ok(Action::Version);
    }

    Ok(Action::Launch(Invocation {
        paths: args.paths,
        shell: args.shell,
        shell_args: passthrough.to_vec(),
        go: args.go,
        blank: args.blank,
        dry: args.dry,
        verbose: args.verbose,
    }))
}
