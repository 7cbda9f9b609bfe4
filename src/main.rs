use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

use mollie::api::HttpClient;
use mollie::cli::commands::{completions, methods, payments, resource};
use mollie::cli::{Cli, Commands, GlobalOpts, OutputFormat};
use mollie::core::{logging, CliError, Config, Credential};

fn main() -> ExitCode {
    // Reset SIGPIPE to default behavior (terminate silently) so piping to
    // `head` does not fail with a broken pipe error.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    let hook = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }));
    if let Err(e) = hook {
        eprintln!("warning: {e}");
    }

    let cli = Cli::parse();
    let global = cli.global;
    logging::init(global.verbose, global.quiet);

    let config = Config::load();
    let format = OutputFormat::resolve(global.format, config.default_format.as_deref());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run(cli.command, &global, &config, format, &mut out).and_then(|()| {
        out.flush()?;
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            report(err, global.verbose);
            ExitCode::from(code)
        }
    }
}

fn run(
    command: Commands,
    global: &GlobalOpts,
    config: &Config,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Commands::Payments(cmd) => payments::run(cmd, &connect(global, config)?, format, out),
        Commands::Methods(cmd) => methods::run(cmd, &connect(global, config)?, format, out),
        Commands::List(args) => resource::run_list(args, &connect(global, config)?, format, out),
        Commands::Get(args) => resource::run_get(args, &connect(global, config)?, format, out),
        Commands::Completions(args) => completions::run(args, out),
    }
}

/// Build the API client from flags (or env), falling back to the config file
fn connect(global: &GlobalOpts, config: &Config) -> Result<HttpClient, CliError> {
    let key = global.key.as_deref().or(config.api_key.as_deref());
    let testmode = global.testmode || config.testmode.unwrap_or(false);
    let credential = Credential::resolve(key, testmode)?;
    log::debug!("using {credential:?}");

    let base_url = match &global.api_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => config.api_url(),
    };
    Ok(HttpClient::new(base_url, credential))
}

/// One line on stderr, or the full diagnostic with --verbose
fn report(err: CliError, verbose: bool) {
    if verbose {
        eprintln!("{:?}", miette::Report::new(err));
    } else {
        eprintln!("{} {}", console::style("error:").for_stderr().red().bold(), err);
    }
}
