mod cli;
#[cfg(unix)]
mod exec;

pub use cli::BtrfsCommand;
pub use cli::Cli;
pub use cli::RootCommand;
pub use cli::SubvolumeCommand;

#[cfg(unix)]
pub fn run_main() -> anyhow::Result<()> {
    use std::path::Path;

    use clap::Parser;
    use subguard_core::Authorization;
    use subguard_core::DEFAULT_CONFIG_PATH;
    use subguard_core::GuardConfig;
    use subguard_core::InvokingUser;
    use tracing::debug;

    init_logging();

    // Refuse before the CLI surface runs at all: without sudo context
    // there is no identity to authorize, not even for --help.
    let user = InvokingUser::from_sudo_env()?;

    let cli = Cli::parse();

    let config = GuardConfig::load(Path::new(DEFAULT_CONFIG_PATH))?;
    let authorization = Authorization::new(&config, user)?;

    let argv = cli.command.into_guarded().validated_argv(&authorization)?;
    debug!(?argv, "handing off to the privileged command");
    match exec::replace_process(&argv)? {}
}

#[cfg(not(unix))]
pub fn run_main() -> anyhow::Result<()> {
    eprintln!("error: subguard is only supported on Unix systems");
    std::process::exit(1);
}

#[cfg(unix)]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    // Fall back to `default_level` if RUST_LOG is unset or invalid.
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
