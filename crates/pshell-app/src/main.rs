//! PShell entry point.
//!
//! Interactive shell over the host filesystem: `files`, `info`, `delete`,
//! `move`, `into`, `out`, `make`, `finish`. Logs go to stderr and are
//! controlled by `RUST_LOG`.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use pshell_terminal::{Environment, Shell};
use pshell_types::config::ShellConfig;
use pshell_vfs::HostVfs;

fn main() -> Result<()> {
    let config = ShellConfig::default();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let cwd = start_dir(cwd)?;
    let mut vfs = HostVfs::new();
    let mut env = Environment::new(cwd, &mut vfs);
    log::info!("Starting PShell in {}", env.cwd);

    let shell = Shell::new(config);
    shell
        .run(&mut env, io::stdin().lock(), io::stdout().lock())
        .context("terminal I/O failed")?;

    log::info!("PShell finished in {}", env.cwd);
    Ok(())
}

/// The starting directory as a shell path. Paths are handled as UTF-8 text,
/// so a directory that cannot be spelled that way is refused.
fn start_dir(path: PathBuf) -> Result<String> {
    path.into_os_string().into_string().map_err(|raw| {
        anyhow!(
            "working directory {} is not valid UTF-8; start pshell from another directory",
            raw.to_string_lossy()
        )
    })
}
