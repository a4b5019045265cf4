//! vconfig command - legacy VLAN configuration on top of rtnetlink.

mod dry_run;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use vlink::{
    Command, DEFAULT_STATE_FILE, Dispatcher, FileStore, IpCommand, LinkExecutor, MemoryStore,
    NameStyle, NameStyleStore, NetlinkExecutor,
};

use crate::dry_run::DryRun;

#[derive(Parser)]
#[command(
    name = "vconfig",
    version,
    about = "Legacy VLAN configuration tool",
    after_help = "Run without arguments to list the commands."
)]
struct Cli {
    /// How link operations are applied.
    #[arg(long, value_enum, env = "VCONFIG_BACKEND", default_value_t = Backend::Netlink)]
    backend: Backend,

    /// Where the current name-type is kept.
    #[arg(long, env = "VCONFIG_NAME_TYPE_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    /// ip(8) binary used by the ip backend and in dry-run output.
    #[arg(long, env = "VCONFIG_IP", default_value = vlink::executor::IP_CMD)]
    ip: PathBuf,

    /// Print the equivalent ip(8) command instead of changing anything.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Command and its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    args: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// rtnetlink requests.
    Netlink,
    /// ip(8) subprocesses.
    Ip,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.args.is_empty() {
        print!("{}", vlink::USAGE);
        std::process::exit(2);
    }

    if let Err(e) = run(cli).await {
        // Library errors already name their cause; setup errors need the chain.
        match e.downcast_ref::<vlink::Error>() {
            Some(err) => eprintln!("vconfig: {}", err),
            None => eprintln!("vconfig: {:#}", e),
        }
        std::process::exit(exit_code(&e));
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG, when set, takes precedence over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Library errors map to their own status; setup failures exit 1.
fn exit_code(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<vlink::Error>()
        .map_or(1, vlink::Error::exit_code)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = Command::parse(&cli.args)?;
    let store = FileStore::new(&cli.state_file);
    let name_style = store.load();

    // Every argument error is reported before privileges or sockets.
    command.validate(name_style)?;

    if cli.dry_run {
        // Nothing is persisted either.
        let store = MemoryStore::new(name_style);
        return execute(DryRun::new(&cli.ip), store, name_style, command).await;
    }

    if command.needs_link() && !is_root() {
        return Err(vlink::Error::PermissionDenied.into());
    }

    // set_name_type never reaches an executor, so it needs no socket.
    match cli.backend {
        Backend::Netlink if command.needs_link() => {
            let executor = NetlinkExecutor::new().context("cannot open rtnetlink socket")?;
            execute(executor, store, name_style, command).await
        }
        _ => execute(IpCommand::new(&cli.ip), store, name_style, command).await,
    }
}

async fn execute<E, S>(
    executor: E,
    store: S,
    name_style: NameStyle,
    command: Command,
) -> anyhow::Result<()>
where
    E: LinkExecutor,
    S: NameStyleStore,
{
    let mut dispatcher = Dispatcher::with_name_style(executor, store, name_style);
    let outcome = dispatcher.dispatch(command).await?;
    tracing::info!(?outcome, "ok");
    Ok(())
}

fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
