//! CLI argument definitions and command implementations.

use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hostgate_identity::{
    DnsIdentityResolver, IdentityError, IdentityResolver, StaticIdentityResolver,
};
use hostgate_rules::{provider, CallerIdentity, HostGate, Kind, RuleSet, RuleStore, Verdict};

/// hostgate CLI.
#[derive(Parser)]
#[command(
    name = "hostgate",
    version,
    about = "Host-based access control for REST APIs",
    propagate_version = true
)]
pub struct Cli {
    /// Log level (trace/debug/info/warn/error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a caller against a rules file.
    Check(CheckArgs),
    /// Load a rules file and report its contents.
    Validate(ValidateArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Application,
    User,
}

impl From<KindArg> for Kind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Application => Kind::Application,
            KindArg::User => Kind::User,
        }
    }
}

#[derive(Args)]
pub struct CheckArgs {
    /// Rules file (YAML)
    #[arg(long)]
    rules: PathBuf,

    /// Authentication surface to check
    #[arg(long, value_enum)]
    kind: KindArg,

    /// Caller source address
    #[arg(long)]
    addr: String,

    /// Hostname supplied by the transport (takes precedence over --resolve)
    #[arg(long)]
    host: Option<String>,

    /// Reverse-resolve the address when no --host is given
    #[arg(long)]
    resolve: bool,

    /// Reverse-lookup timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Rules file (YAML)
    #[arg(long)]
    rules: PathBuf,
}

/// Run the CLI. Returns the process exit code.
pub async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Check(args) => check(args).await,
        Commands::Validate(args) => validate(args),
    }
}

async fn check(args: CheckArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let rules = provider::load_rules(&args.rules)?;
    let gate = HostGate::new(Arc::new(RuleStore::new(rules)));

    let resolver: Arc<dyn IdentityResolver> = if args.resolve {
        Arc::new(
            DnsIdentityResolver::from_system_conf()?
                .with_lookup_timeout(Duration::from_secs(args.timeout_secs)),
        )
    } else {
        Arc::new(StaticIdentityResolver::new())
    };

    let caller = match resolver.resolve(&args.addr, args.host.as_deref()).await {
        Ok(identity) => identity,
        Err(IdentityError::Resolution(err)) => {
            // Resolver faults don't block the decision; the check falls
            // back to address rules only.
            warn!(error = %err, "reverse lookup failed; continuing without hostname");
            let address: IpAddr = args.addr.parse()?;
            CallerIdentity::from_address(address)
        }
        Err(err) => return Err(err.into()),
    };

    let verdict = gate.authorize(args.kind.into(), &caller);
    println!("{verdict}");

    Ok(match verdict {
        Verdict::Allow => ExitCode::SUCCESS,
        Verdict::Deny => ExitCode::from(2),
    })
}

fn validate(args: ValidateArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let rules = provider::load_rules(&args.rules)?;
    let set: RuleSet = rules.into_iter().collect();

    for rule in set.iter() {
        println!("{:<12} {}", rule.entry_type().to_string(), rule);
    }

    for kind in [Kind::User, Kind::Application] {
        let allow = set.filter(kind, hostgate_rules::Access::Allow).count();
        let deny = set.filter(kind, hostgate_rules::Access::Deny).count();
        println!("{kind}: {allow} allow, {deny} deny");
    }
    println!("{} rules total", set.len());

    Ok(ExitCode::SUCCESS)
}

/// Initialize the tracing subscriber with the given base level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
