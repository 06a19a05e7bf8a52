//! ifwatch - watch interface and address events from rtnetlink.

use std::time::Duration;

use clap::Parser;
use ifwatch::{DumpKind, Event, EventStream};

#[derive(Parser)]
#[command(name = "ifwatch", version, about = "Watch network interface events")]
struct Cli {
    /// Glob patterns interface names must match.
    #[arg(long, default_value = "*")]
    accept: Vec<String>,

    /// Glob patterns that exclude interfaces.
    #[arg(long)]
    reject: Vec<String>,

    /// Drop events missing carrier or address details.
    #[arg(long)]
    strict: bool,

    /// Stop after this many seconds without an event. Runs forever when unset.
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Skip the initial state dump.
    #[arg(long)]
    no_dump: bool,

    /// Watch IPv4 address changes as well as links.
    #[arg(short, long)]
    addresses: bool,

    /// Output JSON, one event per line.
    #[arg(short, long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut stream = EventStream::builder()
        .links(true)
        .addresses(cli.addresses)
        .accept(cli.accept.clone())
        .reject(cli.reject.clone())
        .strict(cli.strict)
        .open()?;

    if !cli.no_dump {
        for event in stream.dump(DumpKind::Links)? {
            print_event(&event, cli.json)?;
        }
        if cli.addresses {
            for event in stream.dump(DumpKind::Addresses)? {
                print_event(&event, cli.json)?;
            }
        }
    }

    let window = cli.timeout.map(Duration::from_secs_f64);
    for event in stream.wait(window) {
        print_event(&event?, cli.json)?;
    }

    Ok(())
}

fn print_event(event: &Event, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::Link(link) => {
            let name = link.name().unwrap_or("?");
            let mtu = link
                .mtu()
                .map(|m| format!(" mtu={m}"))
                .unwrap_or_default();
            let carrier = match link.carrier() {
                Some(c) => c.to_string(),
                None => "unknown".to_string(),
            };
            println!(
                "{name}: attached={} up={} carrier={carrier}{mtu}",
                link.exists,
                link.up(),
            );
        }
        Event::Address(addr) => {
            let name = addr.label().unwrap_or("?");
            match addr.address() {
                Some(ip) => println!(
                    "{name}: address {} {}/{} scope {}",
                    if addr.exists { "added" } else { "removed" },
                    ip,
                    addr.prefix_len,
                    addr.scope_name(),
                ),
                None => println!("{name}: address event with no IPv4 address"),
            }
        }
    }
    Ok(())
}
