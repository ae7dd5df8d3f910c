use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use nem_query::aggregator::{Aggregate, AggregationPolicy};
use nem_query::balances::{divisibility_or_raw, fetch_balances};
use nem_query::display::{format_quantity, format_xem_moved, Table};
use nem_query::network::{resolve_network, Address, Network, NodeEndpoint, DEFAULT_PORT};
use nem_query::nis::{NisApi, NisClient};
use nem_query::runtime::AggregationRunner;
use nem_query::time::nem_time_to_utc;
use nem_query::types::{AssetId, Direction, XEM_DIVISIBILITY};

#[derive(Parser)]
#[command(author, version, about = "Query a NEM node from the terminal")]
struct Args {
    /// Network to talk to. Defaults to the network of the given address.
    #[arg(long, global = true, env = "NEM_NETWORK", value_enum)]
    network: Option<Network>,

    /// NIS node host, e.g. `hugealice.nem.ninja` or `https://node.example`.
    #[arg(long, global = true, env = "NEM_NODE")]
    node: Option<String>,

    #[arg(long, global = true)]
    port: Option<u16>,

    /// Per-request timeout in seconds. No timeout when unset.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count an account's transactions
    Count {
        #[arg(long)]
        address: String,

        /// Only count transfers and sum the quantity of this asset (e.g. `nem:xem`).
        #[arg(long)]
        asset: Option<AssetId>,

        #[arg(long, value_enum, default_value_t = Direction::All)]
        direction: Direction,
    },
    /// List the newest page of an account's transactions
    Recent {
        #[arg(long)]
        address: String,
    },
    /// List an account's whole history, newest first
    History {
        #[arg(long)]
        address: String,

        #[arg(long, value_enum, default_value_t = Direction::All)]
        direction: Direction,
    },
    /// Show the mosaic balances of an account
    Balances {
        #[arg(long)]
        address: String,

        /// Only show this mosaic, e.g. `nem:xem`.
        #[arg(long)]
        mosaic: Option<AssetId>,
    },
    /// Show account status, importance and harvesting data
    Overview {
        #[arg(long)]
        address: String,
    },
    /// Show the block at a height
    Block {
        #[arg(long)]
        height: u64,
    },
    /// Show the current chain height
    Height,
    /// Send a raw request to the NIS API
    Api {
        /// Endpoint path, e.g. `/chain/height`.
        #[arg(long)]
        url: String,

        #[arg(long)]
        post: bool,

        /// JSON body.
        #[arg(long)]
        json: Option<String>,
    },
    /// Convert a NEM timestamp to a UTC date
    Time { timestamp: u32 },
}

impl Command {
    fn address(&self) -> Option<&str> {
        match self {
            Command::Count { address, .. }
            | Command::Recent { address }
            | Command::History { address, .. }
            | Command::Balances { address, .. }
            | Command::Overview { address } => Some(address.as_str()),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Command::Time { timestamp } = args.command {
        println!("UTC Time & Date: {}", nem_time_to_utc(timestamp).to_rfc2822());
        return Ok(());
    }

    let address = args
        .command
        .address()
        .map(Address::parse)
        .transpose()
        .context("invalid address")?;

    let network = resolve_network(args.network, address.as_ref());
    let endpoint = node_endpoint(&args, network);
    log::info!(
        "[MAIN] {} (id {}) via {}",
        network,
        network.id(),
        endpoint.base_url()
    );

    let client = NisClient::new(&endpoint, args.timeout.map(Duration::from_secs))?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("[MAIN] interrupted, abandoning run");
                cancel.cancel();
            }
        });
    }

    let addr = address.as_ref().map(Address::as_str).unwrap_or_default();

    match &args.command {
        Command::Count { asset, direction, .. } => {
            let policy = match asset {
                Some(asset) => AggregationPolicy::count_with_amount(asset.clone()),
                None => AggregationPolicy::count(),
            }
            .with_direction(*direction);

            let runner = AggregationRunner::new(client).with_cancellation(cancel);
            let out = runner.run(addr, policy).await?;

            if args.raw {
                return print_json(&out);
            }

            println!("Transactions Count:");
            println!("-----------------------------------");
            println!("Total Count:      {}", out.count);
            if let (Some(asset), Some(total)) = (asset, out.total) {
                let div = divisibility_or_raw(runner.client(), asset).await;
                println!("Total Amount:     {} {}", format_quantity(total, div), asset);
            }
            println!("-----------------------------------");
        }

        Command::Recent { .. } => {
            let runner = AggregationRunner::new(client).with_cancellation(cancel);
            let out = runner.run(addr, AggregationPolicy::recent()).await?;
            print_records("Recent Transactions", &out, args.raw)?;
        }

        Command::History { direction, .. } => {
            let runner = AggregationRunner::new(client).with_cancellation(cancel);
            let policy = AggregationPolicy::sorted_history().with_direction(*direction);
            let out = runner.run(addr, policy).await?;
            print_records("Transactions History", &out, args.raw)?;
        }

        Command::Balances { mosaic, .. } => {
            let balances = fetch_balances(&client, addr, mosaic.as_ref()).await?;

            if args.raw {
                return print_json(&balances);
            }

            println!("Wallet Balances:");
            if balances.is_empty() {
                println!("No Mosaic Balances to display.");
                return Ok(());
            }

            let mut table = Table::new(&["Mosaic", "Balance"]);
            for b in &balances {
                table.add_row([b.asset.to_string(), b.display_quantity()]);
            }
            print!("{}", table.render());
        }

        Command::Overview { .. } => {
            let info = client.fetch_account(addr).await?;

            if args.raw {
                return print_json(&info);
            }

            let acct = &info.account;
            let mut table = Table::new(&["Field", "Value"]);
            table.add_row(["Address".to_string(), acct.address.clone()]);
            table.add_row([
                "Public Key".to_string(),
                acct.public_key.clone().unwrap_or_else(|| "-".into()),
            ]);
            table.add_row(["Status".to_string(), info.meta.status.clone()]);
            table.add_row(["Remote Status".to_string(), info.meta.remote_status.clone()]);
            table.add_row([
                "Balance".to_string(),
                format!("{} XEM", format_quantity(acct.balance, XEM_DIVISIBILITY)),
            ]);
            table.add_row([
                "Vested Balance".to_string(),
                format!("{} XEM", format_quantity(acct.vested_balance, XEM_DIVISIBILITY)),
            ]);
            table.add_row(["Importance".to_string(), format!("{:.6}", acct.importance)]);
            table.add_row(["Harvested Blocks".to_string(), acct.harvested_blocks.to_string()]);
            table.add_row(["Cosignatories".to_string(), info.meta.cosignatories.len().to_string()]);
            table.add_row(["Cosignatory Of".to_string(), info.meta.cosignatory_of.len().to_string()]);
            print!("{}", table.render());
        }

        Command::Block { height } => {
            let block = client.block_at(*height).await?;

            if args.raw {
                return print_json(&block);
            }

            println!("-----------------------------------");
            println!(
                "Block Timestamp:     {} ({})",
                block.time_stamp,
                nem_time_to_utc(block.time_stamp).to_rfc2822()
            );
            println!("Block Signature:     {}", block.signature);
            println!("Block Signer:        {}", block.signer);
            println!(
                "Previous Block Hash: {}",
                block.prev_block_hash.data.as_deref().unwrap_or("N/A")
            );
            println!("Transactions:        {}", block.transaction_count());
            println!("-----------------------------------");
        }

        Command::Height => {
            let height = client.chain_height().await?;
            println!("{}", height);
        }

        Command::Api { url, post, json } => {
            let body = json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .context("--json is not valid JSON")?;

            if body.is_some() && !post {
                bail!("--json requires --post");
            }

            let method = if *post {
                reqwest::Method::POST
            } else {
                reqwest::Method::GET
            };

            let response = client.raw_request(method, url, body).await?;
            print_json(&response)?;
        }

        Command::Time { .. } => unreachable!("handled before connecting"),
    }

    Ok(())
}

fn node_endpoint(args: &Args, network: Network) -> NodeEndpoint {
    match (&args.node, args.port) {
        (Some(host), port) => NodeEndpoint::new(host, port.unwrap_or(DEFAULT_PORT)),
        (None, Some(port)) => NodeEndpoint::new(network.default_node().host(), port),
        (None, None) => network.default_node(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_records(title: &str, out: &Aggregate, raw: bool) -> Result<()> {
    if raw {
        return print_json(out);
    }

    println!("{}: {}", title, out.count);

    let mut table = Table::new(&["ID", "Date", "Amount", "Hash"]);
    for r in &out.records {
        table.add_row([
            r.id.to_string(),
            nem_time_to_utc(r.timestamp).format("%Y-%m-%d %H:%M:%S").to_string(),
            format_xem_moved(r),
            r.hash.clone(),
        ]);
    }

    if !table.is_empty() {
        print!("{}", table.render());
    }

    Ok(())
}
