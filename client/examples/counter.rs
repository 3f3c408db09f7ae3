//! Increments a plain counter, creating the counter account first when none is given.
//!
//! cargo run --example counter -- <PROGRAM_ID> [COUNTER]

use bootcamp_interface::{
    instructions::authorized_counter::increment_plain,
    state::{
        counter::Counter,
        AccountState,
    },
};
use clap::Parser;
use client::{
    e2e_helpers::E2e,
    logs::{
        log_divider,
        log_info,
    },
    transactions::NewAccount,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
};

#[derive(Parser)]
struct Args {
    /// The deployed counter program.
    program_id: Pubkey,
    /// An existing counter account. A new one is created when omitted.
    counter: Option<Pubkey>,
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let e2e = E2e::new(args.url, None).await?;
    log_info("Program", args.program_id);

    let new_counter = Keypair::new();
    let confirmation = match args.counter {
        Some(counter) => {
            log_info("Counter", "found counter address");
            let increment = increment_plain(&args.program_id, &counter)?;
            e2e.send(&[increment], &[]).await?
        }
        None => {
            log_info("Counter", "generating new counter address");
            let increment = increment_plain(&args.program_id, &new_counter.pubkey())?;
            let create = NewAccount {
                keypair: &new_counter,
                space: Counter::LEN,
                owner: args.program_id,
            };
            e2e.rpc
                .send_with_new_account(&e2e.payer, create, &[increment])
                .await?
        }
    };
    let counter = args.counter.unwrap_or_else(|| new_counter.pubkey());

    log_divider();
    println!("{}", e2e.explorer_url(&confirmation.signature));
    let state: Counter = e2e.fetch(&counter).await?;
    log_info("Counter Key", counter);
    log_info("Count", state.count);

    Ok(())
}
