//! Increments an authorized counter through the tracker program, which also counts the
//! increments made by each user.
//!
//! cargo run --example tracker -- [COUNTER] [--keypair <PATH>]

use std::path::PathBuf;

use anyhow::Context;
use bootcamp_interface::{
    instructions::tracker,
    program_ids::{
        AUTHORIZED_COUNTER_ID,
        TRACKER_ID,
    },
    state::{
        counter::{
            AuthorizedCounter,
            Tracker,
        },
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
    pda::{
        find_tracker_address,
        find_tracker_authority_address,
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
    /// An existing authorized counter. A new one is created when omitted.
    counter: Option<Pubkey>,
    /// A JSON keypair file for the user. A fresh keypair is airdropped when omitted.
    #[arg(long)]
    keypair: Option<PathBuf>,
    #[arg(long, default_value = "https://api.devnet.solana.com")]
    url: String,
}

fn read_keypair(path: &PathBuf) -> anyhow::Result<Keypair> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Couldn't read {}", path.display()))?;
    let bytes: Vec<u8> = serde_json::from_str(&contents).context("Malformed keypair file")?;
    Keypair::try_from(bytes.as_slice()).map_err(|e| anyhow::anyhow!("Invalid keypair: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log_info("Tracker Program", TRACKER_ID);
    log_info("Counter Program", AUTHORIZED_COUNTER_ID);

    let user = args.keypair.as_ref().map(read_keypair).transpose()?;
    let e2e = E2e::new(Some(args.url), user).await?;
    let user = e2e.payer();

    let new_counter = Keypair::new();
    let counter = args.counter.unwrap_or_else(|| new_counter.pubkey());
    let (tracker_address, _) = find_tracker_address(&user, &counter)?;
    let (authority, _) = find_tracker_authority_address(&counter)?;

    let mut instructions = vec![];
    if !e2e.exists(&tracker_address).await? {
        log_info("Tracker", "no tracker account found, creating one");
        instructions.push(tracker::initialize(
            &TRACKER_ID,
            &tracker_address,
            &user,
            &authority,
            &counter,
        )?);
    }
    instructions.push(tracker::increment(
        &TRACKER_ID,
        &tracker_address,
        &user,
        &AUTHORIZED_COUNTER_ID,
        &counter,
        &authority,
    )?);

    let new_accounts = match args.counter {
        Some(_) => vec![],
        None => vec![NewAccount {
            keypair: &new_counter,
            space: AuthorizedCounter::LEN,
            owner: AUTHORIZED_COUNTER_ID,
        }],
    };
    let confirmation = e2e.send_creating(new_accounts, &instructions, &[]).await?;
    println!("{}", e2e.explorer_url(&confirmation.signature));

    let global: AuthorizedCounter = e2e.fetch(&counter).await?;
    let tracked: Tracker = e2e.fetch(&tracker_address).await?;
    log_divider();
    log_info("Counter Key", counter);
    log_info("Counter Authority Key", global.authority);
    log_info("Global Count", global.count);
    log_info("User Key", user);
    log_info("User Count", tracked.count);

    Ok(())
}
