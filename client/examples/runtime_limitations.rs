//! Pushes the runtime limitations program against its compute, stack, CPI and buffer limits.
//!
//! cargo run --example runtime_limitations -- <PROGRAM_ID> stack
//! cargo run --example runtime_limitations -- <PROGRAM_ID> runtime --max-iter 1000

use bootcamp_interface::instructions::runtime_limitations::{
    self,
    MARKETPLACE_SIZE,
};
use clap::{
    Parser,
    Subcommand,
};
use client::{
    e2e_helpers::E2e,
    logs::{
        log_divider,
        log_info,
    },
    transactions::NewAccount,
};
use rand::{
    distributions::Alphanumeric,
    Rng,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
};

#[derive(Parser)]
struct Args {
    program_id: Pubkey,
    #[command(subcommand)]
    command: Command,
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Copies the marketplace onto the stack.
    Stack,
    /// Spins for `max_iter` iterations.
    Runtime {
        #[arg(long, default_value_t = 1_000)]
        max_iter: u64,
    },
    /// Creates an account of `size` bytes through the system program.
    Cpi {
        #[arg(long, default_value_t = 1_024)]
        size: u64,
    },
    /// Reads the marketplace in place.
    ZeroCopy,
    /// Echoes `size` random printable bytes into a fresh buffer.
    Echo {
        #[arg(long, default_value_t = 64)]
        size: usize,
    },
}

fn marketplace(keypair: &Keypair, program_id: Pubkey) -> NewAccount<'_> {
    NewAccount {
        keypair,
        space: MARKETPLACE_SIZE,
        owner: program_id,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let e2e = E2e::new(args.url, None).await?;
    let program_id = args.program_id;
    let user = e2e.payer();
    let new_account = Keypair::new();

    let confirmation = match args.command {
        Command::Stack => {
            let instruction =
                runtime_limitations::stack(&program_id, &new_account.pubkey(), &user)?;
            e2e.send_creating(vec![marketplace(&new_account, program_id)], &[instruction], &[])
                .await?
        }
        Command::ZeroCopy => {
            let instruction =
                runtime_limitations::zero_copy(&program_id, &new_account.pubkey(), &user)?;
            e2e.send_creating(vec![marketplace(&new_account, program_id)], &[instruction], &[])
                .await?
        }
        Command::Runtime { max_iter } => {
            let instruction = runtime_limitations::runtime(&program_id, max_iter)?;
            e2e.send(&[instruction], &[]).await?
        }
        Command::Cpi { size } => {
            log_info("New Account", new_account.pubkey());
            let instruction =
                runtime_limitations::cpi(&program_id, &user, &new_account.pubkey(), size)?;
            e2e.send(&[instruction], &[&new_account]).await?
        }
        Command::Echo { size } => {
            let data: Vec<u8> = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(size)
                .collect();
            log_info("Echo", String::from_utf8_lossy(&data));
            let instruction =
                runtime_limitations::echo(&program_id, &new_account.pubkey(), data)?;
            let create = NewAccount {
                keypair: &new_account,
                space: size,
                owner: program_id,
            };
            e2e.send_creating(vec![create], &[instruction], &[]).await?
        }
    };

    log_divider();
    println!("{}", e2e.explorer_url(&confirmation.signature));
    Ok(())
}
