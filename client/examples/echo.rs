//! Writes text into an echo buffer and reads it back.
//!
//! cargo run --example echo -- <PROGRAM_ID> "hello"
//! cargo run --example echo -- <PROGRAM_ID> "hello" --authorized --buffer-seed 3

use bootcamp_interface::{
    instructions::echo,
    state::{
        echo::{
            split_echo_buffer,
            EchoBufferHeader,
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
    pda::find_authorized_buffer_address,
    single_signer_instruction::SingleSignerInstruction,
    transactions::NewAccount,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
};

#[derive(Parser)]
struct Args {
    program_id: Pubkey,
    text: String,
    /// Write through an authority-owned buffer instead of a throwaway one.
    #[arg(long)]
    authorized: bool,
    #[arg(long, default_value_t = 0)]
    buffer_seed: u64,
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let e2e = E2e::new(args.url, None).await?;
    let data = args.text.into_bytes();

    let (buffer, confirmation) = if args.authorized {
        let authority = e2e.payer();
        let (buffer, bump) =
            find_authorized_buffer_address(&args.program_id, &authority, args.buffer_seed)?;
        log_info("Authorized Buffer", format!("{buffer} (bump {bump})"));

        if !e2e.exists(&buffer).await? {
            let initialize = echo::initialize_authorized_echo(
                &args.program_id,
                &buffer,
                &authority,
                args.buffer_seed,
                (EchoBufferHeader::LEN + data.len()) as u64,
            )?;
            e2e.send(&[initialize], &[]).await?;
        }
        let write = echo::authorized_echo(&args.program_id, &buffer, &authority, data)?;
        let confirmation = SingleSignerInstruction::try_from(write)?
            .send_single_signer(&e2e.rpc, &e2e.payer)
            .await?;
        (buffer, confirmation)
    } else {
        let keypair = Keypair::new();
        let create = NewAccount {
            keypair: &keypair,
            space: data.len(),
            owner: args.program_id,
        };
        let instruction = echo::echo(&args.program_id, &keypair.pubkey(), data)?;
        let confirmation = e2e.send_creating(vec![create], &[instruction], &[]).await?;
        (keypair.pubkey(), confirmation)
    };

    log_divider();
    println!("{}", e2e.explorer_url(&confirmation.signature));
    let stored = e2e.rpc.fetch_account_data(&buffer).await?;
    let text = match args.authorized {
        true => split_echo_buffer(&stored)?.1,
        false => &stored[..],
    };
    log_info("Buffer", buffer);
    log_info("Echoed", String::from_utf8_lossy(text));

    Ok(())
}
