//! Walks the framework token program through its lifecycle: a mint owned by the payer, two token
//! accounts, then a mint, a transfer and a burn.
//!
//! cargo run --example framework_token

use bootcamp_interface::{
    instructions::framework_token,
    program_ids::FRAMEWORK_TOKEN_ID,
    state::token::{
        FrameworkTokenAccount,
        TokenMint,
    },
};
use clap::Parser;
use client::{
    e2e_helpers::E2e,
    logs::{
        log_divider,
        log_info,
        log_success,
    },
    pda::{
        find_framework_mint_address,
        find_framework_token_account_address,
    },
};
use solana_sdk::{
    signature::Keypair,
    signer::Signer,
};
use solana_system_interface::instruction::transfer;

const RECIPIENT_FUNDING: u64 = 10_000_000;

#[derive(Parser)]
struct Args {
    #[arg(long, default_value_t = 100)]
    mint_amount: u64,
    #[arg(long, default_value_t = 40)]
    transfer_amount: u64,
    #[arg(long, default_value_t = 10)]
    burn_amount: u64,
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let e2e = E2e::new(args.url, None).await?;
    let payer = e2e.payer();
    let recipient = Keypair::new();

    let (mint, _) = find_framework_mint_address(&payer)?;
    let (payer_account, _) = find_framework_token_account_address(&payer, &mint)?;
    let (recipient_account, _) =
        find_framework_token_account_address(&recipient.pubkey(), &mint)?;
    log_info("Mint", mint);

    let mut setup = vec![];
    if !e2e.exists(&mint).await? {
        setup.push(framework_token::initialize_mint(&FRAMEWORK_TOKEN_ID, &mint, &payer)?);
    }
    if !e2e.exists(&payer_account).await? {
        setup.push(framework_token::initialize_token_account(
            &FRAMEWORK_TOKEN_ID,
            &payer_account,
            &mint,
            &payer,
        )?);
    }
    setup.push(transfer(&payer, &recipient.pubkey(), RECIPIENT_FUNDING));
    setup.push(framework_token::initialize_token_account(
        &FRAMEWORK_TOKEN_ID,
        &recipient_account,
        &mint,
        &recipient.pubkey(),
    )?);
    let confirmation = e2e.send(&setup, &[&recipient]).await?;
    log_success("Setup", e2e.explorer_url(&confirmation.signature));

    let movements = [
        framework_token::mint(
            &FRAMEWORK_TOKEN_ID,
            &mint,
            &payer_account,
            &payer,
            args.mint_amount,
        )?,
        framework_token::transfer(
            &FRAMEWORK_TOKEN_ID,
            &payer_account,
            &recipient_account,
            &payer,
            args.transfer_amount,
        )?,
        framework_token::burn(
            &FRAMEWORK_TOKEN_ID,
            &mint,
            &recipient_account,
            &recipient.pubkey(),
            args.burn_amount,
        )?,
    ];
    let confirmation = e2e.send(&movements, &[&recipient]).await?;
    log_success("Mint, transfer, burn", e2e.explorer_url(&confirmation.signature));

    let mint_state: TokenMint = e2e.fetch(&mint).await?;
    let payer_state: FrameworkTokenAccount = e2e.fetch(&payer_account).await?;
    let recipient_state: FrameworkTokenAccount = e2e.fetch(&recipient_account).await?;
    log_divider();
    log_info("Mint Authority", mint_state.authority);
    log_info("Supply", mint_state.supply);
    log_info("Payer Balance", payer_state.amount);
    log_info("Recipient Balance", recipient_state.amount);

    Ok(())
}
