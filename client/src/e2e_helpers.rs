//! Shared setup for the demos that run against a live validator.

use anyhow::Context;
use bootcamp_interface::state::AccountState;
use solana_instruction::Instruction;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
    },
    signer::Signer,
};

use crate::{
    logs::log_info,
    rpc::LedgerRpc,
    transactions::{
        assemble,
        Confirmation,
        CustomRpcClient,
        NewAccount,
    },
};

/// Payers below this balance are topped up with an airdrop.
pub const MIN_PAYER_BALANCE: u64 = 100_000_000;

pub struct E2e {
    pub rpc: CustomRpcClient,
    pub payer: Keypair,
}

impl E2e {
    /// Connects and makes sure `payer`, or a fresh keypair, can pay for transactions.
    pub async fn new(url: Option<String>, payer: Option<Keypair>) -> anyhow::Result<Self> {
        let rpc = CustomRpcClient::new(url, None);
        let payer = payer.unwrap_or_else(Keypair::new);

        let balance = rpc
            .client
            .get_balance(&payer.pubkey())
            .await
            .context("Couldn't retrieve the payer balance")?;
        if balance < MIN_PAYER_BALANCE {
            log_info("Airdrop", format!("funding {}", payer.pubkey()));
            rpc.fund_account(&payer.pubkey()).await?;
        }

        Ok(Self { rpc, payer })
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Sends `instructions` paid for by the payer, with `signers` as extra authorizers.
    pub async fn send(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> anyhow::Result<Confirmation> {
        self.rpc
            .send_and_confirm_txn(&self.payer, signers, instructions)
            .await
            .context("Transaction failed")
    }

    /// Like [`E2e::send`], creating `new_accounts` first.
    pub async fn send_creating(
        &self,
        new_accounts: Vec<NewAccount<'_>>,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> anyhow::Result<Confirmation> {
        new_accounts
            .into_iter()
            .fold(
                assemble(instructions.iter().cloned(), signers, Some(&self.payer))?,
                |pending, new_account| pending.create_account(new_account),
            )
            .submit(&self.rpc.client, &self.rpc.config)
            .await
            .context("Transaction failed")
    }

    pub async fn fetch<T: AccountState>(&self, address: &Pubkey) -> anyhow::Result<T> {
        self.rpc.fetch_state(address).await
    }

    pub async fn exists(&self, address: &Pubkey) -> anyhow::Result<bool> {
        let account = LedgerRpc::account(&self.rpc.client, address, self.rpc.config.commitment)
            .await
            .with_context(|| format!("Couldn't fetch account {address}"))?;
        Ok(account.is_some())
    }

    pub fn explorer_url(&self, signature: &Signature) -> String {
        explorer_url(signature, &self.rpc.url())
    }
}

/// A block explorer link for `signature` on the cluster behind `rpc_url`.
pub fn explorer_url(signature: &Signature, rpc_url: &str) -> String {
    let cluster = match rpc_url {
        url if url.contains("devnet") => "devnet".to_string(),
        url if url.contains("testnet") => "testnet".to_string(),
        url if url.contains("mainnet") => {
            return format!("https://explorer.solana.com/tx/{signature}");
        }
        url => format!("custom&customUrl={url}"),
    };
    format!("https://explorer.solana.com/tx/{signature}?cluster={cluster}")
}
