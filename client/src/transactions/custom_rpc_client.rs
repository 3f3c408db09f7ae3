use std::time::Duration;

use anyhow::{
    bail,
    Context,
};
use bootcamp_interface::state::AccountState;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_instruction::Instruction;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
};

use super::{
    assemble,
    Confirmation,
    NewAccount,
};
use crate::{
    config::{
        rpc_url,
        SendTransactionConfig,
    },
    error::LedgerResult,
    rpc::LedgerRpc,
};

/// Lamports airdropped by [`CustomRpcClient::fund_account`].
pub const DEFAULT_FUND_AMOUNT: u64 = 10_000_000_000;

const AIRDROP_CONFIRM_ATTEMPTS: usize = 10;

/// An RPC connection bundled with the policy every transaction sent through it uses.
pub struct CustomRpcClient {
    pub client: RpcClient,
    pub config: SendTransactionConfig,
}

impl Default for CustomRpcClient {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl CustomRpcClient {
    /// Connects to `url`, or to `RPC_URL`/the local validator when `url` is `None`.
    pub fn new(url: Option<String>, config: Option<SendTransactionConfig>) -> Self {
        let config = config.unwrap_or_default();
        let client = RpcClient::new_with_commitment(rpc_url(url), config.commitment);
        Self { client, config }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    pub async fn send_and_confirm_txn(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> LedgerResult<Confirmation> {
        assemble(instructions.iter().cloned(), signers, Some(payer))?
            .submit(&self.client, &self.config)
            .await
    }

    pub async fn send_single_signer(
        &self,
        signer: &Keypair,
        instructions: impl AsRef<[Instruction]>,
    ) -> LedgerResult<Confirmation> {
        self.send_and_confirm_txn(signer, &[], instructions.as_ref())
            .await
    }

    /// Creates `new_account` and runs `instructions` in the same transaction.
    pub async fn send_with_new_account(
        &self,
        payer: &Keypair,
        new_account: NewAccount<'_>,
        instructions: &[Instruction],
    ) -> LedgerResult<Confirmation> {
        assemble(instructions.iter().cloned(), &[], Some(payer))?
            .create_account(new_account)
            .submit(&self.client, &self.config)
            .await
    }

    /// Airdrops [`DEFAULT_FUND_AMOUNT`] to `address`. Only works against local and dev clusters.
    pub async fn fund_account(&self, address: &Pubkey) -> anyhow::Result<()> {
        let airdrop_signature = self
            .client
            .request_airdrop(address, DEFAULT_FUND_AMOUNT)
            .await
            .context("Failed to request airdrop")?;

        for _ in 0..AIRDROP_CONFIRM_ATTEMPTS {
            if self
                .client
                .confirm_transaction(&airdrop_signature)
                .await
                .context("Couldn't confirm airdrop")?
            {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        bail!("Airdrop {airdrop_signature} to {address} was never confirmed")
    }

    pub async fn fetch_account_data(&self, address: &Pubkey) -> anyhow::Result<Vec<u8>> {
        let account = LedgerRpc::account(&self.client, address, self.config.commitment)
            .await
            .with_context(|| format!("Couldn't fetch account {address}"))?
            .with_context(|| format!("Account {address} doesn't exist"))?;
        Ok(account.data)
    }

    pub async fn fetch_state<T: AccountState>(&self, address: &Pubkey) -> anyhow::Result<T> {
        let data = self.fetch_account_data(address).await?;
        T::unpack(&data).with_context(|| format!("Couldn't decode account {address}"))
    }
}
