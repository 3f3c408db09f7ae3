//! The network boundary the transaction assembler talks through.

use solana_account::Account;
use solana_client::{
    client_error::Result as ClientResult,
    nonblocking::rpc_client::RpcClient,
    rpc_config::{
        RpcSendTransactionConfig,
        RpcTransactionConfig,
    },
};
use solana_commitment_config::{
    CommitmentConfig,
    CommitmentLevel,
};
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use solana_transaction_error::TransactionError;
use solana_transaction_status::{
    TransactionConfirmationStatus,
    UiTransactionEncoding,
};

/// What the cluster currently knows about a submitted signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureStatus {
    pub slot: u64,
    pub err: Option<TransactionError>,
    pub confirmation_status: Option<TransactionConfirmationStatus>,
}

impl SignatureStatus {
    /// Whether the status has reached `commitment`. A missing confirmation status is treated as
    /// rooted, matching nodes that predate the field.
    pub fn satisfies_commitment(&self, commitment: CommitmentConfig) -> bool {
        use TransactionConfirmationStatus::*;

        match (commitment.commitment, &self.confirmation_status) {
            (_, None) => true,
            (CommitmentLevel::Finalized, Some(status)) => *status == Finalized,
            (CommitmentLevel::Confirmed, Some(status)) => *status != Processed,
            (CommitmentLevel::Processed, Some(_)) => true,
        }
    }
}

/// The remote ledger operations submission needs. Every error is a transport or node error;
/// a transaction that executes and fails is reported through [`SignatureStatus::err`].
#[allow(async_fn_in_trait)]
pub trait LedgerRpc {
    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> ClientResult<u64>;

    async fn account(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>>;

    async fn latest_blockhash(&self) -> ClientResult<Hash>;

    async fn send(
        &self,
        transaction: &Transaction,
        config: RpcSendTransactionConfig,
    ) -> ClientResult<Signature>;

    async fn signature_status(&self, signature: &Signature)
        -> ClientResult<Option<SignatureStatus>>;

    /// The program log lines of a landed transaction, if the node still has them.
    async fn transaction_logs(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> ClientResult<Option<Vec<String>>>;
}

impl LedgerRpc for RpcClient {
    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> ClientResult<u64> {
        self.get_minimum_balance_for_rent_exemption(space).await
    }

    async fn account(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>> {
        Ok(self
            .get_account_with_commitment(address, commitment)
            .await?
            .value)
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        self.get_latest_blockhash().await
    }

    async fn send(
        &self,
        transaction: &Transaction,
        config: RpcSendTransactionConfig,
    ) -> ClientResult<Signature> {
        self.send_transaction_with_config(transaction, config).await
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<SignatureStatus>> {
        let statuses = self.get_signature_statuses(&[*signature]).await?.value;
        Ok(statuses
            .into_iter()
            .next()
            .flatten()
            .map(|status| SignatureStatus {
                slot: status.slot,
                err: status.err.map(Into::into),
                confirmation_status: status.confirmation_status,
            }))
    }

    async fn transaction_logs(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> ClientResult<Option<Vec<String>>> {
        let transaction = self
            .get_transaction_with_config(
                signature,
                RpcTransactionConfig {
                    encoding: Some(UiTransactionEncoding::Json),
                    commitment: Some(commitment),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await?;
        Ok(transaction
            .transaction
            .meta
            .and_then(|meta| Option::<Vec<String>>::from(meta.log_messages)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(confirmation_status: Option<TransactionConfirmationStatus>) -> SignatureStatus {
        SignatureStatus {
            slot: 1,
            err: None,
            confirmation_status,
        }
    }

    #[test]
    fn commitment_ladder() {
        use TransactionConfirmationStatus::*;

        let processed = status(Some(Processed));
        let confirmed = status(Some(Confirmed));
        let finalized = status(Some(Finalized));

        assert!(processed.satisfies_commitment(CommitmentConfig::processed()));
        assert!(!processed.satisfies_commitment(CommitmentConfig::confirmed()));
        assert!(confirmed.satisfies_commitment(CommitmentConfig::confirmed()));
        assert!(!confirmed.satisfies_commitment(CommitmentConfig::finalized()));
        assert!(finalized.satisfies_commitment(CommitmentConfig::finalized()));
        assert!(status(None).satisfies_commitment(CommitmentConfig::finalized()));
    }
}
