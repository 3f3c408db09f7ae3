use bootcamp_interface::error::EncodingError;
use solana_client::client_error::ClientError;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Signature,
    signer::SignerError,
};
use solana_transaction_error::TransactionError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("seeds exceed the per-seed length or seed count limit")]
    InvalidSeeds,
    #[error("no bump in 255..=0 yields an off-curve address")]
    NoValidBumpFound,
    #[error("no fee payer and no authorizers were supplied")]
    MissingFeePayer,
    #[error("missing keypair for required signer {0}")]
    MissingAuthorizer(Pubkey),
    #[error("signing failed: {0}")]
    Signing(#[from] SignerError),
    #[error("network error: {0}")]
    Network(Box<ClientError>),
    #[error("transaction {signature} rejected: {reason}")]
    RemoteRejection {
        signature: Signature,
        reason: TransactionError,
        /// The program log lines reported by the cluster, verbatim.
        logs: Vec<String>,
    },
    /// The node stopped answering after accepting the transaction. Its outcome is unknown; query
    /// it again with [`crate::transactions::settlement`].
    #[error("lost contact while settling transaction {signature}: {source}")]
    Unsettled {
        signature: Signature,
        source: Box<ClientError>,
    },
    /// The deadline passed before the transaction reached the requested commitment. It may still
    /// land; query it again with [`crate::transactions::settlement`].
    #[error("transaction {signature} was not confirmed before the deadline")]
    ConfirmationTimeout { signature: Signature },
}

impl From<ClientError> for LedgerError {
    fn from(error: ClientError) -> Self {
        Self::Network(Box::new(error))
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
