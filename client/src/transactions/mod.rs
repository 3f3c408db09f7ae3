//! Assembling, signing, submitting and confirming transactions.

use itertools::Itertools;
use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
        Result as ClientResult,
    },
    rpc_request::{
        RpcError::RpcResponseError,
        RpcResponseErrorData,
    },
    rpc_response::RpcSimulateTransactionResult,
};
use solana_commitment_config::{
    CommitmentConfig,
    CommitmentLevel,
};
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_instruction::Instruction;
use solana_sdk::{
    message::Message,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};
use solana_system_interface::instruction::create_account;
use solana_transaction_error::TransactionError;
use tokio::time::{
    sleep,
    Instant,
};

use crate::{
    config::SendTransactionConfig,
    error::{
        LedgerError,
        LedgerResult,
    },
    logs::{
        log_error,
        log_info,
        log_program_logs,
        log_success,
        log_warning,
    },
    rpc::{
        LedgerRpc,
        SignatureStatus,
    },
};

mod custom_rpc_client;
mod state;

pub use custom_rpc_client::*;
pub use state::*;

/// An account to create with a system `create_account` ahead of the transaction's operations.
/// It is funded with exactly the rent-exempt minimum for `space` bytes.
pub struct NewAccount<'a> {
    pub keypair: &'a Keypair,
    pub space: usize,
    pub owner: Pubkey,
}

/// Operations and keypairs gathered for one transaction, not yet signed or sent.
pub struct PendingTransaction<'a> {
    fee_payer: &'a Keypair,
    authorizers: Vec<&'a Keypair>,
    new_accounts: Vec<NewAccount<'a>>,
    operations: Vec<Instruction>,
}

/// Collects `operations` into a pending transaction. The fee payer defaults to the first
/// authorizer.
pub fn assemble<'a>(
    operations: impl IntoIterator<Item = Instruction>,
    authorizers: &[&'a Keypair],
    fee_payer: Option<&'a Keypair>,
) -> LedgerResult<PendingTransaction<'a>> {
    let fee_payer = fee_payer
        .or_else(|| authorizers.first().copied())
        .ok_or(LedgerError::MissingFeePayer)?;

    Ok(PendingTransaction {
        fee_payer,
        authorizers: authorizers.to_vec(),
        new_accounts: vec![],
        operations: operations.into_iter().collect(),
    })
}

impl<'a> PendingTransaction<'a> {
    pub fn create_account(mut self, new_account: NewAccount<'a>) -> Self {
        self.new_accounts.push(new_account);
        self
    }

    pub fn fee_payer(&self) -> Pubkey {
        self.fee_payer.pubkey()
    }

    pub fn operations(&self) -> &[Instruction] {
        &self.operations
    }

    /// Builds and signs the transaction: account creations first, then compute budget
    /// instructions, then the operations in the order they were given.
    pub async fn build(
        &self,
        rpc: &impl LedgerRpc,
        config: &SendTransactionConfig,
    ) -> LedgerResult<Transaction> {
        let payer = self.fee_payer.pubkey();
        let mut instructions = Vec::with_capacity(self.new_accounts.len() + self.operations.len());

        for NewAccount {
            keypair,
            space,
            owner,
        } in &self.new_accounts
        {
            let address = keypair.pubkey();
            if rpc.account(&address, config.commitment).await?.is_some() {
                if config.debug_logs() {
                    log_info("Account exists", address);
                }
                continue;
            }
            let lamports = rpc.minimum_balance_for_rent_exemption(*space).await?;
            instructions.push(create_account(
                &payer,
                &address,
                lamports,
                *space as u64,
                owner,
            ));
        }

        if let Some(budget) = config.compute_budget {
            instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(budget));
            instructions.push(ComputeBudgetInstruction::set_compute_unit_price(1));
        }
        instructions.extend(self.operations.iter().cloned());

        let message = Message::new(&instructions, Some(&payer));
        let signers = self.required_signers(&message)?;
        let blockhash = rpc.latest_blockhash().await?;

        let mut transaction = Transaction::new_unsigned(message);
        transaction.try_sign(&signers, blockhash)?;
        Ok(transaction)
    }

    /// Picks, for every signer the message requires, the supplied keypair with that address.
    fn required_signers(&self, message: &Message) -> LedgerResult<Vec<&'a Keypair>> {
        let supplied = std::iter::once(self.fee_payer)
            .chain(self.authorizers.iter().copied())
            .chain(self.new_accounts.iter().map(|account| account.keypair))
            .unique_by(|keypair| keypair.pubkey())
            .collect_vec();

        let num_signers = message.header.num_required_signatures as usize;
        message.account_keys[..num_signers]
            .iter()
            .map(|key| {
                supplied
                    .iter()
                    .find(|keypair| keypair.pubkey() == *key)
                    .copied()
                    .ok_or(LedgerError::MissingAuthorizer(*key))
            })
            .collect()
    }

    /// Sends the transaction once and polls until it reaches `config.commitment`, is rejected,
    /// or `config.timeout` elapses. Once the node has accepted the transaction, every error
    /// carries its signature.
    pub async fn submit(
        &self,
        rpc: &impl LedgerRpc,
        config: &SendTransactionConfig,
    ) -> LedgerResult<Confirmation> {
        let transaction = self.build(rpc, config).await?;
        let signature = transaction.signatures[0];

        let mut state = TransactionState::Unsubmitted;
        match rpc.send(&transaction, config.rpc_send_config()).await {
            Ok(sent) => {
                state = state.apply(SettlementEvent::Sent { signature: sent });
                if config.debug_logs() {
                    log_info("Submitted", sent);
                }
            }
            Err(error) => match preflight_rejection(&error) {
                Some((reason, logs)) => {
                    state = state
                        .apply(SettlementEvent::Sent { signature })
                        .apply(SettlementEvent::Failed { reason, logs });
                }
                None => return Err(error.into()),
            },
        }

        let deadline = Instant::now() + config.timeout;
        loop {
            state = match state.into_outcome() {
                Ok(outcome) => {
                    if config.debug_logs() {
                        log_outcome(&outcome, &transaction);
                    }
                    return outcome;
                }
                Err(pending) => pending,
            };

            let polled = poll(rpc, &signature, config).await.map_err(|source| {
                if config.debug_logs() {
                    log_warning("Unsettled", format!("{signature}: {source}"));
                }
                LedgerError::Unsettled {
                    signature,
                    source: Box::new(source),
                }
            })?;
            match polled {
                Some(event) => state = state.apply(event),
                None if Instant::now() >= deadline => {
                    state = state.apply(SettlementEvent::DeadlinePassed)
                }
                None => sleep(config.poll_interval).await,
            }
        }
    }
}

/// The commitment at which a failed transaction's logs can be fetched.
fn log_commitment(commitment: CommitmentConfig) -> CommitmentConfig {
    match commitment.commitment {
        CommitmentLevel::Processed => CommitmentConfig::confirmed(),
        _ => commitment,
    }
}

async fn poll(
    rpc: &impl LedgerRpc,
    signature: &Signature,
    config: &SendTransactionConfig,
) -> ClientResult<Option<SettlementEvent>> {
    let failed_commitment = log_commitment(config.commitment);
    let event = match rpc.signature_status(signature).await? {
        Some(status) if status.err.is_some() => {
            if !status.satisfies_commitment(failed_commitment) {
                return Ok(None);
            }
            let logs = match rpc.transaction_logs(signature, failed_commitment).await {
                Ok(logs) => logs.unwrap_or_default(),
                Err(error) => {
                    log_warning("Couldn't fetch logs", error);
                    vec![]
                }
            };
            status
                .err
                .map(|reason| SettlementEvent::Failed { reason, logs })
        }
        Some(status) if status.satisfies_commitment(config.commitment) => {
            Some(SettlementEvent::Landed { slot: status.slot })
        }
        _ => None,
    };
    Ok(event)
}

/// Extracts the simulated error and program logs from a node's preflight rejection.
fn preflight_rejection(error: &ClientError) -> Option<(TransactionError, Vec<String>)> {
    match error.kind() {
        ClientErrorKind::RpcError(RpcResponseError {
            data:
                RpcResponseErrorData::SendTransactionPreflightFailure(RpcSimulateTransactionResult {
                    err: Some(ui_err),
                    logs,
                    ..
                }),
            ..
        }) => Some((ui_err.clone().into(), logs.clone().unwrap_or_default())),
        _ => None,
    }
}

fn log_outcome(outcome: &LedgerResult<Confirmation>, transaction: &Transaction) {
    match outcome {
        Ok(Confirmation { signature, slot }) => {
            log_success("Confirmed", format!("{signature} (slot {slot})"));
        }
        Err(LedgerError::RemoteRejection {
            signature,
            reason,
            logs,
        }) => {
            log_error("Rejected", signature);
            if let TransactionError::InstructionError(index, error) = reason {
                let label = format!("Instruction {index}");
                let program = transaction
                    .message
                    .instructions
                    .get(*index as usize)
                    .and_then(|ix| {
                        let keys = &transaction.message.account_keys;
                        keys.get(ix.program_id_index as usize)
                    });
                match program {
                    Some(program) => log_error(label, format!("{program}: {error}")),
                    None => log_error(label, error),
                }
            } else {
                log_error("Reason", reason);
            }
            log_program_logs(logs);
        }
        Err(LedgerError::ConfirmationTimeout { signature }) => {
            log_warning("Unconfirmed", format!("{signature} (outcome unknown)"));
        }
        Err(error) => log_error("Failed", error),
    }
}

/// Where a previously submitted transaction stands on the ledger right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    Landed { slot: u64 },
    Failed { slot: u64, reason: TransactionError },
    /// The node has no record of the signature.
    Absent,
}

/// Queries a signature's status once, e.g. after a [`LedgerError::ConfirmationTimeout`].
pub async fn settlement(rpc: &impl LedgerRpc, signature: &Signature) -> LedgerResult<Settlement> {
    Ok(match rpc.signature_status(signature).await? {
        Some(SignatureStatus {
            slot,
            err: Some(reason),
            ..
        }) => Settlement::Failed { slot, reason },
        Some(SignatureStatus { slot, .. }) => Settlement::Landed { slot },
        None => Settlement::Absent,
    })
}
