//! An in-memory [`LedgerRpc`] for exercising submission without a cluster.
//!
//! Transactions execute atomically against a local account store: a failed instruction leaves only
//! the fee charged. The system program's `create_account` and `transfer` are interpreted, and
//! every other program succeeds unless a rejection has been registered for it. Unless preflight is
//! skipped, a transaction that would fail is refused at send time with its simulated logs. Status
//! and log queries answer from what was executed.

use std::{
    cell::{
        Cell,
        RefCell,
    },
    collections::HashMap,
};

use bootcamp_interface::program_ids::SYSTEM_PROGRAM_ID;
use solana_account::Account;
use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
        Result as ClientResult,
    },
    rpc_config::RpcSendTransactionConfig,
    rpc_request::{
        RpcError,
        RpcResponseErrorData,
    },
    rpc_response::RpcSimulateTransactionResult,
};
use solana_commitment_config::CommitmentConfig;
use solana_instruction_error::InstructionError;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use solana_system_interface::instruction::SystemInstruction;
use solana_transaction_error::TransactionError;
use solana_transaction_status::TransactionConfirmationStatus;

use crate::rpc::{
    LedgerRpc,
    SignatureStatus,
};

pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;
const LAMPORTS_PER_BYTE_YEAR: u64 = 3_480;
const EXEMPTION_THRESHOLD_YEARS: u64 = 2;

/// The default cluster rent schedule's exemption minimum.
pub fn rent_exempt_minimum(space: usize) -> u64 {
    (ACCOUNT_STORAGE_OVERHEAD + space as u64) * LAMPORTS_PER_BYTE_YEAR * EXEMPTION_THRESHOLD_YEARS
}

struct Rejection {
    code: u32,
    logs: Vec<String>,
}

struct Executed {
    status: SignatureStatus,
    logs: Vec<String>,
}

type ExecutionResult = Result<Vec<String>, (TransactionError, Vec<String>)>;
type AccountStore = HashMap<Pubkey, Account>;

pub struct MockLedger {
    accounts: RefCell<AccountStore>,
    executed: RefCell<HashMap<Signature, Executed>>,
    sent: RefCell<Vec<Transaction>>,
    rejections: RefCell<HashMap<Pubkey, Rejection>>,
    confirmation_status: RefCell<TransactionConfirmationStatus>,
    never_land: Cell<bool>,
    offline: Cell<bool>,
    slot: Cell<u64>,
    blockhashes: Cell<u64>,
    status_queries: Cell<usize>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            accounts: Default::default(),
            executed: Default::default(),
            sent: Default::default(),
            rejections: Default::default(),
            confirmation_status: RefCell::new(TransactionConfirmationStatus::Confirmed),
            never_land: Cell::new(false),
            offline: Cell::new(false),
            slot: Cell::new(1),
            blockhashes: Cell::new(0),
            status_queries: Cell::new(0),
        }
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `address` a system-owned balance of `lamports`.
    pub fn with_lamports(self, address: Pubkey, lamports: u64) -> Self {
        self.accounts
            .borrow_mut()
            .insert(address, Account::new(lamports, 0, &SYSTEM_PROGRAM_ID));
        self
    }

    pub fn with_account(self, address: Pubkey, account: Account) -> Self {
        self.accounts.borrow_mut().insert(address, account);
        self
    }

    /// Makes every instruction for `program_id` fail with `Custom(code)` after emitting `logs`.
    pub fn reject_program(&self, program_id: Pubkey, code: u32, logs: Vec<String>) {
        self.rejections
            .borrow_mut()
            .insert(program_id, Rejection { code, logs });
    }

    /// Accepts transactions but never reports a status for them.
    pub fn never_land(&self) {
        self.never_land.set(true);
    }

    /// The confirmation level reported for executed transactions.
    pub fn report_confirmation_status(&self, status: TransactionConfirmationStatus) {
        *self.confirmation_status.borrow_mut() = status;
    }

    /// Fails every subsequent request with a connection error.
    pub fn go_offline(&self) {
        self.offline.set(true);
    }

    pub fn go_online(&self) {
        self.offline.set(false);
    }

    pub fn account_data(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.borrow().get(address).cloned()
    }

    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.accounts
            .borrow()
            .get(address)
            .map_or(0, |account| account.lamports)
    }

    /// Every transaction handed to [`LedgerRpc::send`], in order.
    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.borrow().clone()
    }

    pub fn status_queries(&self) -> usize {
        self.status_queries.get()
    }

    fn check_online(&self) -> ClientResult<()> {
        match self.offline.get() {
            true => Err(ClientErrorKind::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock ledger is offline",
            ))
            .into()),
            false => Ok(()),
        }
    }

    /// Runs `transaction` against a copy of the account store. Returns the store to commit, which
    /// is `None` when the fee can't be paid. A failed instruction discards every effect except the
    /// fee.
    fn execute(&self, transaction: &Transaction) -> (Option<AccountStore>, ExecutionResult) {
        let message = &transaction.message;
        let mut accounts = self.accounts.borrow().clone();

        let fee = LAMPORTS_PER_SIGNATURE * transaction.signatures.len() as u64;
        let payer = message.account_keys[0];
        if debit(&mut accounts, &payer, fee).is_err() {
            return (None, Err((TransactionError::InsufficientFundsForFee, vec![])));
        }
        let fee_paid = accounts.clone();

        let mut logs = vec![];
        for (index, instruction) in message.instructions.iter().enumerate() {
            let program_id = message.account_keys[instruction.program_id_index as usize];
            let keys: Vec<Pubkey> = instruction
                .accounts
                .iter()
                .map(|i| message.account_keys[*i as usize])
                .collect();

            logs.push(format!("Program {program_id} invoke [1]"));
            let result = match self.rejections.borrow().get(&program_id) {
                Some(Rejection { code, logs: emitted }) => {
                    logs.extend(emitted.iter().cloned());
                    Err(InstructionError::Custom(*code))
                }
                None if program_id == SYSTEM_PROGRAM_ID => {
                    process_system(&mut accounts, &keys, &instruction.data, &mut logs)
                }
                None => Ok(()),
            };

            match result {
                Ok(()) => logs.push(format!("Program {program_id} success")),
                Err(error) => {
                    logs.push(format!("Program {program_id} failed: {error}"));
                    let error = TransactionError::InstructionError(index as u8, error);
                    return (Some(fee_paid), Err((error, logs)));
                }
            }
        }

        (Some(accounts), Ok(logs))
    }
}

/// The error a node answers `sendTransaction` with when simulation fails.
fn preflight_failure(error: TransactionError, logs: Vec<String>) -> ClientError {
    let simulation = RpcSimulateTransactionResult {
        err: Some(error.into()),
        logs: Some(logs),
        accounts: None,
        units_consumed: None,
        loaded_accounts_data_size: None,
        return_data: None,
        inner_instructions: None,
        replacement_blockhash: None,
        fee: None,
        pre_balances: None,
        post_balances: None,
        pre_token_balances: None,
        post_token_balances: None,
        loaded_addresses: None,
    };
    ClientErrorKind::RpcError(RpcError::RpcResponseError {
        code: -32002,
        message: "Transaction simulation failed".to_string(),
        data: RpcResponseErrorData::SendTransactionPreflightFailure(simulation),
    })
    .into()
}

fn debit(
    accounts: &mut AccountStore,
    address: &Pubkey,
    lamports: u64,
) -> Result<(), u64> {
    let balance = accounts.get(address).map_or(0, |account| account.lamports);
    match (accounts.get_mut(address), balance.checked_sub(lamports)) {
        (Some(account), Some(remaining)) => {
            account.lamports = remaining;
            Ok(())
        }
        _ => Err(balance),
    }
}

fn process_system(
    accounts: &mut AccountStore,
    keys: &[Pubkey],
    data: &[u8],
    logs: &mut Vec<String>,
) -> Result<(), InstructionError> {
    let instruction: SystemInstruction =
        bincode::deserialize(data).map_err(|_| InstructionError::InvalidInstructionData)?;
    let (Some(from), Some(to)) = (keys.first(), keys.get(1)) else {
        return Err(InstructionError::MissingAccount);
    };

    match instruction {
        SystemInstruction::CreateAccount {
            lamports,
            space,
            owner,
        } => {
            if accounts
                .get(to)
                .is_some_and(|account| account.lamports > 0 || !account.data.is_empty())
            {
                logs.push(format!("Create Account: account {to} already in use"));
                return Err(InstructionError::Custom(0));
            }
            if let Err(balance) = debit(accounts, from, lamports) {
                logs.push(format!(
                    "Transfer: insufficient lamports {balance}, need {lamports}"
                ));
                return Err(InstructionError::Custom(1));
            }
            accounts.insert(*to, Account::new(lamports, space as usize, &owner));
        }
        SystemInstruction::Transfer { lamports } => {
            if let Err(balance) = debit(accounts, from, lamports) {
                logs.push(format!(
                    "Transfer: insufficient lamports {balance}, need {lamports}"
                ));
                return Err(InstructionError::Custom(1));
            }
            accounts
                .entry(*to)
                .or_insert_with(|| Account::new(0, 0, &SYSTEM_PROGRAM_ID))
                .lamports += lamports;
        }
        _ => return Err(InstructionError::InvalidInstructionData),
    }
    Ok(())
}

impl LedgerRpc for MockLedger {
    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> ClientResult<u64> {
        self.check_online()?;
        Ok(rent_exempt_minimum(space))
    }

    async fn account(
        &self,
        address: &Pubkey,
        _commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>> {
        self.check_online()?;
        Ok(self.account_data(address))
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        self.check_online()?;
        let n = self.blockhashes.get() + 1;
        self.blockhashes.set(n);
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&n.to_le_bytes());
        Ok(Hash::new_from_array(bytes))
    }

    async fn send(
        &self,
        transaction: &Transaction,
        config: RpcSendTransactionConfig,
    ) -> ClientResult<Signature> {
        self.check_online()?;
        transaction.verify().map_err(|error| {
            ClientError::from(ClientErrorKind::Custom(format!(
                "signature verification failed: {error}"
            )))
        })?;
        let signature = transaction.signatures[0];
        self.sent.borrow_mut().push(transaction.clone());

        let (committed, result) = self.execute(transaction);
        if let (false, Err((error, logs))) = (config.skip_preflight, &result) {
            return Err(preflight_failure(error.clone(), logs.clone()));
        }
        if self.never_land.get() {
            return Ok(signature);
        }

        if let Some(accounts) = committed {
            *self.accounts.borrow_mut() = accounts;
        }
        let slot = self.slot.get() + 1;
        self.slot.set(slot);
        let (err, logs) = match result {
            Ok(logs) => (None, logs),
            Err((error, logs)) => (Some(error), logs),
        };
        let status = SignatureStatus {
            slot,
            err,
            confirmation_status: Some(self.confirmation_status.borrow().clone()),
        };
        self.executed
            .borrow_mut()
            .insert(signature, Executed { status, logs });
        Ok(signature)
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<SignatureStatus>> {
        self.check_online()?;
        self.status_queries.set(self.status_queries.get() + 1);
        Ok(self
            .executed
            .borrow()
            .get(signature)
            .map(|executed| executed.status.clone()))
    }

    async fn transaction_logs(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> ClientResult<Option<Vec<String>>> {
        self.check_online()?;
        Ok(self
            .executed
            .borrow()
            .get(signature)
            .map(|executed| executed.logs.clone()))
    }
}
