use std::time::Duration;

use bootcamp_interface::{
    instructions::{
        authorized_counter,
        tracker,
    },
    program_ids::{
        AUTHORIZED_COUNTER_ID,
        SYSTEM_PROGRAM_ID,
        TRACKER_ID,
    },
    state::{
        counter::AuthorizedCounter,
        AccountState,
    },
};
use client::{
    config::SendTransactionConfig,
    error::LedgerError,
    mock_ledger::{
        rent_exempt_minimum,
        MockLedger,
        LAMPORTS_PER_SIGNATURE,
    },
    pda::{
        find_tracker_address,
        find_tracker_authority_address,
    },
    rpc::{
        LedgerRpc,
        SignatureStatus,
    },
    transactions::{
        assemble,
        settlement,
        NewAccount,
        Settlement,
    },
};
use solana_account::Account;
use solana_client::{
    client_error::Result as ClientResult,
    rpc_config::RpcSendTransactionConfig,
};
use solana_commitment_config::CommitmentConfig;
use solana_instruction_error::InstructionError;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
    },
    signer::Signer,
    transaction::Transaction,
};
use solana_system_interface::instruction::SystemInstruction;
use solana_transaction_error::TransactionError;
use solana_transaction_status::TransactionConfirmationStatus;

const SOL: u64 = 1_000_000_000;

fn quiet_config() -> SendTransactionConfig {
    SendTransactionConfig {
        debug_logs: Some(false),
        ..Default::default()
    }
}

/// Loses the connection to the wrapped ledger as soon as a transaction is accepted.
struct DisconnectsAfterSend<'a>(&'a MockLedger);

impl LedgerRpc for DisconnectsAfterSend<'_> {
    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> ClientResult<u64> {
        self.0.minimum_balance_for_rent_exemption(space).await
    }

    async fn account(
        &self,
        address: &Pubkey,
        commitment: CommitmentConfig,
    ) -> ClientResult<Option<Account>> {
        self.0.account(address, commitment).await
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        self.0.latest_blockhash().await
    }

    async fn send(
        &self,
        transaction: &Transaction,
        config: RpcSendTransactionConfig,
    ) -> ClientResult<Signature> {
        let signature = self.0.send(transaction, config).await?;
        self.0.go_offline();
        Ok(signature)
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<SignatureStatus>> {
        self.0.signature_status(signature).await
    }

    async fn transaction_logs(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> ClientResult<Option<Vec<String>>> {
        self.0.transaction_logs(signature, commitment).await
    }
}

fn program_ids(transaction: &Transaction) -> Vec<Pubkey> {
    let message = &transaction.message;
    message
        .instructions
        .iter()
        .map(|ix| message.account_keys[ix.program_id_index as usize])
        .collect()
}

fn system_instruction(transaction: &Transaction, index: usize) -> SystemInstruction {
    bincode::deserialize(&transaction.message.instructions[index].data).unwrap()
}

#[tokio::test]
async fn new_account_is_created_first_with_the_rent_minimum() {
    let payer = Keypair::new();
    let counter = Keypair::new();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);

    let increment =
        authorized_counter::increment(&AUTHORIZED_COUNTER_ID, &counter.pubkey(), &payer.pubkey())
            .unwrap();
    let confirmation = assemble([increment], &[&payer], None)
        .unwrap()
        .create_account(NewAccount {
            keypair: &counter,
            space: AuthorizedCounter::LEN,
            owner: AUTHORIZED_COUNTER_ID,
        })
        .submit(&ledger, &quiet_config())
        .await
        .unwrap();

    let sent = ledger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(confirmation.signature, sent[0].signatures[0]);
    assert_eq!(
        program_ids(&sent[0]),
        vec![SYSTEM_PROGRAM_ID, AUTHORIZED_COUNTER_ID]
    );
    assert_eq!(
        system_instruction(&sent[0], 0),
        SystemInstruction::CreateAccount {
            lamports: rent_exempt_minimum(AuthorizedCounter::LEN),
            space: AuthorizedCounter::LEN as u64,
            owner: AUTHORIZED_COUNTER_ID,
        }
    );

    let created = ledger.account_data(&counter.pubkey()).unwrap();
    assert_eq!(created.owner, AUTHORIZED_COUNTER_ID);
    assert_eq!(created.data.len(), AuthorizedCounter::LEN);
    assert_eq!(created.lamports, rent_exempt_minimum(AuthorizedCounter::LEN));
}

#[tokio::test]
async fn existing_account_is_not_created_again() {
    let payer = Keypair::new();
    let counter = Keypair::new();
    let ledger = MockLedger::new()
        .with_lamports(payer.pubkey(), SOL)
        .with_account(
            counter.pubkey(),
            Account::new(SOL, AuthorizedCounter::LEN, &AUTHORIZED_COUNTER_ID),
        );

    let increment =
        authorized_counter::increment(&AUTHORIZED_COUNTER_ID, &counter.pubkey(), &payer.pubkey())
            .unwrap();
    assemble([increment], &[&payer], None)
        .unwrap()
        .create_account(NewAccount {
            keypair: &counter,
            space: AuthorizedCounter::LEN,
            owner: AUTHORIZED_COUNTER_ID,
        })
        .submit(&ledger, &quiet_config())
        .await
        .unwrap();

    let sent = ledger.sent();
    assert_eq!(program_ids(&sent[0]), vec![AUTHORIZED_COUNTER_ID]);
    // The counter no longer has to sign.
    assert_eq!(sent[0].signatures.len(), 1);
}

#[tokio::test]
async fn operations_keep_caller_order_after_compute_budget() {
    let user = Keypair::new();
    let counter = Pubkey::new_unique();
    let ledger = MockLedger::new().with_lamports(user.pubkey(), SOL);

    let (tracker_address, _) = find_tracker_address(&user.pubkey(), &counter).unwrap();
    let (authority, _) = find_tracker_authority_address(&counter).unwrap();
    let initialize = tracker::initialize(
        &TRACKER_ID,
        &tracker_address,
        &user.pubkey(),
        &authority,
        &counter,
    )
    .unwrap();
    let increment = tracker::increment(
        &TRACKER_ID,
        &tracker_address,
        &user.pubkey(),
        &AUTHORIZED_COUNTER_ID,
        &counter,
        &authority,
    )
    .unwrap();

    let config = SendTransactionConfig {
        compute_budget: Some(200_000),
        ..quiet_config()
    };
    assemble([initialize.clone(), increment.clone()], &[&user], None)
        .unwrap()
        .submit(&ledger, &config)
        .await
        .unwrap();

    let sent = &ledger.sent()[0];
    let data: Vec<Vec<u8>> = sent
        .message
        .instructions
        .iter()
        .map(|ix| ix.data.clone())
        .collect();
    assert_eq!(data.len(), 4);
    assert_eq!(data[2], initialize.data);
    assert_eq!(data[3], increment.data);
    assert_eq!(program_ids(sent)[2..], [TRACKER_ID, TRACKER_ID]);
}

#[tokio::test]
async fn missing_authorizer_is_caught_before_sending() {
    let payer = Keypair::new();
    let user = Pubkey::new_unique();
    let counter = Pubkey::new_unique();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);

    let (tracker_address, _) = find_tracker_address(&user, &counter).unwrap();
    let (authority, _) = find_tracker_authority_address(&counter).unwrap();
    let initialize =
        tracker::initialize(&TRACKER_ID, &tracker_address, &user, &authority, &counter).unwrap();

    let result = assemble([initialize], &[&payer], None)
        .unwrap()
        .submit(&ledger, &quiet_config())
        .await;

    assert!(matches!(result, Err(LedgerError::MissingAuthorizer(key)) if key == user));
    assert!(ledger.sent().is_empty());
}

#[test]
fn no_fee_payer() {
    assert!(matches!(
        assemble([], &[], None),
        Err(LedgerError::MissingFeePayer)
    ));
}

#[tokio::test]
async fn underfunded_payer_is_rejected_with_remote_logs() {
    let payer = Keypair::new();
    let counter = Keypair::new();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), 20_000);

    let increment =
        authorized_counter::increment(&AUTHORIZED_COUNTER_ID, &counter.pubkey(), &payer.pubkey())
            .unwrap();
    let result = assemble([increment], &[&payer], None)
        .unwrap()
        .create_account(NewAccount {
            keypair: &counter,
            space: AuthorizedCounter::LEN,
            owner: AUTHORIZED_COUNTER_ID,
        })
        .submit(&ledger, &SendTransactionConfig::default())
        .await;

    let (signature, reason, logs) = match result {
        Err(LedgerError::RemoteRejection {
            signature,
            reason,
            logs,
        }) => (signature, reason, logs),
        other => panic!("expected a remote rejection, got {other:?}"),
    };
    assert_eq!(signature, ledger.sent()[0].signatures[0]);
    assert_eq!(
        reason,
        TransactionError::InstructionError(0, InstructionError::Custom(1))
    );
    let need = rent_exempt_minimum(AuthorizedCounter::LEN);
    assert!(logs.contains(&format!(
        "Transfer: insufficient lamports 10000, need {need}"
    )));
    assert!(ledger.account_data(&counter.pubkey()).is_none());
}

#[tokio::test]
async fn program_rejection_carries_logs_verbatim() {
    let payer = Keypair::new();
    let counter = Pubkey::new_unique();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);
    let program_logs = vec![
        "Program log: Instruction: Increment".to_string(),
        "Program log: Error: authority mismatch".to_string(),
    ];
    ledger.reject_program(AUTHORIZED_COUNTER_ID, 6, program_logs.clone());

    let increment =
        authorized_counter::increment(&AUTHORIZED_COUNTER_ID, &counter, &payer.pubkey()).unwrap();
    let result = assemble([increment], &[&payer], None)
        .unwrap()
        .submit(&ledger, &quiet_config())
        .await;

    match result {
        Err(LedgerError::RemoteRejection { reason, logs, .. }) => {
            assert_eq!(
                reason,
                TransactionError::InstructionError(0, InstructionError::Custom(6))
            );
            assert_eq!(logs[1..3], program_logs[..]);
            assert_eq!(
                logs.last().unwrap(),
                &format!("Program {AUTHORIZED_COUNTER_ID} failed: custom program error: 0x6")
            );
        }
        other => panic!("expected a remote rejection, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn unconfirmed_transaction_times_out_and_can_be_queried_later() {
    let payer = Keypair::new();
    let counter = Pubkey::new_unique();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);
    ledger.never_land();

    let config = SendTransactionConfig {
        poll_interval: Duration::from_millis(500),
        timeout: Duration::from_secs(5),
        ..SendTransactionConfig::default()
    };
    let increment =
        authorized_counter::increment_plain(&AUTHORIZED_COUNTER_ID, &counter).unwrap();
    let result = assemble([increment], &[&payer], None)
        .unwrap()
        .submit(&ledger, &config)
        .await;

    let sent_signature = ledger.sent()[0].signatures[0];
    assert!(matches!(
        result,
        Err(LedgerError::ConfirmationTimeout { signature }) if signature == sent_signature
    ));
    assert!(ledger.status_queries() >= 10);
    assert_eq!(
        settlement(&ledger, &sent_signature).await.unwrap(),
        Settlement::Absent
    );
}

#[tokio::test(start_paused = true)]
async fn commitment_is_caller_policy() {
    let payer = Keypair::new();
    let counter = Pubkey::new_unique();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);
    ledger.report_confirmation_status(TransactionConfirmationStatus::Processed);

    let increment =
        authorized_counter::increment_plain(&AUTHORIZED_COUNTER_ID, &counter).unwrap();
    let pending = assemble([increment], &[&payer], None).unwrap();

    let confirmed = SendTransactionConfig {
        timeout: Duration::from_secs(2),
        ..quiet_config()
    };
    assert!(matches!(
        pending.submit(&ledger, &confirmed).await,
        Err(LedgerError::ConfirmationTimeout { .. })
    ));

    let processed = SendTransactionConfig {
        commitment: CommitmentConfig::processed(),
        ..confirmed
    };
    let confirmation = pending.submit(&ledger, &processed).await.unwrap();
    assert_eq!(
        settlement(&ledger, &confirmation.signature).await.unwrap(),
        Settlement::Landed {
            slot: confirmation.slot
        }
    );
}

#[tokio::test]
async fn network_errors_are_not_retried() {
    let payer = Keypair::new();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);
    ledger.go_offline();

    let increment =
        authorized_counter::increment_plain(&AUTHORIZED_COUNTER_ID, &Pubkey::new_unique())
            .unwrap();
    let result = assemble([increment], &[&payer], None)
        .unwrap()
        .submit(&ledger, &quiet_config())
        .await;

    assert!(matches!(result, Err(LedgerError::Network(_))));
    assert!(ledger.sent().is_empty());
    assert_eq!(ledger.status_queries(), 0);
}

#[tokio::test]
async fn preflight_rejection_lands_nothing() {
    let payer = Keypair::new();
    let counter = Pubkey::new_unique();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);
    let program_logs = vec!["Program log: Error: authority mismatch".to_string()];
    ledger.reject_program(AUTHORIZED_COUNTER_ID, 6, program_logs.clone());

    let increment =
        authorized_counter::increment(&AUTHORIZED_COUNTER_ID, &counter, &payer.pubkey()).unwrap();
    let config = quiet_config();
    assert!(!config.skip_preflight);
    let result = assemble([increment], &[&payer], None)
        .unwrap()
        .submit(&ledger, &config)
        .await;

    let signature = match result {
        Err(LedgerError::RemoteRejection {
            signature,
            reason,
            logs,
        }) => {
            assert_eq!(
                reason,
                TransactionError::InstructionError(0, InstructionError::Custom(6))
            );
            assert_eq!(
                logs,
                vec![
                    format!("Program {AUTHORIZED_COUNTER_ID} invoke [1]"),
                    program_logs[0].clone(),
                    format!("Program {AUTHORIZED_COUNTER_ID} failed: custom program error: 0x6"),
                ]
            );
            signature
        }
        other => panic!("expected a remote rejection, got {other:?}"),
    };

    assert_eq!(ledger.status_queries(), 0);
    assert_eq!(ledger.balance(&payer.pubkey()), SOL);
    assert_eq!(
        settlement(&ledger, &signature).await.unwrap(),
        Settlement::Absent
    );
}

#[tokio::test]
async fn skipped_preflight_rejection_lands_and_keeps_the_fee() {
    let payer = Keypair::new();
    let counter = Pubkey::new_unique();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);
    ledger.reject_program(AUTHORIZED_COUNTER_ID, 6, vec![]);

    let increment =
        authorized_counter::increment(&AUTHORIZED_COUNTER_ID, &counter, &payer.pubkey()).unwrap();
    let config = SendTransactionConfig {
        skip_preflight: true,
        ..quiet_config()
    };
    let result = assemble([increment], &[&payer], None)
        .unwrap()
        .submit(&ledger, &config)
        .await;

    let signature = match result {
        Err(LedgerError::RemoteRejection { signature, .. }) => signature,
        other => panic!("expected a remote rejection, got {other:?}"),
    };
    assert!(ledger.status_queries() > 0);
    assert_eq!(
        ledger.balance(&payer.pubkey()),
        SOL - LAMPORTS_PER_SIGNATURE
    );
    assert!(matches!(
        settlement(&ledger, &signature).await.unwrap(),
        Settlement::Failed { .. }
    ));
}

#[tokio::test]
async fn losing_the_node_after_sending_keeps_the_signature() {
    let payer = Keypair::new();
    let ledger = MockLedger::new().with_lamports(payer.pubkey(), SOL);
    let rpc = DisconnectsAfterSend(&ledger);

    let increment =
        authorized_counter::increment_plain(&AUTHORIZED_COUNTER_ID, &Pubkey::new_unique())
            .unwrap();
    let result = assemble([increment], &[&payer], None)
        .unwrap()
        .submit(&rpc, &quiet_config())
        .await;

    let sent_signature = ledger.sent()[0].signatures[0];
    let signature = match result {
        Err(LedgerError::Unsettled { signature, .. }) => signature,
        other => panic!("expected an unsettled transaction, got {other:?}"),
    };
    assert_eq!(signature, sent_signature);

    ledger.go_online();
    assert!(matches!(
        settlement(&ledger, &signature).await.unwrap(),
        Settlement::Landed { .. }
    ));
}
