use solana_sdk::signature::Signature;
use solana_transaction_error::TransactionError;

use crate::error::{
    LedgerError,
    LedgerResult,
};

/// A transaction that reached the requested commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub signature: Signature,
    pub slot: u64,
}

/// The lifecycle of one submission.
///
/// ```text
/// Unsubmitted --Sent--> Submitted --Landed---------> Confirmed
///                                 --Failed---------> Rejected
///                                 --DeadlinePassed-> TimedOut
/// ```
///
/// `Confirmed`, `Rejected` and `TimedOut` are terminal and absorb every later event.
#[derive(Clone, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum TransactionState {
    Unsubmitted,
    Submitted {
        signature: Signature,
    },
    Confirmed {
        signature: Signature,
        slot: u64,
    },
    Rejected {
        signature: Signature,
        reason: TransactionError,
        logs: Vec<String>,
    },
    TimedOut {
        signature: Signature,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettlementEvent {
    /// The node accepted the transaction, or rejected it in preflight under this signature.
    Sent { signature: Signature },
    Landed { slot: u64 },
    Failed {
        reason: TransactionError,
        logs: Vec<String>,
    },
    DeadlinePassed,
}

impl TransactionState {
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Unsubmitted => None,
            Self::Submitted { signature }
            | Self::Confirmed { signature, .. }
            | Self::Rejected { signature, .. }
            | Self::TimedOut { signature } => Some(signature),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Confirmed { .. } | Self::Rejected { .. } | Self::TimedOut { .. }
        )
    }

    /// Advances the state machine. Events that don't apply to the current state leave it
    /// unchanged.
    pub fn apply(self, event: SettlementEvent) -> Self {
        use SettlementEvent::*;

        match (self, event) {
            (Self::Unsubmitted, Sent { signature }) => Self::Submitted { signature },
            (Self::Submitted { signature }, Landed { slot }) => Self::Confirmed { signature, slot },
            (Self::Submitted { signature }, Failed { reason, logs }) => Self::Rejected {
                signature,
                reason,
                logs,
            },
            (Self::Submitted { signature }, DeadlinePassed) => Self::TimedOut { signature },
            (state, _) => state,
        }
    }

    /// The caller-facing result of a terminal state, or the state itself if it isn't terminal.
    pub fn into_outcome(self) -> Result<LedgerResult<Confirmation>, Self> {
        match self {
            Self::Confirmed { signature, slot } => Ok(Ok(Confirmation { signature, slot })),
            Self::Rejected {
                signature,
                reason,
                logs,
            } => Ok(Err(LedgerError::RemoteRejection {
                signature,
                reason,
                logs,
            })),
            Self::TimedOut { signature } => Ok(Err(LedgerError::ConfirmationTimeout { signature })),
            pending => Err(pending),
        }
    }
}
