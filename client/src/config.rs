use std::time::Duration;

use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_commitment_config::CommitmentConfig;

/// The endpoint used when no URL is passed and `RPC_URL` isn't set.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Resolves the RPC endpoint: an explicit URL, then `RPC_URL`, then the local validator.
pub fn rpc_url(url: Option<String>) -> String {
    url.or_else(|| std::env::var(RPC_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string())
}

/// Submission and confirmation policy for a single transaction.
#[derive(Clone, Debug)]
pub struct SendTransactionConfig {
    /// The commitment a transaction must reach to count as confirmed.
    pub commitment: CommitmentConfig,
    pub preflight_commitment: CommitmentConfig,
    pub skip_preflight: bool,
    /// Rebroadcast attempts the RPC node may make on its own. `Some(0)` submits exactly once.
    pub max_retries: Option<usize>,
    pub poll_interval: Duration,
    /// How long to poll for confirmation before giving up with a timeout.
    pub timeout: Duration,
    /// Prepends compute unit limit and price instructions when set.
    pub compute_budget: Option<u32>,
    pub debug_logs: Option<bool>,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig {
            commitment: CommitmentConfig::confirmed(),
            preflight_commitment: CommitmentConfig::confirmed(),
            skip_preflight: false,
            max_retries: Some(0),
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
            compute_budget: Default::default(),
            debug_logs: Some(true),
        }
    }
}

impl SendTransactionConfig {
    pub fn debug_logs(&self) -> bool {
        matches!(self.debug_logs, Some(true))
    }

    pub fn rpc_send_config(&self) -> RpcSendTransactionConfig {
        RpcSendTransactionConfig {
            skip_preflight: self.skip_preflight,
            preflight_commitment: Some(self.preflight_commitment.commitment),
            max_retries: self.max_retries,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins() {
        assert_eq!(
            rpc_url(Some("http://example.invalid".to_string())),
            "http://example.invalid"
        );
    }

    #[test]
    fn default_submits_once() {
        let config = SendTransactionConfig::default().rpc_send_config();
        assert_eq!(config.max_retries, Some(0));
        assert!(!config.skip_preflight);
    }
}
