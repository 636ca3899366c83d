use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("verification rejected: {0}")]
    Verification(#[from] qol_verification::VerificationError),

    #[error("reward error: {0}")]
    Reward(#[from] qol_rewards::RewardError),

    #[error("store error: {0}")]
    Store(#[from] qol_store::StoreError),

    #[error("scoring error: {0}")]
    Scoring(#[from] qol_scoring::ScoringError),

    #[error("wallet error: {0}")]
    Wallet(#[from] qol_wallet::WalletError),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("audit {0} still contended after retries")]
    Contention(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
