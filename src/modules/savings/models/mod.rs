pub mod savings_account;

pub use savings_account::{SavingsAccount, SavingsAnalytics};
