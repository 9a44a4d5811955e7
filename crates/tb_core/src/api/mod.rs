pub mod balance_json;

pub use balance_json::{balance_teams_json, BalanceRequest, BalanceResponse};
