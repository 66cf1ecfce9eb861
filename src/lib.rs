//! Balance computation and debt settlement for groups sharing expenses.
//!
//! [`compute_balances`] turns a group and its expenses into one net balance
//! per participant (paid minus fair share). [`suggest_settlements`] turns
//! balances into the transfers that bring every participant back to zero,
//! matching the largest debtor with the largest creditor first.
//!
//! Both are pure functions of their input. [`GroupLedger`] keeps a cached
//! copy of a group's balances that is dropped on every mutation.
pub use balance::{
    compute_balances, compute_balances_for_groups, compute_balances_with_payments, group_totals,
};
pub use error::SettleError;
pub use expense_report::ExpenseReport;
pub use ledger::GroupLedger;
pub use model::{
    Balance, Expense, Group, Participant, Payment, PaymentStatus, PaymentSuggestion,
};
pub use money::{Cents, MAX_AMOUNT, NEGLIGIBLE, ZERO_SUM_TOLERANCE};
pub use settlement::suggest_settlements;

mod balance;
mod error;
mod expense_report;
mod ledger;
mod model;
pub mod money;
mod settlement;

pub type ResultSettle<T> = Result<T, SettleError>;
