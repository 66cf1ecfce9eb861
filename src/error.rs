//! Errors raised while turning expense records into balances.
//!
//! The balance calculator fails fast on malformed input, so every variant here
//! means "cannot compute balances for this group". The settlement planner never
//! returns one of these: inconsistent balances are only logged.
use thiserror::Error;

/// Custom errors of the settlement core.
#[derive(Error, Debug)]
pub enum SettleError {
    #[error("Invalid expense \"{expense}\": {reason}")]
    InvalidExpense { expense: String, reason: String },
    #[error("Unknown participant \"{participant}\" in group \"{group}\"")]
    UnknownParticipant { participant: String, group: String },
    #[error("Participant \"{participant}\" listed twice in group \"{group}\"")]
    DuplicateParticipant { participant: String, group: String },
    #[error("\"{0}\" group not found!")]
    UnknownGroup(String),
    #[error("\"{0}\" group already present!")]
    DuplicateGroup(String),
    #[error("Invalid payment \"{payment}\": {reason}")]
    InvalidPayment { payment: String, reason: String },
    #[error("\"{0}\" expense not found!")]
    ExpenseNotFound(String),
    #[error("\"{0}\" expense already present!")]
    DuplicateExpense(String),
    #[error(transparent)]
    Input(#[from] serde_json::Error),
}

impl SettleError {
    pub(crate) fn invalid_expense(expense: &str, reason: impl Into<String>) -> Self {
        Self::InvalidExpense {
            expense: expense.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_payment(payment: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPayment {
            payment: payment.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_participant(participant: &str, group: &str) -> Self {
        Self::UnknownParticipant {
            participant: participant.to_string(),
            group: group.to_string(),
        }
    }
}

impl PartialEq for SettleError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InvalidExpense {
                    expense: a,
                    reason: ra,
                },
                Self::InvalidExpense {
                    expense: b,
                    reason: rb,
                },
            ) => a == b && ra == rb,
            (
                Self::UnknownParticipant {
                    participant: a,
                    group: ga,
                },
                Self::UnknownParticipant {
                    participant: b,
                    group: gb,
                },
            ) => a == b && ga == gb,
            (
                Self::DuplicateParticipant {
                    participant: a,
                    group: ga,
                },
                Self::DuplicateParticipant {
                    participant: b,
                    group: gb,
                },
            ) => a == b && ga == gb,
            (Self::UnknownGroup(a), Self::UnknownGroup(b)) => a == b,
            (Self::DuplicateGroup(a), Self::DuplicateGroup(b)) => a == b,
            (
                Self::InvalidPayment {
                    payment: a,
                    reason: ra,
                },
                Self::InvalidPayment {
                    payment: b,
                    reason: rb,
                },
            ) => a == b && ra == rb,
            (Self::ExpenseNotFound(a), Self::ExpenseNotFound(b)) => a == b,
            (Self::DuplicateExpense(a), Self::DuplicateExpense(b)) => a == b,
            (Self::Input(a), Self::Input(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
