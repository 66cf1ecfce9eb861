//! Plain records exchanged with the surrounding application.
//!
//! Groups, expenses and payments come from the external data layer. Balances
//! and payment suggestions are derived from them and never stored.
use serde::{Deserialize, Serialize};

use crate::{money::MAX_AMOUNT, ResultSettle, SettleError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A named set of participants sharing expenses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            participants: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_participant(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.participants.push(Participant::new(id, name));
        self
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Fails if a participant id appears more than once.
    pub fn ensure_unique_participants(&self) -> ResultSettle<()> {
        for (index, participant) in self.participants.iter().enumerate() {
            if self.participants[..index]
                .iter()
                .any(|other| other.id == participant.id)
            {
                return Err(SettleError::DuplicateParticipant {
                    participant: participant.id.clone(),
                    group: self.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Money spent by one payer on behalf of the `involved` participants.
///
/// `involved` is authoritative: the payer only owes a share when listed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    #[serde(default)]
    pub title: String,
    pub amount: f64,
    pub payer_id: String,
    pub involved: Vec<String>,
}

impl Expense {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        payer_id: impl Into<String>,
        amount: f64,
        involved: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            title: String::new(),
            amount,
            payer_id: payer_id.into(),
            involved: involved.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Checks the expense against `group` before it touches any balance.
    pub fn validate(&self, group: &Group) -> ResultSettle<()> {
        if self.group_id != group.id {
            return Err(SettleError::invalid_expense(
                &self.id,
                format!("belongs to group \"{}\", not \"{}\"", self.group_id, group.id),
            ));
        }
        if !self.amount.is_finite() {
            return Err(SettleError::invalid_expense(&self.id, "amount is not finite"));
        }
        if self.amount < 0.0 {
            return Err(SettleError::invalid_expense(&self.id, "amount is negative"));
        }
        if self.amount > MAX_AMOUNT {
            return Err(SettleError::invalid_expense(&self.id, "amount is too large"));
        }
        if self.involved.is_empty() {
            return Err(SettleError::invalid_expense(&self.id, "no involved participants"));
        }
        if group.participant(&self.payer_id).is_none() {
            return Err(SettleError::unknown_participant(&self.payer_id, &group.id));
        }
        for (index, id) in self.involved.iter().enumerate() {
            if group.participant(id).is_none() {
                return Err(SettleError::unknown_participant(id, &group.id));
            }
            if self.involved[..index].contains(id) {
                return Err(SettleError::invalid_expense(
                    &self.id,
                    format!("\"{id}\" is involved twice"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
}

/// A transfer recorded by the surrounding application.
///
/// Only completed payments move balances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub group_id: String,
    pub from_id: String,
    pub to_id: String,
    pub amount: f64,
    #[serde(default)]
    pub status: PaymentStatus,
}

impl Payment {
    /// Records a confirmed suggestion as a completed payment.
    pub fn from_suggestion(id: impl Into<String>, suggestion: &PaymentSuggestion) -> Self {
        Self {
            id: id.into(),
            group_id: suggestion.group_id.clone(),
            from_id: suggestion.from.clone(),
            to_id: suggestion.to.clone(),
            amount: suggestion.amount,
            status: PaymentStatus::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    pub fn validate(&self, group: &Group) -> ResultSettle<()> {
        if self.group_id != group.id {
            return Err(SettleError::invalid_payment(
                &self.id,
                format!("belongs to group \"{}\", not \"{}\"", self.group_id, group.id),
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(SettleError::invalid_payment(
                &self.id,
                "amount must be positive",
            ));
        }
        if self.amount > MAX_AMOUNT {
            return Err(SettleError::invalid_payment(&self.id, "amount is too large"));
        }
        if self.from_id == self.to_id {
            return Err(SettleError::invalid_payment(
                &self.id,
                "payer and receiver are the same participant",
            ));
        }
        for id in [&self.from_id, &self.to_id] {
            if group.participant(id).is_none() {
                return Err(SettleError::unknown_participant(id, &group.id));
            }
        }
        Ok(())
    }
}

/// Net position of a participant within a group: paid minus owed.
///
/// `amount` is not rounded; use [`Cents`](crate::Cents) to display it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub participant_id: String,
    pub participant_name: String,
    pub group_id: String,
    pub group_name: String,
    pub amount: f64,
}

/// A proposed transfer from a debtor to a creditor of the same group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentSuggestion {
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub to_name: String,
    pub amount: f64,
    pub group_id: String,
    pub group_name: String,
}
