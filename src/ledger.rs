//! Cached view over one group's expenses and payments.
//!
//! The cached balances are only a materialized view of
//! [`compute_balances_with_payments`]: every mutation drops them and the next
//! read recomputes from scratch.
use crate::{
    compute_balances_with_payments, suggest_settlements, Balance, Expense, Group, Payment,
    PaymentSuggestion, ResultSettle, SettleError,
};

#[derive(Clone, Debug)]
pub struct GroupLedger {
    group: Group,
    expenses: Vec<Expense>,
    payments: Vec<Payment>,
    cached: Option<Vec<Balance>>,
}

impl GroupLedger {
    pub fn new(group: Group) -> ResultSettle<Self> {
        group.ensure_unique_participants()?;

        Ok(Self {
            group,
            expenses: Vec::new(),
            payments: Vec::new(),
            cached: None,
        })
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Total amount spent by the group.
    pub fn total(&self) -> f64 {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }

    /// Validates and stores a new expense.
    pub fn add_expense(&mut self, expense: Expense) -> ResultSettle<()> {
        expense.validate(&self.group)?;
        if self.expenses.iter().any(|known| known.id == expense.id) {
            return Err(SettleError::DuplicateExpense(expense.id));
        }
        self.expenses.push(expense);
        self.invalidate();
        Ok(())
    }

    /// Replaces the expense with the same id.
    pub fn update_expense(&mut self, expense: Expense) -> ResultSettle<()> {
        expense.validate(&self.group)?;
        let slot = self
            .expenses
            .iter_mut()
            .find(|existing| existing.id == expense.id)
            .ok_or_else(|| SettleError::ExpenseNotFound(expense.id.clone()))?;
        *slot = expense;
        self.invalidate();
        Ok(())
    }

    pub fn remove_expense(&mut self, id: &str) -> ResultSettle<Expense> {
        let index = self
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or_else(|| SettleError::ExpenseNotFound(id.to_string()))?;
        let removed = self.expenses.remove(index);
        self.invalidate();
        Ok(removed)
    }

    /// Stores a payment; completed ones move balances on the next read.
    pub fn record_payment(&mut self, payment: Payment) -> ResultSettle<()> {
        payment.validate(&self.group)?;
        self.payments.push(payment);
        self.invalidate();
        Ok(())
    }

    /// Records a confirmed suggestion as a completed payment.
    pub fn confirm(
        &mut self,
        id: impl Into<String>,
        suggestion: &PaymentSuggestion,
    ) -> ResultSettle<()> {
        self.record_payment(Payment::from_suggestion(id, suggestion))
    }

    pub fn balances(&mut self) -> ResultSettle<&[Balance]> {
        if self.cached.is_none() {
            let balances =
                compute_balances_with_payments(&self.group, &self.expenses, &self.payments)?;
            self.cached = Some(balances);
        }

        Ok(self.cached.as_deref().unwrap_or_default())
    }

    pub fn settlements(&mut self) -> ResultSettle<Vec<PaymentSuggestion>> {
        Ok(suggest_settlements(self.balances()?))
    }

    fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            tracing::trace!(group = %self.group.id, "balance cache invalidated");
        }
    }
}
