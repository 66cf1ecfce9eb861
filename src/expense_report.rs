use serde::Deserialize;

use crate::{
    Balance, Cents, Expense, Group, GroupLedger, Payment, PaymentStatus, PaymentSuggestion,
    ResultSettle, SettleError,
};

/// Every group of an input document, with a readable history of its records.
pub struct ExpenseReport {
    ledgers: Vec<GroupLedger>,
    currency: String,
    history: Vec<String>,
}

impl ExpenseReport {
    /// Parses a JSON document of groups, expenses and payments.
    ///
    /// Every record is validated against its group; the first invalid one
    /// fails the whole report.
    pub fn from_json(json: &str, currency: &str) -> ResultSettle<Self> {
        let input: JsonInput = serde_json::from_str(json)?;

        let mut report = Self {
            ledgers: Vec::with_capacity(input.groups.len()),
            currency: currency.to_string(),
            history: Vec::new(),
        };

        for group in input.groups {
            if report.ledgers.iter().any(|l| l.group().id == group.id) {
                return Err(SettleError::DuplicateGroup(group.id));
            }
            report.ledgers.push(GroupLedger::new(group)?);
        }

        for payment in input.payments {
            report.payment(payment)?;
        }

        for expense in input.expenses {
            report.expense(expense)?;
        }

        tracing::info!(
            groups = report.ledgers.len(),
            entries = report.history.len(),
            "loaded expense report"
        );

        Ok(report)
    }

    pub fn summarize(&self) -> &[String] {
        &self.history
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.ledgers.iter().map(GroupLedger::group)
    }

    pub fn ledger_mut(&mut self, group_id: &str) -> ResultSettle<&mut GroupLedger> {
        self.ledgers
            .iter_mut()
            .find(|ledger| ledger.group().id == group_id)
            .ok_or_else(|| SettleError::UnknownGroup(group_id.to_string()))
    }

    /// Balances of one group, or of every group when `group_id` is `None`.
    pub fn balances(&mut self, group_id: Option<&str>) -> ResultSettle<Vec<Balance>> {
        match group_id {
            Some(id) => Ok(self.ledger_mut(id)?.balances()?.to_vec()),
            None => {
                let mut balances = Vec::new();
                for ledger in &mut self.ledgers {
                    balances.extend_from_slice(ledger.balances()?);
                }
                Ok(balances)
            }
        }
    }

    pub fn settlements(&mut self, group_id: Option<&str>) -> ResultSettle<Vec<PaymentSuggestion>> {
        match group_id {
            Some(id) => self.ledger_mut(id)?.settlements(),
            None => {
                let mut suggestions = Vec::new();
                for ledger in &mut self.ledgers {
                    suggestions.extend(ledger.settlements()?);
                }
                Ok(suggestions)
            }
        }
    }

    /// Renders an amount with the report currency.
    pub fn money(&self, amount: f64) -> String {
        if self.currency.is_empty() {
            Cents::from_amount(amount).to_string()
        } else {
            format!("{} {}", Cents::from_amount(amount), self.currency)
        }
    }

    fn payment(&mut self, payment: Payment) -> ResultSettle<()> {
        let ledger = self.ledger_mut(&payment.group_id)?;
        ledger.record_payment(payment.clone())?;
        let group = ledger.group().clone();

        let from = participant_name(&group, &payment.from_id);
        let to = participant_name(&group, &payment.to_id);
        let state = match payment.status {
            PaymentStatus::Completed => "gave",
            PaymentStatus::Pending => "promised",
        };

        let entry = format!(
            "[{}] {} {} {} to {}.",
            group.name,
            from,
            state,
            self.money(payment.amount),
            to
        );
        self.history.push(entry);

        Ok(())
    }

    fn expense(&mut self, expense: Expense) -> ResultSettle<()> {
        let ledger = self.ledger_mut(&expense.group_id)?;
        ledger.add_expense(expense.clone())?;
        let group = ledger.group().clone();

        let share = expense.amount / expense.involved.len() as f64;
        let count = expense.involved.len();

        let mut entry = Vec::new();

        entry.push(format!(
            "[{}] {} paid {} for '{}', which is split:",
            group.name,
            participant_name(&group, &expense.payer_id),
            self.money(expense.amount),
            expense.title
        ));

        for id in &expense.involved {
            entry.push(format!(
                "    {} 1/{} ({})",
                participant_name(&group, id),
                count,
                self.money(share)
            ));
        }

        self.history.push(entry.join("\n"));

        Ok(())
    }
}

fn participant_name<'a>(group: &'a Group, id: &'a str) -> &'a str {
    group
        .participant(id)
        .map(|participant| participant.name.as_str())
        .unwrap_or(id)
}

#[derive(Deserialize, Debug)]
struct JsonInput {
    groups: Vec<Group>,
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default)]
    payments: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const TRIP: &str = r#"{
        "groups": [
            {
                "id": "trip",
                "name": "Trip",
                "participants": [
                    { "id": "alice", "name": "Alice" },
                    { "id": "bob", "name": "Bob" },
                    { "id": "carol", "name": "Carol" }
                ]
            },
            {
                "id": "flat",
                "name": "Flat",
                "participants": [
                    { "id": "alice", "name": "Alice" },
                    { "id": "dave", "name": "Dave" }
                ]
            }
        ],
        "expenses": [
            { "id": "e1", "group_id": "trip", "title": "stay", "amount": 30.0,
              "payer_id": "alice", "involved": ["alice", "bob", "carol"] },
            { "id": "e2", "group_id": "trip", "title": "food", "amount": 15.0,
              "payer_id": "bob", "involved": ["bob", "carol"] },
            { "id": "e3", "group_id": "flat", "title": "rent", "amount": 800.0,
              "payer_id": "dave", "involved": ["alice", "dave"] }
        ],
        "payments": [
            { "id": "p1", "group_id": "flat", "from_id": "alice", "to_id": "dave",
              "amount": 100.0, "status": "completed" }
        ]
    }"#;

    #[fixture]
    fn report() -> ExpenseReport {
        ExpenseReport::from_json(TRIP, "eur").unwrap()
    }

    #[rstest]
    fn history_lists_payments_then_expenses(report: ExpenseReport) {
        let history = report.summarize();

        assert_eq!(history.len(), 4);
        assert_eq!(history[0], "[Flat] Alice gave 100.00 eur to Dave.");
        assert_eq!(
            history[1],
            "[Trip] Alice paid 30.00 eur for 'stay', which is split:\n    Alice 1/3 (10.00 eur)\n    Bob 1/3 (10.00 eur)\n    Carol 1/3 (10.00 eur)"
        );
    }

    #[rstest]
    fn settlements_per_group(mut report: ExpenseReport) {
        let trip: Vec<(String, String, f64)> = report
            .settlements(Some("trip"))
            .unwrap()
            .into_iter()
            .map(|s| (s.from, s.to, s.amount))
            .collect();
        assert_eq!(
            trip,
            vec![
                ("carol".to_string(), "alice".to_string(), 17.5),
                ("bob".to_string(), "alice".to_string(), 2.5),
            ]
        );

        let all = report.settlements(None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].from, "alice");
        assert_eq!(all[2].to, "dave");
        assert_eq!(all[2].amount, 300.0);
    }

    #[rstest]
    fn balances_of_every_group(mut report: ExpenseReport) {
        let balances = report.balances(None).unwrap();

        assert_eq!(balances.len(), 5);
        assert_eq!(report.groups().count(), 2);
    }

    #[rstest]
    fn unknown_group_is_reported(mut report: ExpenseReport) {
        assert_eq!(
            report.balances(Some("office")),
            Err(SettleError::UnknownGroup("office".to_string()))
        );
    }

    #[test]
    fn expense_for_missing_group_fails() {
        let json = r#"{
            "groups": [],
            "expenses": [
                { "id": "e1", "group_id": "ghost", "amount": 1.0,
                  "payer_id": "a", "involved": ["a"] }
            ]
        }"#;

        assert!(matches!(
            ExpenseReport::from_json(json, ""),
            Err(SettleError::UnknownGroup(_))
        ));
    }

    #[test]
    fn malformed_json_is_an_input_error() {
        assert!(matches!(
            ExpenseReport::from_json("{ not json", ""),
            Err(SettleError::Input(_))
        ));
    }

    #[test]
    fn amounts_without_currency() {
        let report = ExpenseReport::from_json(r#"{ "groups": [] }"#, "").unwrap();
        assert_eq!(report.money(-2.5), "-2.50");
    }
}
