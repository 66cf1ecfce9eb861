//! Settlement planner.
//!
//! Greedy largest-first matching of debtors against creditors, one group at a
//! time. The planner never fails: balances that do not net to zero are matched
//! as far as possible and the leftover is dropped with a warning.
use crate::{
    money::{distribute_cents, is_negligible, MAX_BALANCE},
    Balance, Cents, PaymentSuggestion, ZERO_SUM_TOLERANCE,
};

/// Suggests the transfers that settle every group found in `balances`.
///
/// Debts are never netted across groups. Within a group, the most indebted
/// participant pays the most owed one first; ties keep the input order.
///
/// ```rust
/// use settle_up::{compute_balances, suggest_settlements, Expense, Group};
///
/// let group = Group::new("g", "Trip")
///     .with_participant("alice", "Alice")
///     .with_participant("bob", "Bob");
/// let expenses = [Expense::new("e1", "g", "alice", 30.0, &["alice", "bob"])];
/// let balances = compute_balances(&group, &expenses).unwrap();
///
/// let suggestions = suggest_settlements(&balances);
/// assert_eq!(suggestions.len(), 1);
/// assert_eq!(suggestions[0].from, "bob");
/// assert_eq!(suggestions[0].amount, 15.0);
/// ```
pub fn suggest_settlements(balances: &[Balance]) -> Vec<PaymentSuggestion> {
    partition_by_group(balances)
        .into_iter()
        .flat_map(|group| settle_group(&group))
        .collect()
}

/// Groups balances by group id, keeping the order in which groups appear.
fn partition_by_group(balances: &[Balance]) -> Vec<Vec<&Balance>> {
    let mut groups: Vec<Vec<&Balance>> = Vec::new();

    for balance in balances {
        match groups
            .iter_mut()
            .find(|group| group[0].group_id == balance.group_id)
        {
            Some(group) => group.push(balance),
            None => groups.push(vec![balance]),
        }
    }

    groups
}

/// A debtor or creditor with what is still left to settle.
#[derive(Debug)]
struct Party<'a> {
    balance: &'a Balance,
    remaining: Cents,
}

fn settle_group(balances: &[&Balance]) -> Vec<PaymentSuggestion> {
    let Some(first) = balances.first() else {
        return Vec::new();
    };
    let group_id = first.group_id.as_str();

    let total: f64 = balances.iter().map(|balance| balance.amount).sum();
    if !total.is_finite() || total.abs() > ZERO_SUM_TOLERANCE {
        tracing::warn!(
            group = %group_id,
            total,
            "inconsistent balances: group does not sum to zero"
        );
    }

    // Sub-cent balances count as settled and never reach the cent rounding.
    let mut eligible: Vec<&Balance> = Vec::with_capacity(balances.len());
    for &balance in balances {
        if !balance.amount.is_finite() || balance.amount.abs() > MAX_BALANCE {
            tracing::warn!(
                group = %group_id,
                participant = %balance.participant_id,
                amount = balance.amount,
                "skipping out-of-range balance"
            );
        } else if !is_negligible(balance.amount) {
            eligible.push(balance);
        }
    }

    let amounts: Vec<f64> = eligible.iter().map(|balance| balance.amount).collect();
    let parties: Vec<Party> = eligible
        .into_iter()
        .zip(distribute_cents(&amounts))
        .map(|(balance, remaining)| Party { balance, remaining })
        .collect();

    let (mut debtors, mut creditors): (Vec<Party>, Vec<Party>) = parties
        .into_iter()
        .filter(|party| !party.remaining.is_zero())
        .partition(|party| party.remaining < Cents::ZERO);

    debtors.sort_by(|a, b| a.balance.amount.total_cmp(&b.balance.amount));
    creditors.sort_by(|a, b| b.balance.amount.total_cmp(&a.balance.amount));

    let mut suggestions = Vec::new();
    let (mut d, mut c) = (0, 0);

    while d < debtors.len() && c < creditors.len() {
        let debtor = &mut debtors[d];
        let creditor = &mut creditors[c];

        let amount = debtor.remaining.abs().min(creditor.remaining);

        if !is_negligible(amount.amount()) {
            suggestions.push(PaymentSuggestion {
                from: debtor.balance.participant_id.clone(),
                from_name: debtor.balance.participant_name.clone(),
                to: creditor.balance.participant_id.clone(),
                to_name: creditor.balance.participant_name.clone(),
                amount: amount.amount(),
                group_id: debtor.balance.group_id.clone(),
                group_name: debtor.balance.group_name.clone(),
            });
        }

        debtor.remaining += amount;
        creditor.remaining -= amount;

        if is_negligible(debtor.remaining.amount()) {
            d += 1;
        }
        if is_negligible(creditor.remaining.amount()) {
            c += 1;
        }
    }

    let residual: Cents = debtors[d..]
        .iter()
        .chain(&creditors[c..])
        .map(|party| party.remaining)
        .fold(Cents::ZERO, |acc, remaining| acc + remaining);
    if !residual.is_zero() {
        tracing::warn!(
            group = %group_id,
            residual = %residual,
            "dropping unmatched residual"
        );
    }

    tracing::debug!(
        group = %group_id,
        suggestions = suggestions.len(),
        "planned settlements"
    );

    suggestions
}
