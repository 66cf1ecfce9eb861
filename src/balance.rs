//! Balance calculator.
//!
//! Balances are always recomputed from the expense records of a group. The
//! accumulation is plain addition, so the result does not depend on the order
//! of the expenses.
use std::collections::HashMap;

use crate::{Balance, Expense, Group, Payment, ResultSettle, SettleError};

/// Computes the net balance of every participant of `group`.
///
/// Returns one [`Balance`] per participant, in the group's participant order,
/// including participants that never paid nor owed anything.
///
/// # Errors
///
/// Fails without partial result if any expense is invalid for the group.
///
/// ```rust
/// use settle_up::{compute_balances, Expense, Group};
///
/// let group = Group::new("g", "Trip")
///     .with_participant("alice", "Alice")
///     .with_participant("bob", "Bob");
/// let expenses = [Expense::new("e1", "g", "alice", 30.0, &["alice", "bob"])];
///
/// let balances = compute_balances(&group, &expenses).unwrap();
/// assert_eq!(balances[0].amount, 15.0);
/// assert_eq!(balances[1].amount, -15.0);
/// ```
pub fn compute_balances(group: &Group, expenses: &[Expense]) -> ResultSettle<Vec<Balance>> {
    compute_balances_with_payments(group, expenses, &[])
}

/// Same as [`compute_balances`], also applying the completed `payments`.
///
/// A completed payment raises the sender's balance and lowers the receiver's
/// by its amount. Pending payments are ignored.
pub fn compute_balances_with_payments(
    group: &Group,
    expenses: &[Expense],
    payments: &[Payment],
) -> ResultSettle<Vec<Balance>> {
    group.ensure_unique_participants()?;

    let mut accumulators: HashMap<&str, f64> = group
        .participants
        .iter()
        .map(|participant| (participant.id.as_str(), 0.0))
        .collect();

    for expense in expenses {
        expense.validate(group)?;

        if let Some(payer) = accumulators.get_mut(expense.payer_id.as_str()) {
            *payer += expense.amount;
        }

        let share = expense.amount / expense.involved.len() as f64;

        for id in &expense.involved {
            if let Some(involved) = accumulators.get_mut(id.as_str()) {
                *involved -= share;
            }
        }
    }

    for payment in payments.iter().filter(|payment| payment.is_completed()) {
        payment.validate(group)?;

        if let Some(from) = accumulators.get_mut(payment.from_id.as_str()) {
            *from += payment.amount;
        }
        if let Some(to) = accumulators.get_mut(payment.to_id.as_str()) {
            *to -= payment.amount;
        }
    }

    let balances: Vec<Balance> = group
        .participants
        .iter()
        .map(|participant| Balance {
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            amount: accumulators
                .get(participant.id.as_str())
                .copied()
                .unwrap_or_default(),
        })
        .collect();

    tracing::debug!(
        group = %group.id,
        participants = balances.len(),
        expenses = expenses.len(),
        payments = payments.len(),
        "computed balances"
    );

    Ok(balances)
}

/// Computes the balances of several groups at once.
///
/// Expenses and payments are routed to their group by `group_id`; the result
/// lists each group's balances in the order of `groups`.
///
/// # Errors
///
/// [`SettleError::UnknownGroup`] if a record names a group not in `groups`,
/// otherwise any error of [`compute_balances_with_payments`].
pub fn compute_balances_for_groups(
    groups: &[Group],
    expenses: &[Expense],
    payments: &[Payment],
) -> ResultSettle<Vec<Balance>> {
    let mut expenses_by_group: HashMap<&str, Vec<Expense>> = HashMap::new();
    let mut payments_by_group: HashMap<&str, Vec<Payment>> = HashMap::new();

    for group in groups {
        if expenses_by_group.contains_key(group.id.as_str()) {
            return Err(SettleError::DuplicateGroup(group.id.clone()));
        }
        expenses_by_group.insert(group.id.as_str(), Vec::new());
        payments_by_group.insert(group.id.as_str(), Vec::new());
    }

    for expense in expenses {
        expenses_by_group
            .get_mut(expense.group_id.as_str())
            .ok_or_else(|| SettleError::UnknownGroup(expense.group_id.clone()))?
            .push(expense.clone());
    }

    for payment in payments {
        payments_by_group
            .get_mut(payment.group_id.as_str())
            .ok_or_else(|| SettleError::UnknownGroup(payment.group_id.clone()))?
            .push(payment.clone());
    }

    let mut balances = Vec::new();
    for group in groups {
        let expenses = expenses_by_group
            .get(group.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let payments = payments_by_group
            .get(group.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        balances.extend(compute_balances_with_payments(group, expenses, payments)?);
    }

    Ok(balances)
}

/// Sums balances per group, in first-appearance order.
pub fn group_totals(balances: &[Balance]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for balance in balances {
        match totals.iter_mut().find(|(group, _)| *group == balance.group_id) {
            Some((_, total)) => *total += balance.amount,
            None => totals.push((balance.group_id.clone(), balance.amount)),
        }
    }
    totals
}
