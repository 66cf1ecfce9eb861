use std::collections::HashMap;

use proptest::prelude::*;
use settle_up::{
    compute_balances, compute_balances_for_groups, suggest_settlements, Balance, Expense, Group,
    NEGLIGIBLE, ZERO_SUM_TOLERANCE,
};

fn group(id: &str, members: usize) -> Group {
    (0..members).fold(Group::new(id, id.to_uppercase()), |group, idx| {
        group.with_participant(format!("m{idx}"), format!("Member {idx}"))
    })
}

/// (amount in cents, payer index, bitmask of involved members)
fn raw_expenses() -> impl Strategy<Value = Vec<(u32, usize, u8)>> {
    prop::collection::vec((0u32..=100_000, 0usize..=5, 1u8..=63), 0..=30)
}

fn build_expenses(group_id: &str, members: usize, raw: &[(u32, usize, u8)]) -> Vec<Expense> {
    raw.iter()
        .enumerate()
        .map(|(idx, &(cents, payer, mask))| {
            let mut involved: Vec<String> = (0..members)
                .filter(|member| mask & (1 << member) != 0)
                .map(|member| format!("m{member}"))
                .collect();
            if involved.is_empty() {
                involved.push(format!("m{}", payer % members));
            }
            let involved: Vec<&str> = involved.iter().map(String::as_str).collect();
            Expense::new(
                format!("{group_id}-e{idx}"),
                group_id,
                format!("m{}", payer % members),
                f64::from(cents) / 100.0,
                &involved,
            )
        })
        .collect()
}

fn apply(balances: &[Balance], suggestions: &[settle_up::PaymentSuggestion]) -> Vec<f64> {
    let mut remaining: HashMap<(&str, &str), f64> = balances
        .iter()
        .map(|b| ((b.group_id.as_str(), b.participant_id.as_str()), b.amount))
        .collect();

    for suggestion in suggestions {
        *remaining
            .get_mut(&(suggestion.group_id.as_str(), suggestion.from.as_str()))
            .expect("unknown debtor") += suggestion.amount;
        *remaining
            .get_mut(&(suggestion.group_id.as_str(), suggestion.to.as_str()))
            .expect("unknown creditor") -= suggestion.amount;
    }

    remaining.into_values().collect()
}

/// Largest amount a participant may still owe or be owed after settling.
///
/// Sub-cent balances are left out of the matching, so whatever they hold can
/// end up unmatched on the other side.
fn settle_slack(balances: &[Balance]) -> f64 {
    let dropped: f64 = balances
        .iter()
        .filter(|b| b.amount.abs() < NEGLIGIBLE)
        .map(|b| b.amount.abs())
        .sum();
    NEGLIGIBLE * 1.5 + dropped
}

proptest! {
    #[test]
    fn balances_sum_to_zero(members in 1usize..=6, raw in raw_expenses()) {
        let group = group("g", members);
        let expenses = build_expenses("g", members, &raw);

        let balances = compute_balances(&group, &expenses).unwrap();
        let total: f64 = balances.iter().map(|b| b.amount).sum();

        prop_assert_eq!(balances.len(), members);
        prop_assert!(total.abs() < ZERO_SUM_TOLERANCE * 1_000.0, "total = {}", total);
    }

    #[test]
    fn settlements_bring_everyone_to_zero(members in 1usize..=6, raw in raw_expenses()) {
        let group = group("g", members);
        let expenses = build_expenses("g", members, &raw);

        let balances = compute_balances(&group, &expenses).unwrap();
        let suggestions = suggest_settlements(&balances);

        prop_assert!(suggestions.iter().all(|s| s.amount >= NEGLIGIBLE));
        prop_assert!(suggestions.len() < members.max(1));
        let slack = settle_slack(&balances);
        for remaining in apply(&balances, &suggestions) {
            prop_assert!(remaining.abs() < slack, "remaining = {}", remaining);
        }
    }

    #[test]
    fn settlements_stay_within_their_group(
        trip_members in 1usize..=6,
        flat_members in 1usize..=6,
        trip_raw in raw_expenses(),
        flat_raw in raw_expenses(),
    ) {
        let groups = [group("trip", trip_members), group("flat", flat_members)];
        let mut expenses = build_expenses("trip", trip_members, &trip_raw);
        expenses.extend(build_expenses("flat", flat_members, &flat_raw));

        let balances = compute_balances_for_groups(&groups, &expenses, &[]).unwrap();
        let suggestions = suggest_settlements(&balances);

        for suggestion in &suggestions {
            let members: Vec<&str> = balances
                .iter()
                .filter(|b| b.group_id == suggestion.group_id)
                .map(|b| b.participant_id.as_str())
                .collect();
            prop_assert!(members.contains(&suggestion.from.as_str()));
            prop_assert!(members.contains(&suggestion.to.as_str()));
            prop_assert_ne!(&suggestion.from, &suggestion.to);
        }
        let slack = settle_slack(&balances);
        for remaining in apply(&balances, &suggestions) {
            prop_assert!(remaining.abs() < slack, "remaining = {}", remaining);
        }
    }

    #[test]
    fn equal_split_excluding_payer(amount in 0u32..=100_000, members in 2usize..=6) {
        let group = group("g", members);
        let involved: Vec<String> = (1..members).map(|m| format!("m{m}")).collect();
        let involved: Vec<&str> = involved.iter().map(String::as_str).collect();
        let amount = f64::from(amount) / 100.0;
        let expenses = [Expense::new("e", "g", "m0", amount, &involved)];

        let balances = compute_balances(&group, &expenses).unwrap();
        let share = amount / (members - 1) as f64;

        prop_assert_eq!(balances[0].amount, amount);
        for balance in &balances[1..] {
            prop_assert_eq!(balance.amount, -share);
        }
    }
}
