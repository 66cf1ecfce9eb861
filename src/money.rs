use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// Smallest amount a balance or a suggested transfer must reach to matter.
///
/// Anything strictly below one cent is treated as settled. A transfer of
/// exactly one cent is still suggested: with a strict `> 0.01` rule a one-cent
/// debt could never be matched nor dropped, and the two parties would keep
/// blocking each other.
pub const NEGLIGIBLE: f64 = 0.01;

/// Largest amount accepted for a single expense or payment.
///
/// Keeps every balance far inside the range of [`Cents`].
pub const MAX_AMOUNT: f64 = 1e12;

/// Largest balance magnitude the settlement planner will match.
///
/// Larger or non-finite balances can only come from corrupt input and are
/// left out of the matching.
pub const MAX_BALANCE: f64 = 1e15;

/// Tolerance used when checking that the balances of a group sum to zero.
pub const ZERO_SUM_TOLERANCE: f64 = 1e-9;

/// Currency amount represented as integer cents.
///
/// Balances are accumulated as `f64` and only converted to cents for display
/// and for matching debtors with creditors.
///
/// ```rust
/// use settle_up::Cents;
///
/// assert_eq!(Cents::from_amount(17.5).cents(), 1750);
/// assert_eq!(Cents::from_amount(-2.5).to_string(), "-2.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Rounds a currency amount to the nearest cent.
    ///
    /// Saturates at the bounds of `i64`; NaN maps to zero.
    #[must_use]
    pub fn from_amount(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn amount(self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Self::Output {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Self::Output {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Cents {
    fn sub_assign(&mut self, rhs: Cents) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Cents {
    type Output = Cents;

    fn neg(self) -> Self::Output {
        Cents(self.0.saturating_neg())
    }
}

/// Rounds an amount to currency precision (2 decimals).
#[must_use]
pub fn round_currency(amount: f64) -> f64 {
    Cents::from_amount(amount).amount()
}

/// Returns `true` if the amount is below one cent in magnitude.
#[must_use]
pub fn is_negligible(amount: f64) -> bool {
    amount.abs() < NEGLIGIBLE
}

/// Converts amounts to cents so that the cents sum to the rounded total.
///
/// Each value is floored to a cent and the missing cents go to the values with
/// the largest remainders (ties to the earlier value). Every result is within
/// one cent of its input, and a zero-summing input yields cents summing to 0.
#[must_use]
pub fn distribute_cents(amounts: &[f64]) -> Vec<Cents> {
    let scaled: Vec<f64> = amounts
        .iter()
        .map(|amount| {
            let scaled = amount * 100.0;
            // Snap float noise such as 28.999999999999996 back to a whole cent.
            if (scaled - scaled.round()).abs() < 1e-6 {
                scaled.round()
            } else {
                scaled
            }
        })
        .collect();

    let mut floors: Vec<i64> = scaled.iter().map(|s| s.floor() as i64).collect();
    let target = scaled.iter().sum::<f64>().round() as i64;
    let floored = floors.iter().fold(0i64, |acc, floor| acc.saturating_add(*floor));
    let missing = target
        .saturating_sub(floored)
        .clamp(0, floors.len() as i64) as usize;

    let mut by_remainder: Vec<usize> = (0..scaled.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = scaled[a] - scaled[a].floor();
        let rb = scaled[b] - scaled[b].floor();
        rb.total_cmp(&ra)
    });

    for &index in by_remainder.iter().take(missing) {
        floors[index] = floors[index].saturating_add(1);
    }

    floors.into_iter().map(Cents).collect()
}
