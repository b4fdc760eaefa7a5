use rust_decimal::Decimal;

/// Money columns are `NUMERIC(10, 2)`: two decimals, below this bound
pub const AMOUNT_CEILING: i64 = 100_000_000;

const AMOUNT_SCALE: u32 = 2;

/// Round `amount` to cents, or `None` when the result does not fit a money column
pub fn stored_amount(amount: Decimal) -> Option<Decimal> {
    let rounded = amount.round_dp(AMOUNT_SCALE);
    (rounded.abs() < Decimal::from(AMOUNT_CEILING)).then_some(rounded)
}
