use crate::error::IntegrityError;
use crate::types::transaction::{quantize_usd, Action, Transaction, USD_SCALE};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

const SECONDS_PER_DAY: i64 = 86_400;

pub type FeatureMap = BTreeMap<String, WalletFeatures>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletFeatures {
    pub total_deposited_usd: Decimal,
    pub total_borrowed_usd: Decimal,
    pub total_repaid_usd: Decimal,
    pub deposit_count: u64,
    pub borrow_count: u64,
    pub repay_count: u64,
    pub redeem_count: u64,
    pub liquidation_count: u64,
    pub transaction_count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    // set once a sum no longer fits at cent precision
    pub overflowed: bool,
}

impl WalletFeatures {
    pub fn from_transaction(tx: &Transaction) -> Self {
        let mut features = Self {
            total_deposited_usd: Decimal::new(0, USD_SCALE),
            total_borrowed_usd: Decimal::new(0, USD_SCALE),
            total_repaid_usd: Decimal::new(0, USD_SCALE),
            deposit_count: 0,
            borrow_count: 0,
            repay_count: 0,
            redeem_count: 0,
            liquidation_count: 0,
            transaction_count: 0,
            first_seen: tx.timestamp,
            last_seen: tx.timestamp,
            overflowed: false,
        };
        features.record(tx);
        features
    }

    pub fn record(&mut self, tx: &Transaction) {
        self.transaction_count += 1;
        self.first_seen = self.first_seen.min(tx.timestamp);
        self.last_seen = self.last_seen.max(tx.timestamp);

        let amount = match quantize_usd(tx.amount_usd) {
            Some(amount) => amount,
            None => {
                self.overflowed = true;
                Decimal::new(0, USD_SCALE)
            }
        };
        match tx.action {
            Action::Deposit => {
                self.deposit_count += 1;
                self.total_deposited_usd =
                    checked_sum(self.total_deposited_usd, amount, &mut self.overflowed);
            }
            Action::Borrow => {
                self.borrow_count += 1;
                self.total_borrowed_usd =
                    checked_sum(self.total_borrowed_usd, amount, &mut self.overflowed);
            }
            Action::Repay => {
                self.repay_count += 1;
                self.total_repaid_usd =
                    checked_sum(self.total_repaid_usd, amount, &mut self.overflowed);
            }
            Action::Liquidation => self.liquidation_count += 1,
            Action::Redeem => self.redeem_count += 1,
        }
    }

    pub fn merge(&mut self, other: &WalletFeatures) {
        self.total_deposited_usd = checked_sum(
            self.total_deposited_usd,
            other.total_deposited_usd,
            &mut self.overflowed,
        );
        self.total_borrowed_usd = checked_sum(
            self.total_borrowed_usd,
            other.total_borrowed_usd,
            &mut self.overflowed,
        );
        self.total_repaid_usd =
            checked_sum(self.total_repaid_usd, other.total_repaid_usd, &mut self.overflowed);
        self.deposit_count += other.deposit_count;
        self.borrow_count += other.borrow_count;
        self.repay_count += other.repay_count;
        self.redeem_count += other.redeem_count;
        self.liquidation_count += other.liquidation_count;
        self.transaction_count += other.transaction_count;
        self.first_seen = self.first_seen.min(other.first_seen);
        self.last_seen = self.last_seen.max(other.last_seen);
        self.overflowed |= other.overflowed;
    }

    pub fn activity_span(&self) -> Duration {
        self.last_seen - self.first_seen
    }

    pub fn activity_span_days(&self) -> Decimal {
        Decimal::from(self.activity_span().num_seconds()) / Decimal::from(SECONDS_PER_DAY)
    }

    pub fn repay_to_borrow_ratio(&self) -> Option<Decimal> {
        if self.total_borrowed_usd <= Decimal::ZERO {
            return None;
        }
        Some(
            self.total_repaid_usd
                .checked_div(self.total_borrowed_usd)
                .unwrap_or(Decimal::MAX),
        )
    }

    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        if self.overflowed {
            return Err(IntegrityError::Overflow);
        }
        for (field, value) in [
            ("total_deposited_usd", self.total_deposited_usd),
            ("total_borrowed_usd", self.total_borrowed_usd),
            ("total_repaid_usd", self.total_repaid_usd),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(IntegrityError::NegativeTotal { field, value });
            }
        }
        if self.first_seen > self.last_seen {
            return Err(IntegrityError::InvertedSpan);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> FeatureSnapshot {
        FeatureSnapshot {
            total_deposited_usd: self.total_deposited_usd,
            total_borrowed_usd: self.total_borrowed_usd,
            total_repaid_usd: self.total_repaid_usd,
            repay_to_borrow_ratio: self.repay_to_borrow_ratio().map(|ratio| ratio.normalize()),
            liquidation_count: self.liquidation_count,
            deposit_count: self.deposit_count,
            borrow_count: self.borrow_count,
            repay_count: self.repay_count,
            redeem_count: self.redeem_count,
            transaction_count: self.transaction_count,
            first_seen: self.first_seen,
            last_seen: self.last_seen,
            activity_span_days: self.activity_span_days().normalize(),
        }
    }
}

// Operands are non-negative cents, so a sum is exact unless it no longer fits
// at cent scale; checked_add would round such a sum instead of failing.
fn checked_sum(total: Decimal, amount: Decimal, overflowed: &mut bool) -> Decimal {
    match total.checked_add(amount) {
        Some(sum) if sum.scale() == USD_SCALE => sum,
        _ => {
            *overflowed = true;
            total
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSnapshot {
    pub total_deposited_usd: Decimal,
    pub total_borrowed_usd: Decimal,
    pub total_repaid_usd: Decimal,
    pub repay_to_borrow_ratio: Option<Decimal>,
    pub liquidation_count: u64,
    pub deposit_count: u64,
    pub borrow_count: u64,
    pub repay_count: u64,
    pub redeem_count: u64,
    pub transaction_count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub activity_span_days: Decimal,
}
