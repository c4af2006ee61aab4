use crate::types::features::{FeatureMap, WalletFeatures};
use crate::types::transaction::Transaction;
use rayon::prelude::*;

pub fn aggregate<'a, I>(transactions: I) -> FeatureMap
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut features = FeatureMap::new();
    for tx in transactions {
        add(&mut features, tx);
    }
    features
}

pub fn aggregate_parallel(transactions: &[Transaction]) -> FeatureMap {
    transactions
        .par_iter()
        .fold(FeatureMap::new, |mut features, tx| {
            add(&mut features, tx);
            features
        })
        .reduce(FeatureMap::new, merge)
}

pub fn aggregate_shards(shards: &[&[Transaction]]) -> FeatureMap {
    shards
        .par_iter()
        .map(|shard| aggregate(shard.iter()))
        .reduce(FeatureMap::new, merge)
}

pub fn merge(mut left: FeatureMap, right: FeatureMap) -> FeatureMap {
    for (wallet, partial) in right {
        match left.get_mut(&wallet) {
            Some(existing) => existing.merge(&partial),
            None => {
                left.insert(wallet, partial);
            }
        }
    }
    left
}

fn add(features: &mut FeatureMap, tx: &Transaction) {
    match features.get_mut(&tx.wallet_address) {
        Some(existing) => existing.record(tx),
        None => {
            features.insert(tx.wallet_address.clone(), WalletFeatures::from_transaction(tx));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::Action;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx(wallet: &str, action: Action, amount: Decimal, secs: i64) -> Transaction {
        Transaction::new(
            wallet,
            action,
            amount,
            Utc.timestamp_opt(secs, 0).single().expect("valid timestamp"),
        )
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("0xaaa", Action::Deposit, dec!(10000), 1_000),
            tx("0xbbb", Action::Borrow, dec!(2000), 500),
            tx("0xaaa", Action::Borrow, dec!(5000), 2_000),
            tx("0xbbb", Action::Liquidation, dec!(0), 900),
            tx("0xaaa", Action::Repay, dec!(5000), 9_640_000),
            tx("0xbbb", Action::Liquidation, dec!(0), 700),
        ]
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(aggregate(&Vec::<Transaction>::new()).is_empty());
        assert!(aggregate_parallel(&[]).is_empty());
    }

    #[test]
    fn groups_by_wallet() {
        let features = aggregate(&sample());
        assert_eq!(features.len(), 2);

        let a = &features["0xaaa"];
        assert_eq!(a.total_deposited_usd, dec!(10000));
        assert_eq!(a.total_borrowed_usd, dec!(5000));
        assert_eq!(a.total_repaid_usd, dec!(5000));
        assert_eq!(a.first_seen.timestamp(), 1_000);
        assert_eq!(a.last_seen.timestamp(), 9_640_000);

        let b = &features["0xbbb"];
        assert_eq!(b.liquidation_count, 2);
        assert_eq!(b.first_seen.timestamp(), 500);
        assert_eq!(b.last_seen.timestamp(), 900);
    }

    #[test]
    fn parallel_and_sharded_match_sequential() {
        let txs = sample();
        let sequential = aggregate(&txs);
        assert_eq!(aggregate_parallel(&txs), sequential);

        let (head, tail) = txs.split_at(4);
        assert_eq!(aggregate_shards(&[tail, head]), sequential);
        assert_eq!(aggregate_shards(&[head, tail]), sequential);
    }

    #[test]
    fn merge_is_commutative() {
        let txs = sample();
        let (head, tail) = txs.split_at(2);
        let left = aggregate(head);
        let right = aggregate(tail);
        assert_eq!(merge(left.clone(), right.clone()), merge(right, left));
    }

    #[test]
    fn totals_near_decimal_precision_ignore_order_and_sharding() {
        let a = tx("0xwhale", Action::Deposit, dec!(9000000000000000000000000), 1);
        let b = tx("0xwhale", Action::Deposit, dec!(0.0004), 2);
        let c = tx("0xwhale", Action::Deposit, dec!(0.0004), 3);

        let forward = aggregate([&a, &b, &c]);
        let shuffled = aggregate([&b, &c, &a]);
        let head = vec![a.clone()];
        let tail = vec![b.clone(), c.clone()];
        let sharded = aggregate_shards(&[head.as_slice(), tail.as_slice()]);

        assert_eq!(forward, shuffled);
        assert_eq!(forward, sharded);
        let whale = &forward["0xwhale"];
        assert!(!whale.overflowed);
        assert_eq!(
            whale.total_deposited_usd.to_string(),
            "9000000000000000000000000.00"
        );
        assert_eq!(
            shuffled["0xwhale"].total_deposited_usd.to_string(),
            whale.total_deposited_usd.to_string()
        );
    }

    fn arb_transaction() -> impl Strategy<Value = Transaction> {
        (
            prop::sample::select(vec!["0xaaa", "0xbbb", "0xccc"]),
            prop::sample::select(vec![
                Action::Deposit,
                Action::Borrow,
                Action::Repay,
                Action::Liquidation,
                Action::Redeem,
            ]),
            0i64..10_000_000,
            0u32..6,
            0i64..100_000_000,
        )
            .prop_map(|(wallet, action, mantissa, scale, secs)| {
                tx(wallet, action, Decimal::new(mantissa, scale), secs)
            })
    }

    proptest! {
        #[test]
        fn aggregation_ignores_input_order(
            (txs, shuffled) in prop::collection::vec(arb_transaction(), 0..60)
                .prop_flat_map(|txs| {
                    let shuffled = Just(txs.clone()).prop_shuffle();
                    (Just(txs), shuffled)
                })
        ) {
            prop_assert_eq!(aggregate(&txs), aggregate(&shuffled));
            prop_assert_eq!(aggregate_parallel(&shuffled), aggregate(&txs));
        }
    }
}
