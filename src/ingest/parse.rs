use crate::error::RecordError;
use crate::types::transaction::{quantize_usd, Action, Transaction, USD_SCALE};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

const WALLET_FIELD: &str = "userWallet";
const ACTION_FIELD: &str = "action";
const TIMESTAMP_FIELD: &str = "timestamp";
const ACTION_DATA_FIELD: &str = "actionData";
const AMOUNT_FIELD: &str = "amount";
const PRICE_FIELD: &str = "assetPriceUSD";
const TX_HASH_FIELD: &str = "txHash";

pub fn parse_record(value: &Value) -> Result<Transaction, RecordError> {
    let record = value.as_object().ok_or(RecordError::NotAnObject)?;

    let wallet_address = required_str(record, WALLET_FIELD)?.trim().to_string();
    if wallet_address.is_empty() {
        return Err(RecordError::MissingField(WALLET_FIELD));
    }

    let action = required_str(record, ACTION_FIELD)?
        .parse::<Action>()
        .map_err(RecordError::UnknownAction)?;

    let timestamp = parse_timestamp(
        record
            .get(TIMESTAMP_FIELD)
            .filter(|value| !value.is_null())
            .ok_or(RecordError::MissingField(TIMESTAMP_FIELD))?,
    )?;

    let action_data = record.get(ACTION_DATA_FIELD).and_then(Value::as_object);
    let amount = action_data.and_then(|data| data.get(AMOUNT_FIELD)).filter(|v| !v.is_null());
    let price = action_data.and_then(|data| data.get(PRICE_FIELD)).filter(|v| !v.is_null());

    let amount_usd = match (amount, price) {
        (Some(amount), Some(price)) => {
            let amount = parse_decimal(AMOUNT_FIELD, amount)?;
            let price = parse_decimal(PRICE_FIELD, price)?;
            usd_value(amount, price)?
        }
        (None, _) if action == Action::Liquidation => Decimal::new(0, USD_SCALE),
        (None, _) => return Err(RecordError::MissingField(AMOUNT_FIELD)),
        (Some(_), None) => return Err(RecordError::MissingField(PRICE_FIELD)),
    };

    Ok(Transaction {
        wallet_address,
        action,
        amount_usd,
        timestamp,
    })
}

pub fn tx_hash(value: &Value) -> Option<String> {
    value
        .get(TX_HASH_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn usd_value(amount: Decimal, price: Decimal) -> Result<Decimal, RecordError> {
    let product = amount
        .checked_mul(price)
        .ok_or(RecordError::AmountOverflow)?;
    // checked_mul drops low-order digits instead of failing; that is only
    // harmless while the cents survive.
    let truncated = product.scale() < amount.scale() + price.scale();
    if truncated && product.scale() <= USD_SCALE {
        return Err(RecordError::AmountOverflow);
    }
    quantize_usd(product).ok_or(RecordError::AmountOverflow)
}

fn required_str<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, RecordError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingField(field))
}

fn parse_decimal(field: &'static str, value: &Value) -> Result<Decimal, RecordError> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        // arbitrary_precision keeps the literal digits of JSON numbers
        Value::Number(number) => number.to_string(),
        other => {
            return Err(RecordError::InvalidDecimal {
                field,
                value: other.to_string(),
            })
        }
    };

    let parsed = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| RecordError::InvalidDecimal {
            field,
            value: text.clone(),
        })?;
    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(RecordError::NegativeValue(field));
    }
    Ok(parsed)
}

fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, RecordError> {
    let invalid = || RecordError::InvalidTimestamp(value.to_string());
    let seconds = match value {
        Value::Number(number) => number.as_i64().ok_or_else(invalid)?,
        Value::String(text) => {
            let text = text.trim();
            match text.parse::<i64>() {
                Ok(seconds) => seconds,
                Err(_) => {
                    return DateTime::parse_from_rfc3339(text)
                        .map(|parsed| parsed.with_timezone(&Utc))
                        .map_err(|_| invalid())
                }
            }
        }
        _ => return Err(invalid()),
    };
    DateTime::from_timestamp(seconds, 0).ok_or_else(invalid)
}
