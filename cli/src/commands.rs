//! Subcommand implementations.
//!
//! Each command returns the JSON document `main` prints, so the logic can
//! be exercised without capturing stdout.

use anyhow::{Context, Result};
use serde_json::{json, Value};

use quill_protocol::clock::{Clock, FixedClock};
use quill_protocol::config::ProtocolConfig;
use quill_protocol::crypto::keys::{QuillKeypair, QuillSignature};
use quill_protocol::identity::Address;
use quill_protocol::ledger::{LedgerSnapshot, MemoryLedger};
use quill_protocol::transaction::{
    result_code, verify_transaction, ArbitraryTransactionBuilder, Transaction, TransactionError,
};

use crate::cli::{DecodeArgs, KeygenArgs, SignArgs, ValidateArgs};

/// `quill keygen`
pub fn keygen(args: &KeygenArgs) -> Result<Value> {
    let keypair = match &args.seed {
        Some(seed) => QuillKeypair::from_hex(seed).context("invalid --seed")?,
        None => QuillKeypair::generate(),
    };
    let public_key = keypair.public_key();

    tracing::info!(public_key = %public_key.to_hex(), "keypair ready");

    Ok(json!({
        "secret_key": hex::encode(keypair.secret_key_bytes()),
        "public_key": public_key.to_hex(),
        "address": Address::from_public_key(&public_key).to_base58(),
    }))
}

/// `quill sign`
pub fn sign(args: &SignArgs, clock: &dyn Clock) -> Result<Value> {
    let keypair = QuillKeypair::from_hex(&args.secret_key).context("invalid --secret-key")?;
    let reference = QuillSignature::from_base58(&args.reference).context("invalid --reference")?;
    let data = match (&args.data, &args.data_hex) {
        (_, Some(h)) => hex::decode(h).context("invalid --data-hex")?,
        (Some(text), None) => text.as_bytes().to_vec(),
        (None, None) => Vec::new(),
    };

    let tx = ArbitraryTransactionBuilder::new(args.service)
        .data(data)
        .fee(args.fee)
        .timestamp(args.timestamp.unwrap_or_else(|| clock.now()))
        .sign_with_reference(&keypair, reference);
    let tx = Transaction::from(tx);

    tracing::info!(id = %tx.id(), len = tx.data_length(), "signed transaction");

    Ok(json!({
        "hex": hex::encode(tx.encode()),
        "transaction": tx.to_json(),
    }))
}

/// `quill decode`
pub fn decode(args: &DecodeArgs) -> Result<Value> {
    let bytes = hex::decode(args.hex.trim()).context("transaction is not valid hex")?;
    let tx = Transaction::decode(&bytes).context("failed to decode transaction")?;

    Ok(json!({
        "id": tx.id(),
        "length": tx.data_length(),
        "signature_valid": tx.is_signature_valid(),
        "transaction": tx.to_json(),
    }))
}

/// `quill validate`
///
/// Builds a ledger holding only the creator's account and runs the full
/// admission check. Undecodable input is reported as a result code, not
/// an error, so scripts see one shape of output.
pub fn validate(args: &ValidateArgs, config: &ProtocolConfig, clock: &dyn Clock) -> Result<Value> {
    let bytes = hex::decode(args.hex.trim()).context("transaction is not valid hex")?;
    let last_reference = args
        .last_reference
        .as_deref()
        .map(QuillSignature::from_base58)
        .transpose()
        .context("invalid --last-reference")?;
    let now = args.now.unwrap_or_else(|| clock.now());

    let outcome = Transaction::decode(&bytes)
        .map_err(TransactionError::from)
        .and_then(|tx| {
            let creator = Address::from_public_key(tx.creator());
            let mut ledger = MemoryLedger::new();
            ledger.set_confirmed_balance(&creator, args.balance);
            if let Some(reference) = last_reference {
                ledger.set_last_reference(&creator, reference);
            }
            verify_transaction(&tx, &ledger, &FixedClock::new(now), config)
        });

    let code = result_code(&outcome);
    tracing::info!(code = code.as_u16(), "validation finished");

    Ok(json!({
        "valid": outcome.is_ok(),
        "code": code.as_u16(),
        "result": code,
        "message": outcome.err().map(|e| e.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_protocol::config::ARBITRARY_TRANSACTIONS_RELEASE;
    use quill_protocol::transaction::Amount;

    const SEED: &str = "0101010101010101010101010101010101010101010101010101010101010101";
    const NOW: i64 = 1_700_000_000_000;

    fn reference() -> QuillSignature {
        QuillSignature::from_bytes([0xAA; 64])
    }

    fn signed_hex(data: &str, fee: Amount) -> String {
        let args = SignArgs {
            secret_key: SEED.to_string(),
            service: 1,
            data: Some(data.to_string()),
            data_hex: None,
            fee,
            reference: reference().to_base58(),
            timestamp: None,
        };
        let out = sign(&args, &FixedClock::new(NOW)).unwrap();
        out["hex"].as_str().unwrap().to_string()
    }

    fn validate_args(hex: String, balance: Amount) -> ValidateArgs {
        ValidateArgs {
            hex,
            balance,
            last_reference: Some(reference().to_base58()),
            now: None,
        }
    }

    #[test]
    fn keygen_from_seed_is_deterministic() {
        let args = KeygenArgs {
            seed: Some(SEED.to_string()),
        };
        let a = keygen(&args).unwrap();
        let b = keygen(&args).unwrap();
        assert_eq!(a, b);
        assert_eq!(a["secret_key"], SEED);
        let address: Address = a["address"].as_str().unwrap().parse().unwrap();
        let keypair = QuillKeypair::from_hex(SEED).unwrap();
        assert!(address.belongs_to(&keypair.public_key()));
    }

    #[test]
    fn keygen_rejects_bad_seed() {
        let args = KeygenArgs {
            seed: Some("zz".to_string()),
        };
        assert!(keygen(&args).is_err());
    }

    #[test]
    fn sign_then_decode() {
        let hex = signed_hex("hello", Amount::from_units(100));
        let out = decode(&DecodeArgs { hex }).unwrap();
        assert_eq!(out["signature_valid"], true);
        assert_eq!(out["length"], 4 + 184 + 5);
        assert_eq!(out["transaction"]["timestamp"], NOW);
        assert_eq!(out["transaction"]["fee"], "0.00000100");
        assert_eq!(out["transaction"]["reference"], reference().to_base58());
    }

    #[test]
    fn sign_accepts_hex_payload() {
        let args = SignArgs {
            secret_key: SEED.to_string(),
            service: -1,
            data: None,
            data_hex: Some("00ff".to_string()),
            fee: Amount::from_units(1),
            reference: reference().to_base58(),
            timestamp: Some(5),
        };
        let out = sign(&args, &FixedClock::new(NOW)).unwrap();
        assert_eq!(out["transaction"]["service"], -1);
        assert_eq!(out["transaction"]["timestamp"], 5);
    }

    #[test]
    fn decode_reports_malformed_input() {
        assert!(decode(&DecodeArgs { hex: "0000000a".into() }).is_err());
        assert!(decode(&DecodeArgs { hex: "not hex".into() }).is_err());
    }

    #[test]
    fn validate_accepts_funded_account() {
        let hex = signed_hex("hello", Amount::from_units(100));
        let out = validate(
            &validate_args(hex, Amount::from_coins(10).unwrap()),
            &ProtocolConfig::default(),
            &FixedClock::new(NOW),
        )
        .unwrap();
        assert_eq!(out["valid"], true);
        assert_eq!(out["code"], 1);
        assert_eq!(out["message"], Value::Null);
    }

    #[test]
    fn validate_reports_codes() {
        let hex = signed_hex("hello", Amount::from_units(100));

        let poor = validate(
            &validate_args(hex.clone(), Amount::from_units(99)),
            &ProtocolConfig::default(),
            &FixedClock::new(NOW),
        )
        .unwrap();
        assert_eq!(poor["valid"], false);
        assert_eq!(poor["code"], 5);
        assert_eq!(poor["result"], "InsufficientBalance");

        let mut early = validate_args(hex, Amount::from_coins(10).unwrap());
        early.now = Some(ARBITRARY_TRANSACTIONS_RELEASE - 1);
        let out = validate(&early, &ProtocolConfig::default(), &FixedClock::new(NOW)).unwrap();
        assert_eq!(out["code"], 1000);
    }

    #[test]
    fn validate_reports_malformed_as_code() {
        let out = validate(
            &validate_args("0000000a00".into(), Amount::ZERO),
            &ProtocolConfig::default(),
            &FixedClock::new(NOW),
        )
        .unwrap();
        assert_eq!(out["valid"], false);
        assert_eq!(out["code"], 1002);
    }
}
