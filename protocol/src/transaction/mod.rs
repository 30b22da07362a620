//! # Transaction Module
//!
//! Decoding, signing, validation, and state application for Quill ledger
//! transactions. Every transaction kind is a variant of [`Transaction`];
//! today that is only the arbitrary-payload transaction.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        - TransactionType tags and the fixed-point Amount
//! codec.rs        - Big-endian wire primitives and DecodeError
//! arbitrary.rs    - ArbitraryTransaction: layout, rules, process/orphan
//! envelope.rs     - The closed Transaction enum and tag dispatch
//! builder.rs      - Fluent ArbitraryTransactionBuilder
//! signing.rs      - Signing flow reading the creator's live reference
//! verification.rs - Result codes, TransactionError, verify_transaction
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build & sign** - [`ArbitraryTransactionBuilder`] with the creator's
//!    keypair, chaining from their current last reference.
//! 2. **Decode** - Peers call [`Transaction::decode`] on received bytes.
//! 3. **Verify** - [`verify_transaction`] checks the signature, then the
//!    ledger rules in a fixed order.
//! 4. **Process** - Block application debits the fee and advances the
//!    creator's reference.
//! 5. **Orphan** - On reorganization the exact inverse is applied.
//!
//! ## Design Decisions
//!
//! - Amounts are `i64` counts of 10^-8 units. No floating point anywhere
//!   near monetary values.
//! - A transaction's id is its Base58 signature. The signature also becomes
//!   the creator's next reference, so history forms a hash chain.
//! - Validation never mutates state; process and orphan are the only writers.

pub mod arbitrary;
pub mod builder;
pub mod codec;
pub mod envelope;
pub mod signing;
pub mod types;
pub mod verification;

pub use arbitrary::ArbitraryTransaction;
pub use builder::ArbitraryTransactionBuilder;
pub use codec::DecodeError;
pub use envelope::Transaction;
pub use signing::{current_reference, sign_arbitrary, SigningError};
pub use types::{Amount, AmountError, TransactionType};
pub use verification::{result_code, verify_transaction, ResultCode, TransactionError};
