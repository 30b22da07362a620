//! The shared transaction contract.
//!
//! [`Transaction`] is a closed enum with one case per transaction kind.
//! Decoding reads the four-byte type tag and hands the rest of the buffer to
//! the matching variant; every other operation is a straight dispatch.
//! Adding a variant means adding a case here and a tag in
//! [`TransactionType`], and the compiler points at every match that needs
//! updating.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::arbitrary::ArbitraryTransaction;
use super::codec::{DecodeError, WireReader};
use super::types::{Amount, TransactionType};
use super::verification::TransactionError;
use crate::config::{ProtocolConfig, TYPE_LENGTH};
use crate::crypto::keys::{QuillPublicKey, QuillSignature};
use crate::identity::Address;
use crate::ledger::{LedgerSnapshot, StateError};

/// Any transaction the ledger understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Arbitrary(ArbitraryTransaction),
}

impl From<ArbitraryTransaction> for Transaction {
    fn from(tx: ArbitraryTransaction) -> Self {
        Self::Arbitrary(tx)
    }
}

impl Transaction {
    /// Decode a transaction from its canonical encoding.
    ///
    /// # Errors
    ///
    /// A [`DecodeError`] if the buffer is too short, names an unknown type,
    /// or declares a payload that runs past its end. Business rules are not
    /// checked here.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < TYPE_LENGTH {
            return Err(DecodeError::TooShort {
                expected: TYPE_LENGTH,
                actual: bytes.len(),
            });
        }

        let tag = WireReader::new(bytes).read_u32("type")?;
        let body = &bytes[TYPE_LENGTH..];

        let decoded = match TransactionType::from_tag(tag) {
            Some(TransactionType::Arbitrary) => ArbitraryTransaction::decode_body(body).map(Self::from),
            None => Err(DecodeError::UnknownType(tag)),
        };

        if let Err(ref e) = decoded {
            debug!(tag, len = bytes.len(), error = %e, "discarding undecodable transaction bytes");
        }
        decoded
    }

    /// Canonical wire encoding.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Arbitrary(tx) => tx.encode(),
        }
    }

    /// The bytes covered by the signature.
    pub fn signing_payload(&self) -> Vec<u8> {
        match self {
            Self::Arbitrary(tx) => tx.signing_payload(),
        }
    }

    /// Length of [`encode`](Self::encode)'s output, without encoding.
    pub fn data_length(&self) -> usize {
        match self {
            Self::Arbitrary(tx) => tx.data_length(),
        }
    }

    // -- shared fields ------------------------------------------------------

    pub fn tx_type(&self) -> TransactionType {
        match self {
            Self::Arbitrary(_) => TransactionType::Arbitrary,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Self::Arbitrary(tx) => tx.timestamp(),
        }
    }

    pub fn reference(&self) -> &QuillSignature {
        match self {
            Self::Arbitrary(tx) => tx.reference(),
        }
    }

    pub fn fee(&self) -> Amount {
        match self {
            Self::Arbitrary(tx) => tx.fee(),
        }
    }

    pub fn signature(&self) -> &QuillSignature {
        match self {
            Self::Arbitrary(tx) => tx.signature(),
        }
    }

    pub fn creator(&self) -> &QuillPublicKey {
        match self {
            Self::Arbitrary(tx) => tx.creator(),
        }
    }

    /// Human-facing transaction id: the Base58 signature.
    pub fn id(&self) -> String {
        self.signature().to_base58()
    }

    // -- lifecycle ----------------------------------------------------------

    pub fn is_signature_valid(&self) -> bool {
        match self {
            Self::Arbitrary(tx) => tx.is_signature_valid(),
        }
    }

    /// Validate against `ledger` at time `now` (ms). See the variant for
    /// the exact check order.
    pub fn validate<L>(
        &self,
        ledger: &L,
        now: i64,
        config: &ProtocolConfig,
    ) -> Result<(), TransactionError>
    where
        L: LedgerSnapshot + ?Sized,
    {
        match self {
            Self::Arbitrary(tx) => tx.validate(ledger, now, config),
        }
    }

    pub fn process<L>(&self, ledger: &mut L) -> Result<(), StateError>
    where
        L: LedgerSnapshot + ?Sized,
    {
        match self {
            Self::Arbitrary(tx) => tx.process(ledger),
        }
    }

    pub fn orphan<L>(&self, ledger: &mut L) -> Result<(), StateError>
    where
        L: LedgerSnapshot + ?Sized,
    {
        match self {
            Self::Arbitrary(tx) => tx.orphan(ledger),
        }
    }

    // -- involvement --------------------------------------------------------

    pub fn involved_accounts(&self) -> Vec<Address> {
        match self {
            Self::Arbitrary(tx) => tx.involved_accounts(),
        }
    }

    pub fn is_involved(&self, account: &Address) -> bool {
        match self {
            Self::Arbitrary(tx) => tx.is_involved(account),
        }
    }

    /// Signed net amount for `account`. Summed over every account this is
    /// always `-fee`; `None` if that value does not fit in an [`Amount`].
    pub fn amount(&self, account: &Address) -> Option<Amount> {
        match self {
            Self::Arbitrary(tx) => tx.amount(account),
        }
    }

    // -- presentation -------------------------------------------------------

    /// Debug/API representation: the shared base fields plus the variant's
    /// own, with every byte string Base58-encoded.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".into(), json!(self.tx_type().tag()));
        object.insert("fee".into(), json!(self.fee().to_string()));
        object.insert("timestamp".into(), json!(self.timestamp()));
        object.insert("reference".into(), json!(self.reference().to_base58()));
        object.insert("signature".into(), json!(self.signature().to_base58()));

        let fields = match self {
            Self::Arbitrary(tx) => tx.json_fields(),
        };
        if let Value::Object(fields) = fields {
            object.extend(fields);
        }

        Value::Object(object)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
