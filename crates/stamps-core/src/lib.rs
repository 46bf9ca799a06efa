//! Bitcoin Stamps / SRC-20 transaction-construction core.
//!
//! Pure, synchronous functions that turn a payload or a tagged SRC-20
//! operation into an unsigned Bitcoin transaction: protocol encoders
//! (`encode`), a UTXO selector engine (`selector`), and a transaction
//! assembler (`assembler`). The core never performs network I/O, never
//! manages keys, and never signs — callers hand it validated UTXOs and
//! get back a fully materialized, unsigned transaction.

pub mod address;
pub mod assembler;
pub mod asset;
pub mod encode;
pub mod error;
pub mod fee;
pub mod model;
pub mod network;
pub mod rc4;
pub mod selector;

pub use asset::AssetIdentifier;
pub use encode::src20::{encode_src20, Src20Operation};
pub use encode::stamp::{encode_stamp, StampOptions};
pub use error::StampError;
pub use model::{ScriptType, TransactionOutput, Utxo};
pub use selector::{select, Selector, SelectionOptions, SelectionResult};
