//! Protocol encoders: deterministic, byte-exact construction of the
//! output-script sequences for Stamp issuance and SRC-20 operations.

pub mod counterparty;
pub mod p2wsh;
pub mod src20;
pub mod stamp;
