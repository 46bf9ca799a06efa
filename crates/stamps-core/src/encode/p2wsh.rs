//! 32-byte chunking primitive shared by the Stamp and SRC-20 encoders.
//!
//! Splits an opaque byte buffer into fixed 32-byte chunks (the final
//! chunk zero-padded), used in two modes:
//!
//! - "fake P2WSH" (Stamp mode): the 32-byte field is a raw payload
//!   chunk, reconstructed by concatenating chunk payloads in order.
//! - standard P2WSH (SRC-20 mode): the 32-byte field is
//!   `SHA-256(witness_script)`, where the witness script embeds the
//!   chunk behind `OP_FALSE OP_IF <chunk> OP_ENDIF`.

use bitcoin::opcodes::all::{OP_ENDIF, OP_IF, OP_PUSHBYTES_0 as OP_FALSE};
use bitcoin::script::Builder;
use bitcoin::ScriptBuf;
use sha2::{Digest, Sha256};

const CHUNK_SIZE: usize = 32;

/// Splits `data` into 32-byte chunks, zero-padding the final chunk.
pub fn chunk(data: &[u8]) -> Vec<[u8; CHUNK_SIZE]> {
    if data.is_empty() {
        return Vec::new();
    }
    data.chunks(CHUNK_SIZE)
        .map(|slice| {
            let mut buf = [0u8; CHUNK_SIZE];
            buf[..slice.len()].copy_from_slice(slice);
            buf
        })
        .collect()
}

/// Builds a "fake P2WSH" output script: `OP_0 <32-byte payload chunk>`.
/// The 32 bytes here are data, not a script hash.
pub fn fake_p2wsh_script(chunk: &[u8; CHUNK_SIZE]) -> ScriptBuf {
    Builder::new()
        .push_opcode(OP_FALSE)
        .push_slice(chunk)
        .into_script()
}

/// Builds the SRC-20 witness script for one chunk:
/// `OP_FALSE OP_IF <chunk> OP_ENDIF` (36 bytes: 1 + 1 + 1 + 32 + 1).
pub fn src20_witness_script(chunk: &[u8; CHUNK_SIZE]) -> ScriptBuf {
    Builder::new()
        .push_opcode(OP_FALSE)
        .push_opcode(OP_IF)
        .push_slice(chunk)
        .push_opcode(OP_ENDIF)
        .into_script()
}

/// Builds the standard P2WSH output script for a chunk's witness script:
/// `OP_0 <SHA-256(witness_script)>`.
pub fn standard_p2wsh_script(witness_script: &ScriptBuf) -> ScriptBuf {
    let digest: [u8; 32] = Sha256::digest(witness_script.as_bytes()).into();
    Builder::new()
        .push_opcode(OP_FALSE)
        .push_slice(&digest)
        .into_script()
}
