//! RC4 stream cipher, used to obfuscate the Counterparty issuance message
//! carried in a Stamp transaction's OP_RETURN output.
//!
//! Encryption and decryption are the same operation (XOR with a keystream
//! derived from the key via the standard 256-byte S-box permutation), so
//! this crate exposes a single `apply` function rather than separate
//! encrypt/decrypt entry points.
//!
//! Hand-rolled rather than pulled from a one-off crate: the algorithm is
//! small, this is its only use site, and every Stamps/Counterparty
//! indexer reimplements it the same way rather than depending on a
//! general-purpose RC4 library.

use rng_utils::zeroizing::ZeroizingBytes;

/// Applies RC4 keystream XOR to `buf` using `key`, returning the result.
///
/// Per the Counterparty protocol's documented quirk, `key` here is the
/// raw UTF-8 bytes of a txid *hex string* (64 ASCII bytes), not the
/// 32 raw bytes the hex decodes to. Callers must pass the hex string's
/// bytes literally to remain bit-compatible with indexers.
pub fn apply(key: &[u8], buf: &[u8]) -> Vec<u8> {
    let key = ZeroizingBytes::from(key);
    let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);

    // Key-scheduling algorithm (KSA).
    let mut j: u8 = 0;
    for i in 0..256usize {
        j = j
            .wrapping_add(s[i])
            .wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }

    // Pseudo-random generation algorithm (PRGA).
    let mut out = Vec::with_capacity(buf.len());
    let mut i: u8 = 0;
    let mut j: u8 = 0;
    for &byte in buf {
        i = i.wrapping_add(1);
        j = j.wrapping_add(s[i as usize]);
        s.swap(i as usize, j as usize);
        let k = s[(s[i as usize].wrapping_add(s[j as usize])) as usize];
        out.push(byte ^ k);
    }
    out
}
