/**
 * Cryptographic types and operations.
 *  - RSA identity keys and their PEM encodings
 *  - The on-disk keystore
 *  - Per-package AES-GCM session keys and
 *     their RSA-OAEP wrapping
 */
pub mod crypto;
/**
 * The signed, encrypted package envelope:
 *  building, canonical digest, verification
 *  and decryption.
 */
pub mod envelope;
/**
 * Storage abstraction for the relay: public
 *  key directory plus package store, with an
 *  in-memory implementation.
 */
pub mod relay_store;
