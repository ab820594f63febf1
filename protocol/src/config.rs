//! # Protocol Configuration & Constants
//!
//! Every magic number in Ledgerline lives here. If you're hardcoding a
//! constant somewhere else, move it here and save the next reviewer a
//! scavenger hunt.
//!
//! Some of these values are baked into signatures, chain hashes, and vault
//! files already sitting on people's disks. Changing them breaks every one
//! of those, so treat this file as append-mostly.

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// The full protocol version string.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Signing Parameters
// ---------------------------------------------------------------------------

/// Ed25519 seed (secret key) length in bytes. This is all we ever persist.
pub const SEED_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// SHA-256 digest length. Canonical messages and chain links are both this size.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Vault Parameters
// ---------------------------------------------------------------------------

/// AES-256-GCM key length in bytes. Also the scrypt output length.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. 96 bits, prepended to every sealed blob.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

/// Random salt drawn fresh for every vault encryption.
pub const SALT_LENGTH: usize = 16;

/// scrypt CPU/memory cost, as log2(N). N = 2^15 ≈ 32 MiB of memory per
/// derivation with r = 8. Anything lower makes offline guessing cheap.
pub const SCRYPT_LOG_N: u8 = 15;

/// scrypt block size parameter.
pub const SCRYPT_R: u32 = 8;

/// scrypt parallelism parameter.
pub const SCRYPT_P: u32 = 1;

// ---------------------------------------------------------------------------
// Ledger Parameters
// ---------------------------------------------------------------------------

/// Sentinel address used as both sender and recipient of the genesis entry.
/// It is not valid hex, so no keypair can ever sign for it.
pub const GENESIS_ADDRESS: &str = "GENESIS";

/// Number of minor units (cents) in one whole coin.
pub const MINOR_UNITS_PER_COIN: u64 = 100;

/// Decimal places in the canonical amount text. Load-bearing: signatures
/// are computed over this exact rendering.
pub const AMOUNT_DECIMALS: usize = 2;

/// Largest representable amount in minor units (9,999,999,999,999.99 coins).
/// Fifteen significant digits is the most an `f64` carries through a JSON
/// number and back without changing a cent.
pub const MAX_MINOR_UNITS: u64 = 999_999_999_999_999;

/// Default faucet grant in minor units (100.00 coins).
pub const DEFAULT_FAUCET_GRANT: u64 = 100 * MINOR_UNITS_PER_COIN;

// ---------------------------------------------------------------------------
// Network Parameters
// ---------------------------------------------------------------------------

/// Default HTTP API port.
pub const DEFAULT_API_PORT: u16 = 3000;

/// Default Prometheus metrics port.
pub const DEFAULT_METRICS_PORT: u16 = 3001;
