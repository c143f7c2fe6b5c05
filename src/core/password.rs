use hex::ToHex;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

const SALT_CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    let mut rng = thread_rng();
    (0..32).map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char).collect()
}

pub fn verify_password(pass: &str, slt: &str, hashed: &str) -> bool {
    hash_password(pass, slt) == hashed
}

/// Fingerprint of the stored credentials carried in session tokens. Any
/// password change alters it, which retires every token issued before.
pub fn session_hash(hashed: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"session:");
    hasher.update(hashed);
    hasher.update(slt);
    let digest: String = hasher.finalize().encode_hex();
    digest[..16].to_owned()
}
