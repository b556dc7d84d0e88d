use sha2::{Digest, Sha256};
use uuid::Uuid;

const SCHEME: &str = "sha256";

/// Salted digest stored as `sha256$<salt>$<hex digest>`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{SCHEME}${salt}${}", digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SCHEME), Some(salt), Some(expected)) => {
            constant_time_eq(digest(salt, password).as_bytes(), expected.as_bytes())
        }
        _ => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_are_salted() {
        let first = hash_password("babysteps1");
        let second = hash_password("babysteps1");
        assert_ne!(first, second);
        assert!(verify_password("babysteps1", &first));
        assert!(verify_password("babysteps1", &second));
        assert!(!verify_password("babysteps2", &first));
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "md5$salt$abc"));
        assert!(!verify_password("anything", "sha256$only-salt"));
    }
}
