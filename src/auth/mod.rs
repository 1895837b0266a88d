use crate::{Error, Result, config::AuthConfig};
use tracing::debug;

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// One-way password hashing with bcrypt.
///
/// Hashing is CPU bound, so both operations run on tokio's blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(Error::config(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_COST, MAX_COST, cost
            )));
        }
        Ok(Self { cost })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        Self::new(config.bcrypt_cost)
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        debug!("Hashing password with cost {}", self.cost);
        let cost = self.cost;
        let password = password.to_string();

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| Error::internal(format!("Hashing task failed: {e}")))?
            .map_err(Error::from)
    }

    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| Error::internal(format!("Verify task failed: {e}")))?
            .map_err(Error::from)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(MIN_COST).unwrap()
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("s3cret").await.unwrap();

        assert_ne!(hash, "s3cret");
        assert!(hasher.verify("s3cret", &hash).await.unwrap());
        assert!(!hasher.verify("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = hasher();
        let first = hasher.hash("s3cret").await.unwrap();
        let second = hasher.hash("s3cret").await.unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_cost_bounds() {
        assert!(PasswordHasher::new(MIN_COST).is_ok());
        assert!(PasswordHasher::new(MAX_COST).is_ok());
        assert!(matches!(PasswordHasher::new(MIN_COST - 1), Err(Error::Config(_))));
        assert!(matches!(PasswordHasher::new(MAX_COST + 1), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_hash() {
        assert!(hasher().verify("s3cret", "not-a-hash").await.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_yields_to_runtime() {
        let hasher = PasswordHasher::new(10).unwrap();
        let hash = hasher.hash("s3cret");
        tokio::pin!(hash);

        // Inline hashing would finish on the first poll.
        tokio::select! {
            biased;
            _ = &mut hash => panic!("hash completed without yielding"),
            _ = tokio::task::yield_now() => {}
        }

        let hash = hash.await.unwrap();
        assert!(hasher.verify("s3cret", &hash).await.unwrap());
    }
}
