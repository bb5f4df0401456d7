use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// bcrypt hashing with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash_password(&self, password: &str) -> Result<String, BcryptError> {
        hash(password, self.cost)
    }

    pub fn verify_password(
        &self,
        password: &str,
        hashed_password: &str,
    ) -> Result<bool, BcryptError> {
        verify(password, hashed_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_hashing_and_verification() {
        let hasher = PasswordHasher::new(TEST_COST);
        let password = "test_password123";
        let hashed = hasher.hash_password(password).unwrap();

        assert!(hasher.verify_password(password, &hashed).unwrap());
        assert!(!hasher.verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        let hasher = PasswordHasher::new(TEST_COST);
        match hasher.verify_password("test_password123", "invalidhashformat") {
            Err(_) | Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
        }
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        assert!(PasswordHasher::new(2).hash_password("secret").is_err());
    }
}
