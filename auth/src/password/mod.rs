pub mod argon2;
pub mod errors;

pub use self::argon2::HashingAlgorithm;
pub use self::argon2::HashingParams;
pub use self::argon2::PasswordHasher;
pub use errors::PasswordError;
