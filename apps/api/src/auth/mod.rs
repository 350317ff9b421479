// Authentication: token issuing and verification

pub mod jwt;

pub use jwt::{create_token, verify_token, Claims, Role};
