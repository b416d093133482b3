pub mod password_hasher;
