pub mod challenge;
pub mod checkers;
pub mod credentials;
pub mod directory;
pub mod gate;
pub mod passwd_file;
pub mod realm;
