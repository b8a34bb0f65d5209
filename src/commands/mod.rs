// Subcommand implementations

pub mod add;
pub mod check;
pub mod init;
pub mod inspect;
