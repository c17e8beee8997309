pub mod ssh_shell;

pub use self::ssh_shell::SshShell;
