pub mod credentials_prompt;
pub mod inventory;
pub mod remote_shell;
pub mod settings_repository;
pub mod toml_file_proxy;

pub use self::credentials_prompt::prompt_credentials;
pub use self::inventory::*;
pub use self::remote_shell::*;
pub use self::settings_repository::*;

pub use toml_file_proxy::TomlFileProxy;
