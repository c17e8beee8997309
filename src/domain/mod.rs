pub mod host_source;
pub mod models;
pub mod remote_shell;
pub mod result_sink;
pub mod settings_repository;

pub use self::host_source::*;
pub use self::models::*;
pub use self::remote_shell::*;
pub use self::result_sink::*;
pub use self::settings_repository::*;
