pub mod toml_settings_repository;

pub use self::toml_settings_repository::TomlSettingsRepository;
