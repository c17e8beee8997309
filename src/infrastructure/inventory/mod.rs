pub mod toml_inventory;

pub use self::toml_inventory::{RowRef, TomlInventory};
