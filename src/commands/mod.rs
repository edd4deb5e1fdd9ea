mod bundle_cmd;
mod config_cmd;
mod convert_cmd;
mod cost_cmd;
mod ingredient_cmd;
mod restaurant_cmd;
mod sync_cmd;

pub use bundle_cmd::{ExportCommand, ImportCommand};
pub use config_cmd::ConfigCommand;
pub use convert_cmd::{ConvertCommand, UnitsCommand};
pub use cost_cmd::CostCommand;
pub use ingredient_cmd::IngredientCommand;
pub use restaurant_cmd::{load_current_restaurant, RestaurantCommand};
pub use sync_cmd::SyncCommand;
