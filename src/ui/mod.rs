pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, info, status, success, warn};
pub use table::{result_table, TableStyle, NO_ROWS};
pub use theme::{theme, Theme};
