pub mod overview;
pub mod replay;
pub mod utils;
