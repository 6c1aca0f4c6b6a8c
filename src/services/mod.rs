pub mod association;
pub mod business;
pub mod category;
pub mod search;
pub mod suggestion;
pub mod user;

pub use association::*;
pub use business::*;
pub use category::*;
pub use search::*;
pub use suggestion::*;
pub use user::*;
