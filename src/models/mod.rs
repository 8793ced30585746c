pub mod activity;
pub mod contract;
pub mod item;
pub mod user;

pub use activity::{Favorite, Feedback, FeedbackInput, SearchHistory};
pub use contract::{Contract, ContractInput, ContractQuery, ContractRole, ContractStatus};
pub use item::{Item, ItemInput, ItemStatus, SearchQuery};
pub use user::{Profile, ProfileUpdate, User};
