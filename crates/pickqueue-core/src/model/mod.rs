pub mod activity;
pub mod history_limit;
pub mod member;

pub use activity::{ActivityAction, ActivityEntry};
pub use history_limit::HistoryLimit;
pub use member::Member;
