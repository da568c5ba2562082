pub mod ordering;
pub mod slug;
pub mod time;
