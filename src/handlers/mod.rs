pub mod content;
pub mod health;
pub mod moods;
pub mod reference;
pub mod users;
