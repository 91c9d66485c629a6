pub mod activities;
pub mod conversations;
pub mod journals;
pub mod moods;
pub mod users;
