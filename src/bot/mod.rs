pub mod delivery;
pub mod dialogue;
pub mod ui;
