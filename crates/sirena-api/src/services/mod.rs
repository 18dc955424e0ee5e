pub mod intake;
pub mod score;
pub mod stage;
