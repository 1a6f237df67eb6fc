pub mod people;
pub mod scores;
