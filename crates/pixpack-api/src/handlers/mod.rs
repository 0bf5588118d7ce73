pub mod health;
pub mod images;

mod archive;
