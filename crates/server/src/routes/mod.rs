pub mod gallery;
pub mod health;
