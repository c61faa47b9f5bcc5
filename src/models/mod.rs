pub mod bullet;
pub mod colors;
pub mod common;
pub mod config;
pub mod elements;
pub mod image;
pub mod layout;
pub mod link;
pub mod list;
pub mod page;
pub mod presentation;
pub mod properties;
pub mod table;
pub mod text;
pub mod theme;
