//! Database entities for the Frostline catalog and blog

pub mod blog_posts;
pub mod categories;
pub mod machines;
