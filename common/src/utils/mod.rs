pub mod config;
pub mod frontmatter;
