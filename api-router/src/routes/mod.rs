pub mod documents;
pub mod languages;
pub mod probes;
pub mod search;
