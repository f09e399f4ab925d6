pub mod prelude;

pub mod document;
