pub mod execute;
pub mod extract;
pub mod prompt;
pub mod sanitize;
pub mod translate;
