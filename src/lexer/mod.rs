pub mod errors;
pub mod scanner;
pub mod source;
pub mod tokens;

pub use errors::*;
pub use scanner::*;
pub use source::SourceBuffer;
pub use tokens::*;
