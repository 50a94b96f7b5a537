mod deletion_token;

pub use deletion_token::*;
