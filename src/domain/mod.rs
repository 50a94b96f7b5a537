mod customer;
mod email_address;
mod subscription;
mod variant;

pub use customer::*;
pub use email_address::*;
pub use subscription::*;
pub use variant::*;
