pub mod assessment;
pub mod pipeline;
pub mod question;
pub mod shared;
