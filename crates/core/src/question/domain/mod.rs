pub mod category;
pub mod generation_error;
pub mod question;
pub mod random_source;
pub mod set_generator;
pub mod slot_picker;
pub mod topic_bank;
