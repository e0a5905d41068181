pub mod subscribe;

pub use subscribe::{subscribe, subscribe_method_not_allowed};
