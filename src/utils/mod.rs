pub mod duration;
pub mod email_filter;
pub mod name_cache;
pub mod validation;
