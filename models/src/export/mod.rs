pub mod job;
pub mod template;
pub mod template_spec;
