// Document templates: uploaded reference files whose text may be folded into prompts.
// Deleting a template clears the reference on SOWs instead of deleting them.

pub mod extract;
pub mod handlers;
pub mod store;
pub mod upload;
