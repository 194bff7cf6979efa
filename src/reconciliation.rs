pub mod document;
pub mod document_error;
pub mod reconcile_error;
pub mod reconciler;
pub mod registry;
pub mod session;
