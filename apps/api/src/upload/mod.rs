// PDF upload: text extraction for the client's CV input box.
// No model calls happen here.

pub mod handlers;
pub mod pdf;
