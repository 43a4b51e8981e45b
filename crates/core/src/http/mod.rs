mod response;

pub use response::{format_http_response, status_description, HttpResponse};
