//! HTTP protocol layer module
//!
//! Range parsing, content-type detection and canned responses, decoupled from
//! the stream handler.

pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, RangeParseResult, RangeRequest};
pub use response::{
    build_404_response, build_405_response, build_416_response, build_500_response,
    build_file_not_found_response, build_options_response, empty_body, full_body, ResponseBody,
};
