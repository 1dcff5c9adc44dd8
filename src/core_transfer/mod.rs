pub mod listing;
pub mod stream;

pub use listing::build_listing;
pub use stream::{stream_download, stream_upload};
