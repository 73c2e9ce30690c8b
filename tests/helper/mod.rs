#![allow(dead_code)]

pub mod page;
pub mod registry;

pub use page::{PageBuilder, payload_page};
pub use registry::MockPageSource;
