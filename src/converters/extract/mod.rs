//! Per-kind resource extractors. Each turns a node or markup fragment into a typed resource.

pub mod image;
pub mod link;
pub mod list;
pub mod table;
pub mod text;

pub use image::{extract_image, extract_images};
pub use link::{extract_link, extract_link_text, extract_links, normalize_url};
pub use list::{extract_list, extract_lists, format_list_item, format_list_items};
pub use table::{extract_table, extract_tables};
pub use text::{
    extract_block, extract_text, generate_complex_text_elements,
    generate_complex_text_elements_html, parse_formatting, parse_formatting_html,
};
