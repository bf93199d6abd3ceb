//! CPU-bound primitives shared across pipeline components: text extraction,
//! BM25 demonstration retrieval, sentence segmentation, and entity detection.

pub mod bm25;
pub mod entities;
pub mod parsing;
pub mod segmenter;

pub use bm25::Bm25;
pub use parsing::{
    extract_first_code_block, extract_first_square_brackets, strip_non_alphanumeric, strip_string,
};
