/// Analysis modules: the file categoriser and post-scan summaries.
pub mod file_types;
pub mod top_files;

pub use file_types::{
    categorise_extension, category_breakdown, extension_of, CategoryStats, FileCategory,
};
pub use top_files::{top_files, LargestFile};
