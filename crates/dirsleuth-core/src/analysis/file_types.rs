/// File type categorisation based on file extensions.
///
/// Groups files into broad categories and computes size/count totals per
/// category for any subtree of a scanned tree.
use crate::model::{FileTree, NodeIndex};
use crate::treemap::color::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Broad file type categories for visual grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Documents,
    Images,
    Video,
    Audio,
    Code,
    Archives,
    Applications,
    System,
    Caches,
    #[default]
    Other,
}

impl FileCategory {
    /// Every category, in display order.
    pub const ALL: [FileCategory; 10] = [
        Self::Documents,
        Self::Images,
        Self::Video,
        Self::Audio,
        Self::Code,
        Self::Archives,
        Self::Applications,
        Self::System,
        Self::Caches,
        Self::Other,
    ];

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Code => "Code",
            Self::Archives => "Archives",
            Self::Applications => "Applications",
            Self::System => "System",
            Self::Caches => "Caches",
            Self::Other => "Other",
        }
    }

    /// Base treemap colour before depth shading.
    pub fn color(self) -> Rgb {
        match self {
            Self::Documents => Rgb::new(89, 153, 242),
            Self::Images => Rgb::new(140, 217, 102),
            Self::Video => Rgb::new(242, 115, 89),
            Self::Audio => Rgb::new(242, 179, 64),
            Self::Code => Rgb::new(166, 115, 242),
            Self::Archives => Rgb::new(115, 204, 204),
            Self::Applications => Rgb::new(242, 128, 179),
            Self::System => Rgb::new(153, 153, 166),
            Self::Caches => Rgb::new(191, 140, 102),
            Self::Other => Rgb::new(128, 128, 140),
        }
    }
}

/// Size and count totals for a single file category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: FileCategory,
    pub total_size: u64,
    pub file_count: u64,
}

/// The extension of a file name: the text after the last `.`.
///
/// Returns `""` when there is no dot or the name ends with one.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => &name[dot + 1..],
        None => "",
    }
}

/// Categorise a file extension into a broad category.
///
/// Zero-heap-allocation hot path: extensions are lowercased into a fixed-size
/// stack buffer (`[u8; 16]`) rather than allocating a `String`. File
/// extensions longer than 16 bytes are treated as `Other`.
pub fn categorise_extension(ext: &str) -> FileCategory {
    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > 16 {
        return FileCategory::Other;
    }

    let mut lower = [0u8; 16];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let lower_str = match std::str::from_utf8(&lower[..bytes.len()]) {
        Ok(s) => s,
        Err(_) => return FileCategory::Other,
    };

    match lower_str {
        "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "txt" | "rtf" | "csv"
        | "pages" | "numbers" | "key" | "odt" | "ods" | "odp" | "epub" | "md" | "markdown"
        | "tex" | "log" | "nfo" | "readme" => FileCategory::Documents,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "tif" | "svg" | "webp" | "ico"
        | "icns" | "heic" | "heif" | "raw" | "cr2" | "nef" | "arw" | "dng" | "psd" | "ai"
        | "sketch" | "fig" | "xcf" => FileCategory::Images,
        "mp4" | "mov" | "avi" | "mkv" | "wmv" | "flv" | "webm" | "m4v" | "mpg" | "mpeg"
        | "3gp" | "vob" | "ogv" => FileCategory::Video,
        "mp3" | "wav" | "aac" | "flac" | "ogg" | "wma" | "m4a" | "aiff" | "aif" | "opus"
        | "alac" | "mid" | "midi" => FileCategory::Audio,
        "swift" | "h" | "m" | "mm" | "c" | "cpp" | "cc" | "cxx" | "py" | "js" | "ts" | "jsx"
        | "tsx" | "html" | "css" | "scss" | "java" | "kt" | "go" | "rs" | "rb" | "php" | "sh"
        | "zsh" | "bash" | "json" | "xml" | "yaml" | "yml" | "toml" | "sql" | "r" | "lua"
        | "pl" | "pm" | "dart" | "vue" | "svelte" | "zig" | "nim" | "ex" | "exs" | "erl"
        | "hs" | "ml" | "fs" | "clj" | "scala" | "groovy" | "makefile" | "cmake"
        | "dockerfile" | "gitignore" | "gitattributes" | "editorconfig" | "xcodeproj"
        | "xcworkspace" | "pbxproj" | "storyboard" | "xib" => FileCategory::Code,
        "zip" | "tar" | "gz" | "bz2" | "xz" | "7z" | "rar" | "dmg" | "iso" | "pkg" | "deb"
        | "rpm" | "jar" | "war" | "tgz" | "tbz2" | "lz" | "lzma" | "zst" | "cab" | "sit" => {
            FileCategory::Archives
        }
        "app" | "exe" | "msi" | "apk" | "dylib" | "so" | "dll" | "framework" | "bundle"
        | "kext" | "plugin" | "wasm" => FileCategory::Applications,
        "plist" | "entitlements" | "mobileprovision" | "cer" | "p12" | "keychain" | "lock"
        | "ds_store" | "localized" | "strings" => FileCategory::System,
        "cache" | "tmp" | "temp" | "swp" | "swo" | "o" | "obj" | "pyc" | "pyo" | "class"
        | "dsym" | "ipa" | "xcarchive" => FileCategory::Caches,
        _ => FileCategory::Other,
    }
}

/// Compute per-category size and count stats for the files under `root`.
///
/// Uses each file's own logical size. Results are sorted by total size
/// descending, ties by category display order.
pub fn category_breakdown(tree: &FileTree, root: NodeIndex) -> Vec<CategoryStats> {
    let mut map: HashMap<FileCategory, CategoryStats> = HashMap::with_capacity(FileCategory::ALL.len());

    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        let node = tree.node(idx);
        if node.is_dir {
            stack.extend(tree.children(idx));
            continue;
        }
        let entry = map.entry(node.category).or_insert_with(|| CategoryStats {
            category: node.category,
            total_size: 0,
            file_count: 0,
        });
        entry.total_size += node.own_size;
        entry.file_count += 1;
    }

    let mut results: Vec<CategoryStats> = map.into_values().collect();
    results.sort_by(|a, b| {
        b.total_size
            .cmp(&a.total_size)
            .then_with(|| position(a.category).cmp(&position(b.category)))
    });
    results
}

fn position(category: FileCategory) -> usize {
    FileCategory::ALL
        .iter()
        .position(|&c| c == category)
        .unwrap_or(FileCategory::ALL.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileNode;
    use compact_str::CompactString;

    // ── categorise_extension ─────────────────────────────────────────────

    #[test]
    fn categorise_known_image_extensions() {
        for ext in &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "heic"] {
            assert_eq!(
                categorise_extension(ext),
                FileCategory::Images,
                "expected Images for .{ext}"
            );
        }
    }

    #[test]
    fn categorise_known_code_extensions() {
        for ext in &["rs", "py", "js", "ts", "c", "cpp", "go", "toml", "swift"] {
            assert_eq!(
                categorise_extension(ext),
                FileCategory::Code,
                "expected Code for .{ext}"
            );
        }
    }

    #[test]
    fn categorise_other_families() {
        assert_eq!(categorise_extension("zip"), FileCategory::Archives);
        assert_eq!(categorise_extension("dylib"), FileCategory::Applications);
        assert_eq!(categorise_extension("plist"), FileCategory::System);
        assert_eq!(categorise_extension("pyc"), FileCategory::Caches);
        assert_eq!(categorise_extension("flac"), FileCategory::Audio);
        assert_eq!(categorise_extension("mkv"), FileCategory::Video);
        assert_eq!(categorise_extension("pdf"), FileCategory::Documents);
    }

    #[test]
    fn categorise_unknown_extension_returns_other() {
        assert_eq!(categorise_extension("xyz"), FileCategory::Other);
        assert_eq!(categorise_extension(""), FileCategory::Other);
        assert_eq!(
            categorise_extension("averyveryverylongextension"),
            FileCategory::Other
        );
    }

    /// Extension matching must be case-insensitive so "JPG" == "jpg".
    #[test]
    fn categorise_case_insensitive() {
        assert_eq!(categorise_extension("JPG"), FileCategory::Images);
        assert_eq!(categorise_extension("RS"), FileCategory::Code);
        assert_eq!(categorise_extension("dSYM"), FileCategory::Caches);
    }

    #[test]
    fn extension_of_edge_cases() {
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(".gitignore"), "gitignore");
    }

    // ── category_breakdown ───────────────────────────────────────────────

    fn add_file(tree: &mut FileTree, parent: NodeIndex, name: &str, size: u64) -> NodeIndex {
        let category = categorise_extension(extension_of(name));
        let idx = tree.add_node(FileNode::new_file(0, CompactString::new(name), size, size, category));
        tree.add_child(parent, idx);
        idx
    }

    #[test]
    fn breakdown_aggregates_by_category() {
        let mut tree = FileTree::with_capacity(6);
        let root = tree.add_root(FileNode::new_dir(1, CompactString::new("/r"), 0, 0));
        let src = tree.add_node(FileNode::new_dir(2, CompactString::new("src"), 64, 64));
        tree.add_child(root, src);
        add_file(&mut tree, src, "main.rs", 100);
        add_file(&mut tree, src, "lib.rs", 100);
        add_file(&mut tree, root, "logo.png", 300);
        tree.finalise();

        let stats = category_breakdown(&tree, root);
        assert_eq!(
            stats,
            vec![
                CategoryStats {
                    category: FileCategory::Images,
                    total_size: 300,
                    file_count: 1,
                },
                CategoryStats {
                    category: FileCategory::Code,
                    total_size: 200,
                    file_count: 2,
                },
            ]
        );

        // Restricting to a subtree only sees that subtree's files.
        let sub = category_breakdown(&tree, src);
        assert_eq!(sub.len(), 1);
        assert_eq!(sub[0].category, FileCategory::Code);
    }

    /// Directories must not contribute to category stats.
    #[test]
    fn breakdown_skips_directories() {
        let mut tree = FileTree::with_capacity(2);
        let root = tree.add_root(FileNode::new_dir(1, CompactString::new("/r"), 4096, 4096));
        let dir = tree.add_node(FileNode::new_dir(2, CompactString::new("empty"), 4096, 4096));
        tree.add_child(root, dir);
        tree.finalise();

        assert!(category_breakdown(&tree, root).is_empty());
    }
}
