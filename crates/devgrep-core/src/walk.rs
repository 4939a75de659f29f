//! 目录遍历与文件过滤
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::options::ScanConfig;

/// 递归遍历 `root`，产出需要扫描的文件路径
/// - 根目录下（深度 1）被忽略的目录连同子树整体跳过；
/// - 按文件名排序，保证输出顺序可复现；
/// - 不匹配扩展名的文件不会被打开；
/// - 指向文件的符号链接视为文件，指向目录的符号链接不进入。
pub(crate) fn candidate_files<'a>(
    root: &Path,
    config: &'a ScanConfig,
) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| !is_ignored_root_dir(e, config))
        .filter_map(move |entry| match entry {
            Ok(e) if !is_file_like(&e) => None,
            Ok(e) => {
                let wanted = config.extensions.accepts(&e.file_name().to_string_lossy(), &config.special_names);
                if wanted {
                    Some(Ok(display_path(e.into_path())))
                } else {
                    None
                }
            }
            Err(err) => Some(Err(err)),
        })
}

fn is_file_like(entry: &DirEntry) -> bool {
    let ft = entry.file_type();
    ft.is_file() || (ft.is_symlink() && entry.path().is_file())
}

fn is_ignored_root_dir(entry: &DirEntry, config: &ScanConfig) -> bool {
    if entry.depth() != 1 || !entry.file_type().is_dir() { return false; }
    let name = entry.file_name().to_string_lossy();
    let ignored = config.ignore_dirs.contains(&*name)
        || config.ignore_suffixes.iter().any(|s| name.ends_with(s.as_str()));
    if ignored {
        debug!(path = %entry.path().display(), "skipping directory");
    }
    ignored
}

/// 去掉 "./" 前缀，使 `.` 下的文件以相对路径展示
fn display_path(path: PathBuf) -> PathBuf {
    match path.strip_prefix(".") {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path,
    }
}
