//! 替换模式：字面量全局替换并原地写回（无备份）
use std::path::Path;

use tracing::info;

use crate::engine::read_text;
use crate::error::{Result, ScanError};
use crate::output::Reporter;

/// 将文件中所有 `src` 替换为 `dst`，返回原内容中 `src` 的（不重叠、从左到右）出现次数
pub(crate) fn replace_in_file(path: &Path, src: &str, dst: &str, reporter: &mut dyn Reporter) -> Result<usize> {
    let data = match read_text(path)? { Some(d) => d, None => return Ok(0) };
    let new_data = data.replace(src, dst);
    if new_data == data {
        return Ok(0);
    }
    let occurrences = data.matches(src).count();
    // 先写回再输出，写失败时不会留下“已替换”的记录
    std::fs::write(path, new_data).map_err(|e| ScanError::io(path, e))?;
    reporter.replaced(path, occurrences).map_err(ScanError::Output)?;
    info!(path = %path.display(), occurrences, "file rewritten");
    Ok(occurrences)
}
