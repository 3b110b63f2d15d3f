// src/utils.rs

use md5::{Digest, Md5};
use std::path::{Component, Path, PathBuf};

/// 将以 `~` 开头的路径展开为用户主目录下的路径。
pub fn expand_home_dir(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// 以文件名生成的匹配键: 扩展名分隔符替换为下划线 (`a.mp3` -> `a_mp3`)。
/// 云盘对无标签的歌曲以这种形式记录歌名。
pub fn filename_key(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.rfind('.') {
        Some(idx) if idx > 0 => format!("{}_{}", &name[..idx], &name[idx + 1..]),
        _ => name,
    }
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

pub fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_key() {
        assert_eq!(filename_key(Path::new("/music/周杰伦 - 晴天.mp3")), "周杰伦 - 晴天_mp3");
        // 只替换最后一个扩展名分隔符
        assert_eq!(filename_key(Path::new("a.b.flac")), "a.b_flac");
        assert_eq!(filename_key(Path::new("noext")), "noext");
        assert_eq!(filename_key(Path::new(".hidden")), ".hidden");
    }

    #[test]
    fn test_expand_home_dir() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home_dir(Path::new("~/Music/")), home.join("Music"));
        assert_eq!(expand_home_dir(Path::new("~")), home);
        assert_eq!(expand_home_dir(Path::new("/srv/~music")), PathBuf::from("/srv/~music"));
        assert_eq!(expand_home_dir(Path::new("music")), PathBuf::from("music"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghijkl", 8), "abcde...");
        // 中文按双宽字符计算
        assert_eq!(truncate_text("一二三四五六", 8), "一二...");
    }

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
