//! 文件类型识别
//!
//! 上传时用魔术字节校验内容与扩展名是否一致，下载时按扩展名给出 Content-Type。

/// 验证文件开头的魔术字节是否与扩展名匹配
///
/// `extension` 需包含点号，例如 ".png"；大小写不敏感。
/// 只识别作业、头像、海报、教程视频会用到的格式，其余一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        ".webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",

        ".pdf" => data.starts_with(b"%PDF"),
        // OLE 复合文档
        ".doc" => data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
        // docx 本质是 zip
        ".docx" | ".zip" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        ".rar" => data.starts_with(b"Rar!"),

        // ISO BMFF：第 4..8 字节为 "ftyp"
        ".mp4" | ".mov" => data.len() >= 8 && &data[4..8] == b"ftyp",
        // EBML 头
        ".webm" => data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]),

        _ => false,
    }
}

/// 根据扩展名推断 MIME 类型
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}
