//! multipart 表单读取
//!
//! 上传接口（作业、教程视频、头像、海报）共用：文本字段收集到 map，
//! 唯一的文件字段按块读入内存，同时校验扩展名、大小和魔术字节。

use std::collections::HashMap;
use std::path::Path;

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;

use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate_magic_bytes;

// 文本字段上限
const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;
// 魔术字节检查所需的最少字节数
const MAGIC_PROBE_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    /// 小写且带点号，例如 ".pdf"
    pub extension: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 不带点号的扩展名
    pub fn bare_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// 读取文本字段，去掉首尾空白，空串视为缺失
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// 上传约束
pub struct UploadRules<'a> {
    pub file_field: &'a str,
    pub allowed_extensions: &'a [String],
    pub max_size: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UploadRejection {
    TypeNotAllowed,
    ContentMismatch,
    SizeExceeded(usize),
    MultipleFiles,
    FieldTooLarge(String),
    Payload(String),
}

impl UploadRejection {
    pub fn into_response(self) -> HttpResponse {
        let (code, message) = match self {
            UploadRejection::TypeNotAllowed => {
                (ErrorCode::FileTypeNotAllowed, "File type not allowed".to_string())
            }
            UploadRejection::ContentMismatch => {
                (ErrorCode::FileTypeNotAllowed, "文件内容与扩展名不匹配".to_string())
            }
            UploadRejection::SizeExceeded(limit) => (
                ErrorCode::FileSizeExceeded,
                format!("File size exceeds the limit of {} MB", limit / 1024 / 1024),
            ),
            UploadRejection::MultipleFiles => (
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time".to_string(),
            ),
            UploadRejection::FieldTooLarge(name) => {
                (ErrorCode::BadRequest, format!("Field '{name}' is too large"))
            }
            UploadRejection::Payload(e) => {
                (ErrorCode::BadRequest, format!("Invalid multipart payload: {e}"))
            }
        };
        HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
    }
}

/// 取文件名中的扩展名（小写、带点号）
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

fn extension_allowed(extension: &str, allowed: &[String]) -> bool {
    !extension.is_empty() && allowed.iter().any(|t| t.eq_ignore_ascii_case(extension))
}

/// 读取整个 multipart 表单
pub async fn read_upload_form(
    mut payload: Multipart,
    rules: &UploadRules<'_>,
) -> Result<UploadForm, UploadRejection> {
    let mut form = UploadForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| UploadRejection::Payload(e.to_string()))?
    {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name == rules.file_field {
            if form.file.is_some() {
                return Err(UploadRejection::MultipleFiles);
            }

            let original_name = content_disposition
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string())
                .unwrap_or_default();

            let extension = extension_of(&original_name);
            if !extension_allowed(&extension, rules.allowed_extensions) {
                return Err(UploadRejection::TypeNotAllowed);
            }

            // MIME 只做记录，不用于校验
            let content_type = field
                .content_type()
                .map(|ct| ct.to_string())
                .unwrap_or_default();

            let mut data = Vec::new();
            let mut magic_checked = false;
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(|e| UploadRejection::Payload(e.to_string()))?;
                if data.len() + chunk.len() > rules.max_size {
                    return Err(UploadRejection::SizeExceeded(rules.max_size));
                }
                data.extend_from_slice(&chunk);

                if !magic_checked && data.len() >= MAGIC_PROBE_LEN {
                    magic_checked = true;
                    if !validate_magic_bytes(&data, &extension) {
                        return Err(UploadRejection::ContentMismatch);
                    }
                }
            }
            if !magic_checked && !validate_magic_bytes(&data, &extension) {
                return Err(UploadRejection::ContentMismatch);
            }

            form.file = Some(UploadedFile {
                original_name,
                extension,
                content_type,
                data,
            });
        } else {
            let mut value = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(|e| UploadRejection::Payload(e.to_string()))?;
                if value.len() + chunk.len() > MAX_TEXT_FIELD_SIZE {
                    return Err(UploadRejection::FieldTooLarge(name));
                }
                value.extend_from_slice(&chunk);
            }
            form.fields
                .insert(name, String::from_utf8_lossy(&value).into_owned());
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Still Life.JPG"), ".jpg");
        assert_eq!(extension_of("report.final.pdf"), ".pdf");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn test_extension_allowed() {
        let allowed = vec![".pdf".to_string(), ".png".to_string()];
        assert!(extension_allowed(".PDF", &allowed));
        assert!(!extension_allowed(".exe", &allowed));
        assert!(!extension_allowed("", &allowed));
    }

    #[test]
    fn test_form_text_trims_and_skips_blank() {
        let mut form = UploadForm::default();
        form.fields.insert("title".into(), "  Color Wheel ".into());
        form.fields.insert("category".into(), "   ".into());
        assert_eq!(form.text("title"), Some("Color Wheel"));
        assert_eq!(form.text("category"), None);
        assert_eq!(form.text("missing"), None);
    }
}
