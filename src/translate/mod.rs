//! 翻译能力抽象
//!
//! 回填逻辑只依赖一个能力：`translate(text, target) -> text`，可能失败。
//! 调用是阻塞的，每次调用返回后才会发出下一次调用。

pub mod google;

use thiserror::Error;

pub use google::GoogleTranslator;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("未配置翻译服务凭据")]
    MissingCredentials,
    #[error("翻译请求失败: {0}")]
    Transport(String),
    #[error("翻译服务返回 HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("翻译服务响应无法解析: {0}")]
    Response(String),
    #[error("{0}")]
    Other(String),
}

/// 机器翻译提供方
pub trait Translator {
    /// 将 `text` 翻译为 `target_locale`（翻译服务可识别的 ISO 639-1 代码）
    fn translate(&self, text: &str, target_locale: &str) -> Result<String, TranslateError>;

    /// 提供方名称，用于日志
    fn provider_name(&self) -> &str;
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(&self, text: &str, target_locale: &str) -> Result<String, TranslateError> {
        (**self).translate(text, target_locale)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn translate(&self, text: &str, target_locale: &str) -> Result<String, TranslateError> {
        (**self).translate(text, target_locale)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}
