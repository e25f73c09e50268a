use listing_common::{Facet, OTHER};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use url::Url;

use crate::catalog::choices;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

/// 单个字段的校验错误
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 表单校验结果，收集全部错误而不是遇到第一个就停止
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "表单校验失败: {} 处错误", self.errors.len())?;
        for error in &self.errors {
            write!(f, "; {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 某字段是否有错误
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// 必填文本
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "不能为空");
        }
    }

    /// 必填的筛选属性；选择 "Other" 时必须填写自定义标签
    pub fn facet(&mut self, facet: Facet, value: &str, custom: Option<&str>) {
        let value = value.trim();
        if value.is_empty() {
            self.add(facet.field(), "请选择一项");
            return;
        }
        if !choices(facet).contains(&value) {
            self.add(facet.field(), format!("不是有效选项: {}", value));
            return;
        }
        if value == OTHER && custom.map(str::trim).unwrap_or("").is_empty() {
            self.add(facet.custom_field(), "选择 Other 时必须填写");
        }
    }

    /// 链接：绝对 http(s) 地址或站内以 / 开头的路径
    pub fn link(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if value.starts_with('/') && !value.starts_with("//") {
            return;
        }
        match Url::parse(value) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => self.add(field, format!("不支持的协议: {}", url.scheme())),
            Err(_) => self.add(field, "不是有效的链接"),
        }
    }

    /// 可选链接，留空时跳过
    pub fn optional_link(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.link(field, value);
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !EMAIL.is_match(value.trim()) {
            self.add(field, "不是有效的邮箱地址");
        }
    }

    /// 列表中的每一项都不能为空
    pub fn non_empty_entries(&mut self, field: &str, values: &[String]) {
        for (i, value) in values.iter().enumerate() {
            if value.trim().is_empty() {
                self.add(format!("{}[{}]", field, i), "不能为空");
            }
        }
    }
}
