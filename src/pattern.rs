//! 파일 선택 모듈
//!
//! 컬렉션 폴더에서 변환 대상 항목 파일을 고르는 규칙을 담당합니다.

use glob::Pattern;

use crate::error::{ConvertError, Result};

/// 항목 파일 선택기
///
/// `.json` 확장자(대소문자 무시)이고, 컬렉션 인덱스 파일이 아니며,
/// 글로브 패턴이 주어진 경우 그 패턴에 일치하는 파일만 선택합니다.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    pattern: Option<Pattern>,
}

impl PatternMatcher {
    /// 새 선택기 생성
    ///
    /// # Examples
    /// ```
    /// use flowport::pattern::PatternMatcher;
    ///
    /// let matcher = PatternMatcher::new(Some("chat_*".to_string())).unwrap();
    /// assert!(matcher.is_item_file("chat_1.json", "flows_index.json"));
    /// assert!(!matcher.is_item_file("agent.json", "flows_index.json"));
    /// assert!(!matcher.is_item_file("chat_1.txt", "flows_index.json"));
    /// ```
    pub fn new(pattern: Option<String>) -> Result<Self> {
        let compiled = match pattern {
            Some(ref p) => Some(
                Pattern::new(p)
                    .map_err(|_| ConvertError::InvalidPattern { pattern: p.clone() })?,
            ),
            None => None,
        };

        Ok(Self { pattern: compiled })
    }

    /// 컬렉션 안의 파일이 변환 대상 항목인지 확인
    pub fn is_item_file(&self, file_name: &str, index_name: &str) -> bool {
        has_json_extension(file_name) && file_name != index_name && self.matches(file_name)
    }

    /// 파일 이름이 글로브 패턴과 일치하는지 확인 (패턴이 없으면 항상 true)
    pub fn matches(&self, file_name: &str) -> bool {
        match &self.pattern {
            Some(p) => p.matches(file_name),
            None => true,
        }
    }

    /// 패턴 문자열 (설정된 경우)
    pub fn as_str(&self) -> Option<&str> {
        self.pattern.as_ref().map(Pattern::as_str)
    }
}

fn has_json_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
