//! 텍스트 치환 모듈
//!
//! 규칙 집합을 임의의 문자열에 적용하는 순수 함수입니다. I/O가 없고 실패하지 않습니다.

use crate::rules::{RewriteResult, RuleSet};

/// 텍스트에 규칙 집합을 적용
///
/// 텍스트는 불투명한 값으로 취급되며, 빈 문자열은 치환 수 0으로 그대로 반환됩니다.
///
/// # Examples
/// ```
/// use flowport::{rewriter::rewrite, RuleSet};
///
/// let rules = RuleSet::default();
/// let result = rewrite("import langflow.io", &rules);
/// assert_eq!(result.text, "import axiestudio.io");
/// assert!(result.substitution_count > 0);
/// ```
pub fn rewrite(text: &str, rules: &RuleSet) -> RewriteResult {
    if text.is_empty() {
        return RewriteResult::unchanged(text);
    }
    rules.rewrite(text)
}
