//! 치환 규칙 모듈
//!
//! 네임스페이스 별칭(정확한 문자열 치환)과 구조 패턴(정규식 치환)으로
//! 이루어진 순서 있는 규칙 집합을 정의합니다.
//!
//! 적용 순서는 항상 "정확 규칙 전체 → 패턴 규칙 전체"입니다.
//! 뒤의 규칙이 앞 규칙의 결과를 다시 치환할 수 있으며 규칙 간 충돌 검사는 하지 않습니다.

use regex::Regex;

use crate::error::{ConvertError, Result};

/// 기본 변환 원본 네임스페이스
pub const DEFAULT_SOURCE_NAMESPACE: &str = "langflow";

/// 기본 변환 대상 네임스페이스
pub const DEFAULT_TARGET_NAMESPACE: &str = "axiestudio";

/// `from <ns>.<sub> import` 형태로 별도 별칭을 두는 하위 모듈
const IMPORT_ALIAS_MODULES: &[&str] = &[
    "custom",
    "base.models.model",
    "inputs.inputs",
    "io",
    "schema.data",
    "schema.message",
    "schema.dataframe",
    "field_typing",
    "template",
    "components",
    "custom.custom_component.component",
    "base.langchain_utilities.model",
    "helpers",
    "logging",
    "utils",
    "field_typing.range_spec",
];

/// `<ns>.<sub>` 형태로 별도 별칭을 두는 하위 모듈
const NESTED_ALIAS_MODULES: &[&str] = &[
    "custom",
    "base",
    "inputs",
    "io",
    "schema",
    "field_typing",
    "template",
    "components",
    "helpers",
    "logging",
    "utils",
];

/// 점으로 구분된 식별자 경로 (예: `schema.message`)
const DOTTED_PATH: &str = r"[a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*";

/// 단일 치환 규칙
#[derive(Debug, Clone)]
pub enum RewriteRule {
    /// 리터럴 전역 치환
    Exact { needle: String, replacement: String },
    /// 정규식 전역 치환 (`replacement`는 `${1}` 등 캡처 그룹 참조 가능)
    Pattern { pattern: Regex, replacement: String },
}

impl RewriteRule {
    /// 정확 규칙 생성
    pub fn exact(needle: impl Into<String>, replacement: impl Into<String>) -> Result<Self> {
        let needle = needle.into();
        if needle.is_empty() {
            return Err(ConvertError::InvalidRule {
                reason: "빈 문자열은 치환 대상이 될 수 없습니다".to_string(),
            });
        }
        Ok(RewriteRule::Exact {
            needle,
            replacement: replacement.into(),
        })
    }

    /// 패턴 규칙 생성
    pub fn pattern(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|e| ConvertError::InvalidRule {
            reason: format!("정규식 컴파일 실패 ({}): {}", pattern, e),
        })?;
        Ok(RewriteRule::Pattern {
            pattern: compiled,
            replacement: replacement.into(),
        })
    }

    /// 규칙 하나를 텍스트 전체에 적용
    pub fn apply(&self, text: &str) -> RewriteResult {
        match self {
            RewriteRule::Exact {
                needle,
                replacement,
            } => {
                let count = text.matches(needle.as_str()).count();
                if count == 0 {
                    return RewriteResult::unchanged(text);
                }
                RewriteResult {
                    text: text.replace(needle.as_str(), replacement),
                    substitution_count: count,
                }
            }
            RewriteRule::Pattern {
                pattern,
                replacement,
            } => {
                let count = pattern.find_iter(text).count();
                if count == 0 {
                    return RewriteResult::unchanged(text);
                }
                RewriteResult {
                    text: pattern
                        .replace_all(text, replacement.as_str())
                        .into_owned(),
                    substitution_count: count,
                }
            }
        }
    }

    fn is_exact(&self) -> bool {
        matches!(self, RewriteRule::Exact { .. })
    }
}

/// 치환 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// 치환된 텍스트
    pub text: String,
    /// 모든 규칙에 걸쳐 치환된 (겹치지 않는) 매치 수의 합
    pub substitution_count: usize,
}

impl RewriteResult {
    /// 치환 없이 원문 그대로인 결과
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            substitution_count: 0,
        }
    }

    /// 치환이 한 번이라도 일어났는지 여부
    pub fn changed(&self) -> bool {
        self.substitution_count > 0
    }
}

/// 불변 치환 규칙 집합
///
/// 한 번 생성된 뒤에는 변경되지 않으며 변환기에 명시적으로 전달됩니다.
#[derive(Debug, Clone)]
pub struct RuleSet {
    exact: Vec<RewriteRule>,
    patterns: Vec<RewriteRule>,
}

impl RuleSet {
    /// 빈 규칙 집합에서 시작하는 빌더
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// 두 네임스페이스 사이의 표준 규칙 테이블 생성
    ///
    /// 루트 별칭, `from <old>.<sub> import` 별칭, `<old>.<sub>` 별칭을 정확 규칙으로,
    /// import 구문 / 따옴표 문자열 / 문서 URL을 패턴 규칙으로 구성합니다.
    ///
    /// 루트 별칭이 먼저 모든 `old`를 제거하므로, 치환 결과가 `old`를 다시 만들어낼 수
    /// 없는 조합이면 한 번의 적용 후 고정점이 됩니다. 그렇지 않은 조합은 거부합니다.
    ///
    /// # Examples
    /// ```
    /// use flowport::rules::RuleSet;
    ///
    /// let rules = RuleSet::for_namespaces("old_pkg", "new_pkg").unwrap();
    /// let result = rules.rewrite("from old_pkg.custom import Foo");
    /// assert_eq!(result.text, "from new_pkg.custom import Foo");
    /// assert!(RuleSet::for_namespaces("pkg", "pkg2").is_err());
    /// ```
    pub fn for_namespaces(old: &str, new: &str) -> Result<Self> {
        validate_namespace(old)?;
        validate_namespace(new)?;
        if can_recreate(old, new) {
            return Err(ConvertError::InvalidRule {
                reason: format!(
                    "'{}' → '{}' 치환은 원본 네임스페이스를 다시 만들 수 있습니다",
                    old, new
                ),
            });
        }

        let mut builder = Self::builder().exact(old, new)?;

        for module in IMPORT_ALIAS_MODULES {
            builder = builder.exact(
                format!("from {}.{} import", old, module),
                format!("from {}.{} import", new, module),
            )?;
        }
        for module in NESTED_ALIAS_MODULES {
            builder = builder.exact(format!("{}.{}", old, module), format!("{}.{}", new, module))?;
        }

        let ns = regex::escape(old);
        builder
            .pattern(
                &format!(r"from\s+{}\.({})\s+import", ns, DOTTED_PATH),
                format!("from {}.${{1}} import", new),
            )?
            .pattern(
                &format!(r"import\s+{}\.({})", ns, DOTTED_PATH),
                format!("import {}.${{1}}", new),
            )?
            .pattern(
                &format!(r#""{}\.({})""#, ns, DOTTED_PATH),
                format!(r#""{}.${{1}}""#, new),
            )?
            .pattern(
                &format!(r"'{}\.({})'", ns, DOTTED_PATH),
                format!("'{}.${{1}}'", new),
            )?
            .pattern(
                &format!(r"https://docs\.{}\.org", ns),
                format!("https://docs.{}.org", new),
            )?
            .pattern(
                &format!(r"https://{}\.org", ns),
                format!("https://{}.org", new),
            )
            .map(RuleSetBuilder::build)
    }

    /// 정확 규칙만 순서대로 적용
    pub fn apply_exact(&self, text: &str) -> RewriteResult {
        apply_all(&self.exact, text)
    }

    /// 패턴 규칙만 순서대로 적용
    pub fn apply_patterns(&self, text: &str) -> RewriteResult {
        apply_all(&self.patterns, text)
    }

    /// 정확 규칙 전체 후 패턴 규칙 전체를 적용하고 치환 수를 합산
    pub fn rewrite(&self, text: &str) -> RewriteResult {
        let exact = self.apply_exact(text);
        let patterns = self.apply_patterns(&exact.text);
        RewriteResult {
            text: patterns.text,
            substitution_count: exact.substitution_count + patterns.substitution_count,
        }
    }

    /// 정확 규칙 목록
    pub fn exact_rules(&self) -> &[RewriteRule] {
        &self.exact
    }

    /// 패턴 규칙 목록
    pub fn pattern_rules(&self) -> &[RewriteRule] {
        &self.patterns
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::for_namespaces(DEFAULT_SOURCE_NAMESPACE, DEFAULT_TARGET_NAMESPACE)
            .expect("기본 네임스페이스 규칙은 항상 유효합니다")
    }
}

/// `RuleSet` 빌더
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    exact: Vec<RewriteRule>,
    patterns: Vec<RewriteRule>,
}

impl RuleSetBuilder {
    /// 정확 규칙 추가
    pub fn exact(
        self,
        needle: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        Ok(self.rule(RewriteRule::exact(needle, replacement)?))
    }

    /// 패턴 규칙 추가
    pub fn pattern(self, pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(self.rule(RewriteRule::pattern(pattern, replacement)?))
    }

    /// 이미 만들어진 규칙을 종류에 맞는 목록 끝에 추가
    pub fn rule(mut self, rule: RewriteRule) -> Self {
        if rule.is_exact() {
            self.exact.push(rule);
        } else {
            self.patterns.push(rule);
        }
        self
    }

    /// 불변 규칙 집합으로 확정
    pub fn build(self) -> RuleSet {
        RuleSet {
            exact: self.exact,
            patterns: self.patterns,
        }
    }
}

fn apply_all(rules: &[RewriteRule], text: &str) -> RewriteResult {
    rules.iter().fold(RewriteResult::unchanged(text), |acc, rule| {
        let step = rule.apply(&acc.text);
        RewriteResult {
            text: step.text,
            substitution_count: acc.substitution_count + step.substitution_count,
        }
    })
}

fn validate_namespace(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ConvertError::InvalidRule {
            reason: format!("네임스페이스는 식별자여야 합니다: '{}'", name),
        })
    }
}

/// `old`를 `new`로 바꾼 텍스트 안에서 `old`가 다시 생겨날 수 있는지 검사
///
/// 포함 관계이거나, `old`의 앞/뒤 일부가 `new`의 뒤/앞과 겹치면 주변 문자와 합쳐
/// `old`가 재구성될 수 있습니다.
fn can_recreate(old: &str, new: &str) -> bool {
    if new.contains(old) || old.contains(new) {
        return true;
    }
    (1..old.len()).any(|k| new.starts_with(&old[k..]) || new.ends_with(&old[..k]))
}
