//! 문서 변환 모듈
//!
//! 스토어 항목(flow/component) 하나의 페이로드를 치환하고 변환 메타데이터를 붙입니다.
//! 인덱스 파일에는 치환 없이 메타데이터만 기록합니다.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConvertError, Result};
use crate::rewriter::rewrite;
use crate::rules::{RuleSet, DEFAULT_SOURCE_NAMESPACE, DEFAULT_TARGET_NAMESPACE};

/// 항목 메타데이터 키
pub const CONVERSION_KEY: &str = "conversion";

/// 인덱스 메타데이터 키
pub const CONVERSION_INFO_KEY: &str = "conversionInfo";

/// 변환 레이블 및 버전 정보
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionProfile {
    /// `convertedFrom` 레이블
    pub converted_from: String,
    /// `convertedTo` 레이블
    pub converted_to: String,
    /// 최상위 인덱스의 `originalSource`
    pub original_source: String,
    /// 설명 필드 뒤에 붙일 문구
    pub description_suffix: String,
    /// `converterVersion`
    pub converter_version: String,
}

impl Default for ConversionProfile {
    fn default() -> Self {
        Self {
            converted_from: DEFAULT_SOURCE_NAMESPACE.to_string(),
            converted_to: DEFAULT_TARGET_NAMESPACE.to_string(),
            original_source: "Langflow Store".to_string(),
            description_suffix: " (Converted from Langflow Store for AxieStudio compatibility)"
                .to_string(),
            converter_version: "1.0.0".to_string(),
        }
    }
}

/// 항목에 붙는 `conversion` 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    pub converted_at: String,
    pub converted_from: String,
    pub converted_to: String,
    pub conversions_made: usize,
    pub converter_version: String,
}

/// 인덱스 파일에 붙는 `conversionInfo` 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    pub converted_at: String,
    pub converted_from: String,
    pub converted_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter_version: Option<String>,
}

/// 인덱스 파일 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// 소스 루트의 `store_index.json`
    Store,
    /// `flows/flows_index.json`
    Flows,
    /// `components/components_index.json`
    Components,
}

impl IndexKind {
    /// 모든 인덱스 종류 (처리 순서)
    pub const ALL: [IndexKind; 3] = [IndexKind::Store, IndexKind::Flows, IndexKind::Components];

    /// 인덱스 파일 이름
    pub fn file_name(self) -> &'static str {
        match self {
            IndexKind::Store => "store_index.json",
            IndexKind::Flows => "flows_index.json",
            IndexKind::Components => "components_index.json",
        }
    }
}

/// 변환 결과
#[derive(Debug, Clone)]
pub struct Transformed {
    /// 변환된 항목 (입력의 복제본)
    pub item: Value,
    /// `data`와 `original.data`에서 일어난 치환 수의 합
    pub substitution_count: usize,
}

/// 스토어 항목 변환기
#[derive(Debug, Clone, Default)]
pub struct DocumentTransformer {
    rules: RuleSet,
    profile: ConversionProfile,
}

impl DocumentTransformer {
    /// 새 변환기 생성
    pub fn new(rules: RuleSet, profile: ConversionProfile) -> Self {
        Self { rules, profile }
    }

    /// 사용 중인 규칙 집합
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// 사용 중인 레이블
    pub fn profile(&self) -> &ConversionProfile {
        &self.profile
    }

    /// 스토어 항목 하나를 변환
    ///
    /// 입력은 변경하지 않고 복제본을 반환합니다. `data`와 `original.data`가 객체나 배열이면
    /// 직렬화 → 치환 → 재파싱하며, 재파싱에 실패하면 `MalformedPayload`로 실패합니다.
    pub fn transform(&self, item: &Value) -> Result<Transformed> {
        let mut converted = match item {
            Value::Object(map) => map.clone(),
            other => {
                return Err(ConvertError::InvalidInput {
                    reason: format!("스토어 항목은 JSON 객체여야 합니다 ({})", json_kind(other)),
                })
            }
        };

        let mut total = 0;

        if let Some(data) = converted.get_mut("data") {
            total += self.rewrite_payload(data, "data")?;
        }

        if let Some(Value::Object(original)) = converted.get_mut("original") {
            if let Some(data) = original.get_mut("data") {
                total += self.rewrite_payload(data, "original.data")?;
            }
        }

        let metadata = ConversionMetadata {
            converted_at: timestamp(),
            converted_from: self.profile.converted_from.clone(),
            converted_to: self.profile.converted_to.clone(),
            conversions_made: total,
            converter_version: self.profile.converter_version.clone(),
        };
        converted.insert(CONVERSION_KEY.to_string(), to_json(&metadata, CONVERSION_KEY)?);

        if let Some(Value::String(description)) = converted.get_mut("description") {
            if !description.is_empty() {
                description.push_str(&self.profile.description_suffix);
            }
        }

        Ok(Transformed {
            item: Value::Object(converted),
            substitution_count: total,
        })
    }

    /// 인덱스 파일에 `conversionInfo`만 추가 (텍스트 치환 없음)
    pub fn stamp_index(&self, index: &Value, kind: IndexKind) -> Result<Value> {
        let mut stamped: Map<String, Value> = match index {
            Value::Object(map) => map.clone(),
            other => {
                return Err(ConvertError::InvalidInput {
                    reason: format!(
                        "{}은(는) JSON 객체여야 합니다 ({})",
                        kind.file_name(),
                        json_kind(other)
                    ),
                })
            }
        };

        let (original_source, converter_version) = match kind {
            IndexKind::Store => (
                Some(self.profile.original_source.clone()),
                Some(self.profile.converter_version.clone()),
            ),
            IndexKind::Flows | IndexKind::Components => (None, None),
        };

        let metadata = IndexMetadata {
            converted_at: timestamp(),
            converted_from: self.profile.converted_from.clone(),
            converted_to: self.profile.converted_to.clone(),
            original_source,
            converter_version,
        };
        stamped.insert(
            CONVERSION_INFO_KEY.to_string(),
            to_json(&metadata, CONVERSION_INFO_KEY)?,
        );

        Ok(Value::Object(stamped))
    }

    /// 페이로드 하나를 제자리에서 치환하고 치환 수를 반환
    fn rewrite_payload(&self, payload: &mut Value, field: &str) -> Result<usize> {
        if !(payload.is_object() || payload.is_array()) {
            return Ok(0);
        }

        let text = serde_json::to_string(payload).map_err(|e| ConvertError::MalformedPayload {
            field: field.to_string(),
            reason: e.to_string(),
        })?;

        let result = rewrite(&text, &self.rules);
        if !result.changed() {
            return Ok(0);
        }

        *payload =
            serde_json::from_str(&result.text).map_err(|e| ConvertError::MalformedPayload {
                field: field.to_string(),
                reason: e.to_string(),
            })?;

        Ok(result.substitution_count)
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn to_json<T: Serialize>(metadata: &T, field: &str) -> Result<Value> {
    serde_json::to_value(metadata).map_err(|e| ConvertError::MalformedPayload {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
