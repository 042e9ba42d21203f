//! 에러 타입 정의 모듈
//!
//! flowport에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! `SetupFailure`, `SourceNotFound`, `NotADirectory`만 실행 전체를 중단시키며,
//! 나머지는 파일 단위로 기록된 뒤 다음 파일로 진행합니다.

use std::path::PathBuf;
use thiserror::Error;

/// flowport에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 출력 디렉토리 트리를 만들 수 없음 (치명적)
    #[error("출력 디렉토리를 생성할 수 없습니다 ({path}): {reason}")]
    SetupFailure { path: PathBuf, reason: String },

    /// 소스 루트가 존재하지 않음 (치명적)
    #[error("소스 폴더를 찾을 수 없습니다: {path}")]
    SourceNotFound { path: PathBuf },

    /// 소스 루트가 폴더가 아님 (치명적)
    #[error("소스 경로가 폴더가 아닙니다: {path}")]
    NotADirectory { path: PathBuf },

    /// 파일 읽기 실패
    #[error("파일을 읽을 수 없습니다 ({file}): {reason}")]
    ReadFailure { file: PathBuf, reason: String },

    /// JSON 파싱 실패
    #[error("JSON 파싱 실패 ({file}): {reason}")]
    ParseFailure { file: PathBuf, reason: String },

    /// 문서 최상위가 객체가 아님
    #[error("유효하지 않은 입력: {reason}")]
    InvalidInput { reason: String },

    /// 치환 후 페이로드가 더 이상 유효한 JSON이 아님
    #[error("치환 결과가 유효한 JSON이 아닙니다 ({field}): {reason}")]
    MalformedPayload { field: String, reason: String },

    /// JSON 직렬화 실패
    #[error("JSON 직렬화 실패 ({file}): {reason}")]
    SerializeFailure { file: PathBuf, reason: String },

    /// 출력 파일 쓰기 실패
    #[error("파일 쓰기 실패 ({file}): {reason}")]
    WriteFailure { file: PathBuf, reason: String },

    /// 치환 규칙 구성 오류
    #[error("유효하지 않은 치환 규칙: {reason}")]
    InvalidRule { reason: String },

    /// 유효하지 않은 파일 이름 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },
}

impl ConvertError {
    /// 실행 전체를 중단시키는 에러인지 여부
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::SetupFailure { .. }
                | ConvertError::SourceNotFound { .. }
                | ConvertError::NotADirectory { .. }
        )
    }
}

/// flowport 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ConvertError>;
