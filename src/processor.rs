//! JSON 파일 처리 모듈
//!
//! 개별 파일의 읽기, 파싱, 변환, 원자적 쓰기를 담당합니다.

use memmap2::Mmap;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{ConvertError, Result};
use crate::transform::{DocumentTransformer, IndexKind};

/// 파일 처리 결과
#[derive(Debug)]
pub struct ProcessResult {
    /// 소스 파일 경로
    pub path: PathBuf,
    /// 치환 수 (성공 시)
    pub substitutions: usize,
    /// 에러 메시지 (실패 시)
    pub error: Option<String>,
    /// 원본 파일 크기
    pub bytes_read: u64,
    /// 기록한 출력 크기
    pub bytes_written: u64,
}

impl ProcessResult {
    /// 성공 결과 생성
    pub fn success(path: PathBuf, substitutions: usize, bytes_read: u64, bytes_written: u64) -> Self {
        Self {
            path,
            substitutions,
            error: None,
            bytes_read,
            bytes_written,
        }
    }

    /// 실패 결과 생성
    pub fn failure(path: PathBuf, error: String, bytes_read: u64) -> Self {
        Self {
            path,
            substitutions: 0,
            error: Some(error),
            bytes_read,
            bytes_written: 0,
        }
    }

    /// 출력 파일이 기록되었는지 여부
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 파일 처리 옵션
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Pretty 출력 여부 (2칸 들여쓰기)
    pub pretty: bool,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self {
            pretty: true,
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }

    /// Pretty 출력 설정
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }
}

/// 스토어 항목 파일 하나를 변환하여 `output`에 기록
///
/// 실패한 파일은 출력에 기록되지 않습니다.
pub fn process_item_file(
    path: &Path,
    output: &Path,
    transformer: &DocumentTransformer,
    options: &ProcessOptions,
) -> ProcessResult {
    let file_size = file_size(path);

    let result = read_json(path, file_size, options).and_then(|value| {
        let transformed = transformer.transform(&value)?;
        let written = write_json(output, &transformed.item, options)?;
        Ok((transformed.substitution_count, written))
    });

    match result {
        Ok((substitutions, written)) => {
            ProcessResult::success(path.to_path_buf(), substitutions, file_size, written)
        }
        Err(e) => ProcessResult::failure(path.to_path_buf(), e.to_string(), file_size),
    }
}

/// 인덱스 파일 하나에 메타데이터를 기록하여 `output`에 기록
pub fn process_index_file(
    path: &Path,
    output: &Path,
    kind: IndexKind,
    transformer: &DocumentTransformer,
    options: &ProcessOptions,
) -> ProcessResult {
    let file_size = file_size(path);

    let result = read_json(path, file_size, options)
        .and_then(|value| transformer.stamp_index(&value, kind))
        .and_then(|stamped| write_json(output, &stamped, options));

    match result {
        Ok(written) => ProcessResult::success(path.to_path_buf(), 0, file_size, written),
        Err(e) => ProcessResult::failure(path.to_path_buf(), e.to_string(), file_size),
    }
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// JSON 파일 읽기 (크기에 따라 버퍼 리더 또는 메모리 매핑)
pub fn read_json(path: &Path, file_size: u64, options: &ProcessOptions) -> Result<Value> {
    if file_size >= options.mmap_threshold {
        parse_with_mmap(path)
    } else {
        parse_with_reader(path)
    }
}

/// 버퍼 리더를 사용한 JSON 파싱
fn parse_with_reader(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| ConvertError::ReadFailure {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| ConvertError::ParseFailure {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 메모리 매핑을 사용한 JSON 파싱 (대용량 파일용)
fn parse_with_mmap(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| ConvertError::ReadFailure {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // 매핑 중 파일이 외부에서 잘리지 않는다고 가정
    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| ConvertError::ReadFailure {
            file: path.to_path_buf(),
            reason: format!("메모리 매핑 실패: {}", e),
        })?
    };

    serde_json::from_slice(&mmap).map_err(|e| ConvertError::ParseFailure {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// JSON 값을 원자적으로 기록하고 쓴 바이트 수를 반환
///
/// 같은 폴더의 임시 파일에 쓴 뒤 대상 경로로 rename하므로,
/// 대상 파일은 완전히 기록되었거나 이전 상태 그대로입니다.
pub fn write_json(path: &Path, value: &Value, options: &ProcessOptions) -> Result<u64> {
    let text = if options.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| ConvertError::SerializeFailure {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let write_failure = |reason: String| ConvertError::WriteFailure {
        file: path.to_path_buf(),
        reason,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_failure(e.to_string()))?;
    tmp.write_all(text.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| write_failure(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| write_failure(e.error.to_string()))?;

    Ok(text.len() as u64)
}
