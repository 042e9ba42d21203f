//! 통계 및 유틸리티 모듈
//!
//! 변환 실행 통계 수집과 크기/시간 포맷팅을 담당합니다.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// 실패한 파일 한 건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// 실패한 소스 파일 경로
    pub path: PathBuf,
    /// 에러 메시지
    pub message: String,
}

/// 실행 통계
///
/// 한 번의 실행 동안 변환기가 단독으로 갱신합니다. 파일 단위 병렬 처리를 위해
/// 카운터는 원자적이며 실패 목록은 뮤텍스로 보호됩니다.
#[derive(Debug, Default)]
pub struct RunStatistics {
    /// 처리한 항목 파일 수 (인덱스 제외)
    total_files: AtomicUsize,
    /// 치환이 1회 이상 일어난 파일 수
    converted_files: AtomicUsize,
    /// 치환 없이 복사된 파일 수
    unchanged_files: AtomicUsize,
    /// 실패한 파일 수 (인덱스 포함)
    error_files: AtomicUsize,
    /// 전체 치환 수
    total_substitutions: AtomicUsize,
    /// 메타데이터를 기록한 인덱스 파일 수
    index_files: AtomicUsize,
    /// 읽은 총 바이트
    bytes_read: AtomicU64,
    /// 쓴 총 바이트
    bytes_written: AtomicU64,
    /// 실패 목록
    failures: Mutex<Vec<FileFailure>>,
    /// 실행 시작 시간
    start_time: Option<Instant>,
    /// 실행 종료 시 고정된 경과 시간
    elapsed: Option<Duration>,
}

impl RunStatistics {
    /// 새 통계 인스턴스 생성 (시작 시간 기록)
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 항목 파일 하나를 처리 대상으로 집계
    pub fn increment_total(&self) {
        self.total_files.fetch_add(1, Ordering::Relaxed);
    }

    /// 치환이 일어난 파일 기록
    pub fn record_converted(&self, substitutions: usize, bytes_read: u64, bytes_written: u64) {
        self.converted_files.fetch_add(1, Ordering::Relaxed);
        self.total_substitutions
            .fetch_add(substitutions, Ordering::Relaxed);
        self.add_bytes(bytes_read, bytes_written);
    }

    /// 치환 없이 복사된 파일 기록
    pub fn record_unchanged(&self, bytes_read: u64, bytes_written: u64) {
        self.unchanged_files.fetch_add(1, Ordering::Relaxed);
        self.add_bytes(bytes_read, bytes_written);
    }

    /// 인덱스 파일 기록
    pub fn record_index(&self, bytes_read: u64, bytes_written: u64) {
        self.index_files.fetch_add(1, Ordering::Relaxed);
        self.add_bytes(bytes_read, bytes_written);
    }

    /// 실패한 파일 기록
    pub fn record_failure(&self, path: PathBuf, message: String) {
        self.error_files.fetch_add(1, Ordering::Relaxed);
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(FileFailure { path, message });
    }

    fn add_bytes(&self, read: u64, written: u64) {
        self.bytes_read.fetch_add(read, Ordering::Relaxed);
        self.bytes_written.fetch_add(written, Ordering::Relaxed);
    }

    /// 경과 시간 고정
    pub fn finish(&mut self) {
        self.elapsed = Some(self.elapsed());
    }

    pub fn total_files(&self) -> usize {
        self.total_files.load(Ordering::Relaxed)
    }

    pub fn converted_files(&self) -> usize {
        self.converted_files.load(Ordering::Relaxed)
    }

    pub fn unchanged_files(&self) -> usize {
        self.unchanged_files.load(Ordering::Relaxed)
    }

    pub fn error_files(&self) -> usize {
        self.error_files.load(Ordering::Relaxed)
    }

    pub fn total_substitutions(&self) -> usize {
        self.total_substitutions.load(Ordering::Relaxed)
    }

    pub fn index_files(&self) -> usize {
        self.index_files.load(Ordering::Relaxed)
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Relaxed)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// 실패 목록 (기록 순서)
    pub fn failures(&self) -> Vec<FileFailure> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| {
            self.start_time
                .map(|t| t.elapsed())
                .unwrap_or(Duration::ZERO)
        })
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use flowport::stats::format_bytes;
///
/// // 컬렉션 인덱스 하나
/// assert_eq!(format_bytes(350), "350 B");
/// // 노드 몇 개짜리 flow
/// assert_eq!(format_bytes(18_432), "18.00 KB");
/// // 스토어 내보내기 전체
/// assert_eq!(format_bytes(13_107_200), "12.50 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        format!("{}시간 {}분", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}분 {}초", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
