//! 일괄 변환 모듈
//!
//! 소스 트리의 두 컬렉션(flows, components)과 세 인덱스 파일을 찾아
//! 미러링된 출력 트리로 변환합니다.
//!
//! 파일 단위 실패(파싱, 페이로드 손상, 쓰기)는 기록 후 계속 진행하며,
//! 출력 트리를 만들 수 없거나 소스 루트가 없을 때만 실행 전체가 실패합니다.

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{ConvertError, Result};
use crate::pattern::PatternMatcher;
use crate::processor::{process_index_file, process_item_file, ProcessOptions, ProcessResult};
use crate::stats::{FileFailure, RunStatistics};
use crate::transform::{DocumentTransformer, IndexKind};

/// 항목 컬렉션
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Flows,
    Components,
}

impl Collection {
    /// 모든 컬렉션 (처리 순서)
    pub const ALL: [Collection; 2] = [Collection::Flows, Collection::Components];

    /// 소스/출력 루트 아래의 폴더 이름
    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Flows => "flows",
            Collection::Components => "components",
        }
    }

    /// 컬렉션 자체의 인덱스 파일
    pub fn index_kind(self) -> IndexKind {
        match self {
            Collection::Flows => IndexKind::Flows,
            Collection::Components => IndexKind::Components,
        }
    }
}

/// 루트 기준 인덱스 파일 위치
pub fn index_location(root: &Path, kind: IndexKind) -> PathBuf {
    match kind {
        IndexKind::Store => root.join(kind.file_name()),
        IndexKind::Flows => root.join(Collection::Flows.dir_name()).join(kind.file_name()),
        IndexKind::Components => root
            .join(Collection::Components.dir_name())
            .join(kind.file_name()),
    }
}

/// 컬렉션 하나의 변환 계획
#[derive(Debug, Clone)]
pub struct CollectionPlan {
    pub collection: Collection,
    /// 정렬된 항목 파일 목록 (폴더가 없으면 `None`)
    pub files: Option<Vec<PathBuf>>,
    /// 탐색 중 읽을 수 없었던 항목
    pub errors: Vec<FileFailure>,
}

/// 실행 전 발견 단계의 결과
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    pub source_root: PathBuf,
    pub collections: Vec<CollectionPlan>,
    /// 존재하는 인덱스 파일
    pub index_files: Vec<(IndexKind, PathBuf)>,
}

impl ConversionPlan {
    /// 변환할 항목 파일 총 수
    pub fn item_count(&self) -> usize {
        self.collections
            .iter()
            .filter_map(|c| c.files.as_ref())
            .map(Vec::len)
            .sum()
    }
}

/// 소스 트리를 탐색하여 변환 계획을 만든다 (쓰기 없음)
pub fn plan(source_root: &Path, matcher: &PatternMatcher) -> Result<ConversionPlan> {
    if !source_root.exists() {
        return Err(ConvertError::SourceNotFound {
            path: source_root.to_path_buf(),
        });
    }
    if !source_root.is_dir() {
        return Err(ConvertError::NotADirectory {
            path: source_root.to_path_buf(),
        });
    }

    let collections = Collection::ALL
        .iter()
        .map(|&collection| match collect_item_files(source_root, collection, matcher) {
            Some((files, errors)) => CollectionPlan {
                collection,
                files: Some(files),
                errors,
            },
            None => CollectionPlan {
                collection,
                files: None,
                errors: Vec::new(),
            },
        })
        .collect();

    let index_files = IndexKind::ALL
        .iter()
        .map(|&kind| (kind, index_location(source_root, kind)))
        .filter(|(_, path)| path.is_file())
        .collect();

    Ok(ConversionPlan {
        source_root: source_root.to_path_buf(),
        collections,
        index_files,
    })
}

fn collect_item_files(
    source_root: &Path,
    collection: Collection,
    matcher: &PatternMatcher,
) -> Option<(Vec<PathBuf>, Vec<FileFailure>)> {
    let dir = source_root.join(collection.dir_name());
    if !dir.is_dir() {
        return None;
    }

    let index_name = collection.index_kind().file_name();
    let is_item = |path: &Path| {
        path.file_name()
            .and_then(|s| s.to_str())
            .map(|name| matcher.is_item_file(name, index_name))
            .unwrap_or(false)
    };

    let mut files = Vec::new();
    let mut errors = Vec::new();

    // 심볼릭 링크는 대상 파일로 취급
    let walker = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        match entry {
            Ok(e) => {
                if e.file_type().is_file() && is_item(e.path()) {
                    files.push(e.into_path());
                }
            }
            Err(err) => {
                let path = err.path().unwrap_or(dir.as_path()).to_path_buf();
                // 컬렉션 폴더 자체의 오류는 항상, 항목 오류는 대상 파일일 때만 기록
                if err.depth() == 0 || is_item(path.as_path()) {
                    warn!(
                        collection = collection.dir_name(),
                        path = %path.display(),
                        "항목을 읽을 수 없습니다: {}",
                        err
                    );
                    errors.push(FileFailure {
                        path,
                        message: format!("항목을 읽을 수 없습니다: {}", err),
                    });
                }
            }
        }
    }

    Some((files, errors))
}

/// 출력 루트와 두 컬렉션 폴더를 만든다 (이미 있으면 그대로 사용)
pub fn ensure_output_tree(output_root: &Path) -> Result<()> {
    let dirs = std::iter::once(output_root.to_path_buf()).chain(
        Collection::ALL
            .iter()
            .map(|c| output_root.join(c.dir_name())),
    );

    for dir in dirs {
        fs::create_dir_all(&dir).map_err(|e| ConvertError::SetupFailure {
            path: dir.clone(),
            reason: e.to_string(),
        })?;
        debug!(dir = %dir.display(), "출력 폴더 준비");
    }

    Ok(())
}

/// 일괄 변환기
///
/// `run`이 변환기를 소비하므로 인스턴스 하나는 한 번만 실행됩니다.
#[derive(Debug)]
pub struct Converter {
    transformer: DocumentTransformer,
    matcher: PatternMatcher,
    options: ProcessOptions,
    progress: ProgressBar,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(DocumentTransformer::default())
    }
}

impl Converter {
    /// 새 변환기 생성
    pub fn new(transformer: DocumentTransformer) -> Self {
        Self {
            transformer,
            matcher: PatternMatcher::default(),
            options: ProcessOptions::new(),
            progress: ProgressBar::hidden(),
        }
    }

    /// 항목 파일 선택기 설정
    pub fn with_matcher(mut self, matcher: PatternMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// 파일 처리 옵션 설정
    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.options = options;
        self
    }

    /// 항목 파일마다 1씩 증가할 진행률 바 설정
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// 전체 변환 실행
    pub fn run(self, source_root: &Path, output_root: &Path) -> Result<RunStatistics> {
        let plan = plan(source_root, &self.matcher)?;
        ensure_output_tree(output_root)?;

        let mut stats = RunStatistics::new();
        self.progress.set_length(plan.item_count() as u64);

        for collection_plan in &plan.collections {
            self.convert_collection(collection_plan, output_root, &stats);
        }

        for (kind, path) in &plan.index_files {
            self.convert_index(*kind, path, output_root, &stats);
        }

        self.progress.finish_with_message("완료!");
        stats.finish();

        info!(
            total = stats.total_files(),
            converted = stats.converted_files(),
            unchanged = stats.unchanged_files(),
            errors = stats.error_files(),
            "변환 종료"
        );

        Ok(stats)
    }

    fn convert_collection(&self, plan: &CollectionPlan, output_root: &Path, stats: &RunStatistics) {
        let name = plan.collection.dir_name();
        let Some(files) = &plan.files else {
            info!(collection = name, "컬렉션 폴더가 없어 건너뜁니다");
            return;
        };

        for failure in &plan.errors {
            stats.record_failure(failure.path.clone(), failure.message.clone());
        }

        info!(collection = name, count = files.len(), "컬렉션 변환 시작");
        let output_dir = output_root.join(name);

        files.par_iter().for_each(|path| {
            let output = output_dir.join(path.file_name().unwrap_or_default());
            stats.increment_total();
            let result = process_item_file(path, &output, &self.transformer, &self.options);
            record_item(stats, result);
            self.progress.inc(1);
        });
    }

    fn convert_index(&self, kind: IndexKind, path: &Path, output_root: &Path, stats: &RunStatistics) {
        let output = index_location(output_root, kind);
        let result = process_index_file(path, &output, kind, &self.transformer, &self.options);

        match result.error {
            Some(message) => {
                warn!(file = %result.path.display(), "인덱스 변환 실패: {}", message);
                stats.record_failure(result.path, message);
            }
            None => {
                info!(file = kind.file_name(), "인덱스 메타데이터 기록");
                stats.record_index(result.bytes_read, result.bytes_written);
            }
        }
    }
}

fn record_item(stats: &RunStatistics, result: ProcessResult) {
    match result.error {
        Some(message) => {
            warn!(file = %result.path.display(), "변환 실패: {}", message);
            stats.record_failure(result.path, message);
        }
        None if result.substitutions > 0 => {
            debug!(
                file = %result.path.display(),
                substitutions = result.substitutions,
                "변환 완료"
            );
            stats.record_converted(result.substitutions, result.bytes_read, result.bytes_written);
        }
        None => {
            debug!(file = %result.path.display(), "치환 없이 복사");
            stats.record_unchanged(result.bytes_read, result.bytes_written);
        }
    }
}
