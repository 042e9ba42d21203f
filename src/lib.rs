//! flowport - STORE NAMESPACE CONVERTER
//!
//! 내려받은 스토어의 flow/component JSON 파일에서 원본 패키지 네임스페이스 참조를
//! 대상 네임스페이스로 바꾸어, 구조가 같은 다른 호스트 애플리케이션에서 쓸 수 있게 합니다.
//!
//! # 주요 기능
//!
//! - 🔁 **치환 규칙 엔진**: 정확 문자열 별칭 → 정규식 패턴 순서의 고정점 규칙 집합
//! - 🧩 **문서 변환**: `data` / `original.data` 페이로드 치환, 손상 검출, 변환 메타데이터 기록
//! - 📂 **일괄 변환**: flows / components 컬렉션과 인덱스 파일을 미러링된 트리로 변환
//! - 🛡️ **부분 실패 허용**: 파일 단위 오류는 기록 후 계속 진행
//! - 📊 **실행 통계**: 변환/복사/실패 파일 수, 치환 수, 용량, 처리 시간
//!
//! # 예제
//!
//! ```no_run
//! use flowport::Converter;
//! use std::path::Path;
//!
//! let stats = Converter::default()
//!     .run(Path::new("store_components"), Path::new("converted"))
//!     .unwrap();
//! println!("{} files converted", stats.converted_files());
//! ```

pub mod cli;
pub mod converter;
pub mod error;
pub mod pattern;
pub mod processor;
pub mod report;
pub mod rewriter;
pub mod rules;
pub mod stats;
pub mod transform;

// Re-exports for convenient access
pub use cli::Args;
pub use converter::{plan, Collection, ConversionPlan, Converter};
pub use error::{ConvertError, Result};
pub use pattern::PatternMatcher;
pub use processor::{process_index_file, process_item_file, ProcessOptions, ProcessResult};
pub use rules::{RewriteResult, RewriteRule, RuleSet};
pub use stats::{format_bytes, RunStatistics};
pub use transform::{ConversionProfile, DocumentTransformer, IndexKind, Transformed};
