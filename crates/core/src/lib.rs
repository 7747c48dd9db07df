//! # modkit-core
//!
//! 패킷 처리 엔진의 모듈 기반 계층입니다.
//!
//! - [`module`]: 설정 워크 검증(테이블 깊이, 리스트형 모듈), 훅 위임, 통계/트레이스 연결
//! - [`peg`]: 카운터 기술자와 Sum/Now/Max/전역 규칙에 따른 누적 집계
//! - [`trace`]: 트레이스 별칭 → 비트마스크 컴파일, 기본 `all` 옵션
//! - [`param`]: 파라미터 스키마와 명령 인자 목록
//! - [`registry`]: 여러 모듈에 대한 일괄 집계/초기화/출력
//! - [`format`]: 텍스트, JSON, `metrics` 레코더 출력
//! - [`config`], [`logging`], [`error`]: 런타임 설정, tracing 초기화, 에러 타입

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod metrics;
pub mod module;
pub mod param;
pub mod peg;
pub mod registry;
pub mod trace;
pub mod value;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, ModkitError, RegistryError};

// 설정
pub use config::ModkitConfig;

// 모듈
pub use module::{Module, ModuleHooks, SetOutcome};
pub use registry::{DynModule, ModuleRegistry};

// 도메인 타입
pub use param::{Command, ParamKind, Parameter};
pub use peg::{CountType, PegCount, PegInfo, PegStats};
pub use trace::{Trace, TraceHandle, TraceMask, TraceValue};
pub use value::{Value, ValueData};

// 출력
pub use format::{JsonFormatter, MetricsFormatter, StatsFormatter, TextFormatter};
