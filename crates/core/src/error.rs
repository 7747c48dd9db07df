//! 에러 타입 — 도메인별 에러 정의
//!
//! 설정 워크와 통계 집계 연산 자체는 `bool`/값을 반환합니다.
//! 여기의 타입은 설정 파일 로딩, 로깅 초기화, 통계 출력, 레지스트리 조작처럼
//! 주변 계층에서 발생하는 실패만 표현합니다.

/// modkit 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ModkitError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 모듈 레지스트리 에러
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// 로깅 초기화 에러
    #[error("logging error: {0}")]
    Logging(String),

    /// 통계 직렬화 에러
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 모듈 레지스트리 에러
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// 같은 이름의 모듈이 이미 등록됨
    #[error("module already registered: {name}")]
    AlreadyRegistered { name: String },

    /// 모듈을 찾을 수 없음
    #[error("module not found: {name}")]
    NotFound { name: String },
}
