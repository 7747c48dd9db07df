//! 메트릭 상수 및 설명 등록
//!
//! [`MetricsFormatter`](crate::format::MetricsFormatter)가 게시하는 메트릭의
//! 이름, 레이블 키, 설명을 한곳에서 정의합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `modkit_`
//! - 접미어: `_total` (counter), 없음 (gauge)
//! - 모듈과 카운터 이름은 메트릭 이름이 아니라 레이블로 구분합니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use modkit_core::metrics as m;
//!
//! metrics::counter!(m::PEG_COUNT_TOTAL, m::LABEL_MODULE => "stream_tcp", m::LABEL_PEG => "packets")
//!     .absolute(1024);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 모듈 레이블 키
pub const LABEL_MODULE: &str = "module";

/// 카운터(peg) 이름 레이블 키
pub const LABEL_PEG: &str = "peg";

// ─── Peg 메트릭 ─────────────────────────────────────────────────────

/// Sum 유형 카운터의 누적 값 (counter, labels: module, peg)
pub const PEG_COUNT_TOTAL: &str = "modkit_peg_count_total";

/// Now 유형 카운터의 현재 값 (gauge, labels: module, peg)
pub const PEG_COUNT_CURRENT: &str = "modkit_peg_count";

/// Max 유형 카운터의 최고 수위 (gauge, labels: module, peg)
pub const PEG_COUNT_MAX: &str = "modkit_peg_count_max";

// ─── 레지스트리 메트릭 ───────────────────────────────────────────────

/// 등록된 모듈 수 (gauge)
pub const MODULES_REGISTERED: &str = "modkit_modules_registered";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    describe_counter!(
        PEG_COUNT_TOTAL,
        "Accumulated value of sum-type module counters"
    );
    describe_gauge!(
        PEG_COUNT_CURRENT,
        "Current value of now-type module counters"
    );
    describe_gauge!(
        PEG_COUNT_MAX,
        "High-water mark of max-type module counters"
    );
    describe_gauge!(
        MODULES_REGISTERED,
        "Number of modules registered in the module registry"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        PEG_COUNT_TOTAL,
        PEG_COUNT_CURRENT,
        PEG_COUNT_MAX,
        MODULES_REGISTERED,
    ];

    #[test]
    fn all_metrics_start_with_modkit_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("modkit_"),
                "Metric '{}' does not start with 'modkit_' prefix",
                name
            );
        }
    }

    #[test]
    fn counter_metrics_end_with_total() {
        assert!(PEG_COUNT_TOTAL.ends_with("_total"));
        assert!(!PEG_COUNT_CURRENT.ends_with("_total"));
        assert!(!PEG_COUNT_MAX.ends_with("_total"));
    }

    #[test]
    fn metric_names_are_unique() {
        let mut names = ALL_METRIC_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL_METRIC_NAMES.len());
    }

    #[test]
    fn describe_all_does_not_panic() {
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_MODULE, LABEL_PEG] {
            assert_eq!(label.to_lowercase(), label);
        }
    }
}
