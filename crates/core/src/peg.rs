//! Peg 통계 — 모듈 카운터 기술자와 누적 집계
//!
//! 각 모듈은 정적 [`PegInfo`] 슬라이스로 카운터 이름과 유형을 선언하고,
//! 실행 중에는 같은 순서의 라이브 카운터(`[PegCount]`)를 갱신합니다.
//! [`PegStats`]는 라이브 값을 유형별 규칙에 따라 누적 값으로 합칩니다.
//!
//! # 유형별 집계 규칙
//! ```text
//! Sum  : total += live, live = 0      (구간 delta 누적)
//! Now  : accumulate_now일 때만 total += live, live 유지
//! Max  : total = max(total, live)      (최고 수위)
//! 전역 모듈: total = live              (유형 무시)
//! ```

use std::fmt;

use serde::Serialize;
use tracing::trace;

/// 64비트 카운터 값
pub type PegCount = u64;

/// 카운터 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountType {
    /// 누적 카운터
    Sum,
    /// 현재 값 (게이지)
    Now,
    /// 최고 수위
    Max,
}

impl fmt::Display for CountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::Now => write!(f, "now"),
            Self::Max => write!(f, "max"),
        }
    }
}

/// 정적 카운터 기술자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PegInfo {
    pub kind: CountType,
    pub name: &'static str,
    pub help: &'static str,
}

impl PegInfo {
    pub const fn new(kind: CountType, name: &'static str, help: &'static str) -> Self {
        Self { kind, name, help }
    }

    pub const fn sum(name: &'static str, help: &'static str) -> Self {
        Self::new(CountType::Sum, name, help)
    }

    pub const fn now(name: &'static str, help: &'static str) -> Self {
        Self::new(CountType::Now, name, help)
    }

    pub const fn max(name: &'static str, help: &'static str) -> Self {
        Self::new(CountType::Max, name, help)
    }
}

/// 패킷 수 하나만 세는 모듈이 공유하는 기술자
pub static SIMPLE_PEGS: &[PegInfo] = &[PegInfo::sum("packets", "total packets")];

/// 출력 협력자에게 넘기는 카운터 한 줄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PegEntry<'a> {
    /// 기술자 인덱스
    pub index: usize,
    pub name: &'a str,
    pub kind: CountType,
    pub value: PegCount,
}

/// 모듈의 누적 카운터
///
/// `count`는 처음 필요할 때 기술자를 세어 한 번만 결정되며,
/// 이후 누적 값 저장소의 길이와 항상 같습니다.
#[derive(Debug, Clone, Default)]
pub struct PegStats {
    pegs: Option<&'static [PegInfo]>,
    counts: Vec<PegCount>,
    count: Option<usize>,
}

impl PegStats {
    pub fn new(pegs: Option<&'static [PegInfo]>) -> Self {
        Self {
            pegs,
            counts: Vec::new(),
            count: None,
        }
    }

    pub fn pegs(&self) -> Option<&'static [PegInfo]> {
        self.pegs
    }

    /// 결정된 카운터 수. 아직 결정되지 않았으면 `None`.
    pub fn count(&self) -> Option<usize> {
        self.count
    }

    /// 누적 값
    pub fn counts(&self) -> &[PegCount] {
        &self.counts
    }

    /// 카운터 수를 (한 번만) 결정하고 모든 누적 값을 0으로 만듭니다.
    ///
    /// 기술자가 없는 모듈은 0개로 결정되며 저장소를 할당하지 않습니다.
    pub fn reset(&mut self) {
        if self.count.is_none() {
            let n = self.pegs.map_or(0, <[PegInfo]>::len);
            self.counts.resize(n, 0);
            self.count = Some(n);
        }
        self.counts.fill(0);
    }

    /// 라이브 카운터를 누적 값에 합칩니다.
    ///
    /// 아직 카운터 수가 결정되지 않았으면 먼저 [`reset`](Self::reset)을 수행합니다.
    /// `live`가 `None`이면 아무 일도 하지 않습니다.
    pub fn sum(&mut self, live: Option<&mut [PegCount]>, global: bool, accumulate_now: bool) {
        if self.count.is_none() {
            self.reset();
        }

        let Some(live) = live else {
            return;
        };
        let Some(pegs) = self.pegs else {
            return;
        };
        debug_assert_eq!(live.len(), self.counts.len(), "live counters misaligned");

        if global {
            for (total, value) in self.counts.iter_mut().zip(live.iter()) {
                *total = *value;
            }
            return;
        }

        for ((info, total), value) in pegs.iter().zip(self.counts.iter_mut()).zip(live.iter_mut()) {
            match info.kind {
                CountType::Sum => {
                    *total = total.wrapping_add(*value);
                    *value = 0;
                }
                CountType::Now => {
                    if accumulate_now {
                        *total = total.wrapping_add(*value);
                    }
                }
                CountType::Max => {
                    if *value > *total {
                        *total = *value;
                    }
                }
            }
        }
        trace!(counters = self.counts.len(), accumulate_now, "pegs summed");
    }

    /// 이름으로 누적 값을 찾습니다.
    pub fn try_global_count(&self, name: &str) -> Option<PegCount> {
        let pegs = self.pegs?;
        let idx = pegs.iter().position(|p| p.name == name)?;
        Some(self.counts.get(idx).copied().unwrap_or(0))
    }

    /// 이름으로 누적 값을 찾습니다.
    ///
    /// 모듈 자신의 기술자에 없는 이름은 호출자 버그입니다.
    /// 디버그 빌드에서는 assert가 실패하고, 릴리스 빌드에서는 0을 반환합니다.
    pub fn get_global_count(&self, name: &str) -> PegCount {
        match self.try_global_count(name) {
            Some(v) => v,
            None => {
                debug_assert!(false, "unknown peg name: {name}");
                0
            }
        }
    }

    /// 누적 값 전체를 출력용 항목으로 만듭니다.
    pub fn entries(&self) -> Vec<PegEntry<'static>> {
        let Some(pegs) = self.pegs else {
            return Vec::new();
        };
        pegs.iter()
            .zip(self.counts.iter())
            .enumerate()
            .map(|(index, (info, value))| PegEntry {
                index,
                name: info.name,
                kind: info.kind,
                value: *value,
            })
            .collect()
    }

    /// 선택한 인덱스의 라이브 값을 출력용 항목으로 만듭니다.
    ///
    /// 기술자 범위를 벗어난 인덱스는 건너뜁니다.
    pub fn interval_entries(&self, live: &[PegCount], indices: &[usize]) -> Vec<PegEntry<'static>> {
        let Some(pegs) = self.pegs else {
            return Vec::new();
        };
        indices
            .iter()
            .filter_map(|&index| {
                let info = pegs.get(index)?;
                let value = live.get(index).copied()?;
                Some(PegEntry {
                    index,
                    name: info.name,
                    kind: info.kind,
                    value,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &[PegInfo] = &[
        PegInfo::sum("packets", "total packets"),
        PegInfo::now("sessions", "current sessions"),
        PegInfo::max("max_sessions", "peak sessions"),
    ];

    fn mixed() -> PegStats {
        static PEGS: &[PegInfo] = MIXED;
        PegStats::new(Some(PEGS))
    }

    #[test]
    fn count_unresolved_until_reset() {
        let mut stats = mixed();
        assert_eq!(stats.count(), None);
        stats.reset();
        assert_eq!(stats.count(), Some(3));
        assert_eq!(stats.counts(), &[0, 0, 0]);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut stats = mixed();
        stats.reset();
        let mut live = [4, 2, 9];
        stats.sum(Some(&mut live), false, true);
        assert_ne!(stats.counts(), &[0, 0, 0]);

        stats.reset();
        assert_eq!(stats.count(), Some(3));
        assert_eq!(stats.counts(), &[0, 0, 0]);
        stats.reset();
        assert_eq!(stats.count(), Some(3));
        assert_eq!(stats.counts(), &[0, 0, 0]);
    }

    #[test]
    fn no_descriptors_resolves_to_zero() {
        let mut stats = PegStats::new(None);
        stats.reset();
        assert_eq!(stats.count(), Some(0));
        assert!(stats.counts().is_empty());
        assert!(stats.entries().is_empty());
    }

    #[test]
    fn sum_without_live_counters_is_noop() {
        let mut stats = mixed();
        stats.sum(None, false, true);
        assert_eq!(stats.count(), Some(3));
        assert_eq!(stats.counts(), &[0, 0, 0]);
    }

    #[test]
    fn sum_kind_flushes_delta() {
        let mut stats = mixed();
        let mut live = [5, 0, 0];
        stats.sum(Some(&mut live), false, false);
        assert_eq!(stats.counts()[0], 5);
        assert_eq!(live[0], 0);

        // 새 쓰기 없이 다시 합치면 변화 없음
        stats.sum(Some(&mut live), false, false);
        assert_eq!(stats.counts()[0], 5);

        live[0] = 3;
        stats.sum(Some(&mut live), false, false);
        assert_eq!(stats.counts()[0], 8);
    }

    #[test]
    fn now_kind_respects_accumulate_flag() {
        let mut stats = mixed();
        let mut live = [0, 7, 0];
        stats.sum(Some(&mut live), false, false);
        assert_eq!(stats.counts()[1], 0);
        assert_eq!(live[1], 7);

        stats.sum(Some(&mut live), false, true);
        assert_eq!(stats.counts()[1], 7);
        assert_eq!(live[1], 7);

        stats.sum(Some(&mut live), false, true);
        assert_eq!(stats.counts()[1], 14);
    }

    #[test]
    fn max_kind_tracks_high_water_mark() {
        let mut stats = mixed();
        let mut previous = 0;
        for value in [3, 10, 4, 10, 12, 0] {
            let mut live = [0, 0, value];
            stats.sum(Some(&mut live), false, false);
            previous = previous.max(value);
            assert_eq!(stats.counts()[2], previous);
            assert_eq!(live[2], value);
        }
    }

    #[test]
    fn global_copies_live_values_verbatim() {
        let mut stats = mixed();
        let mut live = [5, 7, 9];
        stats.sum(Some(&mut live), true, false);
        assert_eq!(stats.counts(), &[5, 7, 9]);

        let mut live = [1, 2, 3];
        stats.sum(Some(&mut live), true, false);
        assert_eq!(stats.counts(), &[1, 2, 3]);
        // 전역 모듈은 라이브 값을 초기화하지 않음
        assert_eq!(live, [1, 2, 3]);
    }

    #[test]
    fn sum_wraps_on_overflow() {
        let mut stats = mixed();
        let mut live = [u64::MAX, 0, 0];
        stats.sum(Some(&mut live), false, false);
        let mut live = [2, 0, 0];
        stats.sum(Some(&mut live), false, false);
        assert_eq!(stats.counts()[0], 1);
    }

    #[test]
    fn global_count_by_name() {
        let mut stats = PegStats::new(Some(SIMPLE_PEGS));
        let mut live = [5];
        stats.sum(Some(&mut live), false, false);
        assert_eq!(stats.get_global_count("packets"), 5);
        assert_eq!(stats.try_global_count("bytes"), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unknown peg name")]
    fn global_count_unknown_name_asserts() {
        let mut stats = PegStats::new(Some(SIMPLE_PEGS));
        stats.reset();
        let _ = stats.get_global_count("bytes");
    }

    #[test]
    fn entries_follow_descriptor_order() {
        let mut stats = mixed();
        let mut live = [1, 2, 3];
        stats.sum(Some(&mut live), false, true);
        let entries = stats.entries();
        let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["packets", "sessions", "max_sessions"]);
        assert_eq!(entries[2].kind, CountType::Max);
        assert_eq!(entries[2].value, 3);
    }

    #[test]
    fn interval_entries_skip_out_of_range() {
        let mut stats = mixed();
        stats.reset();
        let live = [10, 20, 30];
        let entries = stats.interval_entries(&live, &[2, 7, 0]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 2);
        assert_eq!(entries[0].value, 30);
        assert_eq!(entries[1].index, 0);
        assert_eq!(entries[1].value, 10);
    }

    #[test]
    fn count_type_serializes_lowercase() {
        let json = serde_json::to_string(&CountType::Max).unwrap();
        assert_eq!(json, "\"max\"");
    }
}
