//! 파라미터 스키마 — 모듈 설정 옵션의 정적 기술자
//!
//! 각 모듈은 `&'static [Parameter]` 슬라이스로 자신이 받아들이는 옵션을 기술합니다.
//! 테이블형 옵션([`ParamKind::Table`], [`ParamKind::List`])은 하위 스키마를 품어
//! 재귀 구조를 이룹니다. 슬라이스 길이가 곧 스키마의 끝이므로 종결자 항목은 없습니다.
//!
//! # 예시
//! ```
//! use modkit_core::param::{Command, ParamKind, Parameter};
//!
//! const PORTS: &[Parameter] = &[
//!     Parameter::new("port", ParamKind::Int, Some("1:65535"), None, "listening port"),
//! ];
//! static PARAMS: &[Parameter] = &[
//!     Parameter::new("enabled", ParamKind::Bool, None, Some("true"), "enable module"),
//!     Parameter::list("bindings", PORTS, "port bindings"),
//! ];
//!
//! let cmd = Command::new("reload", PARAMS, "reload module config");
//! assert_eq!(cmd.argument_list(), "(enabled, bindings)");
//! ```

use std::fmt;

/// 파라미터 유형
///
/// `Table`과 `List`는 하위 스키마를 직접 가집니다.
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    /// 정수
    Int,
    /// 불리언
    Bool,
    /// 문자열
    String,
    /// 실수
    Real,
    /// 열거형 (range에 `a | b | c` 형식으로 허용값 기술)
    Enum,
    /// 중첩 테이블
    Table(&'static [Parameter]),
    /// 반복되는 테이블 항목의 배열
    List(&'static [Parameter]),
}

impl ParamKind {
    /// 하위 스키마를 가진 유형인지 여부
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_) | Self::List(_))
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::Real => write!(f, "real"),
            Self::Enum => write!(f, "enum"),
            Self::Table(_) => write!(f, "table"),
            Self::List(_) => write!(f, "list"),
        }
    }
}

/// 단일 설정 옵션 기술자
#[derive(Debug, Clone, Copy)]
pub struct Parameter {
    /// 옵션 이름
    pub name: &'static str,
    /// 옵션 유형 (테이블이면 하위 스키마 포함)
    pub kind: ParamKind,
    /// 허용 범위 (`0:max32`, `a | b` 등). 테이블에는 없음
    pub range: Option<&'static str>,
    /// 기본값
    pub default: Option<&'static str>,
    /// 도움말
    pub help: &'static str,
}

impl Parameter {
    /// 스칼라 옵션을 정의합니다.
    pub const fn new(
        name: &'static str,
        kind: ParamKind,
        range: Option<&'static str>,
        default: Option<&'static str>,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            range,
            default,
            help,
        }
    }

    /// 하위 스키마를 가진 테이블 옵션을 정의합니다.
    pub const fn table(name: &'static str, params: &'static [Parameter], help: &'static str) -> Self {
        Self::new(name, ParamKind::Table(params), None, None, help)
    }

    /// 반복 항목 배열 옵션을 정의합니다.
    pub const fn list(name: &'static str, params: &'static [Parameter], help: &'static str) -> Self {
        Self::new(name, ParamKind::List(params), None, None, help)
    }

    pub fn is_table(&self) -> bool {
        self.kind.is_table()
    }

    /// 하위 스키마를 반환합니다. 스칼라 옵션이면 `None`.
    pub fn nested(&self) -> Option<&'static [Parameter]> {
        match self.kind {
            ParamKind::Table(p) | ParamKind::List(p) => Some(p),
            _ => None,
        }
    }
}

/// 스키마에서 이름으로 옵션을 찾습니다 (최상위 단계만).
pub fn find(params: &'static [Parameter], name: &str) -> Option<&'static Parameter> {
    params.iter().find(|p| p.name == name)
}

/// 스키마의 최대 테이블 중첩 깊이를 계산합니다.
///
/// 스칼라만 있는 스키마는 1, 빈 스키마는 0입니다.
pub fn schema_depth(params: &[Parameter]) -> usize {
    params
        .iter()
        .map(|p| 1 + p.nested().map_or(0, schema_depth))
        .max()
        .unwrap_or(0)
}

/// 스키마의 모든 옵션에 대한 점 구분 전체 경로(fqn)를 깊이 우선 순서로 나열합니다.
///
/// 테이블 자체의 경로도 하위 항목보다 먼저 포함됩니다.
pub fn fully_qualified_names(prefix: &str, params: &[Parameter]) -> Vec<String> {
    let mut names = Vec::new();
    collect_names(prefix, params, &mut names);
    names
}

fn collect_names(prefix: &str, params: &[Parameter], out: &mut Vec<String>) {
    for p in params {
        let fqn = if prefix.is_empty() {
            p.name.to_owned()
        } else {
            format!("{prefix}.{}", p.name)
        };
        if let Some(nested) = p.nested() {
            out.push(fqn.clone());
            collect_names(&fqn, nested, out);
        } else {
            out.push(fqn);
        }
    }
}

/// 도움말/사용법 출력을 위한 이름 있는 명령
#[derive(Debug, Clone, Copy)]
pub struct Command {
    /// 명령 이름
    pub name: &'static str,
    /// 인자 스키마
    pub params: &'static [Parameter],
    /// 도움말
    pub help: &'static str,
}

impl Command {
    pub const fn new(name: &'static str, params: &'static [Parameter], help: &'static str) -> Self {
        Self { name, params, help }
    }

    /// 인자 목록을 `"(a, b, c)"` 형식으로 반환합니다.
    pub fn argument_list(&self) -> String {
        let names: Vec<&str> = self.params.iter().map(|p| p.name).collect();
        format!("({})", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAF: &[Parameter] = &[
        Parameter::new("port", ParamKind::Int, Some("1:65535"), None, "port"),
        Parameter::new("name", ParamKind::String, None, None, "name"),
    ];

    const MID: &[Parameter] = &[Parameter::list("ports", LEAF, "port list")];

    static ROOT: &[Parameter] = &[
        Parameter::new("enabled", ParamKind::Bool, None, Some("false"), "enable"),
        Parameter::table("net", MID, "network"),
        Parameter::new("mode", ParamKind::Enum, Some("fast | slow"), Some("fast"), "mode"),
    ];

    #[test]
    fn argument_list_joins_names() {
        let cmd = Command::new("dump", ROOT, "dump state");
        assert_eq!(cmd.argument_list(), "(enabled, net, mode)");
    }

    #[test]
    fn argument_list_empty_schema() {
        let cmd = Command::new("help", &[], "show help");
        assert_eq!(cmd.argument_list(), "()");
    }

    #[test]
    fn argument_list_single_entry_has_no_separator() {
        let cmd = Command::new("get", &LEAF[..1], "get port");
        assert_eq!(cmd.argument_list(), "(port)");
    }

    #[test]
    fn nested_returns_sub_schema() {
        let net = find(ROOT, "net").unwrap();
        assert!(net.is_table());
        assert_eq!(net.nested().unwrap().len(), 1);

        let enabled = find(ROOT, "enabled").unwrap();
        assert!(!enabled.is_table());
        assert!(enabled.nested().is_none());
    }

    #[test]
    fn find_missing_returns_none() {
        assert!(find(ROOT, "port").is_none());
    }

    #[test]
    fn schema_depth_counts_nesting() {
        assert_eq!(schema_depth(&[]), 0);
        assert_eq!(schema_depth(LEAF), 1);
        assert_eq!(schema_depth(MID), 2);
        assert_eq!(schema_depth(ROOT), 3);
    }

    #[test]
    fn fully_qualified_names_walk_depth_first() {
        let names = fully_qualified_names("stream", ROOT);
        assert_eq!(
            names,
            vec![
                "stream.enabled",
                "stream.net",
                "stream.net.ports",
                "stream.net.ports.port",
                "stream.net.ports.name",
                "stream.mode",
            ]
        );
    }

    #[test]
    fn fully_qualified_names_without_prefix() {
        let names = fully_qualified_names("", LEAF);
        assert_eq!(names, vec!["port", "name"]);
    }

    #[test]
    fn param_kind_display() {
        assert_eq!(ParamKind::Int.to_string(), "int");
        assert_eq!(ParamKind::Table(LEAF).to_string(), "table");
        assert_eq!(ParamKind::List(LEAF).to_string(), "list");
    }
}
