//! 설정 값 — 외부 설정 파서가 워커에 넘기는 타입 있는 값
//!
//! [`Value`]는 옵션의 말단 이름과 데이터를 함께 가집니다.
//! 워커와 트레이스 마스크는 `is(name)`과 `get_u8()` 두 연산만 사용합니다.

use std::fmt;

/// 값 데이터
#[derive(Debug, Clone, PartialEq)]
pub enum ValueData {
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
}

/// 이름이 붙은 설정 값
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    name: String,
    data: ValueData,
}

impl Value {
    pub fn new(name: impl Into<String>, data: ValueData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn bool(name: impl Into<String>, v: bool) -> Self {
        Self::new(name, ValueData::Bool(v))
    }

    pub fn int(name: impl Into<String>, v: i64) -> Self {
        Self::new(name, ValueData::Int(v))
    }

    pub fn real(name: impl Into<String>, v: f64) -> Self {
        Self::new(name, ValueData::Real(v))
    }

    pub fn str(name: impl Into<String>, v: impl Into<String>) -> Self {
        Self::new(name, ValueData::Str(v.into()))
    }

    /// TOML 값을 변환합니다.
    ///
    /// 테이블, 배열, 날짜는 스칼라 값이 아니므로 `None`을 반환합니다.
    /// 테이블과 배열은 워커의 `enter_table`/`exit_table` 경계로 표현됩니다.
    pub fn from_toml(name: impl Into<String>, v: &toml::Value) -> Option<Self> {
        let data = match v {
            toml::Value::Boolean(b) => ValueData::Bool(*b),
            toml::Value::Integer(n) => ValueData::Int(*n),
            toml::Value::Float(x) => ValueData::Real(*x),
            toml::Value::String(s) => ValueData::Str(s.clone()),
            _ => return None,
        };
        Some(Self::new(name, data))
    }

    /// 옵션 말단 이름
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ValueData {
        &self.data
    }

    /// 이 값의 옵션 이름이 `name`과 같은지 확인합니다.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// 값을 부호 없는 8비트 정수로 읽습니다.
    ///
    /// 범위를 벗어난 값은 포화됩니다 (음수 → 0, 255 초과 → 255).
    /// 하위 8비트만 남기는 절단 방식과 달리 256 같은 값도 0이 아닌 값(255)으로 읽히므로,
    /// `trace.all = 256`은 트레이스를 켭니다.
    /// 불리언은 0/1, 문자열은 정수 또는 `true`/`false`로 해석하고 그 외에는 0입니다.
    pub fn get_u8(&self) -> u8 {
        match &self.data {
            ValueData::Bool(b) => u8::from(*b),
            ValueData::Int(n) => saturate_u8(*n),
            ValueData::Real(x) => {
                // as 캐스트는 NaN → 0, 범위 밖 → 경계값으로 포화
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    *x as u8
                }
            }
            ValueData::Str(s) => match s.trim() {
                "true" => 1,
                "false" => 0,
                other => other.parse::<i64>().map_or(0, saturate_u8),
            },
        }
    }

    pub fn get_bool(&self) -> bool {
        self.get_u8() != 0
    }

    /// 정수로 읽습니다. 정수로 해석할 수 없으면 `None`.
    pub fn get_i64(&self) -> Option<i64> {
        match &self.data {
            ValueData::Bool(b) => Some(i64::from(*b)),
            ValueData::Int(n) => Some(*n),
            ValueData::Real(_) => None,
            ValueData::Str(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            ValueData::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            ValueData::Bool(b) => write!(f, "{} = {b}", self.name),
            ValueData::Int(n) => write!(f, "{} = {n}", self.name),
            ValueData::Real(x) => write!(f, "{} = {x}", self.name),
            ValueData::Str(s) => write!(f, "{} = \"{s}\"", self.name),
        }
    }
}

fn saturate_u8(n: i64) -> u8 {
    u8::try_from(n.clamp(0, i64::from(u8::MAX))).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_matches_option_name_exactly() {
        let v = Value::bool("all", true);
        assert!(v.is("all"));
        assert!(!v.is("al"));
        assert!(!v.is("all "));
    }

    #[test]
    fn get_u8_from_bool_and_int() {
        assert_eq!(Value::bool("x", true).get_u8(), 1);
        assert_eq!(Value::bool("x", false).get_u8(), 0);
        assert_eq!(Value::int("x", 7).get_u8(), 7);
        assert_eq!(Value::int("x", 255).get_u8(), 255);
    }

    #[test]
    fn get_u8_saturates_out_of_range() {
        assert_eq!(Value::int("x", -3).get_u8(), 0);
        assert_eq!(Value::int("x", 256).get_u8(), 255);
        assert_eq!(Value::int("x", i64::MAX).get_u8(), 255);
        assert_eq!(Value::real("x", 1e9).get_u8(), 255);
        assert_eq!(Value::real("x", -1.5).get_u8(), 0);
    }

    #[test]
    fn get_u8_multiple_of_256_is_not_zero() {
        // 절단이면 0이 되어 트레이스 옵션이 꺼진 것으로 읽힘
        assert_eq!(Value::int("all", 256).get_u8(), 255);
        assert_eq!(Value::int("all", 512).get_u8(), 255);
        assert_eq!(Value::str("all", "256").get_u8(), 255);
    }

    #[test]
    fn get_u8_from_string() {
        assert_eq!(Value::str("x", "true").get_u8(), 1);
        assert_eq!(Value::str("x", "false").get_u8(), 0);
        assert_eq!(Value::str("x", " 12 ").get_u8(), 12);
        assert_eq!(Value::str("x", "verbose").get_u8(), 0);
    }

    #[test]
    fn get_i64_and_as_str() {
        assert_eq!(Value::int("x", -9).get_i64(), Some(-9));
        assert_eq!(Value::str("x", "42").get_i64(), Some(42));
        assert_eq!(Value::real("x", 1.0).get_i64(), None);
        assert_eq!(Value::str("x", "abc").as_str(), Some("abc"));
        assert_eq!(Value::int("x", 1).as_str(), None);
    }

    #[test]
    fn from_toml_scalars() {
        let v = Value::from_toml("all", &toml::Value::Boolean(true)).unwrap();
        assert!(v.is("all"));
        assert_eq!(v.get_u8(), 1);

        let v = Value::from_toml("depth", &toml::Value::Integer(3)).unwrap();
        assert_eq!(v.get_i64(), Some(3));

        let v = Value::from_toml("mode", &toml::Value::String("fast".to_owned())).unwrap();
        assert_eq!(v.as_str(), Some("fast"));
    }

    #[test]
    fn from_toml_rejects_tables_and_arrays() {
        let table = toml::Value::Table(toml::map::Map::new());
        assert!(Value::from_toml("t", &table).is_none());
        let array = toml::Value::Array(vec![]);
        assert!(Value::from_toml("a", &array).is_none());
    }

    #[test]
    fn display_renders_name_and_value() {
        assert_eq!(Value::int("depth", 3).to_string(), "depth = 3");
        assert_eq!(Value::str("mode", "fast").to_string(), "mode = \"fast\"");
    }
}
