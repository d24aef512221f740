use serde::{Deserialize, Deserializer, Serialize};

/// 배합표의 원료 한 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRow {
    /// 원료명(자유 텍스트). "water"가 포함되면 QS 대상이 된다.
    #[serde(default)]
    pub name: String,
    /// 최종 제품 대비 중량 % (0~100)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percent: f64,
    /// 원료 중 유효 성분 비율(0~1)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub active_frac: f64,
    /// 원료 kg당 단가
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_per_kg: f64,
    /// true면 이름과 무관하게 QS(잔량) 행으로 취급한다.
    #[serde(default, skip_serializing_if = "is_false")]
    pub balance: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl IngredientRow {
    pub fn new(name: impl Into<String>, percent: f64, active_frac: f64, cost_per_kg: f64) -> Self {
        Self {
            name: name.into(),
            percent,
            active_frac,
            cost_per_kg,
            balance: false,
        }
    }

    /// 명시적인 QS 행으로 표시한다.
    pub fn as_balance(mut self) -> Self {
        self.balance = true;
        self
    }

    /// 이름에 "water"가 포함되는지(대소문자 무시) 확인한다.
    pub fn is_water(&self) -> bool {
        self.name.to_lowercase().contains("water")
    }
}

/// 셀 문자열을 숫자로 변환한다. 숫자가 아니면 0.0으로 대체한다.
pub fn coerce_f64(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// 숫자/문자열/기타 값을 모두 받아 f64로 강제 변환하는 역직렬화 함수.
/// 잘못된 셀 하나 때문에 전체 배합표 로드가 실패하지 않도록 한다.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawCell::deserialize(deserializer)? {
        RawCell::Number(v) if v.is_finite() => v,
        RawCell::Number(_) => 0.0,
        RawCell::Text(s) => coerce_f64(&s),
        RawCell::Other(_) => 0.0,
    };
    Ok(value)
}
