use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 支払いサイクル（表示専用で、カレンダー上の繰り返し展開には使わない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    /// 月額
    #[default]
    Monthly,
    /// 年額
    Yearly,
    /// 週額
    Weekly,
}

impl BillingCycle {
    /// 表示用のタグ文字列を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
            BillingCycle::Weekly => "weekly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// サブスクリプションデータモデル
///
/// `id`はストアが採番し、以後変更されない。
/// `payment_date`はこのレコードが表示される唯一の日付。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub cycle: BillingCycle,
    pub payment_date: NaiveDate,
}

/// サブスクリプション作成用データ（id・支払日を除く入力値）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubscriptionData {
    pub name: String,
    pub price: f64,
    pub cycle: BillingCycle,
}

impl Subscription {
    /// 入力値を既存レコードへ反映した新しい値を返す
    ///
    /// idと支払日は保持される
    pub fn merged_with(&self, data: SubscriptionData) -> Subscription {
        Subscription {
            name: data.name,
            price: data.price,
            cycle: data.cycle,
            ..self.clone()
        }
    }
}
