use super::models::{BillingCycle, Subscription, SubscriptionData};
use crate::shared::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// サブスクリプション入力フォームの値
///
/// 金額は未入力を表現するためOption
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionForm {
    pub name: String,
    pub price: Option<f64>,
    pub cycle: BillingCycle,
}

impl SubscriptionForm {
    /// 編集対象の値でフォームを初期化する
    pub fn from_subscription(subscription: &Subscription) -> Self {
        Self {
            name: subscription.name.clone(),
            price: Some(subscription.price),
            cycle: subscription.cycle,
        }
    }

    /// フォームの入力値を検証する
    ///
    /// # 戻り値
    /// 検証済みの入力値、または失敗時はバリデーションエラー
    pub fn validate(&self) -> AppResult<SubscriptionData> {
        // バリデーション: サービス名は必須（空白のみも不可、値は入力のまま保持）
        if self.name.trim().is_empty() {
            return Err(AppError::validation("サービス名を入力してください"));
        }

        // バリデーション: 金額は正の数値
        let price = match self.price {
            Some(price) if price.is_finite() && price > 0.0 => price,
            Some(_) => {
                return Err(AppError::validation("金額は正の数値である必要があります"));
            }
            None => return Err(AppError::validation("金額を入力してください")),
        };

        Ok(SubscriptionData {
            name: self.name.clone(),
            price,
            cycle: self.cycle,
        })
    }
}
