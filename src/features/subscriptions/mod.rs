/// サブスクリプション機能モジュール
///
/// このモジュールは、サブスクリプション管理に関連するすべての機能を提供します：
/// - サブスクリプションの追加、日付別取得、更新、削除
/// - 入力フォームの検証
/// - 月ごとの支払合計の計算
pub mod form;
pub mod models;
pub mod repository;

// 公開インターフェース
pub use form::SubscriptionForm;
pub use models::{BillingCycle, Subscription, SubscriptionData};
pub use repository::SubscriptionStore;
