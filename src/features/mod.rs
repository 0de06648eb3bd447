/// 機能別モジュール
///
/// このモジュールは、アプリケーションの機能を機能別に整理したモジュール群を提供します。
/// 各機能モジュールは、その機能に関連するすべてのコード（モデル、操作、テスト）
/// を含む自己完結型のユニットです。
pub mod calendar;
pub mod subscriptions;
