use crate::features::subscriptions::{Subscription, SubscriptionForm};
use chrono::NaiveDate;
use serde::Serialize;

/// カレンダーグリッドの1セル
///
/// グリッド生成のたびに作り直され、生成後に変更されることはない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    /// このセルが表す日付
    pub date: NaiveDate,
    /// 表示用の日（1〜31）
    pub day_number: u32,
    /// 表示中の月に属するか（前後月の埋め合わせセルはfalse）
    pub is_current_month: bool,
    /// 支払日がこの日のサブスクリプション（追加順）
    pub subscriptions: Vec<Subscription>,
}

impl CalendarDay {
    /// 表示すべきサブスクリプションを取得する
    ///
    /// 埋め合わせセルでは取得済みでも表示しない
    pub fn visible_subscriptions(&self) -> &[Subscription] {
        if self.is_current_month {
            &self.subscriptions
        } else {
            &[]
        }
    }
}

/// 画面セッション単位の選択状態
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionState {
    /// 表示中の月（常に月初日）
    pub current_month: NaiveDate,
    /// 選択中の日付
    pub selected_date: Option<NaiveDate>,
    /// フォーム表示フラグ
    pub show_form: bool,
    /// 編集中のサブスクリプション（Noneは新規作成）
    pub editing: Option<Subscription>,
}

impl SelectionState {
    /// 指定月を表示中とし、未選択・フォーム非表示の状態を作成する
    ///
    /// # 引数
    /// * `current_month` - 表示する月の月初日
    pub fn new(current_month: NaiveDate) -> Self {
        Self {
            current_month,
            selected_date: None,
            show_form: false,
            editing: None,
        }
    }
}

/// フォームから届く操作
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// 保存（編集中なら更新、そうでなければ選択日に新規作成）
    Save(SubscriptionForm),
    /// キャンセル
    Cancel,
    /// 指定IDの削除
    Delete(i64),
}

/// フォーム操作の結果
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Created(Subscription),
    Updated(Subscription),
    Deleted { id: i64, removed: bool },
    Cancelled,
}

/// 表示層へ渡す読み取り専用のスナップショット
#[derive(Debug, Serialize)]
pub struct CalendarView<'a> {
    pub current_month: NaiveDate,
    pub days: &'a [CalendarDay],
    pub selected_date: Option<NaiveDate>,
    pub subscriptions_for_selected_date: &'a [Subscription],
    pub show_form: bool,
    pub editing: Option<&'a Subscription>,
    /// 表示中の月に支払日がある金額の合計
    pub monthly_total: f64,
}
