//! カレンダー機能モジュール
//!
//! このモジュールは、月表示グリッドの生成と、
//! 日付選択・フォーム操作を扱うコントローラーを提供します。

pub mod controller;
pub mod grid;
pub mod models;


// 公開インターフェース
pub use controller::CalendarController;
pub use grid::{
    first_day_of_month, generate, last_day_of_month, same_month, shift_month, weeks,
    DAYS_PER_WEEK, MIN_GRID_CELLS,
};
pub use models::{CalendarDay, CalendarView, FormAction, FormOutcome, SelectionState};
