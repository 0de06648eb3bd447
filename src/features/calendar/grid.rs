use super::models::CalendarDay;
use crate::features::subscriptions::Subscription;
use crate::shared::errors::{AppError, AppResult};
use chrono::{Datelike, Days, Months, NaiveDate};

/// 1週間の日数
pub const DAYS_PER_WEEK: usize = 7;

/// グリッドの最小セル数（5週分）
pub const MIN_GRID_CELLS: usize = 35;

/// 日曜日を0とする曜日インデックス
fn week_index(date: &NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

fn out_of_range(year: i32, month: u32) -> AppError {
    AppError::date_range(format!("{year}-{month:02} は表示可能な範囲外です"))
}

/// 指定日を含む月の月初日を取得する
pub fn first_day_of_month<D: Datelike>(date: &D) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| out_of_range(date.year(), date.month()))
}

/// 指定日を含む月の月末日を取得する
pub fn last_day_of_month<D: Datelike>(date: &D) -> AppResult<NaiveDate> {
    first_day_of_month(date)?
        .checked_add_months(Months::new(1))
        .and_then(|next_month| next_month.pred_opt())
        .ok_or_else(|| out_of_range(date.year(), date.month()))
}

/// 月初日を基準に月を前後へ移動する
///
/// # 引数
/// * `anchor` - 基準日（どの日でもよい）
/// * `delta` - 移動する月数（負で過去方向）
///
/// # 戻り値
/// 移動先の月初日
pub fn shift_month(anchor: &NaiveDate, delta: i32) -> AppResult<NaiveDate> {
    let first = first_day_of_month(anchor)?;
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    };
    shifted.ok_or_else(|| out_of_range(anchor.year(), anchor.month()))
}

/// 2つの日付が同じ年月かを判定する
pub fn same_month<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// グリッドを週（7セル）ごとの行に分割する
pub fn weeks(days: &[CalendarDay]) -> std::slice::Chunks<'_, CalendarDay> {
    days.chunks(DAYS_PER_WEEK)
}

/// 月表示用のカレンダーグリッドを生成する
///
/// 週の始まりは日曜日。前月末の埋め合わせ、当月の全日、週末までの埋め合わせを並べ、
/// それでも35セルに満たない場合は翌日を1日ずつ足していく。
/// 結果は常に7の倍数かつ35セル以上で、日付順に並ぶ。
///
/// # 引数
/// * `anchor` - 表示する月に含まれる任意の日付
/// * `query` - 日付ごとのサブスクリプション取得関数（全セルに対して呼ばれる）
///
/// # 戻り値
/// カレンダーセルの一覧、または日付が表現範囲外の場合はエラー
pub fn generate<D, F>(anchor: &D, mut query: F) -> AppResult<Vec<CalendarDay>>
where
    D: Datelike,
    F: FnMut(&NaiveDate) -> Vec<Subscription>,
{
    let first = first_day_of_month(anchor)?;
    let last = last_day_of_month(anchor)?;
    let overflow = || out_of_range(first.year(), first.month());

    let mut cells: Vec<(NaiveDate, bool)> = Vec::with_capacity(6 * DAYS_PER_WEEK);

    // 前月の埋め合わせ
    let leading = week_index(&first);
    for offset in (1..=leading).rev() {
        let date = first
            .checked_sub_days(Days::new(u64::from(offset)))
            .ok_or_else(overflow)?;
        cells.push((date, false));
    }

    // 当月
    cells.extend(
        first
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| (date, true)),
    );

    // 最終週の残り
    let trailing = 6 - week_index(&last);
    if trailing > 0 && cells.len() % DAYS_PER_WEEK != 0 {
        for offset in 1..=trailing {
            let date = last
                .checked_add_days(Days::new(u64::from(offset)))
                .ok_or_else(overflow)?;
            cells.push((date, false));
        }
    }

    // 最低5週分を確保
    while cells.len() < MIN_GRID_CELLS {
        let previous = cells.last().map_or(last, |(date, _)| *date);
        let next = previous.succ_opt().ok_or_else(overflow)?;
        cells.push((next, false));
    }

    debug_assert!(cells.len() % DAYS_PER_WEEK == 0);
    debug_assert!(cells.len() >= MIN_GRID_CELLS);

    let days: Vec<CalendarDay> = cells
        .into_iter()
        .map(|(date, is_current_month)| CalendarDay {
            date,
            day_number: date.day(),
            is_current_month,
            subscriptions: query(&date),
        })
        .collect();

    log::debug!(
        "カレンダーグリッドを生成しました: month={}, cells={}, leading={}",
        first.format("%Y-%m"),
        days.len(),
        leading
    );
    Ok(days)
}
