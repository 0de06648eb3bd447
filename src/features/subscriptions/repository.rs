use super::models::{Subscription, SubscriptionData};
use chrono::{Datelike, NaiveDate};

/// サブスクリプションのインメモリストア
///
/// 全レコードの唯一の保持者。プロセス終了とともに内容は失われる。
/// 検証は呼び出し側（フォーム）の責務で、ここでは行わない。
#[derive(Debug)]
pub struct SubscriptionStore {
    subscriptions: Vec<Subscription>,
    next_id: i64,
}

impl Default for SubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 年・月・日の3つ組で同じ日かを判定する（時刻は無視）
fn is_same_day<D: Datelike>(date: &NaiveDate, other: &D) -> bool {
    date.year() == other.year() && date.month() == other.month() && date.day() == other.day()
}

impl SubscriptionStore {
    /// 空のストアを作成する
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 1,
        }
    }

    /// サブスクリプションを追加する
    ///
    /// # 引数
    /// * `data` - 名前・金額・支払いサイクル
    /// * `payment_date` - 支払日
    ///
    /// # 戻り値
    /// 採番済みの新しいサブスクリプション
    pub fn add(&mut self, data: SubscriptionData, payment_date: NaiveDate) -> Subscription {
        let subscription = Subscription {
            id: self.next_id,
            name: data.name,
            price: data.price,
            cycle: data.cycle,
            payment_date,
        };
        // 削除後も再利用しない
        self.next_id += 1;
        self.subscriptions.push(subscription.clone());

        log::debug!(
            "サブスクリプションを追加しました: id={}, name={}, cycle={}, payment_date={}",
            subscription.id,
            subscription.name,
            subscription.cycle,
            subscription.payment_date
        );
        subscription
    }

    /// 指定日のサブスクリプションを追加順で取得する
    ///
    /// # 引数
    /// * `date` - 日付（`NaiveDate`、`NaiveDateTime`、`DateTime<Local>`など）
    ///
    /// # 戻り値
    /// 支払日が同じ日のサブスクリプション一覧
    pub fn get_by_date<D: Datelike>(&self, date: &D) -> Vec<Subscription> {
        self.subscriptions
            .iter()
            .filter(|sub| is_same_day(&sub.payment_date, date))
            .cloned()
            .collect()
    }

    /// サブスクリプションを丸ごと置き換える
    ///
    /// # 引数
    /// * `subscription` - 置き換え後の値（`id`で既存レコードを特定）
    ///
    /// # 戻り値
    /// 置き換えた値、該当idがなければNone
    pub fn update(&mut self, subscription: Subscription) -> Option<Subscription> {
        let Some(slot) = self
            .subscriptions
            .iter_mut()
            .find(|sub| sub.id == subscription.id)
        else {
            log::debug!(
                "更新対象のサブスクリプションが見つかりません: id={}",
                subscription.id
            );
            return None;
        };

        *slot = subscription.clone();
        log::debug!("サブスクリプションを更新しました: id={}", subscription.id);
        Some(subscription)
    }

    /// サブスクリプションを削除する
    ///
    /// # 引数
    /// * `id` - サブスクリプションID
    ///
    /// # 戻り値
    /// 削除した場合はtrue、該当idがなければfalse
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        let removed = self.subscriptions.len() < before;

        log::debug!("サブスクリプション削除: id={id}, removed={removed}");
        removed
    }

    /// IDでサブスクリプションを取得する
    pub fn find_by_id(&self, id: i64) -> Option<&Subscription> {
        self.subscriptions.iter().find(|sub| sub.id == id)
    }

    /// 全サブスクリプションを追加順で取得する
    pub fn find_all(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// 保持しているサブスクリプションの件数を取得する
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// サブスクリプションが1件もないかを判定する
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// 指定月に支払日があるサブスクリプションの合計金額を計算する
    ///
    /// 各レコードは支払日の月に一度だけ数える（サイクルによる展開はしない）
    ///
    /// # 引数
    /// * `year` - 年
    /// * `month` - 月（1〜12）
    ///
    /// # 戻り値
    /// 合計金額
    pub fn total_for_month(&self, year: i32, month: u32) -> f64 {
        self.subscriptions
            .iter()
            .filter(|sub| sub.payment_date.year() == year && sub.payment_date.month() == month)
            .fold(0.0, |acc, sub| acc + sub.price)
    }
}
