use super::grid::{first_day_of_month, generate, same_month, shift_month};
use super::models::{CalendarDay, CalendarView, FormAction, FormOutcome, SelectionState};
use crate::features::subscriptions::{Subscription, SubscriptionForm, SubscriptionStore};
use crate::shared::errors::{AppError, AppResult};
use chrono::{Datelike, Local, NaiveDate};

/// カレンダー画面の選択状態とストア操作をまとめるコントローラー
///
/// 月移動・日付選択・フォーム操作のたびにグリッドを丸ごと再生成する。
/// ストアはこのコントローラーが所有し、他に書き込み手段はない。
#[derive(Debug)]
pub struct CalendarController {
    store: SubscriptionStore,
    selection: SelectionState,
    grid: Vec<CalendarDay>,
    subscriptions_for_selected_date: Vec<Subscription>,
}

impl CalendarController {
    /// コントローラーを作成し、初期グリッドを生成する
    ///
    /// # 引数
    /// * `store` - サブスクリプションストア
    /// * `anchor` - 最初に表示する月に含まれる任意の日付
    ///
    /// # 戻り値
    /// コントローラー、または日付が表現範囲外の場合はエラー
    pub fn new(store: SubscriptionStore, anchor: NaiveDate) -> AppResult<Self> {
        let mut controller = Self {
            store,
            selection: SelectionState::new(first_day_of_month(&anchor)?),
            grid: Vec::new(),
            subscriptions_for_selected_date: Vec::new(),
        };
        controller.rebuild_grid()?;
        Ok(controller)
    }

    /// 所有しているストアを参照する
    pub fn store(&self) -> &SubscriptionStore {
        &self.store
    }

    /// 現在の選択状態を取得する
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// 最後に生成したカレンダーグリッドを取得する
    pub fn grid(&self) -> &[CalendarDay] {
        &self.grid
    }

    /// 選択中の日付のサブスクリプション一覧を取得する
    pub fn subscriptions_for_selected_date(&self) -> &[Subscription] {
        &self.subscriptions_for_selected_date
    }

    /// 前月へ移動する
    pub fn previous_month(&mut self) -> AppResult<()> {
        let target = shift_month(&self.selection.current_month, -1)?;
        self.go_to_month(target)
    }

    /// 翌月へ移動する
    pub fn next_month(&mut self) -> AppResult<()> {
        let target = shift_month(&self.selection.current_month, 1)?;
        self.go_to_month(target)
    }

    /// 指定日を含む月へ移動し、選択とフォームをリセットする
    pub fn go_to_month(&mut self, date: NaiveDate) -> AppResult<()> {
        self.selection.current_month = first_day_of_month(&date)?;
        self.rebuild_grid()?;

        self.selection.selected_date = None;
        self.subscriptions_for_selected_date.clear();
        self.close_form();

        log::info!(
            "表示月を変更しました: {}",
            self.selection.current_month.format("%Y-%m")
        );
        Ok(())
    }

    /// 日付セルを選択する
    ///
    /// 表示中の月と異なる月の日付であれば、先にその月へ表示を切り替える。
    pub fn select_date(&mut self, date: NaiveDate) -> AppResult<()> {
        if !same_month(&date, &self.selection.current_month) {
            self.selection.current_month = first_day_of_month(&date)?;
            self.rebuild_grid()?;
        }

        self.selection.selected_date = Some(date);
        self.reload_selected_date();
        self.close_form();

        log::debug!(
            "日付を選択しました: {date}, 件数={}",
            self.subscriptions_for_selected_date.len()
        );
        Ok(())
    }

    /// 新規作成フォームを開く
    ///
    /// 日付が未選択の場合は今日を選択する
    pub fn show_add_form(&mut self) {
        if self.selection.selected_date.is_none() {
            let today = Local::now().date_naive();
            log::warn!("日付が選択されていないため、今日({today})を選択します");
            self.selection.selected_date = Some(today);
            self.reload_selected_date();
        }

        self.selection.editing = None;
        self.selection.show_form = true;
    }

    /// 編集フォームを開く
    ///
    /// # 引数
    /// * `id` - 編集するサブスクリプションのID
    pub fn show_edit_form(&mut self, id: i64) -> AppResult<()> {
        let subscription = self
            .store
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("ID {id} のサブスクリプション")))?;

        self.selection.editing = Some(subscription);
        self.selection.show_form = true;
        Ok(())
    }

    /// 編集中の値で初期化したフォームを取得する
    pub fn current_form(&self) -> SubscriptionForm {
        self.selection
            .editing
            .as_ref()
            .map(SubscriptionForm::from_subscription)
            .unwrap_or_default()
    }

    /// フォームからの操作を処理する
    ///
    /// # 引数
    /// * `action` - 保存・キャンセル・削除
    ///
    /// # 戻り値
    /// 操作結果、または入力不正・対象なしの場合はエラー
    pub fn handle_form_action(&mut self, action: FormAction) -> AppResult<FormOutcome> {
        match action {
            FormAction::Save(form) => self.save(form),
            FormAction::Cancel => {
                self.close_form();
                Ok(FormOutcome::Cancelled)
            }
            FormAction::Delete(id) => {
                let removed = self.store.delete(id);
                if !removed {
                    log::warn!("削除対象のサブスクリプションが見つかりません: id={id}");
                }
                self.after_mutation()?;
                Ok(FormOutcome::Deleted { id, removed })
            }
        }
    }

    /// 表示層へ渡すスナップショットを作成する
    pub fn view(&self) -> CalendarView<'_> {
        let month = self.selection.current_month;
        CalendarView {
            current_month: month,
            days: &self.grid,
            selected_date: self.selection.selected_date,
            subscriptions_for_selected_date: &self.subscriptions_for_selected_date,
            show_form: self.selection.show_form,
            editing: self.selection.editing.as_ref(),
            monthly_total: self.store.total_for_month(month.year(), month.month()),
        }
    }

    fn save(&mut self, form: SubscriptionForm) -> AppResult<FormOutcome> {
        // 入力不正の場合はフォームを開いたままにする
        let data = form.validate()?;

        let outcome = match self.selection.editing.take() {
            Some(editing) => {
                // 支払日は編集で変更しない
                let merged = editing.merged_with(data);
                match self.store.update(merged) {
                    Some(updated) => FormOutcome::Updated(updated),
                    None => {
                        self.after_mutation()?;
                        return Err(AppError::not_found(format!(
                            "ID {} のサブスクリプション",
                            editing.id
                        )));
                    }
                }
            }
            None => {
                let Some(date) = self.selection.selected_date else {
                    return Err(AppError::validation("支払日が選択されていません"));
                };
                FormOutcome::Created(self.store.add(data, date))
            }
        };

        self.after_mutation()?;
        Ok(outcome)
    }

    fn after_mutation(&mut self) -> AppResult<()> {
        self.rebuild_grid()?;
        self.reload_selected_date();
        self.close_form();
        Ok(())
    }

    fn rebuild_grid(&mut self) -> AppResult<()> {
        let store = &self.store;
        self.grid = generate(&self.selection.current_month, |date| store.get_by_date(date))?;
        Ok(())
    }

    fn reload_selected_date(&mut self) {
        self.subscriptions_for_selected_date = match self.selection.selected_date {
            Some(date) => self.store.get_by_date(&date),
            None => Vec::new(),
        };
    }

    fn close_form(&mut self) {
        self.selection.show_form = false;
        self.selection.editing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::subscriptions::BillingCycle;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn form(name: &str, price: f64, cycle: BillingCycle) -> SubscriptionForm {
        SubscriptionForm {
            name: name.to_string(),
            price: Some(price),
            cycle,
        }
    }

    fn july_controller() -> CalendarController {
        CalendarController::new(SubscriptionStore::new(), ymd(2024, 7, 19)).unwrap()
    }

    #[test]
    fn test_new_builds_initial_grid() {
        let controller = july_controller();
        assert_eq!(controller.selection().current_month, ymd(2024, 7, 1));
        assert_eq!(controller.grid().len(), 35);
        assert!(controller.selection().selected_date.is_none());
    }

    #[test]
    fn test_month_navigation_resets_selection() {
        let mut controller = july_controller();
        controller.select_date(ymd(2024, 7, 10)).unwrap();
        controller.show_add_form();

        controller.next_month().unwrap();
        assert_eq!(controller.selection().current_month, ymd(2024, 8, 1));
        assert_eq!(controller.selection().selected_date, None);
        assert!(!controller.selection().show_form);
        assert!(controller.subscriptions_for_selected_date().is_empty());

        controller.previous_month().unwrap();
        controller.previous_month().unwrap();
        assert_eq!(controller.selection().current_month, ymd(2024, 6, 1));
        assert_eq!(controller.grid()[0].date, ymd(2024, 5, 26));
    }

    #[test]
    fn test_select_padding_date_reanchors_month() {
        let mut controller = july_controller();

        controller.select_date(ymd(2024, 6, 30)).unwrap();
        assert_eq!(controller.selection().current_month, ymd(2024, 6, 1));
        assert_eq!(controller.selection().selected_date, Some(ymd(2024, 6, 30)));
        assert!(controller
            .grid()
            .iter()
            .any(|day| day.date == ymd(2024, 6, 30) && day.is_current_month));

        // 同じ月内の選択では再アンカーしない
        controller.select_date(ymd(2024, 6, 3)).unwrap();
        assert_eq!(controller.selection().current_month, ymd(2024, 6, 1));
    }

    #[test]
    fn test_create_subscription_via_form() {
        let mut controller = july_controller();
        controller.select_date(ymd(2024, 7, 15)).unwrap();
        controller.show_add_form();
        assert_eq!(controller.current_form(), SubscriptionForm::default());

        let outcome = controller
            .handle_form_action(FormAction::Save(form("Netflix", 15.0, BillingCycle::Monthly)))
            .unwrap();

        let FormOutcome::Created(created) = outcome else {
            panic!("新規作成の結果を期待しました");
        };
        assert_eq!(created.payment_date, ymd(2024, 7, 15));
        assert!(!controller.selection().show_form);
        assert_eq!(controller.subscriptions_for_selected_date(), &[created.clone()]);

        // グリッドも再生成されている
        let cell = controller
            .grid()
            .iter()
            .find(|day| day.date == ymd(2024, 7, 15))
            .unwrap();
        assert_eq!(cell.subscriptions, vec![created]);
    }

    #[test]
    fn test_invalid_form_keeps_form_open() {
        let mut controller = july_controller();
        controller.select_date(ymd(2024, 7, 15)).unwrap();
        controller.show_add_form();

        let result = controller.handle_form_action(FormAction::Save(SubscriptionForm {
            name: String::new(),
            price: Some(10.0),
            cycle: BillingCycle::Monthly,
        }));

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(controller.selection().show_form);
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_save_without_selected_date_is_rejected() {
        let mut controller = july_controller();

        let result = controller
            .handle_form_action(FormAction::Save(form("Netflix", 15.0, BillingCycle::Monthly)));
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_show_add_form_defaults_to_today() {
        let mut controller = july_controller();
        controller.show_add_form();

        assert!(controller.selection().show_form);
        assert!(controller.selection().selected_date.is_some());
        assert!(controller.selection().editing.is_none());
    }

    #[test]
    fn test_edit_keeps_payment_date() {
        let mut controller = july_controller();
        controller.select_date(ymd(2024, 7, 15)).unwrap();
        controller
            .handle_form_action(FormAction::Save(form("Netflix", 15.0, BillingCycle::Monthly)))
            .unwrap();

        controller.show_edit_form(1).unwrap();
        assert_eq!(controller.current_form().name, "Netflix");

        let outcome = controller
            .handle_form_action(FormAction::Save(form("Netflix 4K", 22.0, BillingCycle::Yearly)))
            .unwrap();
        let FormOutcome::Updated(updated) = outcome else {
            panic!("更新の結果を期待しました");
        };

        assert_eq!(updated.id, 1);
        assert_eq!(updated.payment_date, ymd(2024, 7, 15));
        assert_eq!(updated.cycle, BillingCycle::Yearly);
        assert_eq!(controller.subscriptions_for_selected_date()[0].name, "Netflix 4K");
        assert!(controller.selection().editing.is_none());
    }

    #[test]
    fn test_show_edit_form_unknown_id() {
        let mut controller = july_controller();
        assert!(matches!(
            controller.show_edit_form(42),
            Err(AppError::NotFound(_))
        ));
        assert!(!controller.selection().show_form);
    }

    #[test]
    fn test_update_of_deleted_record_reports_not_found() {
        let mut controller = july_controller();
        controller.select_date(ymd(2024, 7, 15)).unwrap();
        controller
            .handle_form_action(FormAction::Save(form("Hulu", 8.0, BillingCycle::Monthly)))
            .unwrap();
        controller.show_edit_form(1).unwrap();

        // 別経路で削除された状態を再現
        controller.store.delete(1);

        let result = controller
            .handle_form_action(FormAction::Save(form("Hulu", 9.0, BillingCycle::Monthly)));
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(!controller.selection().show_form);
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_delete_and_cancel() {
        let mut controller = july_controller();
        controller.select_date(ymd(2024, 7, 15)).unwrap();
        controller
            .handle_form_action(FormAction::Save(form("Spotify", 10.0, BillingCycle::Monthly)))
            .unwrap();

        controller.show_edit_form(1).unwrap();
        assert_eq!(
            controller.handle_form_action(FormAction::Cancel).unwrap(),
            FormOutcome::Cancelled
        );
        assert!(!controller.selection().show_form);
        assert_eq!(controller.store().len(), 1);

        assert_eq!(
            controller.handle_form_action(FormAction::Delete(1)).unwrap(),
            FormOutcome::Deleted { id: 1, removed: true }
        );
        assert!(controller.subscriptions_for_selected_date().is_empty());

        assert_eq!(
            controller.handle_form_action(FormAction::Delete(1)).unwrap(),
            FormOutcome::Deleted { id: 1, removed: false }
        );
    }

    #[test]
    fn test_view_snapshot() {
        let mut controller = july_controller();
        controller.select_date(ymd(2024, 7, 15)).unwrap();
        controller
            .handle_form_action(FormAction::Save(form("Netflix", 15.0, BillingCycle::Monthly)))
            .unwrap();

        let view = controller.view();
        assert_eq!(view.current_month, ymd(2024, 7, 1));
        assert_eq!(view.days.len(), 35);
        assert_eq!(view.selected_date, Some(ymd(2024, 7, 15)));
        assert_eq!(view.monthly_total, 15.0);
        assert!(view.editing.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["current_month"], "2024-07-01");
        assert_eq!(json["subscriptions_for_selected_date"][0]["name"], "Netflix");
    }
}
