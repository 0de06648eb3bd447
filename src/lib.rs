pub mod features;
pub mod shared;

use chrono::Local;
use features::calendar::CalendarController;
use features::subscriptions::SubscriptionStore;
use log::info;
use shared::{
    initialize_logging_system, load_environment_variables, AppResult, EnvironmentConfig,
};
use std::io::Write;

/// アプリケーションを起動する
///
/// 環境変数とログを初期化し、設定された月のカレンダーを生成して
/// 表示層向けのスナップショットをJSONで標準出力へ書き出す。
pub fn run() -> AppResult<()> {
    // LOG_LEVELを.envから読めるよう、ログ初期化より先に読み込む
    let env_file = load_environment_variables();

    let env_config = EnvironmentConfig::from_env();
    initialize_logging_system(&env_config);

    // ここから先はログが有効
    env_file.log();
    info!("アプリケーション初期化を開始します...");

    let anchor = env_config
        .initial_month()
        .unwrap_or_else(|| Local::now().date_naive());
    let controller = CalendarController::new(SubscriptionStore::new(), anchor)?;

    info!(
        "カレンダーを生成しました: month={}, cells={}",
        controller.selection().current_month.format("%Y-%m"),
        controller.grid().len()
    );

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &controller.view())?;
    writeln!(handle)?;

    info!("アプリケーション初期化が完了しました");
    Ok(())
}
