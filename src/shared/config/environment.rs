use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// ログレベル
    pub log_level: String,
    /// 起動時に表示する月の指定（`YYYY-MM`、未解釈のまま保持）
    pub initial_month_raw: Option<String>,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    ///
    /// ログ初期化前に呼ばれるため、ここではログを出さない
    ///
    /// # 戻り値
    /// 環境設定
    pub fn from_env() -> Self {
        let environment = get_environment();
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| match environment {
            Environment::Development => "debug".to_string(),
            Environment::Production => "info".to_string(),
        });

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            log_level,
            initial_month_raw: std::env::var("CALENDAR_INITIAL_MONTH").ok(),
        }
    }

    /// 起動時に表示する月を解釈する
    ///
    /// 不正な値は警告を出して無視し、当月へフォールバックさせる。
    /// ログ初期化後に呼ぶこと。
    ///
    /// # 戻り値
    /// 月初日、未設定または不正な場合はNone
    pub fn initial_month(&self) -> Option<NaiveDate> {
        let raw = self.initial_month_raw.as_deref()?;
        match parse_initial_month(raw) {
            Ok(month) => Some(month),
            Err(e) => {
                log::warn!("{e}。当月を表示します");
                None
            }
        }
    }

    /// ログレベル文字列を`log::LevelFilter`に変換する
    ///
    /// 未知の値は`Info`として扱う
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

/// `YYYY-MM`形式の月指定を月初日に変換する
///
/// # 引数
/// * `value` - 月指定文字列
///
/// # 戻り値
/// 月初日、または形式が不正な場合は設定エラー
pub fn parse_initial_month(value: &str) -> AppResult<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").map_err(|_| {
        AppError::configuration(format!(
            "CALENDAR_INITIAL_MONTH はYYYY-MM形式で指定してください: {trimmed}"
        ))
    })
}

/// 現在の実行環境を判定する
///
/// # 戻り値
/// 現在の実行環境（Development または Production）
///
/// # 判定ロジック
/// 1. 実行時環境変数 ENVIRONMENT を確認
/// 2. デバッグビルドの場合は Development
/// 3. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        return match env_var.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
    }

    // フォールバック: ビルド設定に基づく判定
    if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    }
}

/// .envファイル読み込みの結果
///
/// 読み込みはログ初期化より前に行うため、結果を保持しておき後からログへ出す
#[derive(Debug, Clone, PartialEq)]
pub struct EnvFileLoad {
    /// ENVIRONMENT の値（未設定なら"development"）
    pub environment: String,
    /// 環境に応じた読み込み対象ファイル
    pub requested: &'static str,
    /// 実際に読み込んだファイル
    pub loaded: Option<&'static str>,
}

impl EnvFileLoad {
    /// 読み込み結果をログに出力する
    pub fn log(&self) {
        log::info!(
            "環境: {}, 読み込み対象: {}",
            self.environment,
            self.requested
        );

        match self.loaded {
            Some(file) if file == self.requested => {
                log::info!("{file}ファイルを読み込みました");
            }
            Some(file) => {
                log::warn!(
                    "{}が見つからないため、デフォルトの{file}ファイルを読み込みました",
                    self.requested
                );
            }
            None => {
                log::warn!("環境変数ファイルが見つかりません。直接設定された環境変数を使用します。");
            }
        }
    }
}

/// 環境に応じた.envファイルを読み込む
///
/// # 処理内容
/// 1. 環境に応じた.envファイルを読み込み
/// 2. 見つからない場合はデフォルトの.envにフォールバック
///
/// # 戻り値
/// 読み込み結果（ログ出力は`EnvFileLoad::log`で行う）
pub fn load_environment_variables() -> EnvFileLoad {
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let requested = match environment.as_str() {
        "production" => ".env.production",
        _ => ".env",
    };

    let loaded = if dotenv::from_filename(requested).is_ok() {
        Some(requested)
    } else if requested != ".env" && dotenv::dotenv().is_ok() {
        Some(".env")
    } else {
        None
    };

    EnvFileLoad {
        environment,
        requested,
        loaded,
    }
}

/// ログシステムを初期化する
///
/// # 引数
/// * `env_config` - 環境設定
///
/// # 処理内容
/// 1. ログレベルを設定
/// 2. env_loggerを初期化（二重初期化は無視）
pub fn initialize_logging_system(env_config: &EnvironmentConfig) {
    let initialized = env_logger::Builder::from_default_env()
        .filter_level(env_config.level_filter())
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    if initialized.is_ok() {
        log::info!(
            "ログシステムを初期化しました: level={}, environment={}",
            env_config.log_level,
            env_config.environment
        );
    }
}
