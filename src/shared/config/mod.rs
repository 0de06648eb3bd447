/// 環境設定とログ初期化
pub mod environment;

pub use environment::{
    get_environment, initialize_logging_system, load_environment_variables,
    parse_initial_month, EnvFileLoad, Environment, EnvironmentConfig,
};
